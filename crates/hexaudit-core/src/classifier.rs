//! Layer classification: one batched advisor call over the project tree.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::warn;

use crate::advisor::AdvisorRef;
use crate::discovery::ProjectTree;
use crate::text::extract_json_block;
use crate::types::Layer;

/// Mapping from directory path to its assigned layer.
///
/// Only directories present in the input [`ProjectTree`] may appear here.
pub type LayerAssignment = BTreeMap<PathBuf, Layer>;

/// What happened while reconciling the advisor's reply against the input
/// tree. Surfaced so that silent data loss is detectable in tests and logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Directories classified and kept.
    pub matched: usize,
    /// Tree directories the reply did not resolve; dropped from analysis.
    pub missing_from_reply: Vec<PathBuf>,
    /// Reply keys with no counterpart in the tree; ignored.
    pub extra_in_reply: Vec<PathBuf>,
    /// True when the advisor call failed or its reply was unparsable and
    /// the whole classification degraded to empty.
    pub degraded: bool,
}

/// Result of a classification run.
#[derive(Debug, Clone, Default)]
pub struct ClassificationOutcome {
    /// Directory-to-layer mapping, restricted to the input tree's keys.
    pub assignment: LayerAssignment,
    /// Record of how the reply lined up with the input tree.
    pub reconciliation: Reconciliation,
}

const CLASSIFIER_PROMPT: &str = r#"## System prompt
You are a code review assistant.

## Your task
You receive the structure of a project named PROJECT as a JSON object whose
keys are directory paths and whose values are the lists of source files in
each directory. The project is expected to follow the hexagonal
architecture. Classify every directory (every key of the object) into
exactly one of the classes below, using your knowledge of how a hexagonal
project is laid out together with the directory and file names.

## Class descriptions
1. **core**
The application layer holds everything related to business logic (entities,
DTOs, constants, domain services and so on). This layer does not depend on
integrations (adapters); dependency injection is used instead. The core
declares the interfaces for obtaining data, the adapters implement them.
2. **adapters**
Adapters hold integrations with external services: database code (table
definitions, migrations, queries), web controllers, CLI entry points,
producers, consumers and other integration components such as API clients.
Primary and secondary adapters may share a directory.
3. **composite**
Where components are assembled for startup. Settings are initialized and
dependencies injected here; `settings.py`-style files usually live here.
4. **tests**
Application test modules: unit tests and integration tests.
5. **docs**
Documentation.

## Output format
You MUST answer with a JSON object whose keys are directory paths (NOT
files) and whose values are the class names. Do not add any reasoning.

Output format:
```json
<your answer>
```

PROJECT:
{project}
Your answer:
"#;

/// Assigns an architectural layer to each discovered directory with a
/// single batched advisor request.
pub struct LayerClassifier {
    advisor: AdvisorRef,
}

impl LayerClassifier {
    /// Creates a classifier backed by the given advisor.
    #[must_use]
    pub fn new(advisor: AdvisorRef) -> Self {
        Self { advisor }
    }

    /// Classifies every directory of `tree` in one advisor call.
    ///
    /// Never fails the run: an advisor error or an unparsable reply
    /// degrades to an empty assignment (zero directories selected), and a
    /// reply whose key set diverges from the tree is reconciled down to
    /// the intersection. Both degradations are logged and recorded on the
    /// returned [`Reconciliation`].
    #[must_use]
    pub fn classify(&self, tree: &ProjectTree) -> ClassificationOutcome {
        let prompt = CLASSIFIER_PROMPT.replace("{project}", &render_tree(tree));

        let reply = match self.advisor.infer(&prompt) {
            Ok(reply) => reply,
            Err(e) => {
                warn!("layer classification degraded to empty: {e}");
                return degraded_outcome();
            }
        };

        let Some(parsed) = parse_reply(&reply) else {
            warn!("layer classification reply was unparsable, degrading to empty");
            return degraded_outcome();
        };

        self.reconcile(tree, parsed)
    }

    /// Keeps the intersection of the reply's key set with the tree's,
    /// recording (not raising on) any mismatch.
    fn reconcile(
        &self,
        tree: &ProjectTree,
        parsed: BTreeMap<String, String>,
    ) -> ClassificationOutcome {
        let mut assignment = LayerAssignment::new();
        let mut extra_in_reply = Vec::new();

        for (dir, label) in parsed {
            let path = PathBuf::from(dir);
            if tree.contains_key(&path) {
                assignment.insert(path, Layer::from_label(&label));
            } else {
                extra_in_reply.push(path);
            }
        }

        let missing_from_reply: Vec<PathBuf> = tree
            .keys()
            .filter(|dir| !assignment.contains_key(*dir))
            .cloned()
            .collect();

        if !missing_from_reply.is_empty() {
            warn!(
                "classifier reply did not resolve {} directories; dropping them from analysis",
                missing_from_reply.len()
            );
        }
        if !extra_in_reply.is_empty() {
            warn!(
                "classifier reply named {} directories not present in the tree; ignoring them",
                extra_in_reply.len()
            );
        }

        ClassificationOutcome {
            reconciliation: Reconciliation {
                matched: assignment.len(),
                missing_from_reply,
                extra_in_reply,
                degraded: false,
            },
            assignment,
        }
    }
}

fn degraded_outcome() -> ClassificationOutcome {
    ClassificationOutcome {
        assignment: LayerAssignment::new(),
        reconciliation: Reconciliation {
            degraded: true,
            ..Reconciliation::default()
        },
    }
}

/// Serializes the tree as the JSON object the prompt embeds.
fn render_tree(tree: &ProjectTree) -> String {
    let as_strings: BTreeMap<String, &Vec<String>> = tree
        .iter()
        .map(|(dir, files)| (dir.to_string_lossy().into_owned(), files))
        .collect();
    serde_json::to_string_pretty(&as_strings).unwrap_or_else(|_| String::from("{}"))
}

/// Strict structured decode of the reply; `None` on any shape mismatch.
fn parse_reply(reply: &str) -> Option<BTreeMap<String, String>> {
    let block = extract_json_block(reply)?;
    serde_json::from_str(block).ok()
}
