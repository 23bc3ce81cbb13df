//! Project-level validator checking repository layout.
//!
//! Renders an ASCII tree of the project and asks the advisor to check it
//! against the standard repository layout requirements. Runs once per
//! review, not per file.

use std::path::Path;

use serde::Deserialize;

use hexaudit_core::text::extract_json_block;
use hexaudit_core::{
    AdvisorRef, Finding, FindingKind, ProjectTree, ProjectValidator, ValidatorError,
};

/// Validator name for project-structure.
pub const NAME: &str = "project-structure";

const STRUCTURE_PROMPT: &str = r#"You are a helpful AI code reviewer.

## Your task
You receive an ASCII representation named TREE of a project's directory
tree. Check it against the requirements described below.

### Requirements
- `.gitignore` is at the root
- `.editorconfig` is at the root
- `.gitattributes` is at the root
- CI/CD files live in `deployment`
- `docs` holds the technical documentation (diagrams built with PlantUml):
  use-case diagram, database diagram, deployment diagram, component diagram
- a `components` directory at the root separates frontend from backend
- the backend follows the hexagonal architecture: three layers split into
  three directories named application, adapters and composites, each
  holding a directory with the backend files
- the backend directory is a standard python package
- `setup.py` (or `setup.cfg`) describes package metadata and dependencies
- `pyproject.toml` holds builder and autoformatter configuration
- `README.md` briefly describes the project, how to run it locally or in a
  container, how to run the tests, and the rights/groups scheme

## Input

TREE:
```
{tree}
```

## Result
List the defects found in TREE relative to the requirements. Do not write
positive comments!
You MUST answer with JSON of the following structure:
```json
{"comments": [{"comment": "..."}]}
```
"#;

#[derive(Debug, Deserialize)]
struct StructureReply {
    comments: Vec<StructureComment>,
}

#[derive(Debug, Deserialize)]
struct StructureComment {
    comment: String,
}

/// Checks the repository layout as a whole through the advisor.
pub struct ProjectStructureValidator {
    advisor: AdvisorRef,
}

impl ProjectStructureValidator {
    /// Creates the validator on top of an advisor.
    #[must_use]
    pub fn new(advisor: AdvisorRef) -> Self {
        Self { advisor }
    }
}

impl ProjectValidator for ProjectStructureValidator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn invoke(&self, root: &Path, _tree: &ProjectTree) -> Result<Vec<Finding>, ValidatorError> {
        let prompt = STRUCTURE_PROMPT.replace("{tree}", &render_ascii_tree(root));

        let reply = self.advisor.infer(&prompt)?;
        let block = extract_json_block(&reply)
            .ok_or_else(|| ValidatorError::Parse("no JSON block in reply".to_string()))?;
        let parsed: StructureReply =
            serde_json::from_str(block).map_err(|e| ValidatorError::Parse(e.to_string()))?;

        Ok(parsed
            .comments
            .into_iter()
            .map(|c| Finding::project(FindingKind::ProjectStructure, c.comment))
            .collect())
    }
}

/// Renders the full directory tree (all files, not only the reviewed
/// extension), indented two spaces per depth level, in sorted order.
fn render_ascii_tree(root: &Path) -> String {
    let mut out = String::new();
    let walker = walkdir::WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name();
    for entry in walker.into_iter().filter_map(Result::ok) {
        let depth = entry.depth();
        let name = entry.file_name().to_string_lossy();
        for _ in 1..depth {
            out.push_str("  ");
        }
        out.push_str(&name);
        if entry.file_type().is_dir() {
            out.push('/');
        }
        out.push('\n');
    }
    out
}
