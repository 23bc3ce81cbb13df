//! Fan-out/fan-in orchestration of per-file validator tasks.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classifier::LayerAssignment;
use crate::discovery::ProjectTree;
use crate::types::{Finding, Layer};
use crate::validator::ValidatorBox;

/// Default bound on concurrent (file, validator) tasks.
///
/// Small on purpose: the advisor is the scarce, rate-limited resource and
/// the pool size bounds outstanding advisor calls.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Errors raised while setting up the fan-out stage.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The worker pool could not be constructed.
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// One file selected for analysis: content is read once, before fan-out,
/// and shared immutably by every task touching the file.
struct FileTask {
    relative: PathBuf,
    layer: Layer,
    content: String,
}

/// Runs every configured validator against every selected file on a
/// bounded worker pool and fans the findings back in.
pub struct ValidatorOrchestrator {
    concurrency: usize,
}

impl Default for ValidatorOrchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

impl ValidatorOrchestrator {
    /// Creates an orchestrator with the given concurrency bound (min 1).
    #[must_use]
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Fans (file, validator) tasks out and returns the findings in
    /// submission order: directory order, then file order, then validator
    /// order.
    ///
    /// Execution completes out of order, but `collect` places each task's
    /// result back into its origin-indexed slot, so the returned sequence
    /// is identical for identical inputs regardless of scheduling. A task
    /// that fails is logged with its file/validator identity and
    /// contributes zero findings; sibling tasks are unaffected. Every
    /// finding is stamped with its file's relative path.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::Pool`] if the worker pool cannot be
    /// built; individual task failures never propagate.
    pub fn run(
        &self,
        root: &Path,
        tree: &ProjectTree,
        assignment: &LayerAssignment,
        validators: &[ValidatorBox],
    ) -> Result<Vec<Finding>, OrchestratorError> {
        let files = collect_files(root, tree, assignment);
        let tasks: Vec<(usize, usize)> = (0..files.len())
            .flat_map(|f| (0..validators.len()).map(move |v| (f, v)))
            .collect();

        info!(
            "running {} validators over {} files ({} tasks, concurrency {})",
            validators.len(),
            files.len(),
            tasks.len(),
            self.concurrency
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency)
            .build()?;

        let per_task: Vec<Vec<Finding>> = pool.install(|| {
            tasks
                .par_iter()
                .map(|&(f, v)| {
                    let file = &files[f];
                    let validator = &validators[v];
                    let relative = file.relative.to_string_lossy();
                    debug!("running {} on {relative}", validator.name());

                    match validator.invoke(&file.content, file.layer, &relative) {
                        Ok(findings) => findings
                            .into_iter()
                            .map(|finding| normalize_range(finding).with_filepath(relative.clone()))
                            .collect(),
                        Err(e) => {
                            warn!("{} failed on {relative}: {e}", validator.name());
                            Vec::new()
                        }
                    }
                })
                .collect()
        });

        Ok(per_task.into_iter().flatten().collect())
    }
}

/// Re-asserts the `1 <= start <= end` invariant on findings coming back
/// from external validators, which construct [`Finding`] values freely.
fn normalize_range(mut finding: Finding) -> Finding {
    if let Some(start) = finding.start_line {
        let start = start.max(1);
        finding.start_line = Some(start);
        finding.end_line = Some(finding.end_line.map_or(start, |end| end.max(start)));
    }
    finding
}

/// Reads each selected file once, in directory order then file order.
///
/// Directories absent from the assignment are skipped entirely; unreadable
/// files are logged and dropped (their tasks contribute zero findings).
fn collect_files(root: &Path, tree: &ProjectTree, assignment: &LayerAssignment) -> Vec<FileTask> {
    let mut files = Vec::new();
    for (dir, layer) in assignment {
        let Some(names) = tree.get(dir) else {
            continue;
        };
        for name in names {
            let relative = if dir == Path::new(".") {
                PathBuf::from(name)
            } else {
                dir.join(name)
            };
            match std::fs::read_to_string(root.join(&relative)) {
                Ok(content) => files.push(FileTask {
                    relative,
                    layer: *layer,
                    content,
                }),
                Err(e) => warn!("skipping unreadable file {}: {e}", relative.display()),
            }
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FindingKind;
    use crate::validator::{Validator, ValidatorError};
    use std::fs;
    use std::time::Duration;

    /// Emits one finding naming the (validator, file) pair. Sleeps on
    /// configured paths so that early-submitted tasks finish last.
    struct ScriptedValidator {
        tag: &'static str,
        slow_on: &'static [&'static str],
        fail_on: &'static [&'static str],
    }

    impl Validator for ScriptedValidator {
        fn name(&self) -> &'static str {
            self.tag
        }

        fn invoke(
            &self,
            _content: &str,
            _layer: Layer,
            relative_path: &str,
        ) -> Result<Vec<Finding>, ValidatorError> {
            if self.slow_on.contains(&relative_path) {
                std::thread::sleep(Duration::from_millis(50));
            }
            if self.fail_on.contains(&relative_path) {
                return Err(ValidatorError::Parse("scripted failure".to_string()));
            }
            Ok(vec![Finding::code(
                FindingKind::Other("scripted".to_string()),
                1,
                1,
                format!("{}:{relative_path}", self.tag),
            )])
        }
    }

    /// Two directories x two files, classified core/adapters.
    fn fixture() -> (tempfile::TempDir, ProjectTree, LayerAssignment) {
        let dir = tempfile::tempdir().expect("tempdir");
        for path in ["a/one.py", "a/two.py", "b/one.py", "b/two.py"] {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().expect("parent")).expect("mkdir");
            fs::write(full, "x = 1\n").expect("write");
        }
        let tree: ProjectTree = [
            (
                PathBuf::from("a"),
                vec!["one.py".to_string(), "two.py".to_string()],
            ),
            (
                PathBuf::from("b"),
                vec!["one.py".to_string(), "two.py".to_string()],
            ),
        ]
        .into_iter()
        .collect();
        let assignment: LayerAssignment = [
            (PathBuf::from("a"), Layer::Core),
            (PathBuf::from("b"), Layer::Adapters),
        ]
        .into_iter()
        .collect();
        (dir, tree, assignment)
    }

    fn expected_order(tags: &[&str]) -> Vec<String> {
        let mut expected = Vec::new();
        for file in ["a/one.py", "a/two.py", "b/one.py", "b/two.py"] {
            for tag in tags {
                expected.push(format!("{tag}:{file}"));
            }
        }
        expected
    }

    #[test]
    fn findings_follow_submission_order_despite_completion_order() {
        let (dir, tree, assignment) = fixture();
        // The first-submitted file is the slowest: completion order is
        // guaranteed to differ from submission order.
        let validators: Vec<ValidatorBox> = vec![
            Box::new(ScriptedValidator {
                tag: "v1",
                slow_on: &["a/one.py"],
                fail_on: &[],
            }),
            Box::new(ScriptedValidator {
                tag: "v2",
                slow_on: &["a/one.py"],
                fail_on: &[],
            }),
        ];

        let findings = ValidatorOrchestrator::new(4)
            .run(dir.path(), &tree, &assignment, &validators)
            .expect("run");

        let messages: Vec<String> = findings.iter().map(|f| f.message.clone()).collect();
        assert_eq!(messages, expected_order(&["v1", "v2"]));
    }

    #[test]
    fn single_task_failure_drops_only_its_contribution() {
        let (dir, tree, assignment) = fixture();
        let validators: Vec<ValidatorBox> = vec![
            Box::new(ScriptedValidator {
                tag: "v1",
                slow_on: &[],
                fail_on: &[],
            }),
            Box::new(ScriptedValidator {
                tag: "v2",
                slow_on: &[],
                fail_on: &["b/one.py"],
            }),
        ];

        let findings = ValidatorOrchestrator::new(4)
            .run(dir.path(), &tree, &assignment, &validators)
            .expect("run");

        let messages: Vec<String> = findings.iter().map(|f| f.message.clone()).collect();
        let expected: Vec<String> = expected_order(&["v1", "v2"])
            .into_iter()
            .filter(|m| m != "v2:b/one.py")
            .collect();
        assert_eq!(messages, expected);
    }

    #[test]
    fn findings_are_stamped_with_relative_paths() {
        let (dir, tree, assignment) = fixture();
        let validators: Vec<ValidatorBox> = vec![Box::new(ScriptedValidator {
            tag: "v1",
            slow_on: &[],
            fail_on: &[],
        })];

        let findings = ValidatorOrchestrator::new(2)
            .run(dir.path(), &tree, &assignment, &validators)
            .expect("run");

        assert_eq!(findings.len(), 4);
        assert!(findings.iter().all(Finding::is_code));
        assert_eq!(findings[0].filepath.as_deref(), Some("a/one.py"));
    }

    #[test]
    fn unassigned_directories_are_not_analyzed() {
        let (dir, tree, _) = fixture();
        let assignment: LayerAssignment =
            [(PathBuf::from("a"), Layer::Core)].into_iter().collect();
        let validators: Vec<ValidatorBox> = vec![Box::new(ScriptedValidator {
            tag: "v1",
            slow_on: &[],
            fail_on: &[],
        })];

        let findings = ValidatorOrchestrator::default()
            .run(dir.path(), &tree, &assignment, &validators)
            .expect("run");

        assert_eq!(findings.len(), 2);
        assert!(findings
            .iter()
            .all(|f| f.filepath.as_deref().is_some_and(|p| p.starts_with("a/"))));
    }

    #[test]
    fn hand_built_ranges_are_normalized_at_the_boundary() {
        struct RawValidator;
        impl Validator for RawValidator {
            fn name(&self) -> &'static str {
                "raw"
            }
            fn invoke(
                &self,
                _content: &str,
                _layer: Layer,
                _relative_path: &str,
            ) -> Result<Vec<Finding>, ValidatorError> {
                Ok(vec![Finding {
                    kind: FindingKind::Data,
                    filepath: None,
                    start_line: Some(0),
                    end_line: None,
                    message: "raw".to_string(),
                    suggestion: None,
                }])
            }
        }

        let (dir, tree, assignment) = fixture();
        let validators: Vec<ValidatorBox> = vec![Box::new(RawValidator)];
        let findings = ValidatorOrchestrator::default()
            .run(dir.path(), &tree, &assignment, &validators)
            .expect("run");

        assert!(findings
            .iter()
            .all(|f| f.start_line == Some(1) && f.end_line == Some(1)));
    }

    #[test]
    fn empty_assignment_yields_no_findings() {
        let (dir, tree, _) = fixture();
        let validators: Vec<ValidatorBox> = vec![Box::new(ScriptedValidator {
            tag: "v1",
            slow_on: &[],
            fail_on: &[],
        })];

        let findings = ValidatorOrchestrator::default()
            .run(dir.path(), &tree, &LayerAssignment::new(), &validators)
            .expect("run");

        assert!(findings.is_empty());
    }
}
