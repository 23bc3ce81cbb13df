//! End-to-end run of the review pipeline with a scripted advisor.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use hexaudit_core::{
    Advisor, AdvisorError, FindingKind, Reviewer, SnippetWindowExtractor,
};
use hexaudit_validators::{default_project_validators, default_validators};

/// Dispatches on prompt markers so one advisor can serve every pass.
struct ScriptedAdvisor;

impl Advisor for ScriptedAdvisor {
    fn infer(&self, prompt: &str) -> Result<String, AdvisorError> {
        // Classification: one batched request over the whole tree.
        if prompt.contains("PROJECT:") {
            return Ok(
                "```json\n{\"app/core\": \"core\", \"app/adapters\": \"adapters\"}\n```"
                    .to_string(),
            );
        }
        // Layer fit: flag only the core service file.
        if prompt.contains("FILE belongs to the layer") {
            if prompt.contains("app/core/service.py") {
                return Ok(r#"```json
{"comments": [{"type": "architecture", "start_line_number": 2, "end_line_number": 2, "comment": "database session opened in core"}]}
```"#
                    .to_string());
            }
            return Ok("```json\n{\"comments\": []}\n```".to_string());
        }
        // Logging: flag the print in the adapter file.
        if prompt.contains("SCRIPT:") {
            if prompt.contains("print(") {
                return Ok(r#"```json
{"errors": [{"start_line_number": 3, "end_line_number": 3, "comment": "print used", "suggestion": "use a module logger"}]}
```"#
                    .to_string());
            }
            return Ok("```json\n{\"errors\": []}\n```".to_string());
        }
        // Project structure.
        if prompt.contains("TREE:") {
            return Ok(
                "```json\n{\"comments\": [{\"comment\": \"no .gitignore at the root\"}]}\n```"
                    .to_string(),
            );
        }
        Err(AdvisorError::Api("unexpected prompt".to_string()))
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "app/core/service.py",
        "import sqlalchemy\nsession = sqlalchemy.orm.Session()\n",
    );
    write(
        dir.path(),
        "app/adapters/console.py",
        "import leftpad\n\nprint('hi')\n",
    );
    dir
}

#[test]
fn full_pipeline_produces_an_ordered_annotated_report() {
    let dir = fixture();
    let advisor: Arc<dyn Advisor> = Arc::new(ScriptedAdvisor);

    let mut builder = Reviewer::builder()
        .root(dir.path())
        .advisor(advisor.clone())
        .validator_boxes(default_validators(&advisor));
    for validator in default_project_validators(&advisor) {
        builder = builder.project_validator_box(validator);
    }
    let report = builder.build().review().expect("review");

    // Two code findings: directory order puts adapters before core, and
    // within a file validators report in registration order.
    assert_eq!(report.code_findings.len(), 2);
    assert_eq!(
        report.code_findings[0].filepath.as_deref(),
        Some("app/adapters/console.py")
    );
    assert_eq!(report.code_findings[0].kind, FindingKind::Logging);
    assert_eq!(
        report.code_findings[1].filepath.as_deref(),
        Some("app/core/service.py")
    );
    assert_eq!(report.code_findings[1].kind, FindingKind::Architecture);

    // Project findings: dependency audit first, then structure pass.
    assert_eq!(report.project_findings.len(), 2);
    assert_eq!(report.project_findings[0].kind, FindingKind::DisallowedDeps);
    assert!(report.project_findings[0].message.contains("leftpad"));
    // sqlalchemy is on the default allow-list.
    assert!(!report.project_findings[0].message.contains("sqlalchemy"));
    assert_eq!(
        report.project_findings[1].kind,
        FindingKind::ProjectStructure
    );

    // Titles in first-seen order across code then project findings.
    assert_eq!(
        report.titles,
        vec![
            "Logging",
            "Architecture",
            "Disallowed dependencies",
            "Project structure"
        ]
    );

    // Window decoration keeps every finding and numbers its context.
    let annotated = SnippetWindowExtractor::new(1).annotate(dir.path(), &report);
    assert_eq!(annotated.code_findings.len(), 2);
    let window = &annotated.code_findings[0].lines;
    assert_eq!(window.first().map(|l| l.line_number), Some(2));
    assert_eq!(window.last().map(|l| l.line_number), Some(3));
    assert!(window.iter().any(|l| l.text.contains("print")));
}

#[test]
fn advisor_outage_still_yields_dependency_findings() {
    struct DownAdvisor;
    impl Advisor for DownAdvisor {
        fn infer(&self, _prompt: &str) -> Result<String, AdvisorError> {
            Err(AdvisorError::Transport("connection refused".to_string()))
        }
    }

    let dir = fixture();
    let advisor: Arc<dyn Advisor> = Arc::new(DownAdvisor);

    let mut builder = Reviewer::builder()
        .root(dir.path())
        .advisor(advisor.clone())
        .validator_boxes(default_validators(&advisor));
    for validator in default_project_validators(&advisor) {
        builder = builder.project_validator_box(validator);
    }
    let report = builder.build().review().expect("review");

    // Classification degraded to empty, so no code findings; the static
    // dependency audit still reports.
    assert!(report.code_findings.is_empty());
    assert_eq!(report.project_findings.len(), 1);
    assert_eq!(report.project_findings[0].kind, FindingKind::DisallowedDeps);
}
