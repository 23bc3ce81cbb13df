//! Core types for review findings and reports.

use serde::{Deserialize, Serialize};

/// Architectural layer assigned to a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Business logic: entities, DTOs, services, domain rules.
    Core,
    /// Integrations with the outside world: DB code, web controllers, clients.
    Adapters,
    /// Assembly and startup: settings, dependency injection, entry points.
    Composite,
    /// Unit and integration tests.
    Tests,
    /// Documentation.
    Docs,
    /// The classifier could not place the directory.
    Unclassified,
}

impl Layer {
    /// Maps a free-text label from the classifier to a layer.
    ///
    /// Unknown labels become [`Layer::Unclassified`] rather than being
    /// dropped, so an answered directory is still analyzed.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "core" => Self::Core,
            "adapters" | "adapter" => Self::Adapters,
            // Both spellings occur in classifier replies
            "composite" | "composites" => Self::Composite,
            "tests" | "test" => Self::Tests,
            "docs" | "documentation" => Self::Docs,
            _ => Self::Unclassified,
        }
    }

    /// Returns the canonical lowercase name of this layer.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Adapters => "adapters",
            Self::Composite => "composite",
            Self::Tests => "tests",
            Self::Docs => "docs",
            Self::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a finding, used to resolve the report section title.
///
/// Pluggable validators may emit kinds the aggregator has no title for;
/// those round-trip through [`FindingKind::Other`] and fall back to the raw
/// kind string as their title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FindingKind {
    /// Imports outside the approved allow-list.
    DisallowedDeps,
    /// Code that does not belong to its assigned layer.
    Architecture,
    /// Logging discipline problems.
    Logging,
    /// Authentication/authorization handling problems.
    Auth,
    /// Dialect-dependent or data-handling problems.
    Data,
    /// Repository layout problems.
    ProjectStructure,
    /// A kind registered by an external validator.
    Other(String),
}

impl FindingKind {
    /// Returns the wire identifier of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::DisallowedDeps => "disallowed-deps",
            Self::Architecture => "architecture",
            Self::Logging => "logging",
            Self::Auth => "auth",
            Self::Data => "data",
            Self::ProjectStructure => "project-structure",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for FindingKind {
    fn from(s: &str) -> Self {
        match s {
            "disallowed-deps" => Self::DisallowedDeps,
            "architecture" => Self::Architecture,
            "logging" => Self::Logging,
            "auth" => Self::Auth,
            "data" => Self::Data,
            "project-structure" => Self::ProjectStructure,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for FindingKind {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<FindingKind> for String {
    fn from(kind: FindingKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reviewer observation.
///
/// Code-level findings carry a file path and a 1-indexed line range with
/// `1 <= start_line <= end_line`; project-level findings carry neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Category of the finding.
    pub kind: FindingKind,
    /// Path relative to the project root; `None` for project-level findings.
    pub filepath: Option<String>,
    /// First line of the flagged range (1-indexed).
    pub start_line: Option<usize>,
    /// Last line of the flagged range (1-indexed, inclusive).
    pub end_line: Option<usize>,
    /// Human-readable description of the problem.
    pub message: String,
    /// Optional fix suggestion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Finding {
    /// Creates a code-level finding.
    ///
    /// Line numbers arrive from model output and are normalized here:
    /// `start_line` is clamped to at least 1 and `end_line` to at least
    /// `start_line`. The file path is stamped later by the orchestrator.
    #[must_use]
    pub fn code(kind: FindingKind, start_line: i64, end_line: i64, message: impl Into<String>) -> Self {
        let start = usize::try_from(start_line.max(1)).unwrap_or(1);
        let end = usize::try_from(end_line.max(1)).unwrap_or(1).max(start);
        Self {
            kind,
            filepath: None,
            start_line: Some(start),
            end_line: Some(end),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Creates a project-level finding (no location).
    #[must_use]
    pub fn project(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            filepath: None,
            start_line: None,
            end_line: None,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Attaches a fix suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Stamps the relative path of the file this finding belongs to.
    #[must_use]
    pub fn with_filepath(mut self, filepath: impl Into<String>) -> Self {
        self.filepath = Some(filepath.into());
        self
    }

    /// Returns true if this finding points at a line range in a file.
    #[must_use]
    pub fn is_code(&self) -> bool {
        self.filepath.is_some() && self.start_line.is_some() && self.end_line.is_some()
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.filepath, self.start_line, self.end_line) {
            (Some(path), Some(start), Some(end)) => {
                write!(f, "{}:{start}-{end}: [{}] {}", path, self.kind, self.message)
            }
            _ => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// The aggregated result of a review run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Section titles in first-seen order, deduplicated.
    pub titles: Vec<String>,
    /// Findings located at a file/line range, in submission order.
    pub code_findings: Vec<Finding>,
    /// Findings about the project as a whole.
    pub project_findings: Vec<Finding>,
}

impl AnalysisReport {
    /// Total number of findings across both streams.
    #[must_use]
    pub fn total_findings(&self) -> usize {
        self.code_findings.len() + self.project_findings.len()
    }

    /// Returns true if the review produced no findings at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code_findings.is_empty() && self.project_findings.is_empty()
    }
}

/// One displayed source line inside a [`Window`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowLine {
    /// 1-indexed line number in the source file.
    pub line_number: usize,
    /// Verbatim line text, without trailing newline.
    pub text: String,
}

/// Padded slice of source lines shown around a code finding.
///
/// A derived, disposable view: not part of the finding's identity.
pub type Window = Vec<WindowLine>;

/// A code finding decorated with its display window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedFinding {
    /// The finding itself.
    #[serde(flatten)]
    pub finding: Finding,
    /// Context lines around the flagged range.
    pub lines: Window,
}

/// An [`AnalysisReport`] with window-decorated code findings, the shape
/// handed to report consumers for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedReport {
    /// Section titles in first-seen order.
    pub titles: Vec<String>,
    /// Code findings with their context windows.
    pub code_findings: Vec<AnnotatedFinding>,
    /// Project-level findings, unchanged.
    pub project_findings: Vec<Finding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_finding_normalizes_line_range() {
        let f = Finding::code(FindingKind::Logging, 0, -3, "print used");
        assert_eq!(f.start_line, Some(1));
        assert_eq!(f.end_line, Some(1));

        let f = Finding::code(FindingKind::Logging, 7, 4, "inverted");
        assert_eq!(f.start_line, Some(7));
        assert_eq!(f.end_line, Some(7));
    }

    #[test]
    fn code_finding_keeps_valid_range() {
        let f = Finding::code(FindingKind::Architecture, 3, 9, "misplaced");
        assert_eq!(f.start_line, Some(3));
        assert_eq!(f.end_line, Some(9));
        assert!(!f.is_code()); // no filepath stamped yet
        assert!(f.with_filepath("src/a.py").is_code());
    }

    #[test]
    fn project_finding_has_no_location() {
        let f = Finding::project(FindingKind::DisallowedDeps, "bad deps");
        assert!(f.filepath.is_none());
        assert!(f.start_line.is_none());
        assert!(f.end_line.is_none());
        assert!(!f.is_code());
    }

    #[test]
    fn kind_round_trips_through_string() {
        for kind in [
            FindingKind::DisallowedDeps,
            FindingKind::Architecture,
            FindingKind::Logging,
            FindingKind::Auth,
            FindingKind::Data,
            FindingKind::ProjectStructure,
            FindingKind::Other("secrets".to_string()),
        ] {
            assert_eq!(FindingKind::from(kind.as_str()), kind);
        }
    }

    #[test]
    fn layer_from_label_accepts_both_composite_spellings() {
        assert_eq!(Layer::from_label("composite"), Layer::Composite);
        assert_eq!(Layer::from_label("composites"), Layer::Composite);
        assert_eq!(Layer::from_label(" Core "), Layer::Core);
        assert_eq!(Layer::from_label("frontend"), Layer::Unclassified);
    }

    #[test]
    fn finding_serializes_kind_as_string() {
        let f = Finding::project(FindingKind::DisallowedDeps, "msg");
        let json = serde_json::to_value(&f).expect("serialize");
        assert_eq!(json["kind"], "disallowed-deps");
    }
}
