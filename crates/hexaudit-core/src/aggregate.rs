//! Fan-in aggregation of findings into a single report.

use std::collections::HashMap;

use crate::types::{AnalysisReport, Finding, FindingKind};

/// Returns the built-in kind-to-title table.
#[must_use]
pub fn default_title_table() -> HashMap<FindingKind, String> {
    [
        (FindingKind::DisallowedDeps, "Disallowed dependencies"),
        (FindingKind::Architecture, "Architecture"),
        (FindingKind::Logging, "Logging"),
        (FindingKind::Auth, "Authentication and authorization"),
        (FindingKind::Data, "Data handling"),
        (FindingKind::ProjectStructure, "Project structure"),
    ]
    .into_iter()
    .map(|(kind, title)| (kind, title.to_string()))
    .collect()
}

/// Merges code and project findings into an [`AnalysisReport`], resolving
/// section titles by finding kind.
pub struct ResultAggregator {
    titles: HashMap<FindingKind, String>,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new(default_title_table())
    }
}

impl ResultAggregator {
    /// Creates an aggregator with the given kind-to-title table.
    #[must_use]
    pub fn new(titles: HashMap<FindingKind, String>) -> Self {
        Self { titles }
    }

    /// Builds the report. `titles` becomes the first-seen-order
    /// deduplicated sequence of resolved titles across code findings then
    /// project findings; a kind absent from the table falls back to its
    /// literal kind string. The finding sequences themselves pass through
    /// untouched: no reordering, no deduplication.
    #[must_use]
    pub fn aggregate(
        &self,
        code_findings: Vec<Finding>,
        project_findings: Vec<Finding>,
    ) -> AnalysisReport {
        let mut titles: Vec<String> = Vec::new();
        for finding in code_findings.iter().chain(project_findings.iter()) {
            let title = self.resolve_title(&finding.kind);
            if !titles.contains(&title) {
                titles.push(title);
            }
        }
        AnalysisReport {
            titles,
            code_findings,
            project_findings,
        }
    }

    /// Resolves the display title for a finding kind.
    #[must_use]
    pub fn resolve_title(&self, kind: &FindingKind) -> String {
        self.titles
            .get(kind)
            .cloned()
            .unwrap_or_else(|| kind.as_str().to_string())
    }
}
