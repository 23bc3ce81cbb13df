//! The review façade: wires discovery, classification, fan-out analysis,
//! dependency audit and aggregation into one run.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::advisor::AdvisorRef;
use crate::aggregate::ResultAggregator;
use crate::classifier::{LayerAssignment, LayerClassifier};
use crate::config::ReviewConfig;
use crate::deps::DependencyAuditor;
use crate::discovery::{DiscoveryError, FileDiscovery, ProjectTree};
use crate::orchestrator::{OrchestratorError, ValidatorOrchestrator};
use crate::types::{AnalysisReport, Finding, Layer};
use crate::validator::{ProjectValidatorBox, ValidatorBox};

/// Errors that abort a review run.
///
/// Deliberately narrow: everything except a bad root and a broken worker
/// pool degrades in place, because the system's job is a best-effort report
/// over a possibly partially-broken project.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The project root is missing or invalid.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// The fan-out stage could not be set up.
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

/// Builder for configuring a [`Reviewer`].
#[derive(Default)]
pub struct ReviewerBuilder {
    root: Option<PathBuf>,
    config: Option<ReviewConfig>,
    advisor: Option<AdvisorRef>,
    validators: Vec<ValidatorBox>,
    project_validators: Vec<ProjectValidatorBox>,
}

impl ReviewerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project root to review (a directory, or a single file).
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: ReviewConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the advisor used for layer classification.
    ///
    /// Without an advisor, classification is skipped and every discovered
    /// directory is assigned [`Layer::Unclassified`].
    #[must_use]
    pub fn advisor(mut self, advisor: AdvisorRef) -> Self {
        self.advisor = Some(advisor);
        self
    }

    /// Adds a per-file validator. Order of registration is the order
    /// findings are reported in.
    #[must_use]
    pub fn validator_box(mut self, validator: ValidatorBox) -> Self {
        self.validators.push(validator);
        self
    }

    /// Adds multiple per-file validators.
    #[must_use]
    pub fn validator_boxes<I>(mut self, validators: I) -> Self
    where
        I: IntoIterator<Item = ValidatorBox>,
    {
        self.validators.extend(validators);
        self
    }

    /// Adds a project-level validator.
    #[must_use]
    pub fn project_validator_box(mut self, validator: ProjectValidatorBox) -> Self {
        self.project_validators.push(validator);
        self
    }

    /// Builds the reviewer. The root defaults to the current directory.
    #[must_use]
    pub fn build(self) -> Reviewer {
        let config = self.config.unwrap_or_default();
        Reviewer {
            root: self.root.unwrap_or_else(|| PathBuf::from(".")),
            classifier: self.advisor.map(LayerClassifier::new),
            auditor: DependencyAuditor::new(config.allowed_deps.clone()),
            aggregator: ResultAggregator::default(),
            validators: self.validators,
            project_validators: self.project_validators,
            config,
        }
    }
}

/// Runs the whole review pipeline over one project.
///
/// Use [`Reviewer::builder()`] to construct an instance.
pub struct Reviewer {
    root: PathBuf,
    config: ReviewConfig,
    classifier: Option<LayerClassifier>,
    auditor: DependencyAuditor,
    aggregator: ResultAggregator,
    validators: Vec<ValidatorBox>,
    project_validators: Vec<ProjectValidatorBox>,
}

impl Reviewer {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> ReviewerBuilder {
        ReviewerBuilder::new()
    }

    /// Returns the root being reviewed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs the pipeline and returns the aggregated report.
    ///
    /// A run always returns a report, possibly with fewer findings than a
    /// fully-successful one; only an invalid root (or a broken worker
    /// pool) aborts.
    ///
    /// # Errors
    ///
    /// Returns a [`ReviewError`] for the fatal cases above.
    pub fn review(&self) -> Result<AnalysisReport, ReviewError> {
        if self.root.is_file() {
            return self.review_single_file();
        }

        let discovery = FileDiscovery::new(&self.config.extension)
            .excludes(self.config.exclude.iter().cloned());
        let tree = discovery.discover(&self.root)?;
        info!(
            "discovered {} directories with matching files under {}",
            tree.len(),
            self.root.display()
        );

        let assignment = self.classify(&tree);

        let mut project_findings: Vec<Finding> = Vec::new();
        if let Some(finding) = self.auditor.audit(&self.root, &tree) {
            project_findings.push(finding);
        }
        for validator in &self.project_validators {
            match validator.invoke(&self.root, &tree) {
                Ok(findings) => project_findings.extend(findings),
                Err(e) => warn!("project validator {} failed: {e}", validator.name()),
            }
        }

        let orchestrator = ValidatorOrchestrator::new(self.config.concurrency);
        let code_findings =
            orchestrator.run(&self.root, &tree, &assignment, &self.validators)?;

        let report = self.aggregator.aggregate(code_findings, project_findings);
        info!(
            "review complete: {} code findings, {} project findings",
            report.code_findings.len(),
            report.project_findings.len()
        );
        Ok(report)
    }

    /// Reviews a single file: a one-entry tree, no classification and no
    /// project-level passes.
    fn review_single_file(&self) -> Result<AnalysisReport, ReviewError> {
        let name = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parent = self
            .root
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let tree: ProjectTree = [(PathBuf::from("."), vec![name])].into_iter().collect();
        let assignment: LayerAssignment = [(PathBuf::from("."), Layer::Unclassified)]
            .into_iter()
            .collect();

        let orchestrator = ValidatorOrchestrator::new(self.config.concurrency);
        let code_findings = orchestrator.run(&parent, &tree, &assignment, &self.validators)?;
        Ok(self.aggregator.aggregate(code_findings, vec![]))
    }

    /// Classifies directories, or assigns everything `unclassified` when
    /// no advisor is configured.
    fn classify(&self, tree: &ProjectTree) -> LayerAssignment {
        match &self.classifier {
            Some(classifier) => {
                let outcome = classifier.classify(tree);
                if outcome.reconciliation.degraded {
                    warn!("classification degraded: no directories selected for analysis");
                }
                outcome.assignment
            }
            None => tree
                .keys()
                .map(|dir| (dir.clone(), Layer::Unclassified))
                .collect(),
        }
    }
}
