//! # hexaudit-core
//!
//! Core review pipeline for hexaudit: walks a project tree, classifies
//! directories into architectural layers through an external inference
//! capability, fans pluggable validators out over (file, validator) pairs
//! on a bounded worker pool, audits declared imports against an allow-list
//! and aggregates everything into a single structured report with padded
//! source windows per finding.
//!
//! This crate provides:
//!
//! - [`Advisor`] for the external text-inference contract
//! - [`Validator`] / [`ProjectValidator`] for pluggable analyses
//! - [`Reviewer`] for orchestrating a whole run
//! - [`Finding`] / [`AnalysisReport`] for representing results
//!
//! ## Example
//!
//! ```ignore
//! use hexaudit_core::Reviewer;
//!
//! let reviewer = Reviewer::builder()
//!     .root("./project")
//!     .advisor(advisor)
//!     .validator_boxes(validators)
//!     .build();
//!
//! let report = reviewer.review()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod advisor;
mod aggregate;
mod classifier;
mod config;
mod deps;
mod discovery;
mod orchestrator;
mod reviewer;
mod types;
mod validator;
mod window;

/// Prompt-side text helpers for model-driven validators.
pub mod text;

pub use advisor::{Advisor, AdvisorError, AdvisorRef};
pub use aggregate::{default_title_table, ResultAggregator};
pub use classifier::{ClassificationOutcome, LayerAssignment, LayerClassifier, Reconciliation};
pub use config::{default_allowed_deps, ConfigError, ReviewConfig};
pub use deps::{AllowedDependency, DependencyAuditor};
pub use discovery::{DiscoveryError, FileDiscovery, ProjectTree};
pub use orchestrator::{OrchestratorError, ValidatorOrchestrator, DEFAULT_CONCURRENCY};
pub use reviewer::{ReviewError, Reviewer, ReviewerBuilder};
pub use types::{
    AnalysisReport, AnnotatedFinding, AnnotatedReport, Finding, FindingKind, Layer, Window,
    WindowLine,
};
pub use validator::{
    ProjectValidator, ProjectValidatorBox, Validator, ValidatorBox, ValidatorError,
};
pub use window::{SnippetWindowExtractor, DEFAULT_PAD};
