//! Validator bundles for common configurations.

use hexaudit_core::{AdvisorRef, ProjectValidatorBox, ValidatorBox};

use crate::{LayerFitValidator, LoggingValidator, ProjectStructureValidator};

/// Returns the default per-file validator stack, in reporting order.
///
/// Includes:
/// - `layer-fit` - layer conformance plus auth and data-handling checks
/// - `logging-quality` - logging discipline checks
#[must_use]
pub fn default_validators(advisor: &AdvisorRef) -> Vec<ValidatorBox> {
    vec![
        Box::new(LayerFitValidator::new(advisor.clone())),
        Box::new(LoggingValidator::new(advisor.clone())),
    ]
}

/// Returns the default project-level validator stack.
///
/// Includes:
/// - `project-structure` - repository layout checks
#[must_use]
pub fn default_project_validators(advisor: &AdvisorRef) -> Vec<ProjectValidatorBox> {
    vec![Box::new(ProjectStructureValidator::new(advisor.clone()))]
}
