//! Validator traits for pluggable analysis capabilities.

use std::path::Path;

use thiserror::Error;

use crate::advisor::AdvisorError;
use crate::discovery::ProjectTree;
use crate::types::{Finding, Layer};

/// Errors a single validator invocation can surface.
///
/// These are always caught at the task boundary by the orchestrator (or the
/// reviewer, for project-level passes), logged, and turned into zero
/// findings; they never abort sibling tasks or the run.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The underlying advisor call failed.
    #[error(transparent)]
    Advisor(#[from] AdvisorError),

    /// The advisor replied, but not in the expected structure.
    #[error("failed to decode validator reply: {0}")]
    Parse(String),
}

/// A per-file analysis capability.
///
/// Implement this trait to add a new analysis type; the orchestrator has no
/// compile-time knowledge of variant count or kind and runs whatever
/// ordered list it is given.
///
/// # Example
///
/// ```ignore
/// use hexaudit_core::{Finding, FindingKind, Layer, Validator, ValidatorError};
///
/// pub struct NoTabs;
///
/// impl Validator for NoTabs {
///     fn name(&self) -> &'static str { "no-tabs" }
///
///     fn invoke(&self, content: &str, _layer: Layer, _relative_path: &str)
///         -> Result<Vec<Finding>, ValidatorError>
///     {
///         Ok(content
///             .lines()
///             .enumerate()
///             .filter(|(_, l)| l.contains('\t'))
///             .map(|(i, _)| {
///                 let n = i64::try_from(i + 1).unwrap_or(i64::MAX);
///                 Finding::code(FindingKind::Other("style".into()), n, n, "tab found")
///             })
///             .collect())
///     }
/// }
/// ```
pub trait Validator: Send + Sync {
    /// Returns the kebab-case name of this validator, used in logs.
    fn name(&self) -> &'static str;

    /// Analyzes one file and returns any findings.
    ///
    /// `layer` is the architectural layer assigned to the file's directory
    /// and `relative_path` its path from the project root; validators that
    /// do not need them may ignore both. Returned findings need not carry a
    /// file path; the orchestrator stamps it.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidatorError`] on advisor or decode failure; the
    /// orchestrator isolates it to this (file, validator) task.
    fn invoke(
        &self,
        content: &str,
        layer: Layer,
        relative_path: &str,
    ) -> Result<Vec<Finding>, ValidatorError>;
}

/// Type alias for boxed [`Validator`] trait objects.
pub type ValidatorBox = Box<dyn Validator>;

/// A project-level analysis capability, invoked once per run rather than
/// per file.
pub trait ProjectValidator: Send + Sync {
    /// Returns the kebab-case name of this validator, used in logs.
    fn name(&self) -> &'static str;

    /// Analyzes the project as a whole and returns project-level findings.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidatorError`] on advisor or decode failure; the
    /// reviewer logs it and continues without this pass's findings.
    fn invoke(&self, root: &Path, tree: &ProjectTree) -> Result<Vec<Finding>, ValidatorError>;
}

/// Type alias for boxed [`ProjectValidator`] trait objects.
pub type ProjectValidatorBox = Box<dyn ProjectValidator>;
