//! The external text-inference contract.

use std::sync::Arc;
use thiserror::Error;

/// Errors an advisor call can surface.
///
/// The core never retries; a failed call costs at most the task that made
/// it. Callers wrapping an advisor may add their own retry policy.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// The request never produced a response (network, timeout, process).
    #[error("advisor transport error: {0}")]
    Transport(String),

    /// The service answered with an error status or payload.
    #[error("advisor returned an error: {0}")]
    Api(String),

    /// The service answered, but with no usable text.
    #[error("advisor response was empty")]
    EmptyResponse,
}

/// External inference capability consumed by the classifier and by
/// model-driven validators.
///
/// Implementations must be shareable across the orchestrator's worker
/// threads; the usual form is an HTTP client behind an [`Arc`].
pub trait Advisor: Send + Sync {
    /// Sends one prompt and returns the model's free-text reply.
    ///
    /// # Errors
    ///
    /// Returns an [`AdvisorError`] if the call fails; the pipeline treats
    /// this as a per-task degradation, never a run failure.
    fn infer(&self, prompt: &str) -> Result<String, AdvisorError>;
}

/// Shared handle to an advisor.
pub type AdvisorRef = Arc<dyn Advisor>;
