//! # hexaudit-validators
//!
//! Built-in model-driven validators for hexaudit.
//!
//! ## Available validators
//!
//! | Name | Scope | Description |
//! |------|-------|-------------|
//! | `layer-fit` | per file | Layer conformance, auth and data-handling checks |
//! | `logging-quality` | per file | Logging discipline checks |
//! | `project-structure` | per run | Repository layout checks |
//!
//! All three call the configured [`hexaudit_core::Advisor`] and decode its
//! fenced-JSON replies; a clean target yields zero findings (no positive
//! comments). New validators plug in by implementing
//! [`hexaudit_core::Validator`] or [`hexaudit_core::ProjectValidator`];
//! nothing here is known to the orchestrator at compile time.
//!
//! ## Usage
//!
//! ```ignore
//! use hexaudit_core::Reviewer;
//! use hexaudit_validators::default_validators;
//!
//! let reviewer = Reviewer::builder()
//!     .root("./project")
//!     .advisor(advisor.clone())
//!     .validator_boxes(default_validators(&advisor))
//!     .build();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod layer_fit;
mod logging;
mod presets;
mod structure;

pub use layer_fit::LayerFitValidator;
pub use logging::LoggingValidator;
pub use presets::{default_project_validators, default_validators};
pub use structure::ProjectStructureValidator;
