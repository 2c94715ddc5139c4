/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use thiserror::Error;

// Re-export subsystem errors
pub use crate::loader::LoaderError;
pub use crate::memory::{ConfigError, MemoryError};
pub use crate::simulation::PlanError;

/// Unified simulator error type with miette diagnostics
///
/// Allocation failures are reported as values inside a run and never
/// surface here.
#[derive(Error, Debug, Diagnostic)]
pub enum SimError {
    #[error("Loader error: {0}")]
    #[diagnostic(transparent)]
    Loader(#[from] LoaderError),

    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Plan error: {0}")]
    #[diagnostic(transparent)]
    Plan(#[from] PlanError),

    #[error("Serialization error: {0}")]
    #[diagnostic(
        code(sim::serialization),
        help("Report could not be encoded as JSON.")
    )]
    Serialization(#[from] serde_json::Error),
}

/// Common result type for simulator operations
pub type SimResult<T> = Result<T, SimError>;
