//! Error types for the response enhancement engine.

use thiserror::Error;

/// Errors raised by enhancement components.
///
/// Every error in this enum is recoverable by design: pipeline stages are
/// skipped on failure and the top-level `enhance` boundary falls back to
/// the unmodified base response.
#[derive(Debug, Error)]
pub enum EnhanceError {
    /// A pipeline stage failed.
    #[error("{stage} stage failed: {message}")]
    Stage {
        stage: &'static str,
        message: String,
    },

    /// Reading or writing persisted state failed.
    #[error("state persistence failed: {message}")]
    Persistence { message: String },

    /// Any other error surfaced through a collaborator boundary.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
