//! Error types for canvas operations.

use thiserror::Error;

/// Result type alias for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur while saving the canvas.
///
/// Edits themselves never fail; unknown ids and dangling edges are accepted.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// The diagram could not be encoded.
    #[error("diagram serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The repository rejected the payload.
    #[error("repository error: {message}")]
    Repository { message: String },
}

impl CanvasError {
    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository {
            message: message.into(),
        }
    }
}
