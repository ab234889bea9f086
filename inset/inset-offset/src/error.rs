//! Error types for the inset engine.

use thiserror::Error;

/// Result type alias for inset operations.
pub type OffsetResult<T> = Result<T, OffsetError>;

/// Errors that can occur during an inset operation.
///
/// Geometric degeneracies are deliberately *not* errors: a region the
/// skeleton cannot process passes through unchanged. These variants cover
/// misuse of the API surface only.
#[derive(Debug, Error)]
pub enum OffsetError {
    /// Input model has no faces.
    #[error("input model is empty")]
    EmptyModel,

    /// Inset distance is negative or not finite.
    #[error("invalid inset distance: {0}")]
    InvalidDistance(String),

    /// Inset height is not finite.
    #[error("invalid inset height: {0}")]
    InvalidHeight(String),

    /// Model construction failed while assembling the output.
    #[error("model construction failed: {0}")]
    Model(#[from] inset_types::ModelError),
}

impl OffsetError {
    /// Create an [`OffsetError::InvalidDistance`] error.
    pub fn invalid_distance(message: impl Into<String>) -> Self {
        Self::InvalidDistance(message.into())
    }

    /// Create an [`OffsetError::InvalidHeight`] error.
    pub fn invalid_height(message: impl Into<String>) -> Self {
        Self::InvalidHeight(message.into())
    }
}
