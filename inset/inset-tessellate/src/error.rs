//! Error types for the tessellation pass.

use thiserror::Error;

/// Result type alias for tessellation operations.
pub type TessellateResult<T> = Result<T, TessellateError>;

/// Errors that can occur while tessellating.
///
/// Geometric degeneracies are not errors: a face the pass cannot project
/// or clip is copied through unchanged. These variants cover misuse of the
/// API surface only.
#[derive(Debug, Error)]
pub enum TessellateError {
    /// A requested face index does not exist in the model.
    #[error("face index {index} out of range for a model with {count} faces")]
    FaceOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of faces in the model.
        count: usize,
    },

    /// Model construction failed while assembling the output.
    #[error("model construction failed: {0}")]
    Model(#[from] inset_types::ModelError),
}

impl TessellateError {
    /// Create a [`TessellateError::FaceOutOfRange`] error.
    #[must_use]
    pub const fn face_out_of_range(index: u32, count: usize) -> Self {
        Self::FaceOutOfRange { index, count }
    }
}
