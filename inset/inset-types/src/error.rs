//! Error types for model construction.

use thiserror::Error;

/// Result type alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while building a model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A face was given fewer than 3 distinct point indices.
    #[error("face needs at least 3 distinct points, got {distinct}")]
    DegenerateFace {
        /// Number of distinct indices supplied.
        distinct: usize,
    },

    /// A face referenced a point index outside the registry.
    #[error("point index {index} out of range (registry holds {count} points)")]
    PointOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of points in the registry.
        count: usize,
    },

    /// A face repeated a point index within its boundary.
    #[error("face repeats point index {index} within its boundary")]
    RepeatedPoint {
        /// The repeated index.
        index: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ModelError::DegenerateFace { distinct: 2 };
        assert!(format!("{err}").contains("3 distinct"));

        let err = ModelError::PointOutOfRange { index: 9, count: 4 };
        assert!(format!("{err}").contains("9"));

        let err = ModelError::RepeatedPoint { index: 1 };
        assert!(format!("{err}").contains("repeats"));
    }
}
