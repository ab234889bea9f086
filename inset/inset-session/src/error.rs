//! Error types for the session driver.

use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while driving an inset session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The mesh has no selected faces to inset.
    #[error("no faces selected")]
    EmptySelection,

    /// An event arrived after the session was confirmed or cancelled.
    #[error("session already terminated")]
    Terminated,

    /// The offset engine rejected the replay.
    #[error("offset failed: {0}")]
    Offset(#[from] inset_offset::OffsetError),

    /// The tessellation pass rejected the replay.
    #[error("tessellation failed: {0}")]
    Tessellate(#[from] inset_tessellate::TessellateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert!(format!("{}", SessionError::EmptySelection).contains("selected"));
        assert!(format!("{}", SessionError::Terminated).contains("terminated"));
    }
}
