//! Error types for the orientation pipeline.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::AxisSet;

/// Main error type for pipeline operations.
///
/// Malformed sensor lines are never reported through this type; they are
/// dropped by the decoder. Only transport and configuration failures surface.
#[derive(Error, Debug)]
pub enum Error {
    /// The byte stream was closed or reached its end
    #[error("Stream closed")]
    StreamClosed,

    /// Settings file does not exist or cannot be accessed
    #[error("Settings file not found: {0}")]
    SettingsNotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A sample's axes do not match the window it is appended to
    #[error("Axis mismatch: window tracks {expected}, sample has {actual}")]
    AxisMismatch { expected: AxisSet, actual: AxisSet },

    /// Face references a vertex that does not exist
    #[error("Face {face} references vertex {index} (vertex count: {count})")]
    FaceOutOfBounds { face: usize, index: usize, count: usize },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::StreamClosed;
        assert!(e.to_string().contains("closed"));

        let e = Error::FaceOutOfBounds { face: 2, index: 9, count: 8 };
        assert!(e.to_string().contains("9"));
        assert!(e.to_string().contains("8"));

        let e = Error::AxisMismatch {
            expected: AxisSet::PitchRollYaw,
            actual: AxisSet::PitchRoll,
        };
        assert!(e.to_string().contains("pitch/roll/yaw"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("test"));
    }
}
