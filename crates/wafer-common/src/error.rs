//! Error types for the wafer map workspace.
//!
//! Grading itself never fails (it reports `-1` for "unknown"); these errors
//! cover the fallible edges: loading and validating wafer descriptions.

use thiserror::Error;

/// Result type alias using WaferError.
pub type WaferResult<T> = Result<T, WaferError>;

/// Primary error type for wafer map operations.
#[derive(Debug, Error)]
pub enum WaferError {
    // === Model Errors ===
    #[error("Invalid wafer bounds: {0}")]
    InvalidBounds(String),

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Invalid layer '{id}': {message}")]
    InvalidLayer { id: String, message: String },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    // === Description Errors ===
    #[error("Failed to read wafer description: {0}")]
    IoError(String),

    #[error("Failed to parse wafer description: {0}")]
    ParseError(String),

    #[error("Unsupported description format: {0}")]
    UnsupportedFormat(String),
}

impl WaferError {
    /// Process exit code used by command line front-ends.
    pub fn exit_code(&self) -> i32 {
        match self {
            WaferError::IoError(_) => 74,
            WaferError::ParseError(_) | WaferError::UnsupportedFormat(_) => 65,
            WaferError::InvalidBounds(_)
            | WaferError::InvalidLayer { .. }
            | WaferError::InvalidColor(_) => 78,
            WaferError::LayerNotFound(_) => 66,
        }
    }
}

impl From<std::io::Error> for WaferError {
    fn from(err: std::io::Error) -> Self {
        WaferError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for WaferError {
    fn from(err: serde_json::Error) -> Self {
        WaferError::ParseError(format!("JSON error: {}", err))
    }
}
