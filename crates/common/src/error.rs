//! Error types shared across Waterflow crates.

use std::path::PathBuf;

/// Top-level error type for Waterflow operations.
///
/// The gesture classifier itself is infallible; these errors come from the
/// surfaces around it (configuration, pointer sources, trace files, and the
/// packed message codec).
#[derive(Debug, thiserror::Error)]
pub enum WaterflowError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Pointer input error: {message}")]
    Input { message: String },

    #[error("Message codec error: {message}")]
    Codec { message: String },

    #[error("Trace error: {message}")]
    Trace { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using WaterflowError.
pub type WaterflowResult<T> = Result<T, WaterflowError>;

impl WaterflowError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
        }
    }

    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec {
            message: msg.into(),
        }
    }

    pub fn trace(msg: impl Into<String>) -> Self {
        Self::Trace {
            message: msg.into(),
        }
    }
}
