//! Errors raised while building or loading model types.

use std::path::PathBuf;

/// Errors that can occur when working with landmark data.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error on line {line}: {source}")]
    ParseError {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Invalid image size {width}x{height}: both dimensions must be positive")]
    InvalidImageSize { width: u32, height: u32 },

    #[error("Failed to serialize stream: {source}")]
    SerializeError { source: serde_json::Error },
}
