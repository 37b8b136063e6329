//! Error types shared across lmsmooth crates.

/// Top-level error type for smoothing operations.
#[derive(Debug, thiserror::Error)]
pub enum SmoothingError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration is locked: the filter has already processed landmarks")]
    ConfigLocked,

    #[error("Landmark count changed: expected {expected}, got {actual}")]
    LandmarkCountMismatch { expected: usize, actual: usize },

    #[error("Timestamp went backwards: {current_us}us is earlier than {previous_us}us")]
    NonMonotonicTimestamp { previous_us: u64, current_us: u64 },

    #[error("Image size is required for normalized input at {timestamp_us}us")]
    MissingImageSize { timestamp_us: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SmoothingError.
pub type SmoothingResult<T> = Result<T, SmoothingError>;

impl SmoothingError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn count_mismatch(expected: usize, actual: usize) -> Self {
        Self::LandmarkCountMismatch { expected, actual }
    }

    pub fn non_monotonic(previous_us: u64, current_us: u64) -> Self {
        Self::NonMonotonicTimestamp {
            previous_us,
            current_us,
        }
    }

    /// Whether the caller can recover by fixing its input and retrying.
    ///
    /// Configuration problems are fatal for the instance that reported them.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::LandmarkCountMismatch { .. }
                | Self::NonMonotonicTimestamp { .. }
                | Self::MissingImageSize { .. }
        )
    }
}
