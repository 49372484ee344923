use std::path::PathBuf;
use thiserror::Error;

/// Operational errors. Estimation outcomes are never reported here; an
/// estimate that cannot be made is a value, not an error.
#[derive(Debug, Error)]
pub enum ClockError {
    /// Configuration or initialization error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A sample file could not be read or decoded.
    #[error("failed to load samples from {path}: {reason}")]
    SampleFile {
        /// Path to the sample file.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// A sample failed validation.
    #[error("invalid sample at position {index}: {reason}")]
    InvalidSample {
        /// Position of the sample in its input.
        index: usize,
        /// What went wrong.
        reason: String,
    },

    /// A time window whose start is after its end.
    #[error("invalid window: from {from} is after to {to}")]
    InvalidWindow {
        /// Requested start.
        from: String,
        /// Requested end.
        to: String,
    },

    /// The sample source failed.
    #[error("sample source error: {0}")]
    Source(String),
}

/// Convenience type alias for commit-clock operations.
pub type ClockResult<T> = Result<T, ClockError>;
