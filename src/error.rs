//! Error types for the activity-bands library.

use thiserror::Error;

/// Result type alias for band computations.
pub type Result<T> = std::result::Result<T, BandError>;

/// Errors that can occur while extracting, scoring or reporting.
///
/// An empty series and an undefined `%b` score are not errors: the first
/// yields an empty table, the second is carried as `None` on the row.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BandError {
    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Reading log data failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// A log record could not be decoded.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The visualization sink failed.
    #[error("plot error: {0}")]
    Plot(String),
}

impl From<std::io::Error> for BandError {
    fn from(err: std::io::Error) -> Self {
        BandError::Io(err.to_string())
    }
}
