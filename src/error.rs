//! Per-file error taxonomy.
//!
//! Every variant is recoverable at the batch level: the runner turns it into
//! an error-marker row and moves on to the next file.

use thiserror::Error;

use crate::data::loader::LoadError;

/// Result type alias for per-file analysis.
pub type Result<T> = std::result::Result<T, PeriodError>;

/// Why a single file did not yield a period.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PeriodError {
    /// Neither the primary nor the fallback encoding could decode the file.
    #[error("could not decode with '{primary}' or '{fallback}'")]
    Decode { primary: String, fallback: String },

    /// The file could not be read or parsed as a table.
    #[error("load failed: {0}")]
    Load(String),

    /// A configured column position does not exist after cleaning.
    #[error("column index {index} out of range ({available} columns after cleaning)")]
    ColumnIndex { index: usize, available: usize },

    /// Fewer than two usable sample points.
    #[error("insufficient data: need at least 2 points, got {got}")]
    InsufficientData { got: usize },

    /// The mean x spacing is exactly zero.
    #[error("invalid sample spacing: mean x difference is zero")]
    ZeroSpacing,

    /// The dominant frequency bin is DC, so the period is undefined.
    #[error("dominant frequency is zero; period undefined")]
    ZeroFrequency,

    /// Anything else that went wrong while processing the file.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<LoadError> for PeriodError {
    fn from(err: LoadError) -> Self {
        PeriodError::Load(err.to_string())
    }
}
