//! Error types for feature generation.

use polars::prelude::PolarsError;

/// Result type for feature generation operations
pub type FeatureResult<T> = Result<T, FeatureError>;

/// Error type for feature generation operations
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("Failed to parse timestamp in column '{column}' at row {row}: {reason}")]
    TimestampParse {
        column: String,
        row: usize,
        reason: String,
    },

    #[error("Missing input column: {0}")]
    MissingColumn(String),

    #[error("Missing synthetic feature '{column}': run {step}() before exporting")]
    MissingFeature {
        column: &'static str,
        step: &'static str,
    },

    #[error("Timestamp columns are still raw strings: run convert_dates() first")]
    DatesNotConverted,

    #[error("DataFrame error: {0}")]
    Polars(#[from] PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
