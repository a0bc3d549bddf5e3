//! Error types for dataset loading and binning setup.

use thiserror::Error;

/// Failure while loading observations from a tabular file
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("row {row}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: column '{column}' has invalid treatment indicator '{value}' (expected 0 or 1)")]
    InvalidTreatment {
        row: usize,
        column: String,
        value: String,
    },
}

/// Invalid binning parameters
#[derive(Debug, Error, PartialEq)]
pub enum BinningError {
    #[error("bin width must be a positive finite number, got {0}")]
    InvalidWidth(f64),

    #[error("histogram needs at least one bin")]
    NoBins,
}
