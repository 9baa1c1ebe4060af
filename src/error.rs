//! Error types.
//!
//! Value shapes are normalized, never rejected. Errors only cover bad
//! configuration and out-of-range row operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid grid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("column {index} has an empty key")]
    EmptyColumnKey { index: usize },
    #[error("duplicate column key: {0}")]
    DuplicateColumn(String),
    #[error("minLength {min} exceeds maxLength {max}")]
    InvertedBounds { min: usize, max: usize },
    #[error("row {index} out of bounds (grid has {len} rows)")]
    RowOutOfBounds { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, GridError>;
