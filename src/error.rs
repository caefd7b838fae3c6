// Error types shared by the library.
// `InvalidInput` is what the person setters return; the session turns it
// into a re-prompt. `TableError` covers the reference CSV files.

use std::path::PathBuf;

use thiserror::Error;

/// A value was rejected by one of the `Person` setters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("Invalid gender.")]
    Gender,

    #[error("Age must be between 5 and 19.")]
    Age,

    #[error("{field} must be a valid number.")]
    NotANumber { field: &'static str },

    #[error("Height should be between 50 and 250 cm.")]
    Height,

    #[error("Weight should be between 5 and 250 kg.")]
    Weight,
}

/// Problems reading or writing a reference table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("couldn't access {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("malformed csv in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("unexpected column `{column}` in {path}")]
    Column { path: PathBuf, column: String },

    #[error("row {row} of {path} has {actual} fields (expected {expected})")]
    Ragged { path: PathBuf, row: usize, expected: usize, actual: usize },

    #[error("row {row} of {path}: `{value}` is not a number")]
    Value { path: PathBuf, row: usize, value: String },

    #[error("{path} has no data rows")]
    Empty { path: PathBuf },
}
