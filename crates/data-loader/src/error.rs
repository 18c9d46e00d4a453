//! Error types for the data-loader crate.
//!
//! Every variant here is a startup failure: the recommender cannot serve a
//! single request without both artifacts, so callers are expected to halt
//! with the error message as the diagnostic.

use thiserror::Error;

/// Errors that can occur while loading the catalog and similarity artifacts
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Artifact could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV reader failed (malformed quoting, bad UTF-8, ...)
    #[error("CSV error in {file}: {source}")]
    CsvError {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// Line in data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Two catalog rows share the same movie id
    #[error("Duplicate movie id {id} at positions {first} and {second}")]
    DuplicateId { id: u32, first: usize, second: usize },

    /// Matrix is not square, or its size disagrees with the catalog
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
