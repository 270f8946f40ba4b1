//! Error type shared by loading, aggregation and view recomputation.

use crate::column::ColumnType;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading listings or deriving a view.
#[derive(Debug, Error)]
pub enum ListingError {
    /// A referenced column is not part of the table schema.
    #[error("Column '{field}' not found")]
    FieldNotFound {
        /// Name of the missing column.
        field: String,
    },

    /// A column exists but has the wrong kind for the requested operation.
    #[error("Column '{field}' has type {actual:?}, expected {expected}")]
    FieldType {
        field: String,
        expected: &'static str,
        actual: ColumnType,
    },

    /// A row index past the end of the table.
    #[error("Row {row} out of range [0, {len})")]
    RowOutOfRange { row: usize, len: usize },

    /// The input file could not be opened.
    #[error("Cannot open input file '{}': {source}", path.display())]
    MissingInputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited input is malformed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A cell could not be converted to its column's type.
    #[error("Row {row}: cannot parse '{value}' in column '{column}' as {expected:?}")]
    Parse {
        row: usize,
        column: String,
        value: String,
        expected: ColumnType,
    },

    /// A payload could not be (de)serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ListingError {
    pub fn field_not_found(field: impl Into<String>) -> Self {
        ListingError::FieldNotFound {
            field: field.into(),
        }
    }
}

pub type Result<T, E = ListingError> = std::result::Result<T, E>;
