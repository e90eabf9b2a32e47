//! Conversion error types

use thiserror::Error;

use crate::data_type::DataType;

/// Result type for conversion operations
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Errors that fail a whole row or a whole configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// Row width differs from the schema width
    #[error("Row {row} has {actual} columns but the schema has {expected}")]
    SchemaMismatch {
        row: u32,
        expected: usize,
        actual: usize,
    },

    /// Locale tag with no known number symbols
    #[error("Unsupported decimal locale: {0}")]
    UnsupportedLocale(String),
}

/// Failure to decode one cell; the rest of its row still decodes
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Text is not a number in the configured decimal format
    #[error("Cell {reference}: '{text}' is not a number")]
    Unparseable { reference: String, text: String },

    /// Value does not fit the column's type without loss
    #[error("Cell {reference}: {value} does not fit {data_type}")]
    Overflow {
        reference: String,
        value: String,
        data_type: DataType,
    },
}
