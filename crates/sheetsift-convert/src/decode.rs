//! Typed decoding of rows against a frozen schema

use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sheetsift_core::{CellRecord, Row};

use crate::data_type::DataType;
use crate::error::{ConvertError, ConvertResult, DecodeError};
use crate::options::ConvertOptions;
use crate::schema::Schema;

/// A decoded cell value
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Text(String),
    Boolean(bool),
    Date(NaiveDateTime),
    Byte(i8),
    Short(i16),
    Integer(i32),
    Long(i64),
    Decimal(Decimal),
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Text(s) => write!(f, "{}", s),
            TypedValue::Boolean(b) => write!(f, "{}", b),
            TypedValue::Date(d) => write!(f, "{}", d),
            TypedValue::Byte(v) => write!(f, "{}", v),
            TypedValue::Short(v) => write!(f, "{}", v),
            TypedValue::Integer(v) => write!(f, "{}", v),
            TypedValue::Long(v) => write!(f, "{}", v),
            TypedValue::Decimal(v) => write!(f, "{}", v),
        }
    }
}

/// Outcome of decoding one cell
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedCell {
    /// Absent cell, blank text, or a date that did not parse
    Null,
    Value(TypedValue),
    /// The cell could not be decoded; the rest of the row still was
    Failed(DecodeError),
}

impl DecodedCell {
    pub fn is_null(&self) -> bool {
        matches!(self, DecodedCell::Null)
    }

    pub fn value(&self) -> Option<&TypedValue> {
        match self {
            DecodedCell::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&DecodeError> {
        match self {
            DecodedCell::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for DecodedCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedCell::Null => Ok(()),
            DecodedCell::Value(v) => write!(f, "{}", v),
            DecodedCell::Failed(_) => write!(f, "#ERR"),
        }
    }
}

/// Decodes rows into typed values using a frozen [`Schema`]
#[derive(Debug, Clone)]
pub struct RowDecoder {
    schema: Schema,
    options: ConvertOptions,
}

impl RowDecoder {
    pub fn new(schema: Schema, options: ConvertOptions) -> Self {
        Self { schema, options }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Decode one row
    ///
    /// The row must be exactly as wide as the schema; pad short rows with
    /// [`Row::pad_to`] first. On a width mismatch nothing is decoded.
    pub fn decode(&self, row: &Row) -> ConvertResult<Vec<DecodedCell>> {
        self.decode_cells(row.number, &row.cells)
    }

    /// Decode the cells of row `row_number`
    pub fn decode_cells(
        &self,
        row_number: u32,
        cells: &[Option<CellRecord>],
    ) -> ConvertResult<Vec<DecodedCell>> {
        if cells.len() != self.schema.len() {
            log::error!(
                "Row {} has {} columns but the schema has {}, skipping row",
                row_number,
                cells.len(),
                self.schema.len()
            );
            return Err(ConvertError::SchemaMismatch {
                row: row_number,
                expected: self.schema.len(),
                actual: cells.len(),
            });
        }

        let decoded = cells
            .iter()
            .zip(self.schema.iter())
            .map(|(cell, data_type)| match cell {
                Some(cell) => self.decode_cell(cell, data_type),
                None => DecodedCell::Null,
            })
            .collect();
        Ok(decoded)
    }

    /// Decode a single cell as `data_type`
    pub fn decode_cell(&self, cell: &CellRecord, data_type: DataType) -> DecodedCell {
        let text = cell.formatted_value();

        match data_type {
            DataType::Unknown | DataType::String => match text {
                Some(text) => DecodedCell::Value(TypedValue::Text(text.to_string())),
                None => DecodedCell::Null,
            },
            _ => match text {
                Some(text) if !text.is_empty() => self.decode_typed(cell, text, data_type),
                _ => DecodedCell::Null,
            },
        }
    }

    fn decode_typed(&self, cell: &CellRecord, text: &str, data_type: DataType) -> DecodedCell {
        match data_type {
            // Looser than inference: anything but a case-insensitive "true" is false
            DataType::Boolean => {
                DecodedCell::Value(TypedValue::Boolean(text.eq_ignore_ascii_case("true")))
            }
            DataType::Date => match self.options.date_format.parse(text) {
                Some(date) => DecodedCell::Value(TypedValue::Date(date)),
                None => {
                    log::debug!(
                        "{}: '{}' does not match date format {}",
                        cell.reference(),
                        text,
                        self.options.date_format.pattern()
                    );
                    DecodedCell::Null
                }
            },
            _ => match self.decode_number(cell, text, data_type) {
                Ok(value) => DecodedCell::Value(value),
                Err(e) => {
                    log::warn!("{}!{}", cell.sheet_name(), e);
                    DecodedCell::Failed(e)
                }
            },
        }
    }

    fn decode_number(
        &self,
        cell: &CellRecord,
        text: &str,
        data_type: DataType,
    ) -> Result<TypedValue, DecodeError> {
        let number = self
            .options
            .decimal_format
            .parse_exact(text)
            .ok_or_else(|| DecodeError::Unparseable {
                reference: cell.reference(),
                text: text.to_string(),
            })?;

        let overflow = || DecodeError::Overflow {
            reference: cell.reference(),
            value: number.to_string(),
            data_type,
        };

        if let DataType::Decimal { .. } = data_type {
            return number.to_decimal().map(TypedValue::Decimal).ok_or_else(overflow);
        }

        let whole = number.to_i128().ok_or_else(overflow)?;

        let typed = match data_type {
            DataType::Byte => i8::try_from(whole).map(TypedValue::Byte).ok(),
            DataType::Short => i16::try_from(whole).map(TypedValue::Short).ok(),
            DataType::Integer => i32::try_from(whole).map(TypedValue::Integer).ok(),
            DataType::Long => i64::try_from(whole).map(TypedValue::Long).ok(),
            _ => None,
        };
        typed.ok_or_else(overflow)
    }
}
