//! # sheetsift-convert
//!
//! Column type inference and typed decoding for sheetsift rows.
//!
//! A [`SchemaInferrer`] observes sample rows and widens one [`DataType`] per
//! column; once sampling is done the schema is frozen into a [`RowDecoder`]
//! that turns every row into typed values.
//!
//! ```
//! use sheetsift_convert::{ConvertOptions, DataType, DecodedCell, SchemaInferrer, TypedValue};
//! use sheetsift_core::{CellAddress, CellRecord, Row};
//!
//! let row = Row::new(1, vec![
//!     Some(CellRecord::new(Some("42".into()), CellAddress::new(0, 0), "Sheet1")),
//!     Some(CellRecord::new(Some("2024-01-31".into()), CellAddress::new(0, 1), "Sheet1")),
//! ]);
//!
//! let mut inferrer = SchemaInferrer::new(ConvertOptions::default());
//! inferrer.observe(&row);
//! assert_eq!(inferrer.schema().as_slice(), &[DataType::Byte, DataType::Date]);
//!
//! let decoder = inferrer.into_decoder();
//! let decoded = decoder.decode(&row).unwrap();
//! assert_eq!(decoded[0], DecodedCell::Value(TypedValue::Byte(42)));
//! ```

mod data_type;
mod decode;
mod error;
mod format;
mod infer;
mod options;
mod schema;

pub use data_type::{DataType, IntegerWidth, Observation};
pub use decode::{DecodedCell, RowDecoder, TypedValue};
pub use error::{ConvertError, ConvertResult, DecodeError};
pub use format::{DateFormat, DecimalFormat, ExactNumber};
pub use infer::{infer_schema, SchemaInferrer, BOOLEAN_FALSE, BOOLEAN_TRUE};
pub use options::ConvertOptions;
pub use schema::Schema;
