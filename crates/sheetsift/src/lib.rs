//! # sheetsift
//!
//! Stream spreadsheet sheets into dense rows, infer a column schema from a
//! sample and decode every row into typed values.
//!
//! ## Features
//!
//! - Pull-based row cursor over a sheet's XML stream with gap filling
//! - Shared-string resolution and rich-text concatenation
//! - Column type inference over a widening type lattice
//! - Exact decimal decoding with per-cell error reporting
//!
//! ## Example
//!
//! ```rust
//! use sheetsift::prelude::*;
//!
//! let xml = r#"<worksheet><sheetData>
//!   <row r="1"><c r="A1" t="n"><v>1</v></c><c r="B1" t="n"><v>2.50</v></c></row>
//!   <row r="3"><c r="A3" t="n"><v>300</v></c></row>
//! </sheetData></worksheet>"#;
//! let strings: Vec<String> = Vec::new();
//!
//! let mut cursor = SheetCursor::new("Sheet1", xml.as_bytes(), &strings);
//! let inferrer = sample_schema(&mut cursor, 0, 100, ConvertOptions::default()).unwrap();
//! assert_eq!(inferrer.schema().to_string(), "short, decimal(2,1)");
//!
//! let cursor = SheetCursor::new("Sheet1", xml.as_bytes(), &strings);
//! let rows: Vec<TypedRow> = TypedRows::new(cursor, inferrer.into_decoder())
//!     .collect::<sheetsift::Result<_>>()
//!     .unwrap();
//! assert_eq!(rows.len(), 3);
//! assert_eq!(rows[2].cells[0], DecodedCell::Value(TypedValue::Short(300)));
//! ```

pub mod pipeline;
pub mod prelude;

pub use pipeline::{sample_schema, Error, Result, TypedRow, TypedRows};

// Re-export core types
pub use sheetsift_core::{CellAddress, CellRecord, Row, MAX_COLS, MAX_ROWS};

// Re-export cursor types
pub use sheetsift_xlsx::{
    CursorOptions, FormulaPolicy, SharedStringTable, SharedStrings, SheetCursor, StyleLookup,
    UntypedValuePolicy, XlsxError, XlsxResult, CELL_NOT_PROCESSABLE,
};

// Re-export inference and decoding types
pub use sheetsift_convert::{
    infer_schema, ConvertError, ConvertOptions, ConvertResult, DataType, DateFormat,
    DecimalFormat, DecodeError, DecodedCell, ExactNumber, RowDecoder, Schema, SchemaInferrer,
    TypedValue,
};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a `sharedStrings.xml` part extracted from a workbook
pub fn open_shared_strings<P: AsRef<Path>>(path: P) -> XlsxResult<SharedStringTable> {
    let file = File::open(path)?;
    SharedStringTable::from_xml(BufReader::new(file))
}
