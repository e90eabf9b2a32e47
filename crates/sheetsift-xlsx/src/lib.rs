//! # sheetsift-xlsx
//!
//! Streaming access to SpreadsheetML sheet parts.
//!
//! [`SheetCursor`] turns one sheet's XML stream into dense, column-aligned
//! [`Row`](sheetsift_core::Row)s. Shared strings and style metadata come in
//! through the [`SharedStrings`] and [`StyleLookup`] traits.
//!
//! ## Example
//!
//! ```rust
//! use sheetsift_xlsx::SheetCursor;
//!
//! let xml = r#"<worksheet><sheetData>
//!   <row r="1"><c r="A1" t="s"><v>0</v></c><c r="C1" t="n"><v>42</v></c></row>
//!   <row r="3"><c r="B3" t="s"><v>0</v></c></row>
//! </sheetData></worksheet>"#;
//! let strings = vec!["hello".to_string()];
//!
//! let rows: Vec<_> = SheetCursor::new("Sheet1", xml.as_bytes(), &strings)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(rows.len(), 3);
//! assert_eq!(rows[0].cells.len(), 3);
//! assert!(rows[1].is_empty());
//! ```

pub mod cursor;
pub mod error;
pub mod options;
pub mod shared_strings;
pub mod styles;

pub use cursor::{SheetCursor, CELL_NOT_PROCESSABLE};
pub use error::{XlsxError, XlsxResult};
pub use options::{CursorOptions, FormulaPolicy, UntypedValuePolicy};
pub use shared_strings::{SharedStringTable, SharedStrings};
pub use styles::StyleLookup;
