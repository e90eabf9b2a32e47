//! # sheetsift-core
//!
//! Core data structures shared by the sheetsift crates.
//!
//! This crate provides:
//! - [`CellAddress`] - A1-style cell addressing
//! - [`CellRecord`] - One cell's formatted text, formula, comment and origin
//! - [`Row`] - A dense, column-aligned row of cell records
//!
//! ## Example
//!
//! ```rust
//! use sheetsift_core::{CellAddress, CellRecord, Row};
//!
//! let addr = CellAddress::parse("C1").unwrap();
//! let cell = CellRecord::new(Some("42".to_string()), addr, "Sheet1");
//!
//! let row = Row::new(1, vec![None, None, Some(cell)]);
//! assert_eq!(row.cell(2).and_then(|c| c.formatted_value()), Some("42"));
//! ```

pub mod cell;
pub mod error;
pub mod row;

pub use cell::{CellAddress, CellRecord};
pub use error::{Error, Result};
pub use row::Row;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
