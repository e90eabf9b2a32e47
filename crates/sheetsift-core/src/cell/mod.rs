//! Cell-related types
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRecord`] - A cell's formatted text plus where it came from

mod address;
mod record;

pub use address::CellAddress;
pub use record::CellRecord;
