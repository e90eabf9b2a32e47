//! Row types

use crate::cell::CellRecord;

/// A dense row of cells produced by a sheet cursor
///
/// `cells[i]` holds the cell in column `i`, or `None` where the source had
/// no cell. The length is the highest populated column plus one, so a row
/// that the source skipped entirely has no cells at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    /// Row number (1-based, as declared in the sheet)
    pub number: u32,
    /// Cells indexed by column
    pub cells: Vec<Option<CellRecord>>,
}

impl Row {
    /// Create a row with no cells
    pub fn empty(number: u32) -> Self {
        Self {
            number,
            cells: Vec::new(),
        }
    }

    /// Create a row from already aligned cells
    pub fn new(number: u32, cells: Vec<Option<CellRecord>>) -> Self {
        Self { number, cells }
    }

    /// Get a cell by column index
    pub fn cell(&self, col: usize) -> Option<&CellRecord> {
        self.cells.get(col).and_then(Option::as_ref)
    }

    /// Number of column positions (present or absent)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if row has no column positions
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of present cells
    pub fn cell_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Extend the row with absent cells up to `width` columns
    ///
    /// Rows are never truncated; a row already wider than `width` is left as is.
    pub fn pad_to(&mut self, width: usize) {
        if self.cells.len() < width {
            self.cells.resize(width, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellAddress;

    fn record(col: u16) -> Option<CellRecord> {
        Some(CellRecord::new(
            Some(format!("v{col}")),
            CellAddress::new(0, col),
            "Sheet1",
        ))
    }

    #[test]
    fn test_cell_lookup() {
        let row = Row::new(1, vec![record(0), None, record(2)]);
        assert_eq!(row.len(), 3);
        assert_eq!(row.cell_count(), 2);
        assert!(row.cell(1).is_none());
        assert_eq!(row.cell(2).and_then(|c| c.formatted_value()), Some("v2"));
        assert!(row.cell(9).is_none());
    }

    #[test]
    fn test_pad_to() {
        let mut row = Row::new(4, vec![record(0)]);
        row.pad_to(3);
        assert_eq!(row.len(), 3);
        assert_eq!(row.cell_count(), 1);

        row.pad_to(1);
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_empty_row() {
        let row = Row::empty(7);
        assert_eq!(row.number, 7);
        assert!(row.is_empty());
    }
}
