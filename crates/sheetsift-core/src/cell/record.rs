//! Cell records emitted by a sheet cursor

use super::CellAddress;

/// One decoded cell of a sheet
///
/// A record is immutable once built. A `formatted_value` of `None` marks an
/// empty cell: it still occupies its column but carries no sample for type
/// inference.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRecord {
    formatted_value: Option<String>,
    comment: String,
    formula: String,
    address: CellAddress,
    sheet_name: String,
    style_index: Option<u32>,
}

impl CellRecord {
    /// Create a record with no comment, formula or style
    pub fn new<S: Into<String>>(
        formatted_value: Option<String>,
        address: CellAddress,
        sheet_name: S,
    ) -> Self {
        Self {
            formatted_value,
            comment: String::new(),
            formula: String::new(),
            address,
            sheet_name: sheet_name.into(),
            style_index: None,
        }
    }

    /// Attach formula text
    pub fn with_formula<S: Into<String>>(mut self, formula: S) -> Self {
        self.formula = formula.into();
        self
    }

    /// Attach a comment
    pub fn with_comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = comment.into();
        self
    }

    /// Attach the raw style index (`s` attribute)
    pub fn with_style_index(mut self, style_index: Option<u32>) -> Self {
        self.style_index = style_index;
        self
    }

    pub fn formatted_value(&self) -> Option<&str> {
        self.formatted_value.as_deref()
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn address(&self) -> CellAddress {
        self.address
    }

    /// The address rendered in A1 notation
    pub fn reference(&self) -> String {
        self.address.to_a1_string()
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn style_index(&self) -> Option<u32> {
        self.style_index
    }

    /// True when the cell has no formatted text to sample
    pub fn is_blank(&self) -> bool {
        self.formatted_value.as_deref().map_or(true, str::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accessors() {
        let record = CellRecord::new(Some("42".into()), CellAddress::new(2, 3), "Data")
            .with_formula("SUM(A1:A2)")
            .with_style_index(Some(4));

        assert_eq!(record.formatted_value(), Some("42"));
        assert_eq!(record.reference(), "D3");
        assert_eq!(record.sheet_name(), "Data");
        assert_eq!(record.formula(), "SUM(A1:A2)");
        assert_eq!(record.comment(), "");
        assert_eq!(record.style_index(), Some(4));
        assert!(!record.is_blank());
    }

    #[test]
    fn test_blank_records() {
        let addr = CellAddress::new(0, 0);
        assert!(CellRecord::new(None, addr, "S").is_blank());
        assert!(CellRecord::new(Some(String::new()), addr, "S").is_blank());
    }
}
