//! Per-column schema

use std::fmt;

use crate::data_type::DataType;

/// One [`DataType`] slot per column, indexed from 0
///
/// The schema only ever grows; slots are added as `Unknown`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Schema {
    columns: Vec<DataType>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_types(columns: Vec<DataType>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, col: usize) -> Option<DataType> {
        self.columns.get(col).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = DataType> + '_ {
        self.columns.iter().copied()
    }

    pub fn as_slice(&self) -> &[DataType] {
        &self.columns
    }

    /// Grow to at least `len` columns
    pub(crate) fn ensure_len(&mut self, len: usize) {
        if self.columns.len() < len {
            self.columns.resize(len, DataType::Unknown);
        }
    }

    pub(crate) fn set(&mut self, col: usize, data_type: DataType) {
        self.columns[col] = data_type;
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, data_type) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", data_type)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grows_with_unknown() {
        let mut schema = Schema::new();
        schema.ensure_len(3);
        schema.set(1, DataType::Date);
        schema.ensure_len(2);

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.get(0), Some(DataType::Unknown));
        assert_eq!(schema.get(1), Some(DataType::Date));
        assert_eq!(schema.get(3), None);
        assert_eq!(schema.to_string(), "unknown, date, unknown");
    }
}
