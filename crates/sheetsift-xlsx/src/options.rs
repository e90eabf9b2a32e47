//! Cursor options

/// What to do with a `<v>` value whose cell has no `t` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UntypedValuePolicy {
    /// Log the cell as unresolved and leave its column empty
    #[default]
    Drop,
    /// Keep the payload text as a literal, like an explicit `t="n"`
    Literal,
}

/// What to do with a cell whose first child is a formula (`<f>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormulaPolicy {
    /// Leave the column empty
    #[default]
    Skip,
    /// Emit a record with the formula text and the cached `<v>` value, if any
    CachedValue,
}

/// Options for reading a sheet stream
#[derive(Debug, Clone, Default)]
pub struct CursorOptions {
    /// Handling of values without a declared type
    pub untyped_values: UntypedValuePolicy,
    /// Handling of formula cells
    pub formula_cells: FormulaPolicy,
}

impl CursorOptions {
    /// Options that keep untyped values and formula results
    ///
    /// Excel and LibreOffice omit `t` on numeric cells, so their sheets need
    /// this to keep numbers.
    pub fn lenient() -> Self {
        Self {
            untyped_values: UntypedValuePolicy::Literal,
            formula_cells: FormulaPolicy::CachedValue,
        }
    }
}
