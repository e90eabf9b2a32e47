//! Conversion options

use crate::format::{DateFormat, DecimalFormat};

/// Text formats shared by schema inference and decoding
///
/// The same options must be used for both passes of a sheet, otherwise the
/// decoder may reject text the inferrer accepted.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Pattern for date cells (default `%Y-%m-%d`)
    pub date_format: DateFormat,
    /// Number symbols for numeric cells (default US: `.` and `,`)
    pub decimal_format: DecimalFormat,
}

impl ConvertOptions {
    pub fn new(date_format: DateFormat, decimal_format: DecimalFormat) -> Self {
        Self {
            date_format,
            decimal_format,
        }
    }
}
