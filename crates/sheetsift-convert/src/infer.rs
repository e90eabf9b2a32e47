//! Schema inference from sample rows

use sheetsift_core::{CellRecord, Row};

use crate::data_type::{IntegerWidth, Observation};
use crate::decode::RowDecoder;
use crate::options::ConvertOptions;
use crate::schema::Schema;

/// Canonical boolean literals as spreadsheets write them
pub const BOOLEAN_TRUE: &str = "TRUE";
pub const BOOLEAN_FALSE: &str = "FALSE";

/// Builds a [`Schema`] by widening column types over sample rows
///
/// Any number of rows may be observed, in any number of calls; observing a
/// row whose values were already seen never changes the schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaInferrer {
    schema: Schema,
    options: ConvertOptions,
}

impl SchemaInferrer {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            schema: Schema::new(),
            options,
        }
    }

    /// The schema as widened so far
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Formats used to classify cell text
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Stop sampling and keep only the schema
    pub fn into_schema(self) -> Schema {
        self.schema
    }

    /// Freeze the schema and build a decoder using the same options
    pub fn into_decoder(self) -> RowDecoder {
        RowDecoder::new(self.schema, self.options)
    }

    /// Widen the schema with one sample row
    pub fn observe(&mut self, row: &Row) {
        self.observe_cells(&row.cells);
    }

    /// Widen the schema with every row of a sample
    pub fn observe_all<'r, I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = &'r Row>,
    {
        for row in rows {
            self.observe(row);
        }
    }

    /// Widen the schema with the cells of one row
    ///
    /// Cells are placed by their address, so the slice need not be aligned.
    pub fn observe_cells(&mut self, cells: &[Option<CellRecord>]) {
        for cell in cells.iter().flatten() {
            let col = cell.address().col as usize;
            self.schema.ensure_len(col + 1);

            let text = match cell.formatted_value() {
                Some(text) if !text.is_empty() => text,
                _ => continue,
            };

            let current = self.schema.get(col).unwrap_or_default();
            let observation = self.classify(text);
            let widened = current.widen(observation);
            if widened != current {
                log::debug!(
                    "{}!{}: column {} {} -> {} on '{}'",
                    cell.sheet_name(),
                    cell.reference(),
                    col,
                    current,
                    widened,
                    text
                );
                self.schema.set(col, widened);
            }
        }
    }

    /// Classify one non-empty cell text: boolean, then date, then number
    pub fn classify(&self, text: &str) -> Observation {
        if text == BOOLEAN_TRUE || text == BOOLEAN_FALSE {
            return Observation::Boolean;
        }

        if self.options.date_format.parse(text).is_some() {
            return Observation::Date;
        }

        match self.options.decimal_format.parse_exact(text) {
            Some(number) if number.is_integral() => {
                Observation::Integral(number.to_i128().and_then(IntegerWidth::of))
            }
            Some(number) => Observation::Fraction {
                precision: number.precision(),
                scale: number.scale(),
            },
            None => Observation::Text,
        }
    }
}

/// Infer a schema from a sample of rows in one call
pub fn infer_schema<'r, I>(rows: I, options: ConvertOptions) -> Schema
where
    I: IntoIterator<Item = &'r Row>,
{
    let mut inferrer = SchemaInferrer::new(options);
    inferrer.observe_all(rows);
    inferrer.into_schema()
}

/// Column type after the inferrer has seen the given texts in order
#[cfg(test)]
fn column_after(texts: &[&str]) -> crate::data_type::DataType {
    use sheetsift_core::CellAddress;

    let mut inferrer = SchemaInferrer::default();
    for (i, text) in texts.iter().enumerate() {
        let cell = CellRecord::new(Some(text.to_string()), CellAddress::new(i as u32, 0), "S");
        inferrer.observe_cells(&[Some(cell)]);
    }
    inferrer.schema().get(0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;
    use crate::format::{DateFormat, DecimalFormat};
    use pretty_assertions::assert_eq;
    use sheetsift_core::CellAddress;

    fn row(number: u32, texts: &[Option<&str>]) -> Row {
        let cells = texts
            .iter()
            .enumerate()
            .map(|(col, text)| {
                text.map(|t| {
                    CellRecord::new(
                        Some(t.to_string()),
                        CellAddress::new(number - 1, col as u16),
                        "Sheet1",
                    )
                })
            })
            .collect();
        Row::new(number, cells)
    }

    #[test]
    fn test_integer_widening_sequence() {
        let mut inferrer = SchemaInferrer::default();
        let expected = [DataType::Byte, DataType::Short, DataType::Integer];

        for (i, (text, want)) in ["1", "200", "40000"].iter().zip(expected).enumerate() {
            inferrer.observe(&row(i as u32 + 1, &[Some(*text)]));
            assert_eq!(inferrer.schema().get(0), Some(want));
        }
    }

    #[test]
    fn test_boolean_column_promoted_by_number() {
        assert_eq!(column_after(&["TRUE", "FALSE"]), DataType::Boolean);
        assert_eq!(column_after(&["TRUE", "FALSE", "7"]), DataType::String);
    }

    #[test]
    fn test_boolean_test_is_exact() {
        assert_eq!(column_after(&["true"]), DataType::String);
        assert_eq!(column_after(&["True", "TRUE"]), DataType::String);
    }

    #[test]
    fn test_date_column() {
        assert_eq!(column_after(&["2024-01-31", "1999-12-01"]), DataType::Date);
        assert_eq!(column_after(&["2024-01-31", "12"]), DataType::String);
        assert_eq!(column_after(&["12", "2024-01-31"]), DataType::String);
    }

    #[test]
    fn test_decimal_column() {
        assert_eq!(
            column_after(&["123.45"]),
            DataType::Decimal {
                precision: 5,
                scale: 2
            }
        );
        // trailing zeros do not count
        assert_eq!(
            column_after(&["123.40"]),
            DataType::Decimal {
                precision: 4,
                scale: 1
            }
        );
        assert_eq!(
            column_after(&["7", "0.5", "12345"]),
            DataType::Decimal {
                precision: 1,
                scale: 1
            }
        );
        assert_eq!(column_after(&["1.0", "2.00"]), DataType::Byte);
    }

    #[test]
    fn test_huge_integers_ceil_at_long() {
        assert_eq!(column_after(&["99999999999999999999"]), DataType::Long);
        assert_eq!(column_after(&["1", "-99999999999999999999"]), DataType::Long);
        // wider than any fixed-size decimal
        assert_eq!(column_after(&["123456789012345678901234567890"]), DataType::Long);
        assert_eq!(column_after(&["1.5E40", "7"]), DataType::Long);
    }

    #[test]
    fn test_long_fractions_keep_their_scale() {
        assert_eq!(
            column_after(&["0.00000000000000000000000000000001"]),
            DataType::Decimal {
                precision: 1,
                scale: 32
            }
        );
        assert_eq!(
            column_after(&["1.00000000000000000000000000015", "2.5"]),
            DataType::Decimal {
                precision: 30,
                scale: 29
            }
        );
    }

    #[test]
    fn test_text_promotes_to_string() {
        assert_eq!(column_after(&["1", "n/a"]), DataType::String);
        assert_eq!(column_after(&["n/a", "1", "TRUE"]), DataType::String);
    }

    #[test]
    fn test_empty_cells_keep_position_only() {
        let mut inferrer = SchemaInferrer::default();
        inferrer.observe(&row(1, &[Some(""), None, Some("3")]));

        let mut blank = row(2, &[]);
        blank.cells = vec![Some(CellRecord::new(None, CellAddress::new(1, 4), "Sheet1"))];
        inferrer.observe(&blank);

        assert_eq!(
            inferrer.schema().as_slice(),
            &[
                DataType::Unknown,
                DataType::Unknown,
                DataType::Byte,
                DataType::Unknown,
                DataType::Unknown
            ]
        );
    }

    #[test]
    fn test_schema_never_shrinks() {
        let mut inferrer = SchemaInferrer::default();
        inferrer.observe(&row(1, &[Some("a"), Some("b"), Some("c")]));
        inferrer.observe(&row(2, &[Some("1")]));
        assert_eq!(inferrer.schema().len(), 3);
        assert_eq!(inferrer.schema().get(0), Some(DataType::String));
    }

    #[test]
    fn test_observing_twice_is_idempotent() {
        let rows = vec![
            row(1, &[Some("TRUE"), Some("1"), Some("2024-05-01"), Some("1.25")]),
            row(2, &[Some("FALSE"), Some("300"), None, Some("10.5")]),
            row(3, &[None, Some("x"), Some("2024-05-02"), Some("3")]),
        ];

        let once = infer_schema(&rows, ConvertOptions::default());
        let mut inferrer = SchemaInferrer::default();
        inferrer.observe_all(&rows);
        inferrer.observe_all(&rows);

        assert_eq!(inferrer.schema(), &once);
        assert_eq!(
            once.to_string(),
            "boolean, string, date, decimal(3,2)"
        );
    }

    #[test]
    fn test_configured_formats() {
        let options = ConvertOptions::new(
            DateFormat::new("%d.%m.%Y"),
            DecimalFormat::for_locale("de-DE").unwrap(),
        );
        let mut inferrer = SchemaInferrer::new(options);
        inferrer.observe(&row(1, &[Some("31.12.2023"), Some("1.234,5"), Some("1.234")]));

        assert_eq!(
            inferrer.schema().as_slice(),
            &[
                DataType::Date,
                DataType::Decimal {
                    precision: 5,
                    scale: 1
                },
                DataType::Short
            ]
        );
    }
}
