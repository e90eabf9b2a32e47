//! The column type lattice
//!
//! ```text
//!                 String
//!          /        |        \
//!     Boolean     Date     Decimal(p, s)
//!                             |
//!                           Long
//!                             |
//!                          Integer
//!                             |
//!                           Short
//!                             |
//!                           Byte
//!          \        |        /
//!                 Unknown
//! ```
//!
//! Columns start at `Unknown` and only move up. Joining two branches that
//! have no common bound below `String` lands on `String`, which absorbs
//! everything after it.

use std::cmp::Ordering;
use std::fmt;

/// Inferred primitive type of one column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DataType {
    /// No non-empty sample seen yet
    #[default]
    Unknown,
    Boolean,
    Date,
    /// 8-bit signed integer
    Byte,
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// Exact decimal; `precision` digits in total, `scale` after the point
    Decimal { precision: u32, scale: u32 },
    String,
}

/// Integer widths, narrowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntegerWidth {
    Byte,
    Short,
    Integer,
    Long,
}

impl IntegerWidth {
    /// Narrowest width holding `value`
    pub fn of(value: i128) -> Option<Self> {
        if i8::try_from(value).is_ok() {
            Some(Self::Byte)
        } else if i16::try_from(value).is_ok() {
            Some(Self::Short)
        } else if i32::try_from(value).is_ok() {
            Some(Self::Integer)
        } else if i64::try_from(value).is_ok() {
            Some(Self::Long)
        } else {
            None
        }
    }

    pub fn data_type(self) -> DataType {
        match self {
            Self::Byte => DataType::Byte,
            Self::Short => DataType::Short,
            Self::Integer => DataType::Integer,
            Self::Long => DataType::Long,
        }
    }
}

/// What a single non-empty cell text looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Boolean,
    Date,
    /// A number with a fractional part after stripping trailing zeros
    Fraction { precision: u32, scale: u32 },
    /// A whole number; `None` when it is wider than any integer width
    Integral(Option<IntegerWidth>),
    /// Anything else
    Text,
}

impl DataType {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Byte
                | DataType::Short
                | DataType::Integer
                | DataType::Long
                | DataType::Decimal { .. }
        )
    }

    pub fn integer_width(&self) -> Option<IntegerWidth> {
        match self {
            DataType::Byte => Some(IntegerWidth::Byte),
            DataType::Short => Some(IntegerWidth::Short),
            DataType::Integer => Some(IntegerWidth::Integer),
            DataType::Long => Some(IntegerWidth::Long),
            _ => None,
        }
    }

    /// The type after seeing `observation` in a column of this type
    pub fn widen(self, observation: Observation) -> DataType {
        use DataType::*;

        match (self, observation) {
            (String, _) | (_, Observation::Text) => String,

            (Unknown | Boolean, Observation::Boolean) => Boolean,
            (_, Observation::Boolean) => String,

            (Unknown | Date, Observation::Date) => Date,
            (_, Observation::Date) => String,

            (Boolean | Date, _) => String,

            (Decimal { precision, scale }, Observation::Fraction { precision: p, scale: s }) => {
                if p > precision && s > scale {
                    Decimal {
                        precision: p,
                        scale: s,
                    }
                } else if s > scale {
                    Decimal {
                        precision,
                        scale: s,
                    }
                } else if p > precision {
                    // keep the integer digits of p under the wider existing scale
                    Decimal {
                        precision: p + (scale - s),
                        scale,
                    }
                } else {
                    self
                }
            }
            (_, Observation::Fraction { precision, scale }) => Decimal { precision, scale },

            (Decimal { .. }, Observation::Integral(_)) => self,
            (current, Observation::Integral(width)) => {
                // wider than i64 still ceils at Long
                let width = width.unwrap_or(IntegerWidth::Long);
                match current.integer_width() {
                    Some(existing) => existing.max(width).data_type(),
                    None => width.data_type(),
                }
            }
        }
    }
}

impl PartialOrd for DataType {
    /// Lattice order; `None` for types on different branches
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        use DataType::*;

        if self == other {
            return Some(Ordering::Equal);
        }

        match (self, other) {
            (Unknown, _) | (_, String) => Some(Ordering::Less),
            (_, Unknown) | (String, _) => Some(Ordering::Greater),
            (
                Decimal {
                    precision: p1,
                    scale: s1,
                },
                Decimal {
                    precision: p2,
                    scale: s2,
                },
            ) => {
                if p1 >= p2 && s1 >= s2 {
                    Some(Ordering::Greater)
                } else if p1 <= p2 && s1 <= s2 {
                    Some(Ordering::Less)
                } else {
                    None
                }
            }
            (Decimal { .. }, b) if b.integer_width().is_some() => Some(Ordering::Greater),
            (a, Decimal { .. }) if a.integer_width().is_some() => Some(Ordering::Less),
            (a, b) => match (a.integer_width(), b.integer_width()) {
                (Some(x), Some(y)) => Some(x.cmp(&y)),
                _ => None,
            },
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Unknown => write!(f, "unknown"),
            DataType::Boolean => write!(f, "boolean"),
            DataType::Date => write!(f, "date"),
            DataType::Byte => write!(f, "byte"),
            DataType::Short => write!(f, "short"),
            DataType::Integer => write!(f, "integer"),
            DataType::Long => write!(f, "long"),
            DataType::Decimal { precision, scale } => write!(f, "decimal({},{})", precision, scale),
            DataType::String => write!(f, "string"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fraction(precision: u32, scale: u32) -> Observation {
        Observation::Fraction { precision, scale }
    }

    fn decimal(precision: u32, scale: u32) -> DataType {
        DataType::Decimal { precision, scale }
    }

    #[test]
    fn test_integer_width_of() {
        assert_eq!(IntegerWidth::of(1), Some(IntegerWidth::Byte));
        assert_eq!(IntegerWidth::of(-128), Some(IntegerWidth::Byte));
        assert_eq!(IntegerWidth::of(200), Some(IntegerWidth::Short));
        assert_eq!(IntegerWidth::of(40_000), Some(IntegerWidth::Integer));
        assert_eq!(IntegerWidth::of(3_000_000_000), Some(IntegerWidth::Long));
        assert_eq!(IntegerWidth::of(i64::MAX as i128 + 1), None);
    }

    #[test]
    fn test_boolean_and_date_branches() {
        assert_eq!(DataType::Unknown.widen(Observation::Boolean), DataType::Boolean);
        assert_eq!(DataType::Boolean.widen(Observation::Boolean), DataType::Boolean);
        assert_eq!(DataType::Byte.widen(Observation::Boolean), DataType::String);
        assert_eq!(DataType::Unknown.widen(Observation::Date), DataType::Date);
        assert_eq!(DataType::Boolean.widen(Observation::Date), DataType::String);
        assert_eq!(
            DataType::Boolean.widen(Observation::Integral(Some(IntegerWidth::Byte))),
            DataType::String
        );
        assert_eq!(DataType::Date.widen(fraction(2, 1)), DataType::String);
    }

    #[test]
    fn test_string_absorbs() {
        for observation in [
            Observation::Boolean,
            Observation::Date,
            fraction(3, 1),
            Observation::Integral(Some(IntegerWidth::Byte)),
            Observation::Text,
        ] {
            assert_eq!(DataType::String.widen(observation), DataType::String);
        }
        assert_eq!(decimal(4, 2).widen(Observation::Text), DataType::String);
    }

    #[test]
    fn test_integer_widening() {
        let t = DataType::Unknown.widen(Observation::Integral(IntegerWidth::of(1)));
        assert_eq!(t, DataType::Byte);
        let t = t.widen(Observation::Integral(IntegerWidth::of(200)));
        assert_eq!(t, DataType::Short);
        let t = t.widen(Observation::Integral(IntegerWidth::of(40_000)));
        assert_eq!(t, DataType::Integer);
        let t = t.widen(Observation::Integral(IntegerWidth::of(5)));
        assert_eq!(t, DataType::Integer);
        let t = t.widen(Observation::Integral(None));
        assert_eq!(t, DataType::Long);
    }

    #[test]
    fn test_decimal_widening() {
        assert_eq!(DataType::Unknown.widen(fraction(5, 2)), decimal(5, 2));
        assert_eq!(DataType::Long.widen(fraction(5, 2)), decimal(5, 2));

        // both larger
        assert_eq!(decimal(5, 2).widen(fraction(7, 3)), decimal(7, 3));
        // scale only
        assert_eq!(decimal(5, 2).widen(fraction(4, 3)), decimal(5, 3));
        // precision only: 12345.6 under scale 2 needs 7 digits
        assert_eq!(decimal(5, 2).widen(fraction(6, 1)), decimal(7, 2));
        // nothing larger
        assert_eq!(decimal(5, 2).widen(fraction(3, 1)), decimal(5, 2));
        // integers never narrow a decimal
        assert_eq!(
            decimal(5, 2).widen(Observation::Integral(Some(IntegerWidth::Long))),
            decimal(5, 2)
        );
        assert_eq!(decimal(5, 2).widen(Observation::Integral(None)), decimal(5, 2));
    }

    #[test]
    fn test_lattice_order() {
        assert!(DataType::Unknown < DataType::Boolean);
        assert!(DataType::Byte < DataType::Long);
        assert!(DataType::Long < decimal(1, 1));
        assert!(decimal(5, 2) < decimal(7, 2));
        assert!(decimal(9, 9) < DataType::String);
        assert_eq!(DataType::Boolean.partial_cmp(&DataType::Date), None);
        assert_eq!(DataType::Boolean.partial_cmp(&DataType::Byte), None);
        assert_eq!(decimal(5, 3).partial_cmp(&decimal(6, 2)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(decimal(5, 2).to_string(), "decimal(5,2)");
        assert_eq!(DataType::Integer.to_string(), "integer");
        assert_eq!(DataType::String.to_string(), "string");
    }
}
