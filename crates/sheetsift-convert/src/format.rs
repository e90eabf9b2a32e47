//! Date and decimal text formats
//!
//! Both formats parse the whole text: trailing characters make the parse fail.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::error::{ConvertError, ConvertResult};

/// Date pattern in `chrono` strftime syntax (e.g. `%d.%m.%Y`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
}

impl DateFormat {
    pub fn new<S: Into<String>>(pattern: S) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parse a date or date-time; date-only patterns yield midnight
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, &self.pattern) {
            return Some(dt);
        }
        NaiveDate::parse_from_str(text, &self.pattern)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::new("%Y-%m-%d")
    }
}

/// Locale-dependent number symbols used to read formatted numeric text
///
/// Results are always exact [`Decimal`]s, never floats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalFormat {
    decimal_separator: char,
    grouping_separator: Option<char>,
}

impl DecimalFormat {
    pub fn new(decimal_separator: char, grouping_separator: Option<char>) -> Self {
        Self {
            decimal_separator,
            grouping_separator,
        }
    }

    /// Number symbols for a BCP 47 style locale tag (`de-DE`, `en_US`, `fr`)
    pub fn for_locale(tag: &str) -> ConvertResult<Self> {
        let normalized = tag.trim().replace('_', "-").to_ascii_lowercase();
        let (language, region) = match normalized.split_once('-') {
            Some((language, region)) => (language.to_string(), Some(region.to_string())),
            None => (normalized.clone(), None),
        };

        let format = match (language.as_str(), region.as_deref()) {
            ("de", Some("ch")) | ("it", Some("ch")) => Self::new('.', Some('\'')),
            ("en" | "ja" | "zh" | "ko" | "he" | "th", _) => Self::new('.', Some(',')),
            ("de" | "it" | "es" | "nl" | "id" | "tr" | "da" | "el", _) => {
                Self::new(',', Some('.'))
            }
            ("pt", Some("br")) => Self::new(',', Some('.')),
            ("pt", _) => Self::new(',', Some('\u{a0}')),
            ("fr" | "ru" | "pl" | "cs" | "sv" | "fi" | "nb" | "uk", _) => {
                Self::new(',', Some('\u{a0}'))
            }
            _ => return Err(ConvertError::UnsupportedLocale(tag.to_string())),
        };
        Ok(format)
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    pub fn grouping_separator(&self) -> Option<char> {
        self.grouping_separator
    }

    fn is_grouping(&self, c: char) -> bool {
        match self.grouping_separator {
            Some(g) if g == c => true,
            // Space-like group separators are typed as plain spaces just as often
            Some(g) if g.is_whitespace() => c.is_whitespace(),
            _ => false,
        }
    }

    /// Parse formatted numeric text such as `-1,234.50` or `1.5E3`
    ///
    /// `None` when the text is not a number or the number does not fit a
    /// [`Decimal`] exactly; values are never rounded. Use
    /// [`parse_exact`](Self::parse_exact) for numbers of any size.
    pub fn parse(&self, text: &str) -> Option<Decimal> {
        self.parse_exact(text)?.to_decimal()
    }

    /// Parse formatted numeric text without any limit on digits or scale
    pub fn parse_exact(&self, text: &str) -> Option<ExactNumber> {
        let text = text.trim();
        let mut chars = text.chars().peekable();

        let mut negative = false;
        if let Some(&sign) = chars.peek() {
            if sign == '-' || sign == '+' {
                negative = sign == '-';
                chars.next();
            }
        }

        let mut digits = String::with_capacity(text.len());
        let mut int_digits = 0usize;
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                int_digits += 1;
            } else if int_digits > 0 && self.is_grouping(c) {
                // grouping only between digits
            } else {
                break;
            }
            chars.next();
        }

        let mut frac_digits = 0usize;
        if chars.peek() == Some(&self.decimal_separator) {
            chars.next();
            while let Some(&c) = chars.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                digits.push(c);
                frac_digits += 1;
                chars.next();
            }
        }

        if int_digits + frac_digits == 0 {
            return None;
        }

        let mut exponent = 0i32;
        if let Some(&e) = chars.peek() {
            if e == 'E' || e == 'e' {
                chars.next();
                let mut written = String::new();
                if let Some(&sign) = chars.peek() {
                    if sign == '-' || sign == '+' {
                        written.push(sign);
                        chars.next();
                    }
                }
                while let Some(&c) = chars.peek() {
                    if !c.is_ascii_digit() {
                        break;
                    }
                    written.push(c);
                    chars.next();
                }
                exponent = written.parse().ok()?;
            }
        }

        if chars.next().is_some() {
            return None;
        }

        let exponent = exponent.checked_sub(i32::try_from(frac_digits).ok()?)?;
        ExactNumber::new(negative, digits, exponent)
    }
}

impl Default for DecimalFormat {
    fn default() -> Self {
        Self::new('.', Some(','))
    }
}

/// A parsed number kept exactly as `digits x 10^exponent`
///
/// Leading and trailing zeros are stripped, so `123.40` and `1.234E2` are the
/// same number with precision 4 and scale 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactNumber {
    negative: bool,
    /// Significant digits; `"0"` for zero
    digits: String,
    exponent: i32,
}

/// Widest run of zeros [`ExactNumber`]'s Display writes out before it
/// switches to exponent notation
const MAX_PLAIN_ZEROS: u32 = 40;

impl ExactNumber {
    fn new(negative: bool, mut digits: String, mut exponent: i32) -> Option<Self> {
        let leading = digits.bytes().take_while(|&b| b == b'0').count();
        digits.drain(..leading);
        if digits.is_empty() {
            return Some(Self {
                negative: false,
                digits: "0".to_string(),
                exponent: 0,
            });
        }
        while digits.ends_with('0') {
            digits.pop();
            exponent = exponent.checked_add(1)?;
        }
        Some(Self {
            negative,
            digits,
            exponent,
        })
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// True when the number has no fractional digits
    pub fn is_integral(&self) -> bool {
        self.exponent >= 0
    }

    /// Number of fractional digits
    pub fn scale(&self) -> u32 {
        if self.exponent < 0 {
            self.exponent.unsigned_abs()
        } else {
            0
        }
    }

    /// Digit count of the unscaled value, as in `precision` of SQL decimals
    ///
    /// Zero has precision 1.
    pub fn precision(&self) -> u32 {
        let digits = u32::try_from(self.digits.len()).unwrap_or(u32::MAX);
        if self.exponent > 0 {
            digits.saturating_add(self.exponent.unsigned_abs())
        } else {
            digits
        }
    }

    /// The value as an `i128`; `None` for fractions or when it does not fit
    pub fn to_i128(&self) -> Option<i128> {
        if !self.is_integral() {
            return None;
        }
        let mut value = self.unscaled()?;
        for _ in 0..self.exponent {
            value = value.checked_mul(10)?;
        }
        Some(value)
    }

    /// The value as a [`Decimal`]; `None` when it cannot be held without
    /// rounding (more than 28 fractional digits or a 96-bit mantissa)
    pub fn to_decimal(&self) -> Option<Decimal> {
        let mantissa = if self.is_integral() {
            self.to_i128()?
        } else {
            self.unscaled()?
        };
        Decimal::try_from_i128_with_scale(mantissa, self.scale()).ok()
    }

    /// Signed digits without the exponent
    fn unscaled(&self) -> Option<i128> {
        let mut value: i128 = 0;
        for b in self.digits.bytes() {
            value = value.checked_mul(10)?.checked_add(i128::from(b - b'0'))?;
        }
        Some(if self.negative { -value } else { value })
    }
}

impl fmt::Display for ExactNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        let len = self.digits.len();
        let scale = self.scale() as usize;

        if self.is_integral() && self.exponent.unsigned_abs() <= MAX_PLAIN_ZEROS {
            f.write_str(&self.digits)?;
            for _ in 0..self.exponent {
                f.write_str("0")?;
            }
            Ok(())
        } else if !self.is_integral() && scale < len {
            write!(f, "{}.{}", &self.digits[..len - scale], &self.digits[len - scale..])
        } else if !self.is_integral() && scale - len <= MAX_PLAIN_ZEROS as usize {
            f.write_str("0.")?;
            for _ in len..scale {
                f.write_str("0")?;
            }
            f.write_str(&self.digits)
        } else {
            write!(f, "{}E{}", self.digits, self.exponent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_us_decimal_format() {
        let fmt = DecimalFormat::default();
        assert_eq!(fmt.parse("123.40"), Some(dec("123.40")));
        assert_eq!(fmt.parse("-1,234,567.5"), Some(dec("-1234567.5")));
        assert_eq!(fmt.parse("+42"), Some(dec("42")));
        assert_eq!(fmt.parse(" 7 "), Some(dec("7")));
        assert_eq!(fmt.parse(".5"), Some(dec("0.5")));
        assert_eq!(fmt.parse("5."), Some(dec("5")));
        assert_eq!(fmt.parse("1.5E3"), Some(dec("1500")));
        assert_eq!(fmt.parse("25e-2"), Some(dec("0.25")));
    }

    #[test]
    fn test_rejects_non_numbers() {
        let fmt = DecimalFormat::default();
        assert_eq!(fmt.parse(""), None);
        assert_eq!(fmt.parse("-"), None);
        assert_eq!(fmt.parse("."), None);
        assert_eq!(fmt.parse("abc"), None);
        assert_eq!(fmt.parse("12 apples"), None);
        assert_eq!(fmt.parse(",5"), None);
        assert_eq!(fmt.parse("1E"), None);
        assert_eq!(fmt.parse("1E99999999999"), None);
        assert_eq!(fmt.parse("2023-01-15"), None);
    }

    #[test]
    fn test_locale_formats() {
        let de = DecimalFormat::for_locale("de-DE").unwrap();
        assert_eq!(de.parse("1.234,5"), Some(dec("1234.5")));
        assert_eq!(de.parse("1,234.5"), None);

        let fr = DecimalFormat::for_locale("fr_FR").unwrap();
        assert_eq!(fr.parse("1\u{a0}234,75"), Some(dec("1234.75")));
        assert_eq!(fr.parse("1 234,75"), Some(dec("1234.75")));

        let ch = DecimalFormat::for_locale("de-CH").unwrap();
        assert_eq!(ch.parse("1'000.25"), Some(dec("1000.25")));

        assert_eq!(
            DecimalFormat::for_locale("xx-YY"),
            Err(ConvertError::UnsupportedLocale("xx-YY".into()))
        );
    }

    fn exact(text: &str) -> ExactNumber {
        DecimalFormat::default().parse_exact(text).unwrap()
    }

    #[test]
    fn test_precision_and_scale() {
        let cases = [
            ("123.45", 5, 2),
            ("123.40", 4, 1),
            ("0.05", 1, 2),
            ("-9,999", 4, 0),
            ("1.5E3", 4, 0),
            ("0", 1, 0),
            ("-0.000", 1, 0),
        ];
        for (text, precision, scale) in cases {
            let number = exact(text);
            assert_eq!((number.precision(), number.scale()), (precision, scale), "{}", text);
        }
        assert!(!exact("-0.000").is_negative());
    }

    #[test]
    fn test_numbers_beyond_decimal_range() {
        let fmt = DecimalFormat::default();

        let tiny = exact("0.00000000000000000000000000000001");
        assert_eq!((tiny.precision(), tiny.scale()), (1, 32));
        assert_eq!(tiny.to_string(), "0.00000000000000000000000000000001");
        assert_eq!(fmt.parse("0.00000000000000000000000000000001"), None);

        let wide = exact("123456789012345678901234567890");
        assert!(wide.is_integral());
        assert_eq!(wide.precision(), 30);
        assert_eq!(wide.to_i128(), Some(123456789012345678901234567890));
        assert_eq!(wide.to_decimal(), None);
        assert_eq!(fmt.parse("123456789012345678901234567890"), None);

        // 30 significant digits would round to fit 96 bits
        let long_fraction = exact("1.00000000000000000000000000015");
        assert_eq!((long_fraction.precision(), long_fraction.scale()), (30, 29));
        assert_eq!(long_fraction.to_string(), "1.00000000000000000000000000015");
        assert_eq!(long_fraction.to_decimal(), None);

        let huge = exact("-4.2E100");
        assert_eq!(huge.to_i128(), None);
        assert_eq!(huge.to_string(), "-42E99");
    }

    #[test]
    fn test_exact_display() {
        assert_eq!(exact("1,200").to_string(), "1200");
        assert_eq!(exact("-0.050").to_string(), "-0.05");
        assert_eq!(exact("12.5e-1").to_string(), "1.25");
        assert_eq!(exact("1E-50").to_string(), "1E-50");
    }

    #[test]
    fn test_date_format() {
        let fmt = DateFormat::default();
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(fmt.parse("2024-02-29"), Some(expected));
        assert_eq!(fmt.parse("2023-02-29"), None);
        assert_eq!(fmt.parse("29.02.2024"), None);
        assert_eq!(fmt.parse("2024"), None);

        let with_time = DateFormat::new("%d/%m/%Y %H:%M");
        let parsed = with_time.parse("01/03/2024 13:45").unwrap();
        assert_eq!(parsed.to_string(), "2024-03-01 13:45:00");
    }
}
