//! Shared-string lookup
//!
//! Sheet cells with `t="s"` carry an index into the workbook's shared-string
//! table instead of their text. The cursor only needs [`SharedStrings`]; how
//! the table is built is up to the caller. [`SharedStringTable::from_xml`]
//! covers the common case of an already extracted `sharedStrings.xml`.

use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};

/// Resolves a shared-string index to its text
pub trait SharedStrings {
    /// Text stored at `index`, or `None` if the index is out of range
    fn lookup(&self, index: usize) -> Option<&str>;
}

impl SharedStrings for [String] {
    fn lookup(&self, index: usize) -> Option<&str> {
        self.get(index).map(String::as_str)
    }
}

impl SharedStrings for Vec<String> {
    fn lookup(&self, index: usize) -> Option<&str> {
        self.as_slice().lookup(index)
    }
}

/// Shared-string table read from a `sharedStrings.xml` stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStringTable {
    strings: Vec<String>,
}

impl SharedStringTable {
    /// Wrap an already built list of strings
    pub fn new(strings: Vec<String>) -> Self {
        Self { strings }
    }

    /// Read every `<si>` item of a shared-string part
    ///
    /// Rich-text runs are concatenated; phonetic runs (`<rPh>`) are skipped.
    pub fn from_xml<R: BufRead>(reader: R) -> XlsxResult<Self> {
        let mut xml_reader = Reader::from_reader(reader);

        let mut buf = Vec::new();
        let mut strings = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    let text = e.unescape()?;
                    current_string.push_str(&text);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        log::debug!("read {} shared strings", strings.len());
        Ok(Self { strings })
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }
}

impl SharedStrings for SharedStringTable {
    fn lookup(&self, index: usize) -> Option<&str> {
        self.strings.lookup(index)
    }
}

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '_' {
            result.push(c);
            continue;
        }

        let mut hex_chars = String::new();
        let mut consumed_x = false;
        let mut decoded = None;

        if chars.peek() == Some(&'x') {
            chars.next();
            consumed_x = true;

            while hex_chars.len() < 4 {
                match chars.peek() {
                    Some(&ch) if ch.is_ascii_hexdigit() => {
                        hex_chars.push(ch);
                        chars.next();
                    }
                    _ => break,
                }
            }

            if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
                decoded = u32::from_str_radix(&hex_chars, 16)
                    .ok()
                    .and_then(char::from_u32);
                if decoded.is_some() {
                    chars.next();
                }
            }
        }

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                result.push('_');
                if consumed_x {
                    result.push('x');
                }
                result.push_str(&hex_chars);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_excel_escapes_control_chars() {
        assert_eq!(decode_excel_escapes("hello_x000d_world"), "hello\rworld");
        assert_eq!(decode_excel_escapes("hello_x000a_world"), "hello\nworld");
        assert_eq!(decode_excel_escapes("col1_x0009_col2"), "col1\tcol2");
        assert_eq!(decode_excel_escapes("_x000D_"), "\r");
    }

    #[test]
    fn test_decode_excel_escapes_underscore() {
        assert_eq!(decode_excel_escapes("under_x005f_score"), "under_score");
        assert_eq!(decode_excel_escapes("plain_text"), "plain_text");
    }

    #[test]
    fn test_decode_excel_escapes_partial_sequence() {
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("_x000d"), "_x000d");
        assert_eq!(decode_excel_escapes("_xyz_"), "_xyz_");
    }

    #[test]
    fn test_table_from_xml() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="4" uniqueCount="4">
  <si><t>Name</t></si>
  <si><t xml:space="preserve"> padded </t></si>
  <si><r><rPr><b/></rPr><t>Rich</t></r><r><t> text</t></r><rPh sb="0" eb="1"><t>ignored</t></rPh></si>
  <si><t>a &amp; b_x000a_c</t></si>
  <si/>
</sst>"#;

        let table = SharedStringTable::from_xml(xml.as_bytes()).unwrap();
        let strings: Vec<&str> = table.iter().collect();
        assert_eq!(strings, vec!["Name", " padded ", "Rich text", "a & b\nc", ""]);
        assert_eq!(table.lookup(2), Some("Rich text"));
        assert_eq!(table.lookup(5), None);
    }

    #[test]
    fn test_vec_lookup() {
        let strings = vec!["x".to_string(), "y".to_string()];
        assert_eq!(strings.lookup(1), Some("y"));
        assert_eq!(strings.lookup(2), None);
    }
}
