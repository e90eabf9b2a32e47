//! Streaming row cursor over a sheet's `sheetData`
//!
//! [`SheetCursor`] pulls XML events for one sheet and hands out [`Row`]s in
//! row-number order. Rows the stream leaves out are synthesized as empty rows
//! so the sequence is dense from row 1 to the last declared row, and cells are
//! placed at their column index with `None` in the gaps.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::options::{CursorOptions, FormulaPolicy, UntypedValuePolicy};
use crate::shared_strings::SharedStrings;
use crate::styles::StyleLookup;
use sheetsift_core::{CellAddress, CellRecord, Row, MAX_ROWS};

/// Formatted value of a cell whose content the cursor cannot interpret
pub const CELL_NOT_PROCESSABLE: &str = "not processable";

/// Value type marking a shared-string index
const CELL_TYPE_SHARED_STRING: &str = "s";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    /// No row start has been read ahead
    Ready,
    /// A row start was read; its cells have not been consumed yet
    RowPending { number: u32, self_closing: bool },
    /// End of stream reached or the stream failed
    Finalized,
}

/// Attributes of a `<c>` start tag
#[derive(Debug)]
struct CellAttrs {
    address: CellAddress,
    cell_type: Option<String>,
    style_index: Option<u32>,
}

/// Forward-only reader of one sheet's rows
///
/// The cursor owns the underlying stream exclusively and drops it as soon as
/// the stream ends or fails. It cannot be restarted.
pub struct SheetCursor<'a, R: BufRead> {
    sheet_name: String,
    reader: Option<Reader<R>>,
    buf: Vec<u8>,
    shared_strings: &'a dyn SharedStrings,
    styles: Option<&'a dyn StyleLookup>,
    options: CursorOptions,
    state: CursorState,
    /// Number of the next row to hand out (1-based)
    current_row: u32,
}

impl<'a> SheetCursor<'a, BufReader<File>> {
    /// Open an extracted sheet part from disk
    pub fn open<P: AsRef<Path>>(
        sheet_name: &str,
        path: P,
        shared_strings: &'a dyn SharedStrings,
    ) -> XlsxResult<Self> {
        let file = File::open(path)?;
        Ok(Self::new(sheet_name, BufReader::new(file), shared_strings))
    }
}

impl<'a, R: BufRead> SheetCursor<'a, R> {
    /// Create a cursor over a sheet stream
    pub fn new(sheet_name: &str, reader: R, shared_strings: &'a dyn SharedStrings) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
            reader: Some(Reader::from_reader(reader)),
            buf: Vec::new(),
            shared_strings,
            styles: None,
            options: CursorOptions::default(),
            state: CursorState::Ready,
            current_row: 1,
        }
    }

    /// Attach style metadata for [`SheetCursor::number_format`]
    pub fn with_styles(mut self, styles: &'a dyn StyleLookup) -> Self {
        self.styles = Some(styles);
        self
    }

    /// Replace the policies for untyped and formula cells
    pub fn with_options(mut self, options: CursorOptions) -> Self {
        self.options = options;
        self
    }

    /// Sheet name copied into every emitted cell
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Number of the row the next call to [`SheetCursor::next_row`] returns
    pub fn current_row(&self) -> u32 {
        self.current_row
    }

    /// Number format of a cell, if style metadata was attached
    pub fn number_format(&self, cell: &CellRecord) -> Option<&str> {
        let styles = self.styles?;
        styles.number_format(cell.style_index()?)
    }

    /// Check whether another row follows
    ///
    /// Reads ahead to the next row start if none is pending. Calling this
    /// repeatedly does not skip rows. Once it returns `false` it always will.
    pub fn has_next(&mut self) -> XlsxResult<bool> {
        match self.state {
            CursorState::RowPending { .. } => Ok(true),
            CursorState::Finalized => Ok(false),
            CursorState::Ready => {
                let found = self.scan_for_row();
                self.release_on_error(found)
            }
        }
    }

    /// Produce the next row, or `None` once the sheet is exhausted
    ///
    /// Rows missing from the stream come back as empty rows without consuming
    /// any events. After an error the cursor is finalized and the rest of the
    /// sheet must be abandoned.
    pub fn next_row(&mut self) -> XlsxResult<Option<Row>> {
        if !self.has_next()? {
            return Ok(None);
        }

        let (number, self_closing) = match self.state {
            CursorState::RowPending {
                number,
                self_closing,
            } => (number, self_closing),
            _ => return Ok(None),
        };

        if self.current_row < number {
            log::trace!(
                "{}: row {} absent from stream, emitting empty row",
                self.sheet_name,
                self.current_row
            );
            let row = Row::empty(self.current_row);
            self.current_row += 1;
            return Ok(Some(row));
        }

        let cells = if self_closing {
            Vec::new()
        } else {
            let cells = self.read_row_cells(number);
            self.release_on_error(cells)?
        };

        self.state = CursorState::Ready;
        self.current_row += 1;
        Ok(Some(Row::new(number, cells)))
    }

    fn release_on_error<T>(&mut self, result: XlsxResult<T>) -> XlsxResult<T> {
        if result.is_err() {
            self.finish();
        }
        result
    }

    fn finish(&mut self) {
        self.state = CursorState::Finalized;
        self.reader = None;
        self.buf = Vec::new();
    }

    fn next_event(&mut self) -> XlsxResult<Event<'static>> {
        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| XlsxError::StreamFormat("stream already released".into()))?;
        self.buf.clear();
        let event = reader.read_event_into(&mut self.buf)?.into_owned();
        Ok(event)
    }

    fn scan_for_row(&mut self) -> XlsxResult<bool> {
        loop {
            match self.next_event()? {
                Event::Start(e) if is_tag(&e, b"row") => {
                    let number = self.declared_row_number(&e)?;
                    self.state = CursorState::RowPending {
                        number,
                        self_closing: false,
                    };
                    return Ok(true);
                }
                Event::Empty(e) if is_tag(&e, b"row") => {
                    let number = self.declared_row_number(&e)?;
                    self.state = CursorState::RowPending {
                        number,
                        self_closing: true,
                    };
                    return Ok(true);
                }
                Event::Eof => {
                    log::debug!(
                        "{}: end of stream after row {}",
                        self.sheet_name,
                        self.current_row - 1
                    );
                    self.finish();
                    return Ok(false);
                }
                _ => {}
            }
        }
    }

    /// Row number from the `r` attribute; rows without one follow the previous row
    fn declared_row_number(&self, e: &BytesStart<'_>) -> XlsxResult<u32> {
        let number = match attribute(e, b"r") {
            Some(value) => value.trim().parse::<u32>().map_err(|_| {
                XlsxError::StreamFormat(format!("invalid row number '{}'", value))
            })?,
            None => self.current_row,
        };

        if number == 0 || number > MAX_ROWS {
            return Err(XlsxError::StreamFormat(format!(
                "row {} outside 1..={}",
                number, MAX_ROWS
            )));
        }
        if number < self.current_row {
            return Err(XlsxError::StreamFormat(format!(
                "row {} declared after row {}",
                number,
                self.current_row - 1
            )));
        }
        Ok(number)
    }

    fn read_row_cells(&mut self, row_number: u32) -> XlsxResult<Vec<Option<CellRecord>>> {
        let mut cells: Vec<Option<CellRecord>> = Vec::new();

        loop {
            match self.next_event()? {
                Event::End(e) if e.local_name().as_ref().eq_ignore_ascii_case(b"row") => break,
                Event::Start(e) if is_tag(&e, b"c") => {
                    let attrs = cell_attrs(&e, row_number, cells.len())?;
                    place_cell(&mut cells, attrs.address)?;
                    let cell = self.read_cell_body(&attrs)?;
                    cells.push(cell);
                }
                Event::Empty(e) if is_tag(&e, b"c") => {
                    let attrs = cell_attrs(&e, row_number, cells.len())?;
                    place_cell(&mut cells, attrs.address)?;
                    cells.push(None);
                }
                Event::Start(_) => self.skip_current_element()?,
                Event::Eof => {
                    return Err(XlsxError::StreamFormat(format!(
                        "stream ended inside row {}",
                        row_number
                    )))
                }
                _ => {}
            }
        }

        Ok(cells)
    }

    /// Decode the children of a `<c>` element, consuming its end tag
    fn read_cell_body(&mut self, attrs: &CellAttrs) -> XlsxResult<Option<CellRecord>> {
        loop {
            match self.next_event()? {
                Event::End(_) => return Ok(None),
                Event::Start(e) => {
                    let name = e.local_name().as_ref().to_ascii_lowercase();
                    return match name.as_slice() {
                        b"v" => {
                            let text = self.read_element_text()?;
                            self.skip_current_element()?;
                            Ok(self.value_cell(attrs, text))
                        }
                        b"f" => {
                            let formula = self.read_element_text()?;
                            let cached = self.read_cached_value()?;
                            Ok(self.formula_cell(attrs, formula, cached))
                        }
                        _ => {
                            self.skip_current_element()?;
                            self.skip_current_element()?;
                            Ok(Some(self.not_processable(attrs)))
                        }
                    };
                }
                Event::Empty(e) => {
                    let name = e.local_name().as_ref().to_ascii_lowercase();
                    return match name.as_slice() {
                        b"v" => {
                            self.skip_current_element()?;
                            Ok(self.value_cell(attrs, None))
                        }
                        b"f" => {
                            let cached = self.read_cached_value()?;
                            Ok(self.formula_cell(attrs, None, cached))
                        }
                        _ => {
                            self.skip_current_element()?;
                            Ok(Some(self.not_processable(attrs)))
                        }
                    };
                }
                Event::Eof => return Err(unexpected_eof(attrs)),
                // whitespace, comments
                _ => {}
            }
        }
    }

    /// Text content of the element just opened, consuming its end tag
    fn read_element_text(&mut self) -> XlsxResult<Option<String>> {
        let mut text: Option<String> = None;
        let mut depth = 0usize;

        loop {
            match self.next_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => return Ok(text),
                Event::End(_) => depth -= 1,
                Event::Text(t) if depth == 0 => {
                    text.get_or_insert_with(String::new).push_str(&t.unescape()?);
                }
                Event::CData(c) if depth == 0 => {
                    text.get_or_insert_with(String::new)
                        .push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
                Event::Eof => {
                    return Err(XlsxError::StreamFormat(
                        "stream ended inside a cell".into(),
                    ))
                }
                _ => {}
            }
        }
    }

    /// The `<v>` text following a formula, consuming the rest of the cell
    fn read_cached_value(&mut self) -> XlsxResult<Option<String>> {
        let mut cached = None;

        loop {
            match self.next_event()? {
                Event::End(_) => return Ok(cached),
                Event::Start(e) if is_tag(&e, b"v") => cached = self.read_element_text()?,
                Event::Start(_) => self.skip_current_element()?,
                Event::Eof => {
                    return Err(XlsxError::StreamFormat(
                        "stream ended inside a cell".into(),
                    ))
                }
                _ => {}
            }
        }
    }

    /// Consume events up to and including the end tag of the open element
    fn skip_current_element(&mut self) -> XlsxResult<()> {
        let mut depth = 0usize;

        loop {
            match self.next_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => return Ok(()),
                Event::End(_) => depth -= 1,
                Event::Eof => {
                    return Err(XlsxError::StreamFormat(
                        "stream ended inside an element".into(),
                    ))
                }
                _ => {}
            }
        }
    }

    fn value_cell(&self, attrs: &CellAttrs, text: Option<String>) -> Option<CellRecord> {
        let value = self.resolve_value(attrs, text, self.options.untyped_values)?;
        Some(self.record(attrs, Some(value)))
    }

    fn formula_cell(
        &self,
        attrs: &CellAttrs,
        formula: Option<String>,
        cached: Option<String>,
    ) -> Option<CellRecord> {
        match self.options.formula_cells {
            FormulaPolicy::Skip => {
                log::debug!(
                    "{}!{}: skipping formula cell",
                    self.sheet_name,
                    attrs.address
                );
                None
            }
            FormulaPolicy::CachedValue => {
                let value = cached.and_then(|text| {
                    self.resolve_value(attrs, Some(text), UntypedValuePolicy::Literal)
                });
                let record = self.record(attrs, value);
                Some(record.with_formula(formula.unwrap_or_default()))
            }
        }
    }

    /// Turn a `<v>` payload into formatted text according to the cell type
    fn resolve_value(
        &self,
        attrs: &CellAttrs,
        text: Option<String>,
        untyped: UntypedValuePolicy,
    ) -> Option<String> {
        let Some(text) = text else {
            log::error!(
                "{}!{}: value element of cell contains no characters",
                self.sheet_name,
                attrs.address
            );
            return None;
        };

        match attrs.cell_type.as_deref() {
            Some(CELL_TYPE_SHARED_STRING) => self.shared_string(attrs, &text),
            Some(_) => Some(text),
            None => match untyped {
                UntypedValuePolicy::Literal => Some(text),
                UntypedValuePolicy::Drop => {
                    log::warn!(
                        "{}!{}: cannot resolve cell type, dropping cell",
                        self.sheet_name,
                        attrs.address
                    );
                    None
                }
            },
        }
    }

    fn shared_string(&self, attrs: &CellAttrs, payload: &str) -> Option<String> {
        let Ok(index) = payload.trim().parse::<usize>() else {
            log::warn!(
                "{}!{}: invalid shared string index '{}', dropping cell",
                self.sheet_name,
                attrs.address,
                payload
            );
            return None;
        };

        match self.shared_strings.lookup(index) {
            Some(s) => Some(s.to_string()),
            None => {
                log::warn!(
                    "{}!{}: shared string index {} out of range, dropping cell",
                    self.sheet_name,
                    attrs.address,
                    index
                );
                None
            }
        }
    }

    fn not_processable(&self, attrs: &CellAttrs) -> CellRecord {
        log::debug!(
            "{}!{}: unsupported cell content",
            self.sheet_name,
            attrs.address
        );
        self.record(attrs, Some(CELL_NOT_PROCESSABLE.to_string()))
    }

    fn record(&self, attrs: &CellAttrs, value: Option<String>) -> CellRecord {
        CellRecord::new(value, attrs.address, self.sheet_name.as_str())
            .with_style_index(attrs.style_index)
    }
}

impl<'a, R: BufRead> Iterator for SheetCursor<'a, R> {
    type Item = XlsxResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

fn is_tag(e: &BytesStart<'_>, name: &[u8]) -> bool {
    e.local_name().as_ref().eq_ignore_ascii_case(name)
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Parse a cell start tag; cells without `r` take the next free column
fn cell_attrs(e: &BytesStart<'_>, row_number: u32, next_col: usize) -> XlsxResult<CellAttrs> {
    let mut reference = None;
    let mut cell_type = None;
    let mut style_index = None;

    for attr in e.attributes().flatten() {
        match attr.key.local_name().as_ref() {
            b"r" => reference = attr.unescape_value().ok().map(|s| s.into_owned()),
            b"t" => cell_type = attr.unescape_value().ok().map(|s| s.into_owned()),
            b"s" => {
                style_index = attr
                    .unescape_value()
                    .ok()
                    .and_then(|s| s.parse::<u32>().ok());
            }
            _ => {}
        }
    }

    let address = match reference {
        Some(r) => CellAddress::parse(&r)?,
        None => {
            let col = u16::try_from(next_col).map_err(|_| {
                XlsxError::StreamFormat(format!("too many cells in row {}", row_number))
            })?;
            CellAddress::new(row_number.saturating_sub(1), col)
        }
    };

    Ok(CellAttrs {
        address,
        cell_type,
        style_index,
    })
}

/// Pad `cells` with absent entries up to the cell's column
fn place_cell(cells: &mut Vec<Option<CellRecord>>, address: CellAddress) -> XlsxResult<()> {
    let col = address.col as usize;
    if col < cells.len() {
        return Err(XlsxError::StreamFormat(format!(
            "cell {} is out of column order",
            address
        )));
    }
    cells.resize(col, None);
    Ok(())
}

fn unexpected_eof(attrs: &CellAttrs) -> XlsxError {
    XlsxError::StreamFormat(format!("stream ended inside cell {}", attrs.address))
}
