//! Sampling and decoding a whole sheet

use std::io::BufRead;

use sheetsift_convert::{
    ConvertError, ConvertOptions, DecodedCell, RowDecoder, Schema, SchemaInferrer,
};
use sheetsift_xlsx::{SheetCursor, XlsxError, XlsxResult};
use thiserror::Error;

/// Errors from reading and decoding a sheet
#[derive(Debug, Error)]
pub enum Error {
    /// The sheet stream failed; the rest of the sheet is lost
    #[error(transparent)]
    Xlsx(#[from] XlsxError),

    /// One row could not be decoded; later rows still can
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Result type for sheet pipelines
pub type Result<T> = std::result::Result<T, Error>;

/// Observe up to `sample_rows` rows of `cursor`, starting after `skip_rows`
///
/// Empty rows synthesized for gaps count towards both limits.
pub fn sample_schema<R: BufRead>(
    cursor: &mut SheetCursor<'_, R>,
    skip_rows: usize,
    sample_rows: usize,
    options: ConvertOptions,
) -> XlsxResult<SchemaInferrer> {
    let mut inferrer = SchemaInferrer::new(options);

    for _ in 0..skip_rows {
        if cursor.next_row()?.is_none() {
            return Ok(inferrer);
        }
    }

    let mut seen = 0;
    while seen < sample_rows {
        match cursor.next_row()? {
            Some(row) => inferrer.observe(&row),
            None => break,
        }
        seen += 1;
    }

    log::debug!(
        "{}: sampled {} rows, schema [{}]",
        cursor.sheet_name(),
        seen,
        inferrer.schema()
    );
    Ok(inferrer)
}

/// A decoded row together with its 1-based row number
#[derive(Debug, Clone, PartialEq)]
pub struct TypedRow {
    pub number: u32,
    pub cells: Vec<DecodedCell>,
}

/// Iterator decoding every remaining row of a cursor
///
/// Rows narrower than the schema are padded with empty cells. A row wider
/// than the schema yields [`Error::Convert`] and iteration continues; a
/// stream failure yields [`Error::Xlsx`] and ends the iteration.
pub struct TypedRows<'a, R: BufRead> {
    cursor: SheetCursor<'a, R>,
    decoder: RowDecoder,
}

impl<'a, R: BufRead> TypedRows<'a, R> {
    pub fn new(cursor: SheetCursor<'a, R>, decoder: RowDecoder) -> Self {
        Self { cursor, decoder }
    }

    pub fn schema(&self) -> &Schema {
        self.decoder.schema()
    }
}

impl<'a, R: BufRead> Iterator for TypedRows<'a, R> {
    type Item = Result<TypedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut row = match self.cursor.next_row() {
            Ok(Some(row)) => row,
            Ok(None) => return None,
            Err(e) => return Some(Err(e.into())),
        };

        row.pad_to(self.decoder.schema().len());
        let decoded = self
            .decoder
            .decode(&row)
            .map(|cells| TypedRow {
                number: row.number,
                cells,
            })
            .map_err(Error::from);
        Some(decoded)
    }
}
