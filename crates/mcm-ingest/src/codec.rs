//! Conversion between CSV rows and typed songs.

use mcm_model::{DataType, FieldRef, FieldSchema, FieldValue, Song};
use tracing::debug;

use crate::coerce::{format_bool, format_number, to_bool, to_number};
use crate::error::{IngestError, Result, RowError};
use crate::rows::{RawRow, read_rows, write_rows};

/// A data row that was left out of a decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    /// 1-based position among the data rows (header excluded).
    pub row_number: usize,
    pub reason: RowError,
}

/// Result of decoding a whole file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedFile {
    /// Parsed songs, ids numbered 1.. in file order.
    pub songs: Vec<Song>,
    /// Rows that could not be parsed.
    pub dropped: Vec<DroppedRow>,
}

/// Decodes and encodes songs against a [`FieldSchema`].
#[derive(Debug, Clone, Default)]
pub struct RecordCodec {
    schema: FieldSchema,
}

impl RecordCodec {
    pub fn new(schema: FieldSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Builds a song from one row of cells.
    ///
    /// The row must have exactly one cell per schema field. Numeric cells that
    /// do not parse become NaN rather than failing the row.
    pub fn decode_row<I, S>(&self, cells: I, id: i64) -> std::result::Result<Song, RowError>
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: ExactSizeIterator,
        S: AsRef<str>,
    {
        let cells = cells.into_iter();
        if cells.len() != self.schema.len() {
            return Err(RowError::FieldCount {
                expected: self.schema.len(),
                found: cells.len(),
            });
        }

        let mut song = Song {
            id,
            ..Song::default()
        };
        for (descriptor, cell) in self.schema.fields().iter().zip(cells) {
            let raw = cell.as_ref();
            let value = match descriptor.data_type() {
                DataType::Number => FieldValue::Number(to_number(raw)),
                DataType::Boolean => FieldValue::Boolean(to_bool(raw)),
                DataType::String => FieldValue::Text(raw.to_string()),
            };
            // The value kind always matches the descriptor's type.
            song.set_field(descriptor.key, value)
                .map_err(|e| RowError::Unreadable {
                    message: e.to_string(),
                })?;
        }
        Ok(song)
    }

    /// Cells for one song in schema order. The id is not included.
    pub fn encode_row(&self, song: &Song) -> Vec<String> {
        self.schema
            .fields()
            .iter()
            .map(|descriptor| match song.field(descriptor.key) {
                FieldRef::Text(text) => text.to_string(),
                FieldRef::Number(n) => format_number(n),
                FieldRef::Boolean(flag) => format_bool(flag).to_string(),
            })
            .collect()
    }

    /// One song as a single CSV line, without a header.
    pub fn encode_line(&self, song: &Song) -> Result<String> {
        write_rows([self.encode_row(song)])
    }

    /// Decodes a whole file, silently dropping rows that do not parse.
    pub fn decode_file(&self, text: &str) -> Result<Vec<Song>> {
        self.decode_file_with_report(text).map(|decoded| decoded.songs)
    }

    /// Decodes a whole file and reports which rows were dropped.
    ///
    /// Fails if the header does not match the schema exactly, or if no data
    /// rows remain after trailing blank rows are removed.
    pub fn decode_file_with_report(&self, text: &str) -> Result<DecodedFile> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut rows = read_rows(text).into_iter();

        let header = match rows.next() {
            Some(Ok(header)) => header,
            _ => Vec::new(),
        };
        if !self.schema.matches_header(&header) {
            return Err(IngestError::HeaderMismatch {
                expected: self
                    .schema
                    .header_row()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                found: header,
            });
        }

        let mut data_rows: Vec<RawRow> = rows.collect();
        while data_rows.last().is_some_and(is_blank_row) {
            data_rows.pop();
        }
        if data_rows.is_empty() {
            return Err(IngestError::EmptyData);
        }

        let mut decoded = DecodedFile::default();
        for (index, row) in data_rows.into_iter().enumerate() {
            let row_number = index + 1;
            let next_id = decoded.songs.len() as i64 + 1;
            match row.and_then(|cells| self.decode_row(&cells, next_id)) {
                Ok(song) => decoded.songs.push(song),
                Err(reason) => {
                    debug!(row = row_number, %reason, "dropped unparseable row");
                    decoded.dropped.push(DroppedRow { row_number, reason });
                }
            }
        }
        Ok(decoded)
    }

    /// Header line followed by one line per song, in the given order.
    pub fn encode_file(&self, songs: &[Song]) -> Result<String> {
        let header: Vec<String> = self
            .schema
            .header_row()
            .into_iter()
            .map(str::to_string)
            .collect();
        write_rows(std::iter::once(header).chain(songs.iter().map(|song| self.encode_row(song))))
    }
}

fn is_blank_row(row: &RawRow) -> bool {
    matches!(row, Ok(cells) if cells.len() == 1 && cells[0].is_empty())
}
