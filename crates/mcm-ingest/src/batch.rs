//! Parsing of pasted song batches.
//!
//! A batch is CSV text without a header, one song per row, in the same
//! column order as a collection file. Blank rows are ignored.

use mcm_model::Song;

use crate::codec::{DroppedRow, RecordCodec};
use crate::rows::read_rows;

/// Songs parsed from a batch, plus the rows that could not be parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBatch {
    /// Parsed songs; ids are the 1-based row positions.
    pub songs: Vec<Song>,
    /// Rows that did not parse, numbered like the songs.
    pub invalid_rows: Vec<DroppedRow>,
}

impl ParsedBatch {
    /// Returns true if every non-blank row parsed.
    pub fn is_clean(&self) -> bool {
        self.invalid_rows.is_empty()
    }

    /// Total number of non-blank rows.
    pub fn row_count(&self) -> usize {
        self.songs.len() + self.invalid_rows.len()
    }
}

impl RecordCodec {
    /// Parses header-less batch text into songs.
    pub fn parse_batch(&self, text: &str) -> ParsedBatch {
        let mut batch = ParsedBatch::default();
        let rows = read_rows(text)
            .into_iter()
            .filter(|row| !matches!(row, Ok(cells) if cells.len() == 1 && cells[0].is_empty()));

        for (index, row) in rows.enumerate() {
            let row_number = index + 1;
            match row.and_then(|cells| self.decode_row(&cells, row_number as i64)) {
                Ok(song) => batch.songs.push(song),
                Err(reason) => batch.invalid_rows.push(DroppedRow { row_number, reason }),
            }
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RowError;

    #[test]
    fn test_parse_batch() {
        let codec = RecordCodec::default();
        let text = "\
1,2021-01-01,Fri,New Song,new_1.mp3,o,p,mp3,a,b,c,1,2,3

oops
0,2021-01-02,Sat,Other,new_2.mp3,o,p,mp3,a,b,c,2,2,4
";
        let batch = codec.parse_batch(text);
        assert_eq!(batch.row_count(), 3);
        assert!(!batch.is_clean());

        let ids: Vec<i64> = batch.songs.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(batch.invalid_rows[0].row_number, 2);
        assert_eq!(
            batch.invalid_rows[0].reason,
            RowError::FieldCount {
                expected: 14,
                found: 1
            }
        );
    }

    #[test]
    fn test_parse_batch_empty() {
        let codec = RecordCodec::default();
        let batch = codec.parse_batch("\n\n");
        assert_eq!(batch.row_count(), 0);
        assert!(batch.is_clean());
    }
}
