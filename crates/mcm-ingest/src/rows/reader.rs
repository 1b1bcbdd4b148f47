//! CSV text loading and row splitting.

use std::fs;
use std::path::Path;

use crate::error::{IngestError, Result, RowError};

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// One row as produced by the CSV grammar, or the reason it could not be read.
pub type RawRow = std::result::Result<Vec<String>, RowError>;

/// Check file size against a limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| file_error(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Reads a collection file as text.
///
/// The size is checked before reading. UTF-16 content is rejected; a UTF-8
/// byte order mark is kept and removed later by the decoder.
///
/// This is a sync function meant to be called via `spawn_blocking` from async contexts.
pub fn read_csv_text(path: &Path, max_size: u64) -> Result<String> {
    check_file_size_with_limit(path, max_size)?;
    let bytes = fs::read(path).map_err(|e| file_error(path, e))?;
    text_from_bytes(bytes)
}

/// Converts raw file bytes to text, rejecting UTF-16 and invalid UTF-8.
pub fn text_from_bytes(bytes: Vec<u8>) -> Result<String> {
    // UTF-16 LE / BE byte order marks
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 BE",
        });
    }

    String::from_utf8(bytes).map_err(|e| IngestError::InvalidUtf8 {
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}

/// Splits CSV text into rows of cells.
///
/// Quoted fields may contain delimiters, doubled quotes, and line breaks.
/// Rows may have any number of cells; blank lines produce no row.
pub fn read_rows(text: &str) -> Vec<RawRow> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .records()
        .map(|result| {
            result
                .map(|record| record.iter().map(str::to_string).collect())
                .map_err(|e| RowError::Unreadable {
                    message: e.to_string(),
                })
        })
        .collect()
}

fn file_error(path: &Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}
