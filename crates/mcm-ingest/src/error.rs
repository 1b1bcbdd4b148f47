//! Error types for music collection ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or decoding a collection file.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("file {path} is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    // === Encoding Errors ===
    /// File starts with a byte order mark for an unsupported encoding.
    #[error("unsupported encoding {encoding}; save the file as UTF-8")]
    UnsupportedEncoding { encoding: &'static str },

    /// Content is not valid UTF-8.
    #[error("file is not valid UTF-8 (invalid byte at offset {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    // === Decode Errors ===
    /// Header row does not match the expected columns, in order.
    #[error("CSV header columns were not in the expected format")]
    HeaderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// No data rows after the header.
    #[error("no data found in CSV file")]
    EmptyData,

    // === Encode Errors ===
    /// CSV writer failed.
    #[error("failed to write CSV: {message}")]
    CsvWrite { message: String },
}

impl IngestError {
    /// Returns true for errors raised by header or data validation, as
    /// opposed to I/O or encoding failures.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::HeaderMismatch { .. } | Self::EmptyData)
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::CsvWrite {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Why a single data row was dropped during decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// Row has the wrong number of cells.
    #[error("expected {expected} cells, found {found}")]
    FieldCount { expected: usize, found: usize },

    /// The CSV reader could not produce the row.
    #[error("unreadable row: {message}")]
    Unreadable { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/music.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /path/to/music.csv");

        let err = RowError::FieldCount {
            expected: 14,
            found: 3,
        };
        assert_eq!(err.to_string(), "expected 14 cells, found 3");
    }

    #[test]
    fn test_is_decode_error() {
        assert!(IngestError::EmptyData.is_decode_error());
        assert!(!IngestError::InvalidUtf8 { valid_up_to: 0 }.is_decode_error());
    }
}
