//! Store error types.
//!
//! All store operations return structured errors that keep the store in its
//! previous state and provide user-friendly messages.

use std::path::PathBuf;

use mcm_ingest::IngestError;
use thiserror::Error;

/// Collection store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or decoding the collection file failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Operation needs a loaded collection.
    #[error("no collection file is loaded")]
    NoFileLoaded,

    /// Save was requested without a target path.
    #[error("no save path is set")]
    NoSavePath,

    /// Edit target does not exist.
    #[error("no song with file name '{new_file_name}'")]
    UnknownRecord { new_file_name: String },

    /// Another load has not finished yet.
    #[error("a file load is already in progress")]
    LoadInProgress,

    /// Songs to add failed validation.
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Background load task panicked or was cancelled.
    #[error("background load task failed: {message}")]
    Task { message: String },

    /// Settings file could not be parsed.
    #[error("invalid settings file {path}: {message}")]
    Settings { path: PathBuf, message: String },
}

impl StoreError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Ingest(err) if err.is_decode_error() => format!(
                "Could not read the collection: {err}. \
                 The current collection was not changed."
            ),
            Self::Ingest(err) => err.to_string(),
            Self::NoFileLoaded => "Open a collection file first.".to_string(),
            Self::NoSavePath => "Choose where to save the collection.".to_string(),
            Self::UnknownRecord { new_file_name } => {
                format!("\"{new_file_name}\" is not in the collection.")
            }
            Self::LoadInProgress => "Please wait for the current file to finish loading.".to_string(),
            Self::Batch(err) => err.to_string(),
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not finish saving {}. Your changes are still unsaved.",
                target_path.display()
            ),
            Self::Task { .. } => "Loading was interrupted. Please try again.".to_string(),
            Self::Settings { path, .. } => {
                format!("The settings file at {} could not be read.", path.display())
            }
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Reasons a batch of new songs is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// Rows of pasted text that could not be parsed (1-based).
    #[error("{}", describe_unparseable(.0))]
    UnparseableRows(Vec<usize>),

    /// File names that appear more than once in the batch, with counts.
    #[error("Duplicate data detected. {}", describe_duplicates(.0))]
    DuplicateInBatch(Vec<(String, usize)>),

    /// File names already present in the collection.
    #[error("Duplicate data detected: {}", describe_existing(.0))]
    AlreadyExists(Vec<String>),
}

fn describe_unparseable(rows: &[usize]) -> String {
    match rows {
        [row] => format!("Row {row} could not be parsed into a song."),
        _ => format!(
            "The following rows could not be parsed into songs: {}",
            rows.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn describe_duplicates(duplicates: &[(String, usize)]) -> String {
    duplicates
        .iter()
        .map(|(name, count)| format!("\"{name}\" found {count} times"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe_existing(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("\"{name}\" already exists in the dataset."))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_error_messages() {
        assert_eq!(
            BatchError::UnparseableRows(vec![3]).to_string(),
            "Row 3 could not be parsed into a song."
        );
        assert_eq!(
            BatchError::UnparseableRows(vec![1, 4]).to_string(),
            "The following rows could not be parsed into songs: 1, 4"
        );
        assert_eq!(
            BatchError::DuplicateInBatch(vec![("a.mp3".to_string(), 2)]).to_string(),
            "Duplicate data detected. \"a.mp3\" found 2 times"
        );
        assert_eq!(
            BatchError::AlreadyExists(vec!["b.mp3".to_string()]).to_string(),
            "Duplicate data detected: \"b.mp3\" already exists in the dataset."
        );
    }

    #[test]
    fn test_user_message_for_header_mismatch() {
        let err = StoreError::Ingest(IngestError::HeaderMismatch {
            expected: vec![],
            found: vec![],
        });
        assert!(err.user_message().contains("not changed"));
    }

    #[test]
    fn test_user_message_keeps_collection_only_for_decode_errors() {
        let empty = StoreError::from(IngestError::EmptyData);
        assert!(empty.user_message().contains("no data found in CSV file"));
        assert!(empty.user_message().ends_with("The current collection was not changed."));

        let missing = StoreError::from(IngestError::FileNotFound {
            path: "gone.csv".into(),
        });
        assert!(!missing.user_message().contains("not changed"));
    }

    #[test]
    fn test_error_from_ingest() {
        let err: StoreError = IngestError::EmptyData.into();
        assert!(matches!(err, StoreError::Ingest(IngestError::EmptyData)));
        assert_eq!(err.to_string(), "no data found in CSV file");
    }
}
