//! Music collection CSV ingestion.
//!
//! This crate converts between collection CSV files and typed [`Song`]
//! records.
//!
//! # Features
//!
//! - **Strict headers**: the first row must match the schema's header row
//!   exactly, in order
//! - **Lenient rows**: rows with the wrong number of cells are dropped, and
//!   can be reported with [`RecordCodec::decode_file_with_report`]
//! - **Typed coercion**: numeric and boolean cells are cast the way the
//!   files' original tooling cast them (see [`coerce`])
//! - **Batch parsing**: header-less pasted rows for bulk adds
//! - **File reading**: size limits and encoding checks before decode
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use mcm_ingest::{MAX_CSV_FILE_SIZE, RecordCodec, read_csv_text};
//!
//! let codec = RecordCodec::default();
//! let text = read_csv_text(Path::new("music_collection.csv"), MAX_CSV_FILE_SIZE)?;
//! let songs = codec.decode_file(&text)?;
//! let written = codec.encode_file(&songs)?;
//! ```
//!
//! [`Song`]: mcm_model::Song

mod batch;
mod codec;
pub mod coerce;
mod error;
mod rows;

// === Error Types ===
pub use error::{IngestError, Result, RowError};

// === Codec ===
pub use batch::ParsedBatch;
pub use codec::{DecodedFile, DroppedRow, RecordCodec};

// === CSV Reading ===
pub use rows::{
    MAX_CSV_FILE_SIZE, check_file_size_with_limit, read_csv_text, read_rows, text_from_bytes,
    write_rows,
};
