//! Music collection store.
//!
//! Holds a loaded collection as a working set plus the last committed
//! snapshot, and tracks whether they differ.
//!
//! # Features
//!
//! - **Staged edits**: edits, toggles, and additions change only the working
//!   set until [`CollectionStore::save`] or [`CollectionStore::commit`]
//! - **Multi-key sorting**: stable passes where the last rule is primary
//! - **Bulk add**: negative ids for new songs, with duplicate checks
//! - **Atomic saves**: temp file + rename through [`FileSink`]
//! - **Background loads**: [`load_path_async`] decodes on the blocking pool
//!   and rejects overlapping loads
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use mcm_model::FieldKey;
//! use mcm_store::CollectionStore;
//!
//! let mut store = CollectionStore::default();
//! store.load_file(Path::new("music_collection.csv"))?;
//! store.toggle_sort_column(FieldKey::Artist);
//! store.toggle_active("item_1.mp3")?;
//! if store.is_dirty() {
//!     store.save()?;
//! }
//! ```

mod batch;
mod config;
mod error;
mod loader;
pub mod sink;
pub mod sorter;
mod store;

// === Error Types ===
pub use error::{BatchError, Result, StoreError};

// === Configuration ===
pub use config::StoreSettings;

// === Store ===
pub use batch::validate_batch;
pub use loader::{LoadTicket, decode_path, load_path_async};
pub use sink::{CsvSink, FileSink, MemorySink};
pub use store::CollectionStore;
