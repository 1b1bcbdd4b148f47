//! Background file loading.
//!
//! A load is split in three steps so the decode can run off the async runtime
//! without holding the store lock: [`CollectionStore::begin_load`] marks the
//! store busy, the file is read and decoded on the blocking pool, and
//! [`CollectionStore::finish_load`] applies the result. Only one load may be
//! in flight.
//!
//! The busy flag is owned by the [`LoadTicket`]. Dropping the ticket, or a
//! `load_path_async` future that holds it, makes the store idle again.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use mcm_ingest::{DecodedFile, RecordCodec, read_csv_text};
use mcm_model::Song;
use tokio::sync::Mutex;

use crate::error::{Result, StoreError};
use crate::store::CollectionStore;

/// Busy flag shared between a store and its outstanding [`LoadTicket`].
///
/// A cloned store starts idle with a flag of its own.
#[derive(Debug, Default)]
pub(crate) struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub(crate) fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Sets the flag, returning a handle that clears it. `None` if already set.
    fn acquire(&self) -> Option<Arc<AtomicBool>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Arc::clone(&self.0))
    }
}

impl Clone for BusyFlag {
    fn clone(&self) -> Self {
        Self::default()
    }
}

/// Proof that the caller owns the in-flight load.
///
/// The store stays busy until the ticket is finished, cancelled or dropped.
#[derive(Debug)]
#[must_use = "a load ticket must be passed to finish_load or cancel_load"]
pub struct LoadTicket {
    path: PathBuf,
    busy: Arc<AtomicBool>,
}

impl LoadTicket {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LoadTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

impl CollectionStore {
    /// Marks the store busy. Fails if a load is already running.
    pub fn begin_load(&mut self, path: impl Into<PathBuf>) -> Result<LoadTicket> {
        self.ensure_idle()?;
        let busy = self.loading.acquire().ok_or(StoreError::LoadInProgress)?;
        let path = path.into();
        tracing::debug!(path = %path.display(), "load started");
        Ok(LoadTicket { path, busy })
    }

    /// Applies a finished decode and clears the busy flag.
    ///
    /// A failed decode leaves the previous contents in place.
    pub fn finish_load(
        &mut self,
        mut ticket: LoadTicket,
        decoded: Result<DecodedFile>,
    ) -> Result<&[Song]> {
        let path = std::mem::take(&mut ticket.path);
        drop(ticket);
        match decoded {
            Ok(decoded) => {
                self.replace_contents(decoded, Some(path));
                Ok(self.songs())
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "load failed");
                Err(err)
            }
        }
    }

    /// Clears the busy flag without touching the contents.
    pub fn cancel_load(&mut self, ticket: LoadTicket) {
        tracing::debug!(path = %ticket.path.display(), "load cancelled");
        drop(ticket);
    }
}

/// Reads and decodes a file on the blocking pool.
pub async fn decode_path(codec: RecordCodec, path: PathBuf, max_size: u64) -> Result<DecodedFile> {
    tokio::task::spawn_blocking(move || -> Result<DecodedFile> {
        let text = read_csv_text(&path, max_size)?;
        Ok(codec.decode_file_with_report(&text)?)
    })
    .await
    .map_err(|e| StoreError::Task {
        message: e.to_string(),
    })?
}

/// Loads a file into a shared store.
///
/// The lock is released while the file is decoded. Returns the number of
/// songs loaded.
pub async fn load_path_async(
    store: &Mutex<CollectionStore>,
    path: impl Into<PathBuf>,
) -> Result<usize> {
    let path = path.into();
    let (ticket, codec, max_size) = {
        let mut guard = store.lock().await;
        let ticket = guard.begin_load(path.clone())?;
        (
            ticket,
            guard.codec().clone(),
            guard.settings().max_file_size,
        )
    };

    let decoded = decode_path(codec, path, max_size).await;

    let mut guard = store.lock().await;
    guard.finish_load(ticket, decoded).map(<[Song]>::len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_is_rejected() {
        let mut store = CollectionStore::default();
        let ticket = store.begin_load("a.csv").unwrap();
        assert!(store.is_loading());
        assert!(matches!(
            store.begin_load("b.csv"),
            Err(StoreError::LoadInProgress)
        ));
        assert!(matches!(
            store.load_text("anything"),
            Err(StoreError::LoadInProgress)
        ));
        store.cancel_load(ticket);
        assert!(!store.is_loading());
    }

    #[test]
    fn test_failed_finish_clears_busy_flag() {
        let mut store = CollectionStore::default();
        let ticket = store.begin_load("a.csv").unwrap();
        let result = store.finish_load(ticket, Err(StoreError::NoFileLoaded));
        assert!(result.is_err());
        assert!(!store.is_loading());
        assert!(!store.has_file());
    }

    #[test]
    fn test_dropped_ticket_clears_busy_flag() {
        let mut store = CollectionStore::default();
        let ticket = store.begin_load("a.csv").unwrap();
        drop(ticket);
        assert!(!store.is_loading());
        store.begin_load("b.csv").unwrap();
    }

    #[test]
    fn test_cloned_store_is_idle() {
        let mut store = CollectionStore::default();
        let ticket = store.begin_load("a.csv").unwrap();
        let mut copy = store.clone();
        assert!(!copy.is_loading());
        let copy_ticket = copy.begin_load("b.csv").unwrap();
        copy.cancel_load(copy_ticket);
        assert!(store.is_loading());
        store.cancel_load(ticket);
    }
}
