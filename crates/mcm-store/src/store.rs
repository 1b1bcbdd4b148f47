//! The collection store.
//!
//! The store keeps two copies of the collection. `working` is what the user
//! sees and edits. `committed` is the last loaded or saved snapshot. The store
//! is dirty while the two differ, order included.

use std::path::{Path, PathBuf};

use mcm_ingest::{DecodedFile, DroppedRow, RecordCodec, read_csv_text, text_from_bytes};
use mcm_model::{FieldSchema, Song, SortField, SortRules};

use crate::batch::validate_batch;
use crate::config::StoreSettings;
use crate::error::{BatchError, Result, StoreError};
use crate::loader::BusyFlag;
use crate::sink::{CsvSink, FileSink};
use crate::sorter;

/// In-memory music collection with staged edits.
#[derive(Debug, Clone, Default)]
pub struct CollectionStore {
    codec: RecordCodec,
    settings: StoreSettings,
    working: Vec<Song>,
    committed: Vec<Song>,
    sort_rules: SortRules,
    source: Option<PathBuf>,
    loaded: bool,
    pub(crate) loading: BusyFlag,
    dropped: Vec<DroppedRow>,
}

impl CollectionStore {
    pub fn new(codec: RecordCodec, settings: StoreSettings) -> Self {
        Self {
            codec,
            settings,
            ..Self::default()
        }
    }

    pub fn with_settings(settings: StoreSettings) -> Self {
        Self::new(RecordCodec::default(), settings)
    }

    pub fn codec(&self) -> &RecordCodec {
        &self.codec
    }

    pub fn schema(&self) -> &FieldSchema {
        self.codec.schema()
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    // === Reading ===

    /// Working set in display order.
    pub fn songs(&self) -> &[Song] {
        &self.working
    }

    /// Last loaded or saved snapshot.
    pub fn committed(&self) -> &[Song] {
        &self.committed
    }

    pub fn sort_rules(&self) -> &SortRules {
        &self.sort_rules
    }

    /// Whether a collection has been loaded.
    pub fn has_file(&self) -> bool {
        self.loaded
    }

    /// Path the collection was loaded from or will be saved to.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    pub fn is_dirty(&self) -> bool {
        self.working != self.committed
    }

    /// Rows the last load skipped.
    pub fn dropped_rows(&self) -> &[DroppedRow] {
        &self.dropped
    }

    /// Looks up a working song by file name.
    pub fn find(&self, new_file_name: &str) -> Option<&Song> {
        self.working
            .iter()
            .find(|song| song.identity() == new_file_name)
    }

    // === Loading ===

    /// Decodes collection text and replaces the store contents.
    ///
    /// On error the store is left as it was.
    pub fn load_text(&mut self, text: &str) -> Result<&[Song]> {
        self.ensure_idle()?;
        let decoded = self.codec.decode_file_with_report(text)?;
        self.replace_contents(decoded, None);
        Ok(&self.working)
    }

    /// Decodes raw file bytes. Rejects UTF-16 and invalid UTF-8.
    pub fn load_bytes(&mut self, bytes: Vec<u8>) -> Result<&[Song]> {
        self.ensure_idle()?;
        let text = text_from_bytes(bytes)?;
        self.load_text(&text)
    }

    /// Reads and decodes a file, remembering it as the save target.
    pub fn load_file(&mut self, path: &Path) -> Result<&[Song]> {
        self.ensure_idle()?;
        let text = read_csv_text(path, self.settings.max_file_size)?;
        let decoded = self.codec.decode_file_with_report(&text)?;
        self.replace_contents(decoded, Some(path.to_path_buf()));
        Ok(&self.working)
    }

    pub(crate) fn ensure_idle(&self) -> Result<()> {
        if self.loading.is_set() {
            tracing::warn!("rejected load: another load is in progress");
            return Err(StoreError::LoadInProgress);
        }
        Ok(())
    }

    pub(crate) fn replace_contents(&mut self, decoded: DecodedFile, source: Option<PathBuf>) {
        let DecodedFile { songs, dropped } = decoded;

        if self.settings.log_dropped_rows && !dropped.is_empty() {
            let rows: Vec<usize> = dropped.iter().map(|d| d.row_number).collect();
            tracing::warn!(count = dropped.len(), ?rows, "dropped unreadable rows");
        }
        tracing::info!(
            songs = songs.len(),
            dropped = dropped.len(),
            path = ?source,
            "loaded collection"
        );

        self.committed = songs.clone();
        self.working = songs;
        self.sort_rules = SortRules::new();
        self.dropped = dropped;
        self.source = source;
        self.loaded = true;
    }

    // === Editing ===

    /// Replaces the working song that has the same file name.
    pub fn edit(&mut self, song: Song) -> Result<()> {
        let slot = self.working_mut(song.identity())?;
        *slot = song;
        Ok(())
    }

    /// Flips the `active` flag of a working song.
    pub fn toggle_active(&mut self, new_file_name: &str) -> Result<bool> {
        let song = self.working_mut(new_file_name)?;
        song.active = !song.active;
        Ok(song.active)
    }

    fn working_mut(&mut self, new_file_name: &str) -> Result<&mut Song> {
        self.working
            .iter_mut()
            .find(|song| song.identity() == new_file_name)
            .ok_or_else(|| StoreError::UnknownRecord {
                new_file_name: new_file_name.to_string(),
            })
    }

    /// Adds new songs ahead of the existing ones and re-sorts.
    ///
    /// New songs get negative ids below the current minimum, keeping their
    /// batch order. Nothing is added if validation fails.
    pub fn add_records(&mut self, songs: Vec<Song>) -> Result<usize> {
        if !self.loaded {
            return Err(StoreError::NoFileLoaded);
        }
        validate_batch(&songs, &self.working)?;

        let min_id = self.working.iter().map(|s| s.id).min().unwrap_or(0).min(0);
        let count = songs.len() as i64;
        let added = songs.len();

        let mut merged: Vec<Song> = songs
            .into_iter()
            .zip(0_i64..)
            .map(|(song, index)| Song {
                id: min_id - (count - index),
                ..song
            })
            .collect();
        merged.append(&mut self.working);
        self.working = merged;
        sorter::apply(&mut self.working, &self.sort_rules);

        tracing::info!(added, total = self.working.len(), "added songs");
        Ok(added)
    }

    /// Parses header-less pasted rows and adds them.
    pub fn add_batch_text(&mut self, text: &str) -> Result<usize> {
        if !self.loaded {
            return Err(StoreError::NoFileLoaded);
        }
        let batch = self.codec.parse_batch(text);
        if !batch.is_clean() {
            let rows = batch.invalid_rows.iter().map(|d| d.row_number).collect();
            return Err(BatchError::UnparseableRows(rows).into());
        }
        self.add_records(batch.songs)
    }

    // === Sorting ===

    /// Replaces the sort rules and re-sorts the working set.
    pub fn set_sort_rules(&mut self, rules: SortRules) {
        self.sort_rules = rules;
        sorter::apply(&mut self.working, &self.sort_rules);
        tracing::debug!(rules = %self.describe_rules(), "sorted collection");
    }

    /// Cycles one column through ascending, descending, and off.
    pub fn toggle_sort_column(&mut self, field: impl Into<SortField>) {
        let rules = self.sort_rules.toggled(field.into());
        self.set_sort_rules(rules);
    }

    fn describe_rules(&self) -> String {
        self.sort_rules
            .effective()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    // === Commit / Revert ===

    /// Accepts the working set as the new snapshot.
    pub fn commit(&mut self) {
        self.committed = self.working.clone();
    }

    /// Discards edits and returns to id order.
    ///
    /// The snapshot is re-sorted too, so the store is clean afterwards.
    pub fn revert(&mut self) {
        self.sort_rules = SortRules::new();
        sorter::apply(&mut self.committed, &self.sort_rules);
        self.working = self.committed.clone();
    }

    // === Saving ===

    /// Saves to the file the collection came from.
    pub fn save(&mut self) -> Result<()> {
        if !self.loaded {
            return Err(StoreError::NoFileLoaded);
        }
        let path = self.source.clone().ok_or(StoreError::NoSavePath)?;
        let mut sink = FileSink::new(&path).atomic(self.settings.atomic_save);
        self.save_to(&mut sink)?;
        tracing::info!(songs = self.working.len(), path = %path.display(), "saved collection");
        Ok(())
    }

    /// Saves to a new file and makes it the save target.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let previous = self.source.replace(path.into());
        let result = self.save();
        if result.is_err() {
            self.source = previous;
        }
        result
    }

    /// Encodes the working set into `sink`, then commits.
    pub fn save_to<S: CsvSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        if !self.loaded {
            return Err(StoreError::NoFileLoaded);
        }
        let text = self.codec.encode_file(&self.working)?;
        sink.write_csv(&text)?;
        self.commit();
        Ok(())
    }
}
