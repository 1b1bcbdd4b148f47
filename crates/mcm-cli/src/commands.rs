use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::{debug, info, info_span};

use mcm_ingest::DroppedRow;
use mcm_model::{FieldSchema, SortRule, SortRules};
use mcm_store::{CollectionStore, StoreError, StoreSettings, load_path_async};

use crate::cli::{AddArgs, FileArgs, OutputFormatArg, ShowArgs, SortArgs, ToggleArgs};
use crate::render::{dropped_table, fields_table, songs_table};

/// Settings from `--config`, or defaults.
pub fn load_settings(path: Option<&Path>) -> Result<StoreSettings> {
    match path {
        Some(path) => StoreSettings::load(path)
            .with_context(|| format!("load settings from {}", path.display())),
        None => Ok(StoreSettings::default()),
    }
}

/// Message shown to the user for a failed command.
///
/// Store errors use their plain-language message. Anything else prints the
/// full context chain.
pub fn describe_error(error: &anyhow::Error) -> String {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<StoreError>())
        .map_or_else(|| format!("{error:#}"), StoreError::user_message)
}

/// Loads a collection file through the background loader.
pub fn open_collection(path: &Path, settings: &StoreSettings) -> Result<CollectionStore> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start runtime")?;
    let store = Mutex::new(CollectionStore::with_settings(settings.clone()));
    let count = runtime
        .block_on(load_path_async(&store, path))
        .with_context(|| format!("load {}", path.display()))?;
    debug!(songs = count, path = %path.display(), "opened collection");
    Ok(store.into_inner())
}

/// Builds a rule set from `--sort` values.
///
/// A field given twice keeps only its last occurrence.
pub fn sort_rules_from_args(rules: &[SortRule]) -> SortRules {
    let mut ordered: Vec<SortRule> = Vec::with_capacity(rules.len());
    for rule in rules {
        ordered.retain(|existing| existing.field != rule.field);
        ordered.push(*rule);
    }
    SortRules::from_rules(ordered)
}

pub fn run_fields() -> String {
    fields_table(&FieldSchema::music_collection()).to_string()
}

pub fn run_show(args: &ShowArgs, settings: &StoreSettings) -> Result<String> {
    let mut store = open_collection(&args.file, settings)?;
    store.set_sort_rules(sort_rules_from_args(&args.sort));

    match args.format {
        OutputFormatArg::Table => {
            Ok(songs_table(store.schema(), store.songs(), store.sort_rules()).to_string())
        }
        OutputFormatArg::Csv => store
            .codec()
            .encode_file(store.songs())
            .context("encode collection"),
        OutputFormatArg::Json => {
            serde_json::to_string_pretty(store.songs()).context("serialize collection")
        }
    }
}

/// Outcome of `mcm check`.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub songs: usize,
    pub dropped: Vec<DroppedRow>,
}

impl CheckReport {
    pub fn render(&self) -> String {
        let mut output = format!(
            "{} songs loaded, {} rows skipped",
            self.songs,
            self.dropped.len()
        );
        if !self.dropped.is_empty() {
            output.push('\n');
            output.push_str(&dropped_table(&self.dropped).to_string());
        }
        output
    }
}

pub fn run_check(args: &FileArgs, settings: &StoreSettings) -> Result<CheckReport> {
    let store = open_collection(&args.file, settings)?;
    Ok(CheckReport {
        songs: store.songs().len(),
        dropped: store.dropped_rows().to_vec(),
    })
}

/// Outcome of `mcm add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    pub added: usize,
    pub total: usize,
    pub saved: bool,
}

pub fn run_add(args: &AddArgs, settings: &StoreSettings) -> Result<AddOutcome> {
    let span = info_span!("add", file = %args.file.display());
    let _guard = span.enter();

    let mut store = open_collection(&args.file, settings)?;
    let batch = fs::read_to_string(&args.from)
        .with_context(|| format!("read batch {}", args.from.display()))?;
    let added = store.add_batch_text(&batch).context("add songs")?;

    let saved = !args.dry_run;
    if saved {
        store.save().context("save collection")?;
    } else {
        info!(added, "dry run, collection not saved");
    }

    Ok(AddOutcome {
        added,
        total: store.songs().len(),
        saved,
    })
}

/// Returns the song's new `active` value.
pub fn run_toggle_active(args: &ToggleArgs, settings: &StoreSettings) -> Result<bool> {
    let mut store = open_collection(&args.file, settings)?;
    let active = store
        .toggle_active(&args.new_file_name)
        .context("toggle active")?;
    store.save().context("save collection")?;
    Ok(active)
}

/// Returns the rules the file was saved with.
pub fn run_sort(args: &SortArgs, settings: &StoreSettings) -> Result<SortRules> {
    let mut store = open_collection(&args.file, settings)?;
    store.set_sort_rules(sort_rules_from_args(&args.sort));
    if store.is_dirty() {
        store.save().context("save collection")?;
    } else {
        info!("collection already in requested order");
    }
    Ok(store.sort_rules().clone())
}
