//! Save targets for encoded collection text.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// Destination for a saved collection.
pub trait CsvSink {
    /// Writes the complete encoded collection, replacing earlier contents.
    fn write_csv(&mut self, contents: &str) -> Result<()>;
}

/// Writes the collection to a file on disk.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    atomic: bool,
}

impl FileSink {
    /// Sink that writes `path` atomically.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            atomic: true,
        }
    }

    /// Toggle the temp-file-and-rename write.
    #[must_use]
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CsvSink for FileSink {
    fn write_csv(&mut self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        if self.atomic {
            write_atomic(&self.path, contents.as_bytes())
        } else {
            fs::write(&self.path, contents).map_err(|e| StoreError::Io {
                operation: "write",
                path: self.path.clone(),
                source: e,
            })
        }
    }
}

/// Writes next to the target, then renames over it.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(path)?;

    let mut file = File::create(&temp_path).map_err(|e| StoreError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(bytes).map_err(|e| StoreError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| StoreError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        StoreError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source: e,
        }
    })
}

fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            operation: "name",
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        });
    };
    let mut temp_name = OsString::from(file_name);
    temp_name.push(".tmp");
    Ok(path.with_file_name(temp_name))
}

/// Keeps every write in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    writes: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent write.
    pub fn contents(&self) -> Option<&str> {
        self.writes.last().map(String::as_str)
    }

    pub fn write_count(&self) -> usize {
        self.writes.len()
    }
}

impl CsvSink for MemorySink {
    fn write_csv(&mut self, contents: &str) -> Result<()> {
        self.writes.push(contents.to_string());
        Ok(())
    }
}
