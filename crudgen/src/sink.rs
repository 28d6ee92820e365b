//! Destinations for generated source files

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::error::Result;

/// Where generated class text is written.
///
/// All operations are idempotent except `append_text`, which always adds to the
/// end of the file.
pub trait FileSystemSink: Send + Sync {
    /// Create a directory (and its parents) if absent
    fn ensure_directory(&self, path: &Path) -> Result<()>;

    /// Create an empty file if absent; existing content is left untouched
    fn ensure_file_exists(&self, path: &Path) -> Result<()>;

    /// Append text to a file
    fn append_text(&self, path: &Path, text: &str) -> Result<()>;
}

/// Sink writing to the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSink;

impl FileSystemSink for LocalFileSink {
    fn ensure_directory(&self, path: &Path) -> Result<()> {
        if !path.is_dir() {
            debug!("Creating directory {}", path.display());
        }
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn ensure_file_exists(&self, path: &Path) -> Result<()> {
        OpenOptions::new().create(true).append(true).open(path)?;
        Ok(())
    }

    fn append_text(&self, path: &Path, text: &str) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(text.as_bytes())?;
        debug!("Appended {} bytes to {}", text.len(), path.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    directories: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, String>,
    appends: usize,
}

/// In-memory sink, used for dry runs and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    state: Mutex<MemoryState>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directories created so far
    pub fn directories(&self) -> Vec<PathBuf> {
        self.lock().directories.iter().cloned().collect()
    }

    /// Paths of the files created so far
    pub fn files(&self) -> Vec<PathBuf> {
        self.lock().files.keys().cloned().collect()
    }

    /// Content of a file, if it exists
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.lock().files.get(path).cloned()
    }

    /// Number of `append_text` calls
    pub fn append_count(&self) -> usize {
        self.lock().appends
    }

    /// Whether nothing was written at all
    pub fn is_empty(&self) -> bool {
        let state = self.lock();
        state.directories.is_empty() && state.files.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FileSystemSink for MemorySink {
    fn ensure_directory(&self, path: &Path) -> Result<()> {
        self.lock().directories.insert(path.to_path_buf());
        Ok(())
    }

    fn ensure_file_exists(&self, path: &Path) -> Result<()> {
        self.lock().files.entry(path.to_path_buf()).or_default();
        Ok(())
    }

    fn append_text(&self, path: &Path, text: &str) -> Result<()> {
        let mut state = self.lock();
        state.appends += 1;
        state
            .files
            .entry(path.to_path_buf())
            .or_default()
            .push_str(text);
        Ok(())
    }
}
