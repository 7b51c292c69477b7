// Durable snapshot storage for the status cache.
// A snapshot is one JSON document, written atomically via a temp file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Backing store for the serialized cache map.
pub trait SnapshotStore: Send {
    /// Read the snapshot, `None` if nothing was ever written.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the snapshot with `contents`.
    fn save(&self, contents: &str) -> Result<()>;
}

/// Snapshot kept in a single file.
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    path: PathBuf,
}

impl FileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshot {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        Ok(Some(contents))
    }

    fn save(&self, contents: &str) -> Result<()> {
        write_atomic(&self.path, contents.as_bytes())
    }
}

/// Store that keeps nothing. Used when no cache directory is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSnapshot;

impl SnapshotStore for NoSnapshot {
    fn load(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn save(&self, _contents: &str) -> Result<()> {
        Ok(())
    }
}

/// Write bytes to `path` atomically via a sibling temp file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}
