//! JSON File Backend
//!
//! Durable backend that keeps the working set in memory and persists it as a
//! single JSON document on flush. The write goes to a sibling temp file first
//! and is renamed into place, so a crash mid-flush leaves the previous
//! snapshot intact rather than a truncated file.
//!
//! Reads and writes after `open` never touch the filesystem; only `flush`
//! does. The hub's over-eager flush policy (flush after every write) means
//! the on-disk snapshot trails the in-memory state by at most one write.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;

use super::backend::{StorageBackend, StoreError};
use super::value::StoredValue;

/// File-backed storage persisting to a JSON document.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    entries: RwLock<IndexMap<String, StoredValue>>,
}

impl JsonFileBackend {
    /// Open a backend at `path`, loading the existing snapshot if present.
    ///
    /// A missing file yields an empty store; an unreadable or unparseable
    /// file is an error, since silently discarding user data on a corrupt
    /// snapshot would be worse than failing construction.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            IndexMap::new()
        };

        debug!(path = %path.display(), "opened json file backend");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for JsonFileBackend {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: StoredValue) {
        self.entries.write().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.write().shift_remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = {
            let entries = self.entries.read();
            serde_json::to_string_pretty(&*entries)?
        };

        // Write-then-rename keeps the previous snapshot intact on crash.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = JsonFileBackend::open(dir.path().join("prefs.json")).expect("open");
        assert!(backend.keys().is_empty());
    }

    #[test]
    fn values_survive_flush_and_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");

        {
            let backend = JsonFileBackend::open(&path).expect("open");
            backend.set("theme", StoredValue::Text("dark".to_string()));
            backend.set("volume", StoredValue::Int(11));
            backend.flush().expect("flush");
        }

        let backend = JsonFileBackend::open(&path).expect("reopen");
        assert_eq!(
            backend.get("theme"),
            Some(StoredValue::Text("dark".to_string()))
        );
        assert_eq!(backend.get("volume"), Some(StoredValue::Int(11)));
    }

    #[test]
    fn remove_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");

        {
            let backend = JsonFileBackend::open(&path).expect("open");
            backend.set("stale", StoredValue::Bool(true));
            backend.flush().expect("flush");
            backend.remove("stale");
            backend.flush().expect("flush");
        }

        let backend = JsonFileBackend::open(&path).expect("reopen");
        assert_eq!(backend.get("stale"), None);
    }

    #[test]
    fn corrupt_snapshot_fails_open() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json {{{").expect("write");

        assert!(matches!(
            JsonFileBackend::open(&path),
            Err(StoreError::Serialize(_))
        ));
    }
}
