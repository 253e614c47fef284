//! Storage Backends
//!
//! The store reads and writes through the [`StorageBackend`] trait, which
//! keeps the persistence mechanism swappable: an in-memory map for tests and
//! development, a JSON file for durable local storage, or anything else that
//! can answer a synchronous get/set/remove.
//!
//! Backends are passive. They never notify anyone about changes — change
//! propagation is entirely the hub's job.

use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;

use super::value::StoredValue;

/// Errors surfaced by storage backends.
///
/// These never escape the store's public read/write surface; they appear only
/// at construction time (opening a file backend) and in logs when a flush
/// fails.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Synchronous key-value persistence.
///
/// All methods take `&self`; implementations provide their own interior
/// mutability and must be safe to share across threads.
pub trait StorageBackend: Send + Sync {
    /// Current value for `key`, or `None` if absent.
    fn get(&self, key: &str) -> Option<StoredValue>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: StoredValue);

    /// Remove `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str);

    /// All keys currently present, in no particular order.
    fn keys(&self) -> Vec<String>;

    /// Force durable persistence.
    ///
    /// May be a no-op for backends whose writes are immediately durable.
    fn flush(&self) -> Result<(), StoreError>;
}

/// Volatile in-memory backend.
///
/// Writes are always "durable" for the lifetime of the process, so `flush`
/// does nothing.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, StoredValue>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: StoredValue) {
        self.entries.write().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_get_set_remove() {
        let backend = MemoryBackend::new();

        assert_eq!(backend.get("k"), None);

        backend.set("k", StoredValue::Int(1));
        assert_eq!(backend.get("k"), Some(StoredValue::Int(1)));

        backend.set("k", StoredValue::Int(2));
        assert_eq!(backend.get("k"), Some(StoredValue::Int(2)));

        backend.remove("k");
        assert_eq!(backend.get("k"), None);

        // Removing again is a no-op.
        backend.remove("k");
    }

    #[test]
    fn memory_backend_lists_keys() {
        let backend = MemoryBackend::new();
        backend.set("a", StoredValue::Bool(true));
        backend.set("b", StoredValue::Bool(false));

        let mut keys = backend.keys();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn memory_backend_flush_is_noop() {
        let backend = MemoryBackend::new();
        backend.flush().expect("flush");
    }
}
