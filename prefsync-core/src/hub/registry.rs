//! Listener Registry
//!
//! The registry is the key→listeners mapping owned by the hub. It is a plain
//! data structure with no locking of its own; the hub serializes every read
//! and mutation through its coordination context.
//!
//! # Invariants
//!
//! - A listener appears under a key iff it was added for that key and has not
//!   since been removed.
//! - Registration is set-like per key: an id already present under a key is
//!   not appended again, so a listener can never be notified twice for one
//!   change to its key.
//! - Removal is total, not key-scoped: the owner only knows "remove me", so
//!   removal scrubs the id from every key it appears under.
//! - Iteration during dispatch is stable: listeners fire in insertion order.

use indexmap::IndexMap;
use smallvec::SmallVec;

use super::listener::{KeyListener, ListenerId, NotifyFn};

/// Per-key listener collection.
///
/// Most keys have a single binding attached; two inline slots cover the
/// common cases without a heap allocation.
type Listeners = SmallVec<[KeyListener; 2]>;

/// Mapping from key to its registered listeners.
#[derive(Debug, Default)]
pub struct Registry {
    entries: IndexMap<String, Listeners>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` under `key`.
    ///
    /// Returns `false` (and leaves the registry unchanged) if the listener's
    /// id is already present under this key.
    pub fn add(&mut self, key: &str, listener: KeyListener) -> bool {
        let listeners = self.entries.entry(key.to_string()).or_default();
        if listeners.iter().any(|l| l.id() == listener.id()) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Remove `id` from every key it is registered under.
    ///
    /// Returns `true` if the listener was found anywhere. Removing an
    /// unknown or already-removed id is a no-op.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let mut removed = false;
        for listeners in self.entries.values_mut() {
            let before = listeners.len();
            listeners.retain(|l| l.id() != id);
            removed |= listeners.len() != before;
        }
        // Drop keys with no listeners left so the map does not grow
        // unboundedly under binding churn across many distinct keys.
        self.entries.retain(|_, listeners| !listeners.is_empty());
        removed
    }

    /// The listeners registered under `key`, in insertion order.
    pub fn listeners_for(&self, key: &str) -> &[KeyListener] {
        self.entries.get(key).map(|l| l.as_slice()).unwrap_or(&[])
    }

    /// Snapshot of the callbacks under `key`, for invocation outside any
    /// lock guarding the registry.
    pub(crate) fn callbacks_for(&self, key: &str) -> Vec<NotifyFn> {
        self.listeners_for(key)
            .iter()
            .map(KeyListener::callback)
            .collect()
    }

    /// Total number of registered listeners across all keys.
    pub fn listener_count(&self) -> usize {
        self.entries.values().map(|l| l.len()).sum()
    }

    /// Number of listeners registered under `key`.
    pub fn key_listener_count(&self, key: &str) -> usize {
        self.listeners_for(key).len()
    }

    /// Whether no listeners are registered at all.
    pub fn is_empty(&self) -> bool {
        self.listener_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_lookup() {
        let mut registry = Registry::new();
        let listener = KeyListener::new(|| {});
        let id = listener.id();

        assert!(registry.add("theme", listener));
        assert_eq!(registry.key_listener_count("theme"), 1);
        assert_eq!(registry.listeners_for("theme")[0].id(), id);
        assert_eq!(registry.listeners_for("volume").len(), 0);
    }

    #[test]
    fn add_is_set_like_per_key() {
        let mut registry = Registry::new();
        let listener = KeyListener::new(|| {});

        assert!(registry.add("theme", listener.clone()));
        assert!(!registry.add("theme", listener.clone()));
        assert_eq!(registry.key_listener_count("theme"), 1);

        // The same listener may observe a second key, though.
        assert!(registry.add("volume", listener));
        assert_eq!(registry.listener_count(), 2);
    }

    #[test]
    fn remove_scrubs_every_key() {
        let mut registry = Registry::new();
        let listener = KeyListener::new(|| {});
        let id = listener.id();

        registry.add("a", listener.clone());
        registry.add("b", listener.clone());
        registry.add("c", listener);

        assert!(registry.remove(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut registry = Registry::new();
        let listener = KeyListener::new(|| {});
        let id = listener.id();
        registry.add("k", listener);

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        // Never-registered ids are a no-op too.
        assert!(!registry.remove(ListenerId::new()));
    }

    #[test]
    fn remove_leaves_other_listeners_alone() {
        let mut registry = Registry::new();
        let keep = KeyListener::new(|| {});
        let gone = KeyListener::new(|| {});
        let keep_id = keep.id();

        registry.add("k", keep);
        registry.add("k", gone.clone());

        registry.remove(gone.id());
        assert_eq!(registry.key_listener_count("k"), 1);
        assert_eq!(registry.listeners_for("k")[0].id(), keep_id);
    }

    #[test]
    fn iteration_order_is_insertion_order() {
        let mut registry = Registry::new();
        let ids: Vec<_> = (0..5)
            .map(|_| {
                let listener = KeyListener::new(|| {});
                let id = listener.id();
                registry.add("k", listener);
                id
            })
            .collect();

        let observed: Vec<_> = registry.listeners_for("k").iter().map(|l| l.id()).collect();
        assert_eq!(observed, ids);
    }
}
