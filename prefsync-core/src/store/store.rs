//! Store Facade
//!
//! [`Store`] is the typed front door to a [`StorageBackend`]: generic
//! accessors over the [`StoreValue`] conversion trait, plus raw-representable
//! enum access via [`RawRepr`].
//!
//! # Semantics
//!
//! - Absence of a key and a stored value of the wrong type both read as
//!   `None`. Callers supply their own fallback default.
//! - `set(key, None)` removes the key; a removed key reads as `None`, which
//!   is distinct from a stored falsy/zero value.
//! - The store owns no observers. It never tells anyone a value changed —
//!   that is the hub's responsibility.
//!
//! # Failure Policy
//!
//! Reads and writes are infallible by contract (the backend is a local
//! facility). The only fallible backend operation is `flush`, whose errors
//! are logged and absorbed here; a failed flush leaves the in-memory state
//! authoritative.

use std::sync::Arc;

use tracing::warn;

use super::backend::{MemoryBackend, StorageBackend};
use super::value::{RawRepr, StoreValue};

/// Typed key-value facade over a shared storage backend.
///
/// Cheap to clone; all clones share the backend.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn StorageBackend>,
}

impl Store {
    /// Create a store over the given backend.
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Create a store over a fresh volatile in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Read the value for `key` as `V`.
    ///
    /// Returns `None` when the key is absent or the stored value is not
    /// convertible to `V`.
    pub fn get<V: StoreValue>(&self, key: &str) -> Option<V> {
        self.backend.get(key).and_then(|v| V::from_stored(&v))
    }

    /// Write `value` under `key`; `None` removes the key.
    pub fn set<V: StoreValue>(&self, key: &str, value: Option<V>) {
        match value {
            Some(v) => self.backend.set(key, v.into_stored()),
            None => self.backend.remove(key),
        }
    }

    /// Remove `key`. Equivalent to `set::<V>(key, None)`.
    pub fn remove(&self, key: &str) {
        self.backend.remove(key);
    }

    /// Whether any value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.backend.get(key).is_some()
    }

    /// All keys currently present.
    pub fn keys(&self) -> Vec<String> {
        self.backend.keys()
    }

    /// Read a raw-representable value, decoding via [`RawRepr::from_raw`].
    ///
    /// An unrecognized raw value reads as `None`, like any type mismatch.
    pub fn get_raw<R: RawRepr>(&self, key: &str) -> Option<R> {
        self.get::<R::Raw>(key).and_then(R::from_raw)
    }

    /// Write a raw-representable value in its raw form; `None` removes.
    pub fn set_raw<R: RawRepr>(&self, key: &str, value: Option<R>) {
        self.set(key, value.map(|v| v.to_raw()));
    }

    /// Force durable persistence. Failures are logged and absorbed.
    pub fn flush(&self) {
        if let Err(err) = self.backend.flush() {
            warn!(error = %err, "store flush failed");
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("keys", &self.backend.keys().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::store::value::{StoreUrl, StoredValue};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Quality {
        Low,
        High,
    }

    impl RawRepr for Quality {
        type Raw = i64;

        fn to_raw(&self) -> i64 {
            match self {
                Quality::Low => 0,
                Quality::High => 1,
            }
        }

        fn from_raw(raw: i64) -> Option<Self> {
            match raw {
                0 => Some(Quality::Low),
                1 => Some(Quality::High),
                _ => None,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Theme {
        Light,
        Dark,
    }

    impl RawRepr for Theme {
        type Raw = String;

        fn to_raw(&self) -> String {
            match self {
                Theme::Light => "light".to_string(),
                Theme::Dark => "dark".to_string(),
            }
        }

        fn from_raw(raw: String) -> Option<Self> {
            match raw.as_str() {
                "light" => Some(Theme::Light),
                "dark" => Some(Theme::Dark),
                _ => None,
            }
        }
    }

    #[test]
    fn typed_round_trips() {
        let store = Store::in_memory();

        store.set("flag", Some(true));
        store.set("count", Some(42_i64));
        store.set("small", Some(7_i32));
        store.set("ratio", Some(0.5_f64));
        store.set("name", Some("prefsync".to_string()));
        store.set("blob", Some(vec![1_u8, 2, 3]));

        let when = Utc.with_ymd_and_hms(2024, 11, 14, 12, 0, 0).unwrap();
        store.set("when", Some(when));

        let feed = StoreUrl::parse("https://example.com/feed").unwrap();
        store.set("feed", Some(feed.clone()));

        assert_eq!(store.get::<bool>("flag"), Some(true));
        assert_eq!(store.get::<i64>("count"), Some(42));
        assert_eq!(store.get::<i32>("small"), Some(7));
        assert_eq!(store.get::<f64>("ratio"), Some(0.5));
        assert_eq!(store.get::<String>("name"), Some("prefsync".to_string()));
        assert_eq!(store.get::<Vec<u8>>("blob"), Some(vec![1, 2, 3]));
        assert_eq!(store.get("when"), Some(when));
        assert_eq!(store.get::<StoreUrl>("feed"), Some(feed));
    }

    #[test]
    fn url_read_validates_the_stored_string() {
        let store = Store::in_memory();

        // A URL is stored as plain text and stays readable as one.
        let url = StoreUrl::parse("https://example.com/a").unwrap();
        store.set("link", Some(url));
        assert_eq!(
            store.get::<String>("link"),
            Some("https://example.com/a".to_string())
        );

        // A string that is not an absolute URL reads as None through the
        // URL type, while remaining intact as text.
        store.set("link", Some("just some words".to_string()));
        assert_eq!(store.get::<StoreUrl>("link"), None);
        assert_eq!(
            store.get::<String>("link"),
            Some("just some words".to_string())
        );
    }

    #[test]
    fn none_removes_the_key() {
        let store = Store::in_memory();

        store.set("k", Some(1_i64));
        assert!(store.contains("k"));

        store.set::<i64>("k", None);
        assert!(!store.contains("k"));
        assert_eq!(store.get::<i64>("k"), None);
    }

    #[test]
    fn absence_is_distinct_from_falsy() {
        let store = Store::in_memory();

        store.set("flag", Some(false));
        store.set("count", Some(0_i64));

        assert_eq!(store.get::<bool>("flag"), Some(false));
        assert_eq!(store.get::<i64>("count"), Some(0));
        assert_eq!(store.get::<bool>("missing"), None);
    }

    #[test]
    fn keys_tracks_live_entries() {
        let store = Store::in_memory();
        assert!(store.keys().is_empty());

        store.set("a", Some(1_i64));
        store.set("b", Some(2_i64));

        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

        store.remove("a");
        assert_eq!(store.keys(), vec!["b".to_string()]);
    }

    #[test]
    fn mismatch_reads_as_none() {
        let store = Store::in_memory();
        store.set("k", Some("text".to_string()));

        assert_eq!(store.get::<i64>("k"), None);
        assert_eq!(store.get::<bool>("k"), None);
        // Original value still intact under its own type.
        assert_eq!(store.get::<String>("k"), Some("text".to_string()));
    }

    #[test]
    fn raw_enum_by_int_round_trips() {
        let store = Store::in_memory();

        store.set_raw("quality", Some(Quality::High));
        assert_eq!(store.get_raw::<Quality>("quality"), Some(Quality::High));
        // Stored as its raw integer.
        assert_eq!(store.get::<i64>("quality"), Some(1));

        store.set_raw::<Quality>("quality", None);
        assert_eq!(store.get_raw::<Quality>("quality"), None);
    }

    #[test]
    fn raw_enum_by_string_round_trips() {
        let store = Store::in_memory();

        store.set_raw("theme", Some(Theme::Dark));
        assert_eq!(store.get_raw::<Theme>("theme"), Some(Theme::Dark));
        assert_eq!(store.get::<String>("theme"), Some("dark".to_string()));
    }

    #[test]
    fn unknown_raw_value_reads_as_none() {
        let store = Store::in_memory();

        store.set("quality", Some(99_i64));
        assert_eq!(store.get_raw::<Quality>("quality"), None);

        store.set("theme", Some("sepia".to_string()));
        assert_eq!(store.get_raw::<Theme>("theme"), None);
    }

    #[test]
    fn dynamic_value_passthrough() {
        let store = Store::in_memory();

        let value = StoredValue::List(vec![StoredValue::Int(1), StoredValue::Int(2)]);
        store.set("list", Some(value.clone()));
        assert_eq!(store.get::<StoredValue>("list"), Some(value));
    }
}
