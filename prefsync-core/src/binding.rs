//! Value Bindings
//!
//! A [`Binding`] is the per-bound-value facade a UI layer holds: it wraps one
//! key with a typed get/set pair, registers an invalidation listener on
//! construction, and deregisters it on drop. The drop-based teardown makes
//! the lifecycle contract deterministic — a binding that goes away always
//! scrubs its registry entry, so high binding churn (list views recycling
//! bound cells) cannot leak listeners.
//!
//! Notifications carry no value. The binding's `on_change` callback is a
//! UI-visible change signal ("re-render, re-read"); the authoritative current
//! value always comes from a fresh [`Binding::get`].
//!
//! Raw-representable enums bind through [`RawBinding`], which routes values
//! through their [`RawRepr`] form and otherwise behaves like [`Binding`].

use crate::hub::{ListenerId, StorageHub};
use crate::store::{RawRepr, StoreValue};

/// A two-way bindable handle to one stored value.
///
/// # Example
///
/// ```rust
/// use prefsync_core::{Binding, StorageHub};
///
/// let hub = StorageHub::in_memory();
/// let theme = Binding::with_default(&hub, "theme", "light".to_string(), || {
///     // UI-visible change signal; re-read through the binding.
/// });
///
/// assert_eq!(theme.get(), Some("light".to_string()));
/// theme.set("dark".to_string());
/// assert_eq!(theme.get(), Some("dark".to_string()));
/// ```
pub struct Binding<V: StoreValue> {
    hub: StorageHub,
    key: String,
    default: Option<V>,
    listener: ListenerId,
}

impl<V: StoreValue + Clone> Binding<V> {
    /// Bind `key` with no default; `get` yields `None` while the key is
    /// absent.
    pub fn new<F>(hub: &StorageHub, key: impl Into<String>, on_change: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::build(hub, key.into(), None, on_change)
    }

    /// Bind `key` with a fallback default returned while the key is absent
    /// or holds a value of the wrong type.
    pub fn with_default<F>(
        hub: &StorageHub,
        key: impl Into<String>,
        default: V,
        on_change: F,
    ) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::build(hub, key.into(), Some(default), on_change)
    }

    fn build<F>(hub: &StorageHub, key: String, default: Option<V>, on_change: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let listener = hub.add_listener(&key, on_change);
        Self {
            hub: hub.clone(),
            key,
            default,
            listener,
        }
    }

    /// Re-read the current value from the store, falling back to the
    /// default.
    pub fn get(&self) -> Option<V> {
        self.hub
            .store()
            .get(&self.key)
            .or_else(|| self.default.clone())
    }

    /// Write a new value through the hub, notifying all of this key's
    /// listeners (including this binding's own `on_change`).
    pub fn set(&self, value: V) {
        self.hub.write(&self.key, Some(value));
    }

    /// Remove the stored value; `get` falls back to the default again.
    pub fn clear(&self) {
        self.hub.write::<V>(&self.key, None);
    }

    /// The bound key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The registration token held by this binding.
    pub fn listener_id(&self) -> ListenerId {
        self.listener
    }
}

impl<V: StoreValue> Drop for Binding<V> {
    fn drop(&mut self) {
        self.hub.remove_listener(self.listener);
    }
}

/// A two-way bindable handle to one raw-representable stored value.
///
/// The counterpart of [`Binding`] for [`RawRepr`] types: values are written
/// in their raw form and decoded on read, with an unrecognized raw value
/// falling back to the default like any type mismatch.
pub struct RawBinding<R: RawRepr> {
    hub: StorageHub,
    key: String,
    default: Option<R>,
    listener: ListenerId,
}

impl<R: RawRepr + Clone> RawBinding<R> {
    /// Bind `key` with no default.
    pub fn new<F>(hub: &StorageHub, key: impl Into<String>, on_change: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::build(hub, key.into(), None, on_change)
    }

    /// Bind `key` with a fallback default returned while the key is absent
    /// or holds an unrecognized raw value.
    pub fn with_default<F>(
        hub: &StorageHub,
        key: impl Into<String>,
        default: R,
        on_change: F,
    ) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::build(hub, key.into(), Some(default), on_change)
    }

    fn build<F>(hub: &StorageHub, key: String, default: Option<R>, on_change: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let listener = hub.add_listener(&key, on_change);
        Self {
            hub: hub.clone(),
            key,
            default,
            listener,
        }
    }

    /// Re-read and decode the current value, falling back to the default.
    pub fn get(&self) -> Option<R> {
        self.hub
            .store()
            .get_raw(&self.key)
            .or_else(|| self.default.clone())
    }

    /// Write a new value in its raw form, notifying this key's listeners.
    pub fn set(&self, value: R) {
        self.hub.write(&self.key, Some(value.to_raw()));
    }

    /// Remove the stored value; `get` falls back to the default again.
    pub fn clear(&self) {
        self.hub.write::<R::Raw>(&self.key, None);
    }

    /// The bound key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The registration token held by this binding.
    pub fn listener_id(&self) -> ListenerId {
        self.listener
    }
}

impl<R: RawRepr> Drop for RawBinding<R> {
    fn drop(&mut self) {
        self.hub.remove_listener(self.listener);
    }
}

impl<R: RawRepr> std::fmt::Debug for RawBinding<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawBinding")
            .field("key", &self.key)
            .field("listener", &self.listener)
            .finish()
    }
}

impl<V: StoreValue> std::fmt::Debug for Binding<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("listener", &self.listener)
            .finish()
    }
}
