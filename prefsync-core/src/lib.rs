//! Prefsync Core
//!
//! This crate provides the core runtime for Prefsync, a reactive wrapper
//! around a persistent key-value store. UI bindings are invalidated
//! automatically when a stored value changes — whether the change originates
//! locally (an in-process write) or externally (a background sync mechanism
//! updating the same store).
//!
//! # Architecture
//!
//! The crate is organized into three modules:
//!
//! - [`store`]: typed synchronous key-value persistence over pluggable
//!   backends; a leaf component with no observers of its own
//! - [`hub`]: the notification engine — the key→listeners registry, the
//!   serial coordination context that orders every registry operation, and
//!   the change status descriptor
//! - [`binding`]: thin per-value facade that registers a listener on
//!   construction and deregisters on drop
//!
//! # How It Fits Together
//!
//! 1. A [`Binding`] is constructed for a key and registers an invalidation
//!    listener with the [`StorageHub`].
//!
//! 2. Writes go through the hub: the store is updated, the key's listeners
//!    are notified in submission order, and the store is flushed.
//!
//! 3. An external change source reports out-of-process mutations via
//!    [`StorageHub::on_external_change`]; affected listeners are notified
//!    exactly as for local writes, with the decoded change reason recorded
//!    in [`Status`].
//!
//! 4. Notified listeners re-read through the store — the notification is a
//!    pure invalidation signal and carries no value.
//!
//! # Example
//!
//! ```rust
//! use prefsync_core::{Binding, StorageHub};
//!
//! let hub = StorageHub::in_memory();
//!
//! let theme = Binding::with_default(&hub, "theme", "light".to_string(), || {
//!     // UI-visible change signal: this bound value may have changed.
//! });
//!
//! theme.set("dark".to_string());
//! assert_eq!(theme.get(), Some("dark".to_string()));
//!
//! // A background sync updated "theme" behind our back:
//! hub.on_external_change(vec!["theme".to_string()], 0);
//! ```

pub mod binding;
pub mod hub;
pub mod store;

pub use binding::{Binding, RawBinding};
pub use hub::{ChangeReason, ChangeSource, KeyListener, ListenerId, SerialQueue, Status, StorageHub};
pub use store::{
    JsonFileBackend, MemoryBackend, RawRepr, StorageBackend, Store, StoreError, StoreUrl,
    StoreValue, StoredValue,
};
