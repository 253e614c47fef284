//! Persistent Key-Value Storage
//!
//! This module implements the storage side of the system: a typed facade
//! ([`Store`]) over a pluggable synchronous backend ([`StorageBackend`]),
//! with a dynamic value representation ([`StoredValue`]) and generic per-type
//! conversion ([`StoreValue`], [`RawRepr`]).
//!
//! The store is a leaf component. It owns no observers and emits no
//! notifications; change propagation lives in the [`hub`](crate::hub).

mod backend;
mod file;
mod store;
mod value;

pub use backend::{MemoryBackend, StorageBackend, StoreError};
pub use file::JsonFileBackend;
pub use store::Store;
pub use value::{RawRepr, StoreUrl, StoreValue, StoredValue};
