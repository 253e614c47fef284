//! Change Notification Engine
//!
//! This module implements the reactive core: the process-wide registry
//! mapping storage keys to interested listeners, and the machinery that
//! dispatches change notifications — local or external — in a strictly
//! serialized order.
//!
//! # Concepts
//!
//! ## Coordination Context
//!
//! All registry mutation and all dispatch is funneled through one
//! [`SerialQueue`]: a FIFO of jobs executed in submission order, never
//! concurrently. Serializing through a single context gives mutual exclusion
//! on the registry without per-operation locking discipline, and makes the
//! ordering guarantees exact: an operation submitted before another is fully
//! applied before the other begins.
//!
//! ## Listeners
//!
//! A [`KeyListener`] pairs an identity token ([`ListenerId`]) with a
//! no-argument invalidation callback. The hub hands the token back from
//! [`StorageHub::add_listener`]; the owning binding holds it and passes it to
//! [`StorageHub::remove_listener`] on teardown. The hub never keeps the
//! owner alive and the owner's destruction never requires the hub's
//! cooperation — the token is the entire coupling.
//!
//! ## Status
//!
//! Every change overwrites a single [`Status`] value (timestamp, source,
//! affected keys). Consumers that need history observe transitions through
//! [`StorageHub::add_status_listener`] rather than polling.

mod hub;
mod listener;
mod queue;
mod registry;
mod status;

pub use hub::StorageHub;
pub use listener::{KeyListener, ListenerId, NotifyFn};
pub use queue::SerialQueue;
pub use registry::Registry;
pub use status::{ChangeReason, ChangeSource, Status};
