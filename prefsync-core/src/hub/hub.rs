//! Notification Hub
//!
//! [`StorageHub`] is the single source of truth for "who listens to key K"
//! and the only component permitted to mutate the listener registry or invoke
//! listener callbacks. Every operation is routed through one [`SerialQueue`],
//! so registry mutation can never race with dispatch and submission order
//! decides who sees what:
//!
//! - a listener removed before a write to its key is not invoked by that
//!   write's notification;
//! - a listener added before a write to its key is invoked by it.
//!
//! # Dispatch Discipline
//!
//! Inside a job, registry and status are updated under the hub's state lock,
//! but callbacks are snapshotted (cheap `Arc` clones) and invoked after the
//! lock is released. A callback may therefore re-enter any hub operation;
//! re-entrant operations are queued and run after the current job completes.
//!
//! # Failure Semantics
//!
//! No hub operation returns an error. An unrecognized external reason code
//! degrades to "reason unknown" (observable via [`Status`]); removing an
//! unknown listener is a no-op; a failed store flush is logged and absorbed.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::store::{Store, StoreValue};

use super::listener::{KeyListener, ListenerId};
use super::queue::SerialQueue;
use super::registry::Registry;
use super::status::{ChangeReason, Status};

/// Shared status-transition callback.
type StatusFn = Arc<dyn Fn(&Status) + Send + Sync>;

/// The process-wide change notification engine.
///
/// Cheap to clone; all clones share the store, the registry, and the
/// coordination context.
#[derive(Clone)]
pub struct StorageHub {
    store: Store,
    inner: Arc<HubInner>,
}

struct HubInner {
    queue: SerialQueue,
    state: Mutex<HubState>,
}

struct HubState {
    registry: Registry,
    status: Status,
    status_listeners: Vec<(ListenerId, StatusFn)>,
}

impl StorageHub {
    /// Create a hub over the given store.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            inner: Arc::new(HubInner {
                queue: SerialQueue::new(),
                state: Mutex::new(HubState {
                    registry: Registry::new(),
                    status: Status::initial(),
                    status_listeners: Vec::new(),
                }),
            }),
        }
    }

    /// Create a hub over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Store::in_memory())
    }

    /// The underlying store, for re-reads on notification.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Write `value` under `key` (`None` removes), then notify the key's
    /// listeners and flush the store.
    ///
    /// The store mutation happens synchronously, so a listener that re-reads
    /// during its notification always observes the new value. The flush after
    /// every write is a deliberate durability policy: it bounds data loss to
    /// a single write if the process is killed, at the accepted cost of
    /// redundant flushes.
    pub fn write<V: StoreValue>(&self, key: &str, value: Option<V>) {
        self.store.set(key, value);

        let key = key.to_string();
        let inner = Arc::clone(&self.inner);
        self.inner.queue.submit(move || {
            inner.apply_change(Status::local(vec![key]));
        });

        self.store.flush();
    }

    /// Register `notify` as a listener for `key`.
    ///
    /// Returns the stable token to pass to [`remove_listener`] on teardown.
    /// The token is minted immediately; the registration itself is applied in
    /// submission order, so it is visible to every subsequently submitted
    /// operation but not necessarily the instant this returns.
    ///
    /// [`remove_listener`]: StorageHub::remove_listener
    pub fn add_listener<F>(&self, key: &str, notify: F) -> ListenerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let listener = KeyListener::new(notify);
        let id = listener.id();

        let key = key.to_string();
        let inner = Arc::clone(&self.inner);
        self.inner.queue.submit(move || {
            inner.state.lock().registry.add(&key, listener);
            trace!(listener = ?id, key = %key, "listener registered");
        });

        id
    }

    /// Remove `id` from every key it is registered under.
    ///
    /// Safe to call repeatedly and for ids that were never registered; both
    /// are silent no-ops. Once this operation is applied, no subsequent
    /// notification invokes the listener.
    pub fn remove_listener(&self, id: ListenerId) {
        let inner = Arc::clone(&self.inner);
        self.inner.queue.submit(move || {
            if inner.state.lock().registry.remove(id) {
                trace!(listener = ?id, "listener removed");
            }
        });
    }

    /// Report that `keys` changed through a channel other than this hub's
    /// own write path.
    ///
    /// `reason_code` is the transport's integer reason; unrecognized codes
    /// degrade to "reason unknown" rather than failing, and notification
    /// proceeds regardless of decodability.
    pub fn on_external_change(&self, keys: Vec<String>, reason_code: i64) {
        let reason = ChangeReason::from_code(reason_code);
        if reason.is_none() {
            warn!(code = reason_code, "unrecognized external change reason");
        }

        let inner = Arc::clone(&self.inner);
        self.inner.queue.submit(move || {
            inner.apply_change(Status::external(reason, keys));
        });
    }

    /// The descriptor of the most recent change event.
    pub fn status(&self) -> Status {
        self.inner.state.lock().status.clone()
    }

    /// Observe every status transition.
    ///
    /// The callback runs once per change, before that change's key listeners.
    pub fn add_status_listener<F>(&self, notify: F) -> ListenerId
    where
        F: Fn(&Status) + Send + Sync + 'static,
    {
        let id = ListenerId::new();
        let callback: StatusFn = Arc::new(notify);

        let inner = Arc::clone(&self.inner);
        self.inner.queue.submit(move || {
            inner.state.lock().status_listeners.push((id, callback));
        });

        id
    }

    /// Stop observing status transitions. No-op for unknown ids.
    pub fn remove_status_listener(&self, id: ListenerId) {
        let inner = Arc::clone(&self.inner);
        self.inner.queue.submit(move || {
            inner
                .state
                .lock()
                .status_listeners
                .retain(|(lid, _)| *lid != id);
        });
    }

    /// Total number of registered key listeners, across all keys.
    pub fn listener_count(&self) -> usize {
        self.inner.state.lock().registry.listener_count()
    }

    /// Number of listeners registered for `key`.
    pub fn key_listener_count(&self, key: &str) -> usize {
        self.inner.state.lock().registry.key_listener_count(key)
    }
}

impl HubInner {
    /// Overwrite the status and dispatch to the affected keys' listeners.
    ///
    /// Runs inside a queued job. State is mutated under the lock; callbacks
    /// are invoked after it is released so they may re-enter the hub.
    fn apply_change(&self, status: Status) {
        let (status, status_callbacks, key_callbacks) = {
            let mut state = self.state.lock();
            state.status = status;

            let status_callbacks: Vec<StatusFn> = state
                .status_listeners
                .iter()
                .map(|(_, cb)| Arc::clone(cb))
                .collect();

            let mut key_callbacks = Vec::new();
            for key in &state.status.keys {
                key_callbacks.extend(state.registry.callbacks_for(key));
            }

            (state.status.clone(), status_callbacks, key_callbacks)
        };

        debug!(%status, listeners = key_callbacks.len(), "dispatching change");

        for callback in status_callbacks {
            callback(&status);
        }
        for callback in key_callbacks {
            callback();
        }
    }
}

impl std::fmt::Debug for StorageHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("StorageHub")
            .field("listeners", &state.registry.listener_count())
            .field("status", &state.status)
            .finish()
    }
}
