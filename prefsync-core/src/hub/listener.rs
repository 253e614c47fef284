//! Key Listeners
//!
//! A [`KeyListener`] represents one interested party for one key: an opaque
//! identity plus a no-argument callback meaning "the value for your key may
//! have changed, re-read it". The notification deliberately carries no value;
//! if several writes coalesce before the listener runs, re-reading yields the
//! authoritative current state instead of a stale snapshot.
//!
//! Listener equality is identity-based: two listeners are the same only if
//! they are the same registered instance, never because they share a key or
//! a callback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared invalidation callback.
pub type NotifyFn = Arc<dyn Fn() + Send + Sync>;

/// Unique identity of a registered listener.
///
/// Minted from a process-wide atomic counter; this is the stable token the
/// owning binding holds and later passes to `remove_listener` on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Mint a new unique listener ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

/// One interested observer of one key's changes.
#[derive(Clone)]
pub struct KeyListener {
    id: ListenerId,
    notify: NotifyFn,
}

impl KeyListener {
    /// Create a listener with a fresh identity and the given callback.
    pub fn new<F>(notify: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            id: ListenerId::new(),
            notify: Arc::new(notify),
        }
    }

    /// The listener's identity.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Invoke the invalidation callback.
    pub fn notify(&self) {
        (self.notify)();
    }

    /// A cheap handle to the callback, for invocation outside the registry
    /// lock.
    pub(crate) fn callback(&self) -> NotifyFn {
        Arc::clone(&self.notify)
    }
}

impl std::fmt::Debug for KeyListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyListener").field("id", &self.id).finish()
    }
}
