//! Ordered callback lists keyed by listener id.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifier of a callback registered on a [`ListenerList`].
///
/// Ids are handed out in increasing order and never reused by the list that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared callback stored in a [`ListenerList`].
pub type Listener<P> = Arc<dyn Fn(&P) + Send + Sync>;

/// Ordered collection of callbacks.
///
/// `call_all` snapshots the current callbacks and releases the lock before invoking them,
/// so a callback may add or remove listeners (itself included). Such changes apply to the
/// next firing, not the one in progress.
pub struct ListenerList<P> {
    listeners: Mutex<BTreeMap<ListenerId, Listener<P>>>,
    next_id: AtomicU64,
}

impl<P> ListenerList<P> {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn add<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().insert(id, Arc::new(callback));
        id
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn remove(&self, id: ListenerId) -> bool {
        self.listeners.lock().remove(&id).is_some()
    }

    /// Invoke every registered callback with `payload`, in registration order.
    pub fn call_all(&self, payload: &P) {
        let snapshot: Vec<Listener<P>> = self.listeners.lock().values().cloned().collect();
        for listener in snapshot {
            listener(payload);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }

    pub fn clear(&self) {
        self.listeners.lock().clear();
    }
}

impl<P> Default for ListenerList<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for ListenerList<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerList")
            .field("len", &self.len())
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}
