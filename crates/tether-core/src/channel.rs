//! Outbound message channel to the host.
//!
//! The channel is write-only from the UI side: inbound traffic is pushed into
//! [`EventBus`](crate::EventBus) by whoever owns the host connection.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Write side of the host message channel.
///
/// `post` is fire-and-forget. Implementations must not block on host acknowledgement.
pub trait MessageChannel: Send + Sync {
    fn post(&self, message: String);

    /// Whether a real host is on the other end.
    fn is_connected(&self) -> bool {
        true
    }
}

/// In-memory channel that records every posted message.
///
/// Used by headless hosts and by tests that play the host role.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    messages: Mutex<Vec<String>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all messages posted so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Drain posted messages.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock())
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl MessageChannel for MemoryChannel {
    fn post(&self, message: String) {
        tracing::trace!(len = message.len(), "memory channel post");
        self.messages.lock().push(message);
    }
}

/// Placeholder channel used when the hosting environment exposes no message channel.
///
/// Discards everything and counts what it dropped.
#[derive(Debug, Default)]
pub struct DetachedChannel {
    dropped: AtomicUsize,
}

impl DetachedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl MessageChannel for DetachedChannel {
    fn post(&self, _message: String) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    fn is_connected(&self) -> bool {
        false
    }
}
