//! Asynchronous call correlation.
//!
//! Each native call gets a fresh [`CallId`]; the host echoes the id back in a completion
//! event and the matching [`PendingCall`] resolves. There is no timeout at this layer.

use crate::error::{Error, Result};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallId(pub u64);

/// Future resolving with the host's result for one call.
///
/// Resolves to [`Error::CallAbandoned`] if the correlator is dropped first.
#[derive(Debug)]
#[must_use = "a pending call does nothing unless awaited"]
pub struct PendingCall {
    id: CallId,
    receiver: oneshot::Receiver<Result<Value>>,
}

impl PendingCall {
    pub fn id(&self) -> CallId {
        self.id
    }
}

impl Future for PendingCall {
    type Output = Result<Value>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(Error::CallAbandoned)),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[derive(Debug, Default)]
pub struct CallCorrelator {
    next_id: AtomicU64,
    pending: Mutex<HashMap<CallId, oneshot::Sender<Result<Value>>>>,
}

impl CallCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_call(&self) -> (CallId, PendingCall) {
        let id = CallId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = oneshot::channel();
        self.pending.lock().insert(id, sender);
        (id, PendingCall { id, receiver })
    }

    /// Resolve a pending call. Unknown or already completed ids are ignored.
    pub fn complete_call(&self, id: CallId, result: Value) -> bool {
        self.settle(id, Ok(result))
    }

    pub fn reject_call(&self, id: CallId, reason: impl Into<String>) -> bool {
        self.settle(id, Err(Error::CallRejected(reason.into())))
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    fn settle(&self, id: CallId, outcome: Result<Value>) -> bool {
        let sender = self.pending.lock().remove(&id);
        match sender {
            // The caller may have dropped its future; the entry is gone either way.
            Some(sender) => {
                let _ = sender.send(outcome);
                true
            }
            None => false,
        }
    }
}
