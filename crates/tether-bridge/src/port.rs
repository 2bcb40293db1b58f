//! Host port: the native object the bridge talks through.

use crate::bridge::MessageBridge;
use crate::error::Result;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::{Arc, Weak};
use tether_core::{Backend, EventSubscription};

pub const BRIDGE_INIT_EVENT_ID: &str = "__bridge__init";
pub const BRIDGE_MESSAGE_EVENT_ID: &str = "__bridge__message";
pub const BRIDGE_READY_EVENT_ID: &str = "__bridge__ready";

/// Outbound half of the host bridge object.
///
/// The host answers `init` by calling [`MessageBridge::notify_ready`] and delivers its
/// messages through [`MessageBridge::receive`].
pub trait HostPort: Send + Sync {
    /// Start the readiness handshake. Called at most once per initialization.
    fn init(&self);

    /// Post one serialized [`BridgeMessage`](crate::BridgeMessage).
    fn send_message(&self, message: String) -> Result<()>;
}

/// [`HostPort`] carried over a [`Backend`]'s event bus.
///
/// Outbound: `__bridge__init` and `__bridge__message` (payload is the message text).
/// Inbound: `__bridge__ready` and `__bridge__message` (payload is the message text or object).
pub struct BusPort {
    backend: Arc<Backend>,
    subscriptions: Mutex<Vec<EventSubscription>>,
}

impl BusPort {
    pub fn new(backend: Arc<Backend>) -> Self {
        Self {
            backend,
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Route the host's inbound bridge events to `bridge`.
    pub(crate) fn attach(&self, bridge: &Arc<MessageBridge>) {
        let bus = self.backend.bus();

        let weak: Weak<MessageBridge> = Arc::downgrade(bridge);
        let ready = bus.subscribe(BRIDGE_READY_EVENT_ID, move |_| {
            if let Some(bridge) = weak.upgrade() {
                bridge.notify_ready();
            }
        });

        let weak: Weak<MessageBridge> = Arc::downgrade(bridge);
        let message = bus.subscribe(BRIDGE_MESSAGE_EVENT_ID, move |payload: &Value| {
            let Some(bridge) = weak.upgrade() else {
                return;
            };
            match payload {
                Value::String(text) => bridge.receive(text),
                other => bridge.receive(&other.to_string()),
            }
        });

        let mut subscriptions = self.subscriptions.lock();
        subscriptions.push(ready);
        subscriptions.push(message);
    }
}

impl HostPort for BusPort {
    fn init(&self) {
        if let Err(e) = self.backend.emit(BRIDGE_INIT_EVENT_ID, Value::Null) {
            tracing::warn!(error = %e, "Failed to request bridge initialization");
        }
    }

    fn send_message(&self, message: String) -> Result<()> {
        self.backend
            .emit(BRIDGE_MESSAGE_EVENT_ID, Value::String(message))?;
        Ok(())
    }
}

impl Drop for BusPort {
    fn drop(&mut self) {
        for subscription in self.subscriptions.lock().drain(..) {
            self.backend.bus().unsubscribe(&subscription);
        }
    }
}

impl std::fmt::Debug for BusPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusPort")
            .field("subscriptions", &self.subscriptions.lock().len())
            .finish()
    }
}
