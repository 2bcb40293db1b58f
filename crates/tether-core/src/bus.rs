//! Event bus over the host message channel.
//!
//! Inbound events are routed by event id to a [`ListenerList`]; outbound events are
//! wrapped in an [`Envelope`] and posted on the [`MessageChannel`].

use crate::channel::MessageChannel;
use crate::error::Result;
use crate::listener::{ListenerId, ListenerList};
use crate::protocol::Envelope;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Handle returned by [`EventBus::subscribe`], pairing the event id with the listener id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventSubscription {
    pub event_id: String,
    pub listener_id: ListenerId,
}

pub struct EventBus {
    registries: Mutex<HashMap<String, Arc<ListenerList<Value>>>>,
    channel: Arc<dyn MessageChannel>,
}

impl EventBus {
    pub fn new(channel: Arc<dyn MessageChannel>) -> Self {
        Self {
            registries: Mutex::new(HashMap::new()),
            channel,
        }
    }

    pub fn channel(&self) -> &Arc<dyn MessageChannel> {
        &self.channel
    }

    pub fn subscribe<F>(&self, event_id: impl Into<String>, callback: F) -> EventSubscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let event_id = event_id.into();
        let registry = Arc::clone(
            self.registries
                .lock()
                .entry(event_id.clone())
                .or_default(),
        );
        let listener_id = registry.add(callback);
        EventSubscription {
            event_id,
            listener_id,
        }
    }

    pub fn unsubscribe(&self, subscription: &EventSubscription) {
        let registry = self.registries.lock().get(&subscription.event_id).cloned();
        if let Some(registry) = registry {
            registry.remove(subscription.listener_id);
        }
    }

    /// Route an inbound event to its subscribers. Events nobody listens to are dropped.
    pub fn dispatch_inbound(&self, event_id: &str, payload: &Value) {
        let registry = self.registries.lock().get(event_id).cloned();
        if let Some(registry) = registry {
            registry.call_all(payload);
        }
    }

    /// Host entry point: `payload` is the JSON text of the event payload.
    pub fn emit_by_backend(&self, event_id: &str, payload: &str) -> Result<()> {
        let payload: Value = serde_json::from_str(payload)?;
        self.dispatch_inbound(event_id, &payload);
        Ok(())
    }

    /// Host entry point for a complete `{eventId, payload}` envelope.
    pub fn receive(&self, text: &str) -> Result<()> {
        let envelope = Envelope::from_text(text)?;
        self.dispatch_inbound(&envelope.event_id, &envelope.payload);
        Ok(())
    }

    /// Serialize and post an event to the host. No acknowledgement, buffering or retry.
    pub fn emit(&self, event_id: &str, payload: Value) -> Result<()> {
        let text = Envelope::new(event_id, payload).to_text()?;
        tracing::trace!(event_id, "emit");
        self.channel.post(text);
        Ok(())
    }

    pub fn has_listeners(&self, event_id: &str) -> bool {
        self.registries
            .lock()
            .get(event_id)
            .is_some_and(|registry| !registry.is_empty())
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("event_ids", &self.registries.lock().len())
            .field("connected", &self.channel.is_connected())
            .finish()
    }
}
