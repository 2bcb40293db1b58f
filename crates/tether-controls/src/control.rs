//! Per-control sub-protocol shared by every mirror kind.

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tether_core::{Backend, EventSubscription, Result};

pub const REQUEST_INITIAL_UPDATE: &str = "requestInitialUpdate";
pub const VALUE_CHANGED: &str = "valueChanged";
pub const PROPERTIES_CHANGED: &str = "propertiesChanged";
pub const SLIDER_DRAG_STARTED: &str = "sliderDragStarted";
pub const SLIDER_DRAG_ENDED: &str = "sliderDragEnded";

/// Kind of host-side control a mirror is synchronised with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Slider,
    Toggle,
    ComboBox,
}

impl ControlKind {
    /// Event id prefix; the full identifier is prefix + control name.
    pub fn prefix(self) -> &'static str {
        match self {
            ControlKind::Slider => "__juce__slider",
            ControlKind::Toggle => "__juce__toggle",
            ControlKind::ComboBox => "__juce__comboBox",
        }
    }

    pub fn identifier(self, name: &str) -> String {
        format!("{}{}", self.prefix(), name)
    }

    fn is_declared(self, backend: &Backend, name: &str) -> bool {
        let manifest = backend.manifest();
        match self {
            ControlKind::Slider => manifest.declares_slider(name),
            ControlKind::Toggle => manifest.declares_toggle(name),
            ControlKind::ComboBox => manifest.declares_combo_box(name),
        }
    }
}

impl std::fmt::Display for ControlKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlKind::Slider => write!(f, "slider"),
            ControlKind::Toggle => write!(f, "toggle"),
            ControlKind::ComboBox => write!(f, "combo box"),
        }
    }
}

/// Inbound control event, keyed by the payload's `eventType`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ControlEvent<'a> {
    ValueChanged(&'a Value),
    /// Payload fields with the `eventType` discriminator still present;
    /// property structs ignore it when deserializing.
    PropertiesChanged(&'a Map<String, Value>),
}

impl<'a> ControlEvent<'a> {
    pub(crate) fn parse(payload: &'a Value) -> Option<Self> {
        let object = payload.as_object()?;
        match object.get("eventType")?.as_str()? {
            VALUE_CHANGED => Some(Self::ValueChanged(object.get("value")?)),
            PROPERTIES_CHANGED => Some(Self::PropertiesChanged(object)),
            _ => None,
        }
    }
}

/// Bus subscription plus outbound helper for one mirror.
///
/// Unsubscribes from the bus when dropped.
pub(crate) struct ControlLink {
    backend: Arc<Backend>,
    identifier: String,
    subscription: Mutex<Option<EventSubscription>>,
}

impl ControlLink {
    pub(crate) fn new(backend: Arc<Backend>, kind: ControlKind, name: &str) -> Self {
        if !kind.is_declared(&backend, name) {
            tracing::warn!(
                control = name,
                "Creating {} state for a control unknown to the backend",
                kind
            );
        }
        Self {
            identifier: kind.identifier(name),
            backend,
            subscription: Mutex::new(None),
        }
    }

    /// Route this control's inbound events to `handler` and ask the host for current state.
    pub(crate) fn connect<F>(&self, handler: F)
    where
        F: Fn(ControlEvent<'_>) + Send + Sync + 'static,
    {
        let subscription = self
            .backend
            .bus()
            .subscribe(self.identifier.clone(), move |payload: &Value| {
                if let Some(event) = ControlEvent::parse(payload) {
                    handler(event);
                }
            });
        *self.subscription.lock() = Some(subscription);

        if let Err(e) = self.emit_event(REQUEST_INITIAL_UPDATE) {
            tracing::warn!(identifier = %self.identifier, error = %e, "initial update request failed");
        }
    }

    pub(crate) fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn emit_event(&self, event_type: &str) -> Result<()> {
        self.backend
            .emit(&self.identifier, json!({ "eventType": event_type }))
    }

    pub(crate) fn emit_value(&self, value: Value) -> Result<()> {
        self.backend.emit(
            &self.identifier,
            json!({ "eventType": VALUE_CHANGED, "value": value }),
        )
    }
}

impl Drop for ControlLink {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.lock().take() {
            self.backend.bus().unsubscribe(&subscription);
        }
    }
}

/// Deserialize a property struct from a `propertiesChanged` payload.
///
/// Missing fields take their defaults. A field of the wrong type keeps its default instead
/// of discarding the whole update.
pub(crate) fn parse_properties<P>(fields: &Map<String, Value>) -> Option<P>
where
    P: Serialize + DeserializeOwned + Default,
{
    match serde_json::from_value(Value::Object(fields.clone())) {
        Ok(properties) => return Some(properties),
        Err(e) => {
            tracing::debug!(error = %e, "malformed control properties, reading fields one by one");
        }
    }

    let Ok(Value::Object(mut merged)) = serde_json::to_value(P::default()) else {
        return None;
    };
    for (key, value) in fields {
        if !merged.contains_key(key) {
            continue;
        }
        let previous = merged.insert(key.clone(), value.clone());
        if serde_json::from_value::<P>(Value::Object(merged.clone())).is_err() {
            tracing::debug!(field = %key, "ignoring malformed control property");
            if let Some(previous) = previous {
                merged.insert(key.clone(), previous);
            }
        }
    }
    serde_json::from_value(Value::Object(merged)).ok()
}
