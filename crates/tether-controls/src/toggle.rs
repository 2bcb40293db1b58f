//! Boolean control mirror.

use crate::control::{parse_properties, ControlEvent, ControlKind, ControlLink};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Weak};
use tether_core::{Backend, ListenerList, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToggleProperties {
    pub name: String,
    pub parameter_index: i32,
}

impl Default for ToggleProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            parameter_index: -1,
        }
    }
}

/// Mirror of a host toggle button.
///
/// Unlike sliders, `set_value` applies locally right away and then informs the host.
pub struct ToggleState {
    name: String,
    link: ControlLink,
    value: Mutex<bool>,
    properties: Mutex<ToggleProperties>,
    value_changed: ListenerList<()>,
    properties_changed: ListenerList<()>,
}

impl ToggleState {
    pub fn new(backend: Arc<Backend>, name: impl Into<String>) -> Arc<Self> {
        let name = name.into();
        let state = Arc::new(Self {
            link: ControlLink::new(backend, ControlKind::Toggle, &name),
            name,
            value: Mutex::new(false),
            properties: Mutex::new(ToggleProperties::default()),
            value_changed: ListenerList::new(),
            properties_changed: ListenerList::new(),
        });

        let weak: Weak<Self> = Arc::downgrade(&state);
        state.link.connect(move |event| {
            if let Some(state) = weak.upgrade() {
                state.handle_event(event);
            }
        });
        state
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identifier(&self) -> &str {
        self.link.identifier()
    }

    pub fn properties(&self) -> ToggleProperties {
        self.properties.lock().clone()
    }

    pub fn value_changed(&self) -> &ListenerList<()> {
        &self.value_changed
    }

    pub fn properties_changed(&self) -> &ListenerList<()> {
        &self.properties_changed
    }

    pub fn value(&self) -> bool {
        *self.value.lock()
    }

    pub fn set_value(&self, value: bool) -> Result<()> {
        *self.value.lock() = value;
        self.link.emit_value(Value::Bool(value))
    }

    fn handle_event(&self, event: ControlEvent<'_>) {
        match event {
            ControlEvent::ValueChanged(value) => {
                let Some(value) = value.as_bool() else {
                    return;
                };
                *self.value.lock() = value;
                self.value_changed.call_all(&());
            }
            ControlEvent::PropertiesChanged(fields) => {
                let Some(properties) = parse_properties::<ToggleProperties>(fields) else {
                    return;
                };
                *self.properties.lock() = properties;
                self.properties_changed.call_all(&());
            }
        }
    }
}

impl std::fmt::Debug for ToggleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToggleState")
            .field("name", &self.name)
            .field("value", &self.value())
            .finish()
    }
}
