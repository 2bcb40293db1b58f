//! Enumerated (choice-indexed) control mirror.
//!
//! The host stores the selection as a normalised value; the mirror maps it to and from
//! an index into `choices`.

use crate::control::{parse_properties, ControlEvent, ControlKind, ControlLink};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Weak};
use tether_core::{Backend, ListenerList, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComboBoxProperties {
    pub name: String,
    pub parameter_index: i32,
    pub choices: Vec<String>,
}

impl Default for ComboBoxProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            parameter_index: -1,
            choices: Vec::new(),
        }
    }
}

impl ComboBoxProperties {
    /// Normalised value for a choice index; `0` when there are fewer than two choices.
    pub fn index_to_value(&self, index: usize) -> f64 {
        let num_items = self.choices.len();
        if num_items > 1 {
            index as f64 / (num_items - 1) as f64
        } else {
            0.0
        }
    }

    pub fn value_to_index(&self, value: f64) -> usize {
        let num_items = self.choices.len();
        if num_items < 2 {
            return 0;
        }
        // Negative results saturate to 0 on the cast.
        (value * (num_items - 1) as f64).round() as usize
    }
}

/// Mirror of a host combo box. Selection changes apply locally and are sent to the host.
pub struct ComboBoxState {
    name: String,
    link: ControlLink,
    value: Mutex<f64>,
    properties: Mutex<ComboBoxProperties>,
    value_changed: ListenerList<()>,
    properties_changed: ListenerList<()>,
}

impl ComboBoxState {
    pub fn new(backend: Arc<Backend>, name: impl Into<String>) -> Arc<Self> {
        let name = name.into();
        let state = Arc::new(Self {
            link: ControlLink::new(backend, ControlKind::ComboBox, &name),
            name,
            value: Mutex::new(0.0),
            properties: Mutex::new(ComboBoxProperties::default()),
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

    pub fn properties(&self) -> ComboBoxProperties {
        self.properties.lock().clone()
    }

    pub fn choices(&self) -> Vec<String> {
        self.properties.lock().choices.clone()
    }

    pub fn value_changed(&self) -> &ListenerList<()> {
        &self.value_changed
    }

    pub fn properties_changed(&self) -> &ListenerList<()> {
        &self.properties_changed
    }

    pub fn choice_index(&self) -> usize {
        let value = *self.value.lock();
        self.properties.lock().value_to_index(value)
    }

    /// Label of the selected choice, if the host has sent any.
    pub fn selected_choice(&self) -> Option<String> {
        let index = self.choice_index();
        self.properties.lock().choices.get(index).cloned()
    }

    pub fn set_choice_index(&self, index: usize) -> Result<()> {
        let value = self.properties.lock().index_to_value(index);
        *self.value.lock() = value;
        self.link.emit_value(Value::from(value))
    }

    fn handle_event(&self, event: ControlEvent<'_>) {
        match event {
            ControlEvent::ValueChanged(value) => {
                let Some(value) = value.as_f64() else {
                    return;
                };
                *self.value.lock() = value;
                self.value_changed.call_all(&());
            }
            ControlEvent::PropertiesChanged(fields) => {
                let Some(properties) = parse_properties::<ComboBoxProperties>(fields) else {
                    return;
                };
                *self.properties.lock() = properties;
                self.properties_changed.call_all(&());
            }
        }
    }
}

impl std::fmt::Debug for ComboBoxState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComboBoxState")
            .field("name", &self.name)
            .field("choice_index", &self.choice_index())
            .field("choices", &self.choices())
            .finish()
    }
}
