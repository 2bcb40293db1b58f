//! Continuous (ranged, skewed, steppable) control mirror.

use crate::control::{
    parse_properties, ControlEvent, ControlKind, ControlLink, SLIDER_DRAG_ENDED,
    SLIDER_DRAG_STARTED,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Weak};
use tether_core::{Backend, ListenerList, Result};

/// Range and display properties of a host slider.
///
/// `skew` shapes the mapping between the normalised `[0, 1]` position and the scaled
/// value; `interval` of zero means continuous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SliderProperties {
    pub start: f64,
    pub end: f64,
    pub skew: f64,
    pub name: String,
    pub label: String,
    pub num_steps: u32,
    pub interval: f64,
    pub parameter_index: i32,
}

impl Default for SliderProperties {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 1.0,
            skew: 1.0,
            name: String::new(),
            label: String::new(),
            num_steps: 100,
            interval: 0.0,
            parameter_index: -1,
        }
    }
}

impl SliderProperties {
    /// `n^(1/skew) * (end - start) + start`
    #[inline]
    pub fn normalised_to_scaled(&self, normalised: f64) -> f64 {
        normalised.powf(1.0 / self.skew) * (self.end - self.start) + self.start
    }

    /// `((scaled - start) / (end - start))^skew`
    #[inline]
    pub fn scaled_to_normalised(&self, scaled: f64) -> f64 {
        ((scaled - self.start) / (self.end - self.start)).powf(self.skew)
    }

    /// Snap to the nearest legal step, ties rounding up, clamped to `[start, end]`.
    /// Continuous sliders (`interval == 0`) pass through unchanged.
    #[inline]
    pub fn snap_to_legal_value(&self, value: f64) -> f64 {
        if self.interval == 0.0 {
            return value;
        }
        let stepped =
            self.start + self.interval * ((value - self.start) / self.interval + 0.5).floor();
        stepped.min(self.end).max(self.start)
    }
}

/// Mirror of a host slider.
///
/// The stored value is the scaled value last confirmed by the host: `set_normalised_value`
/// only sends the request, and `scaled_value` changes once the host echoes it back.
pub struct SliderState {
    name: String,
    link: ControlLink,
    scaled_value: Mutex<f64>,
    properties: Mutex<SliderProperties>,
    value_changed: ListenerList<()>,
    properties_changed: ListenerList<()>,
}

impl SliderState {
    /// Prefer [`ControlRegistry::slider`](crate::ControlRegistry::slider), which caches one
    /// mirror per name.
    pub fn new(backend: Arc<Backend>, name: impl Into<String>) -> Arc<Self> {
        let name = name.into();
        let state = Arc::new(Self {
            link: ControlLink::new(backend, ControlKind::Slider, &name),
            name,
            scaled_value: Mutex::new(0.0),
            properties: Mutex::new(SliderProperties::default()),
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

    pub fn properties(&self) -> SliderProperties {
        self.properties.lock().clone()
    }

    pub fn value_changed(&self) -> &ListenerList<()> {
        &self.value_changed
    }

    pub fn properties_changed(&self) -> &ListenerList<()> {
        &self.properties_changed
    }

    /// Request a new value from a normalised `[0, 1]` position.
    pub fn set_normalised_value(&self, normalised: f64) -> Result<()> {
        let snapped = {
            let properties = self.properties.lock();
            properties.snap_to_legal_value(properties.normalised_to_scaled(normalised))
        };
        self.link.emit_value(Value::from(snapped))
    }

    pub fn normalised_value(&self) -> f64 {
        let scaled = *self.scaled_value.lock();
        self.properties.lock().scaled_to_normalised(scaled)
    }

    pub fn scaled_value(&self) -> f64 {
        *self.scaled_value.lock()
    }

    /// Call when the user starts interacting with the slider.
    pub fn slider_drag_started(&self) -> Result<()> {
        self.link.emit_event(SLIDER_DRAG_STARTED)
    }

    /// Call when the user finishes interacting with the slider.
    pub fn slider_drag_ended(&self) -> Result<()> {
        self.link.emit_event(SLIDER_DRAG_ENDED)
    }

    fn handle_event(&self, event: ControlEvent<'_>) {
        match event {
            ControlEvent::ValueChanged(value) => {
                let Some(value) = value.as_f64() else {
                    return;
                };
                *self.scaled_value.lock() = value;
                self.value_changed.call_all(&());
            }
            ControlEvent::PropertiesChanged(fields) => {
                let Some(properties) = parse_properties::<SliderProperties>(fields) else {
                    return;
                };
                *self.properties.lock() = properties;
                self.properties_changed.call_all(&());
            }
        }
    }
}

impl std::fmt::Debug for SliderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliderState")
            .field("name", &self.name)
            .field("scaled_value", &self.scaled_value())
            .field("properties", &self.properties())
            .finish()
    }
}
