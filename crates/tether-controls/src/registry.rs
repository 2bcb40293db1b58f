//! Mirror cache: one state object per control name and kind.

use crate::combo_box::ComboBoxState;
use crate::slider::SliderState;
use crate::toggle::ToggleState;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tether_core::Backend;

/// Hands out shared control mirrors for a [`Backend`].
///
/// Mirrors are created on first access and kept for the lifetime of the registry, so every
/// caller asking for the same name observes the same value and notifiers.
pub struct ControlRegistry {
    backend: Arc<Backend>,
    sliders: Mutex<HashMap<String, Arc<SliderState>>>,
    toggles: Mutex<HashMap<String, Arc<ToggleState>>>,
    combo_boxes: Mutex<HashMap<String, Arc<ComboBoxState>>>,
}

impl ControlRegistry {
    pub fn new(backend: Arc<Backend>) -> Self {
        Self {
            backend,
            sliders: Mutex::new(HashMap::new()),
            toggles: Mutex::new(HashMap::new()),
            combo_boxes: Mutex::new(HashMap::new()),
        }
    }

    /// Registry with a mirror already created for every control the host declared.
    pub fn with_declared(backend: Arc<Backend>) -> Self {
        let registry = Self::new(backend);
        let manifest = registry.backend.manifest().clone();
        for name in &manifest.sliders {
            registry.slider(name);
        }
        for name in &manifest.toggles {
            registry.toggle(name);
        }
        for name in &manifest.combo_boxes {
            registry.combo_box(name);
        }
        tracing::debug!(
            sliders = manifest.sliders.len(),
            toggles = manifest.toggles.len(),
            combo_boxes = manifest.combo_boxes.len(),
            "Created mirrors for declared controls"
        );
        registry
    }

    pub fn backend(&self) -> &Arc<Backend> {
        &self.backend
    }

    pub fn slider(&self, name: &str) -> Arc<SliderState> {
        let mut sliders = self.sliders.lock();
        Arc::clone(
            sliders
                .entry(name.to_string())
                .or_insert_with(|| SliderState::new(Arc::clone(&self.backend), name)),
        )
    }

    pub fn toggle(&self, name: &str) -> Arc<ToggleState> {
        let mut toggles = self.toggles.lock();
        Arc::clone(
            toggles
                .entry(name.to_string())
                .or_insert_with(|| ToggleState::new(Arc::clone(&self.backend), name)),
        )
    }

    pub fn combo_box(&self, name: &str) -> Arc<ComboBoxState> {
        let mut combo_boxes = self.combo_boxes.lock();
        Arc::clone(
            combo_boxes
                .entry(name.to_string())
                .or_insert_with(|| ComboBoxState::new(Arc::clone(&self.backend), name)),
        )
    }

    pub fn slider_names(&self) -> Vec<String> {
        self.sliders.lock().keys().cloned().collect()
    }

    pub fn toggle_names(&self) -> Vec<String> {
        self.toggles.lock().keys().cloned().collect()
    }

    pub fn combo_box_names(&self) -> Vec<String> {
        self.combo_boxes.lock().keys().cloned().collect()
    }
}

impl std::fmt::Debug for ControlRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlRegistry")
            .field("sliders", &self.sliders.lock().len())
            .field("toggles", &self.toggles.lock().len())
            .field("combo_boxes", &self.combo_boxes.lock().len())
            .finish()
    }
}
