//! Tether session: one host connection and the subsystems built on it.

use crate::Result;
use std::sync::Arc;
use tether_core::{Backend, NativeFunction};

#[cfg(feature = "controls")]
use tether_controls::ControlRegistry;

#[cfg(feature = "bridge")]
use tether_bridge::MessageBridge;

/// Owns the [`Backend`] and the subsystems keyed to it.
///
/// Construct with [`Tether::builder`]. Each session is independent; nothing is global.
pub struct Tether {
    pub(crate) backend: Arc<Backend>,

    #[cfg(feature = "controls")]
    pub(crate) controls: ControlRegistry,

    #[cfg(feature = "bridge")]
    pub(crate) bridge: Arc<MessageBridge>,
}

impl Tether {
    pub fn builder() -> crate::TetherBuilder {
        crate::TetherBuilder::default()
    }

    pub fn backend(&self) -> &Arc<Backend> {
        &self.backend
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Host entry point for a complete `{eventId, payload}` envelope.
    pub fn receive(&self, text: &str) -> Result<()> {
        Ok(self.backend.bus().receive(text)?)
    }

    /// Host entry point for an event id plus its JSON payload text.
    pub fn emit_by_backend(&self, event_id: &str, payload: &str) -> Result<()> {
        Ok(self.backend.bus().emit_by_backend(event_id, payload)?)
    }

    pub fn native_function(&self, name: impl Into<String>) -> NativeFunction {
        self.backend.native_function(name)
    }

    pub fn resource_address(&self, path: &str) -> String {
        self.backend.resource_address(path)
    }

    #[cfg(feature = "controls")]
    pub fn controls(&self) -> &ControlRegistry {
        &self.controls
    }

    #[cfg(feature = "bridge")]
    pub fn bridge(&self) -> &Arc<MessageBridge> {
        &self.bridge
    }
}

impl std::fmt::Debug for Tether {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Tether");
        s.field("backend", &self.backend);
        #[cfg(feature = "controls")]
        s.field("controls", &self.controls);
        #[cfg(feature = "bridge")]
        s.field("bridge", &self.bridge);
        s.finish()
    }
}
