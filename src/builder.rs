//! Builder for configuring and constructing a [`Tether`] session.

use crate::{Error, Result, Tether};
use std::sync::Arc;
use tether_core::{Backend, DetachedChannel, HostManifest, MessageChannel};

#[cfg(feature = "controls")]
use tether_controls::ControlRegistry;

#[cfg(feature = "bridge")]
use tether_bridge::{BridgeConfig, MessageBridge};

/// Without a channel the session runs detached: everything sent is discarded and every
/// readiness query answers `false`.
///
/// # Example
///
/// ```ignore
/// use tether::prelude::*;
///
/// let session = Tether::builder()
///     .manifest_json(init_data)
///     .channel(webview_channel)
///     .build()?;
///
/// let gain = session.controls().slider("gain");
/// ```
#[derive(Default)]
pub struct TetherBuilder {
    manifest: Option<HostManifest>,
    manifest_json: Option<String>,
    channel: Option<Arc<dyn MessageChannel>>,

    #[cfg(feature = "controls")]
    declared_controls: bool,

    #[cfg(feature = "bridge")]
    bridge_config: BridgeConfig,
}

impl TetherBuilder {
    pub fn manifest(mut self, manifest: HostManifest) -> Self {
        self.manifest = Some(manifest);
        self.manifest_json = None;
        self
    }

    /// Host initialisation data as JSON text; parsed by [`build`](Self::build).
    pub fn manifest_json(mut self, json: impl Into<String>) -> Self {
        self.manifest_json = Some(json.into());
        self.manifest = None;
        self
    }

    pub fn channel(mut self, channel: Arc<dyn MessageChannel>) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Create a mirror for every control the manifest declares up front.
    #[cfg(feature = "controls")]
    pub fn declared_controls(mut self) -> Self {
        self.declared_controls = true;
        self
    }

    #[cfg(feature = "bridge")]
    pub fn bridge_config(mut self, config: BridgeConfig) -> Self {
        self.bridge_config = config;
        self
    }

    pub fn build(self) -> Result<Tether> {
        let manifest = match (self.manifest, self.manifest_json) {
            (Some(manifest), _) => manifest,
            (None, Some(json)) => {
                HostManifest::from_json(&json).map_err(|e| Error::Manifest(e.to_string()))?
            }
            (None, None) => HostManifest::default(),
        };

        #[cfg(feature = "bridge")]
        self.bridge_config.validate()?;

        let backend = match self.channel {
            Some(channel) => Backend::new(manifest, channel),
            None => {
                tracing::warn!(
                    "No host message channel is available; native integration features will not work"
                );
                Backend::new(manifest, Arc::new(DetachedChannel::new()))
            }
        };
        let backend = Arc::new(backend);

        #[cfg(feature = "controls")]
        let controls = if self.declared_controls {
            ControlRegistry::with_declared(Arc::clone(&backend))
        } else {
            ControlRegistry::new(Arc::clone(&backend))
        };

        #[cfg(feature = "bridge")]
        let bridge = MessageBridge::over_backend(Arc::clone(&backend), self.bridge_config);

        tracing::debug!(available = backend.is_available(), "Tether session created");

        Ok(Tether {
            backend,
            #[cfg(feature = "controls")]
            controls,
            #[cfg(feature = "bridge")]
            bridge,
        })
    }
}
