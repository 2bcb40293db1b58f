//! Backend context: one host connection and everything keyed to it.
//!
//! Owns the [`EventBus`], the [`HostManifest`] and the [`CallCorrelator`]. Components that
//! talk to the host receive an `Arc<Backend>` instead of reaching for global state, so
//! several independent backends can coexist (one per test, for instance).

use crate::bus::EventBus;
use crate::channel::{DetachedChannel, MessageChannel};
use crate::correlator::{CallCorrelator, CallId};
use crate::error::Result;
use crate::manifest::HostManifest;
use crate::native::NativeFunction;
use crate::protocol::{CompletionPayload, COMPLETE_EVENT_ID};
use serde_json::Value;
use std::sync::Arc;

pub struct Backend {
    bus: EventBus,
    manifest: HostManifest,
    correlator: Arc<CallCorrelator>,
}

impl Backend {
    pub fn new(manifest: HostManifest, channel: Arc<dyn MessageChannel>) -> Self {
        let bus = EventBus::new(channel);
        let correlator = Arc::new(CallCorrelator::new());

        {
            let correlator = Arc::clone(&correlator);
            bus.subscribe(COMPLETE_EVENT_ID, move |payload: &Value| {
                // Malformed or stale completions are dropped without noise.
                if let Ok(done) = serde_json::from_value::<CompletionPayload>(payload.clone()) {
                    correlator.complete_call(CallId(done.promise_id), done.result);
                }
            });
        }

        Self {
            bus,
            manifest,
            correlator,
        }
    }

    /// Backend for an environment without a host channel.
    ///
    /// Everything sent is discarded and every readiness query answers `false`.
    pub fn detached() -> Self {
        tracing::warn!(
            "No host message channel is available; native integration features will not work"
        );
        Self::new(HostManifest::default(), Arc::new(DetachedChannel::new()))
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn manifest(&self) -> &HostManifest {
        &self.manifest
    }

    pub fn correlator(&self) -> &CallCorrelator {
        &self.correlator
    }

    pub fn is_available(&self) -> bool {
        self.bus.channel().is_connected()
    }

    pub fn emit(&self, event_id: &str, payload: Value) -> Result<()> {
        self.bus.emit(event_id, payload)
    }

    /// Bind a host-registered function. Unknown names are flagged but still bound.
    pub fn native_function(self: &Arc<Self>, name: impl Into<String>) -> NativeFunction {
        NativeFunction::new(Arc::clone(self), name.into())
    }

    pub fn resource_address(&self, path: &str) -> String {
        self.manifest.resource_address(path)
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("bus", &self.bus)
            .field("pending_calls", &self.correlator.pending_count())
            .finish()
    }
}
