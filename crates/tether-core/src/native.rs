//! Native function proxies.

use crate::backend::Backend;
use crate::correlator::PendingCall;
use crate::protocol::{InvokeRequest, INVOKE_EVENT_ID};
use serde_json::Value;
use std::sync::Arc;

/// Local handle for a function registered on the host.
///
/// Each call emits an invoke event and returns a [`PendingCall`] that resolves when the
/// host posts the matching completion. Clone is cheap.
#[derive(Clone)]
pub struct NativeFunction {
    backend: Arc<Backend>,
    name: String,
}

impl NativeFunction {
    pub(crate) fn new(backend: Arc<Backend>, name: String) -> Self {
        if !backend.manifest().declares_function(&name) {
            tracing::warn!(
                function = %name,
                "Creating native function binding for a function unknown to the backend"
            );
        }
        Self { backend, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, params: Vec<Value>) -> PendingCall {
        let (id, pending) = self.backend.correlator().begin_call();
        let request = InvokeRequest {
            name: self.name.clone(),
            params,
            result_id: id.0,
        };

        let emitted = serde_json::to_value(&request)
            .map_err(crate::error::Error::from)
            .and_then(|payload| self.backend.emit(INVOKE_EVENT_ID, payload));
        if let Err(e) = emitted {
            tracing::warn!(function = %self.name, error = %e, "failed to emit native call");
            self.backend.correlator().reject_call(id, e.to_string());
        }

        pending
    }
}

impl std::fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .finish()
    }
}
