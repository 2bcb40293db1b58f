//! Test fixtures for Tether integration tests
//!
//! [`SimulatedHost`] plays the native side of the channel: it reads what the session posted
//! to a [`MemoryChannel`] and answers through the session's host entry points.

#![allow(dead_code)]

pub mod tolerances;

use serde_json::{json, Value};
use std::sync::Arc;
use tether::core::{Envelope, COMPLETE_EVENT_ID, INVOKE_EVENT_ID};
use tether::prelude::*;
use tether::HostManifest;

/// Manifest declaring a small plugin UI: two sliders, a toggle, a combo box and two functions.
pub fn test_manifest() -> HostManifest {
    HostManifest::from_json(
        r#"{
            "__juce__platform": ["linux"],
            "__juce__functions": ["sayHello", "getLevels"],
            "__juce__registeredGlobalEventIds": [],
            "__juce__sliders": ["gain", "cutoff"],
            "__juce__toggles": ["bypass"],
            "__juce__comboBoxes": ["mode"]
        }"#,
    )
    .expect("valid manifest")
}

/// Install a subscriber once so `RUST_LOG` output is visible in failing tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub struct SimulatedHost {
    pub channel: Arc<MemoryChannel>,
    pub session: Tether,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::with_builder(Tether::builder().manifest(test_manifest()))
    }

    pub fn with_builder(builder: TetherBuilder) -> Self {
        init_tracing();
        let channel = Arc::new(MemoryChannel::new());
        let session = builder
            .channel(channel.clone())
            .build()
            .expect("Failed to create test session");
        Self { channel, session }
    }

    /// Everything posted since the last call, oldest first.
    pub fn outbound(&self) -> Vec<Envelope> {
        self.channel
            .take()
            .iter()
            .map(|text| Envelope::from_text(text).expect("session posted a valid envelope"))
            .collect()
    }

    /// Send an event to the session the way the host would.
    pub fn emit(&self, event_id: &str, payload: Value) {
        let text = Envelope::new(event_id, payload)
            .to_text()
            .expect("serializable envelope");
        self.session.receive(&text).expect("session accepted envelope");
    }

    /// Answer every pending `__juce__invoke` with `respond(name, params)`.
    ///
    /// Returns the envelopes that were not invocations, in order.
    pub fn answer_invocations<F>(&self, respond: F) -> Vec<Envelope>
    where
        F: Fn(&str, &[Value]) -> Value,
    {
        let mut others = Vec::new();
        let mut answers = Vec::new();
        for envelope in self.outbound() {
            if envelope.event_id == INVOKE_EVENT_ID {
                let name = envelope.payload["name"].as_str().unwrap_or_default().to_string();
                let params = envelope.payload["params"].as_array().cloned().unwrap_or_default();
                let result_id = envelope.payload["resultId"].clone();
                answers.push(json!({"promiseId": result_id, "result": respond(&name, &params)}));
            } else {
                others.push(envelope);
            }
        }
        for answer in answers {
            self.emit(COMPLETE_EVENT_ID, answer);
        }
        others
    }

    /// Echo every control `valueChanged` back to the session, as the host does after
    /// applying a change.
    pub fn echo_control_values(&self) {
        for envelope in self.outbound() {
            if envelope.payload["eventType"] == "valueChanged" {
                self.emit(&envelope.event_id, envelope.payload);
            }
        }
    }

    /// Messages the bridge sent over the bus, decoded.
    pub fn bridge_messages(&self) -> Vec<Value> {
        self.outbound()
            .into_iter()
            .filter(|e| e.event_id == tether::bridge::BRIDGE_MESSAGE_EVENT_ID)
            .map(|e| {
                let text = e.payload.as_str().expect("bridge messages are sent as text");
                serde_json::from_str(text).expect("bridge message is JSON")
            })
            .collect()
    }

    pub fn bridge_ready(&self) {
        self.emit(tether::bridge::BRIDGE_READY_EVENT_ID, Value::Null);
    }

    pub fn bridge_message(&self, message: Value) {
        self.emit(tether::bridge::BRIDGE_MESSAGE_EVENT_ID, Value::String(message.to_string()));
    }
}
