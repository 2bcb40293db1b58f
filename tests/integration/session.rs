//! Session construction integration tests

use crate::helpers::*;
use serde_json::json;
use tether::{BridgeConfig, Error, Tether};

/// Manifest JSON from the host is parsed by the builder.
#[test]
fn test_manifest_json() {
    let session = Tether::builder()
        .manifest_json(r#"{"__juce__platform": ["windows"], "__juce__sliders": ["gain"]}"#)
        .channel(std::sync::Arc::new(tether::MemoryChannel::new()))
        .build()
        .unwrap();

    assert!(session.backend().manifest().declares_slider("gain"));
    assert_eq!(
        session.resource_address("img/knob.png"),
        "https://juce.backend/img/knob.png"
    );
}

#[test]
fn test_invalid_manifest_json() {
    let result = Tether::builder().manifest_json("{not json").build();
    assert!(matches!(result, Err(Error::Manifest(_))));
}

#[test]
fn test_invalid_bridge_config() {
    let config = BridgeConfig {
        queue_capacity: 0,
        ..Default::default()
    };
    let result = Tether::builder().bridge_config(config).build();
    assert!(matches!(result, Err(Error::Bridge(_))));
}

/// Without a channel everything degrades: nothing is ready and nothing is sent.
#[tokio::test]
async fn test_detached_session_degrades() {
    init_tracing();
    let session = Tether::builder().build().unwrap();

    assert!(!session.is_available());
    assert!(!session.bridge().is_available());
    assert!(!session.bridge().initialize().await);
    assert!(session.bridge().midi_input_devices().await.is_empty());
    assert_eq!(session.resource_address("index.html"), "index.html");

    // Mirrors still work locally.
    let bypass = session.controls().toggle("bypass");
    bypass.set_value(true).unwrap();
    assert!(bypass.value());
}

/// Envelopes that are not JSON are reported to the host entry point.
#[test]
fn test_receive_rejects_malformed_envelope() {
    let host = SimulatedHost::new();
    assert!(host.session.receive("{oops").is_err());
    assert!(host.session.receive(r#"{"payload": 1}"#).is_err());
}

/// The two host entry points deliver the same event.
#[test]
fn test_emit_by_backend_matches_receive() {
    let host = SimulatedHost::new();
    let gain = host.session.controls().slider("gain");

    host.session
        .emit_by_backend("__juce__slidergain", r#"{"eventType":"valueChanged","value":0.75}"#)
        .unwrap();
    assert_eq!(gain.scaled_value(), 0.75);

    host.emit("__juce__slidergain", json!({"eventType": "valueChanged", "value": 0.5}));
    assert_eq!(gain.scaled_value(), 0.5);
}

/// Independent sessions never see each other's traffic.
#[test]
fn test_sessions_are_independent() {
    let a = SimulatedHost::new();
    let b = SimulatedHost::new();
    let gain_a = a.session.controls().slider("gain");
    let gain_b = b.session.controls().slider("gain");

    a.emit("__juce__slidergain", json!({"eventType": "valueChanged", "value": 0.9}));
    assert_eq!(gain_a.scaled_value(), 0.9);
    assert_eq!(gain_b.scaled_value(), 0.0);
    assert!(b.outbound().iter().all(|e| e.event_id == "__juce__slidergain"));
}
