//! Message-typed bridge integration tests
//!
//! The bridge reaches the simulated host through the session's event bus.

use crate::helpers::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tether::bridge::{BridgeState, EngineSettingsPatch, MessageBridge, BRIDGE_INIT_EVENT_ID};
use tether::MidiEventLog;

/// Run the readiness handshake with the host answering `__bridge__init`.
async fn handshake(host: &SimulatedHost) -> bool {
    let bridge = Arc::clone(host.session.bridge());
    let (ok, ()) = tokio::join!(bridge.initialize(), async {
        while bridge.state() != BridgeState::Initializing {
            tokio::task::yield_now().await;
        }
        let init = host
            .channel
            .messages()
            .iter()
            .any(|text| text.contains(BRIDGE_INIT_EVENT_ID));
        assert!(init, "host was asked to initialize");
        host.bridge_ready();
    });
    ok
}

/// Messages sent before readiness reach the host in order, followed by the engine settings.
#[tokio::test]
async fn test_queue_flushes_in_order_on_ready() {
    let host = SimulatedHost::new();
    let bridge: &Arc<MessageBridge> = host.session.bridge();
    assert!(bridge.is_available());

    bridge.play_sample(1, None);
    bridge.send_midi_note(60, 100, 0);
    bridge.stop_sample(1);
    assert_eq!(bridge.queued_len(), 3);
    assert!(host.bridge_messages().is_empty());

    assert!(handshake(&host).await);
    assert_eq!(bridge.queued_len(), 0);

    let messages = host.bridge_messages();
    let types: Vec<_> = messages.iter().map(|m| m["type"].clone()).collect();
    assert_eq!(types, vec![json!("audio"), json!("midi"), json!("audio"), json!("engineSettings")]);
    assert_eq!(messages[0]["action"], "play");
    assert_eq!(messages[1]["data"]["note"], 60);
    assert_eq!(messages[2]["action"], "stop");
    assert_eq!(messages[3]["data"]["sampleRate"], 48000);

    // After readiness, sends go straight through.
    bridge.send_midi_control_change(1, 64, 0);
    let messages = host.bridge_messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["data"]["controller"], 1);
}

/// A second ready signal does not flush again.
#[tokio::test]
async fn test_duplicate_ready_ignored() {
    let host = SimulatedHost::new();
    host.session.bridge().play_sample(2, None);
    assert!(handshake(&host).await);
    assert_eq!(host.bridge_messages().len(), 2);

    host.bridge_ready();
    assert!(host.bridge_messages().is_empty());
}

/// Inbound MIDI reaches handlers and the rolling log.
#[tokio::test]
async fn test_inbound_midi_dispatch() {
    let host = SimulatedHost::new();
    let bridge = host.session.bridge();
    let log = MidiEventLog::new();
    log.attach(bridge);

    // Not listening until initialized.
    host.bridge_message(json!({"type": "midi", "data": {"type": "noteOn", "note": 1}}));
    assert!(log.is_empty());

    assert!(handshake(&host).await);
    host.bridge_message(json!({"type": "midi", "data": {"type": "noteOn", "note": 64, "velocity": 90}}));
    host.bridge_message(json!({"type": "somethingElse"}));

    let events = log.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.note, Some(64));
    assert_eq!(events[0].event.velocity, Some(90));
}

/// Device requests resolve with the host's answer.
#[tokio::test(start_paused = true)]
async fn test_midi_device_request_answered() {
    let host = SimulatedHost::new();
    assert!(handshake(&host).await);
    host.bridge_messages();

    let bridge = Arc::clone(host.session.bridge());
    let (inputs, ()) = tokio::join!(bridge.midi_input_devices(), async {
        let request = loop {
            if let Some(request) = host.bridge_messages().pop() {
                break request;
            }
            tokio::task::yield_now().await;
        };
        assert_eq!(request, json!({"type": "midi", "action": "getInputs", "data": {}}));
        host.bridge_message(json!({"type": "midiDeviceList", "data": {"inputs": ["Keystep", "Launchpad"]}}));
    });

    assert_eq!(inputs, vec!["Keystep", "Launchpad"]);
    assert_eq!(bridge.handler_count(tether::MessageKind::MidiDeviceList), 0);
}

/// An unanswered request gives up after the configured timeout; its late answer does not
/// leak into the next request.
#[tokio::test(start_paused = true)]
async fn test_device_request_times_out() {
    let host = SimulatedHost::new();
    assert!(handshake(&host).await);
    let bridge = Arc::clone(host.session.bridge());

    let started = tokio::time::Instant::now();
    let devices = bridge.audio_devices().await;
    assert!(devices.inputs.is_empty() && devices.outputs.is_empty());
    assert!(started.elapsed() >= Duration::from_millis(2000));
    assert_eq!(bridge.handler_count(tether::MessageKind::DeviceList), 0);

    let started = tokio::time::Instant::now();
    assert!(bridge.midi_input_devices().await.is_empty());
    assert!(started.elapsed() >= Duration::from_millis(2000));
    host.bridge_message(json!({"type": "midiDeviceList", "data": {"inputs": ["Stale"]}}));
    host.bridge_messages();

    let (inputs, ()) = tokio::join!(bridge.midi_input_devices(), async {
        while host.bridge_messages().is_empty() {
            tokio::task::yield_now().await;
        }
        host.bridge_message(json!({"type": "midiDeviceList", "data": {"inputs": ["Keystep"]}}));
    });
    assert_eq!(inputs, vec!["Keystep"]);
    assert!(started.elapsed() < Duration::from_millis(4000));
}

/// Engine settings updates are pushed once ready and reset restores the configured values.
#[tokio::test]
async fn test_engine_settings_push() {
    let host = SimulatedHost::new();
    let bridge = host.session.bridge();

    bridge.update_engine_settings(&EngineSettingsPatch::default().buffer_size(256));
    assert!(host.bridge_messages().is_empty());

    assert!(handshake(&host).await);
    let messages = host.bridge_messages();
    assert_eq!(messages.last().unwrap()["data"]["bufferSize"], 256);

    bridge.reset_engine_settings();
    let messages = host.bridge_messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["data"]["bufferSize"], 512);
}

/// Shutdown notifies the host and stops inbound handling.
#[tokio::test]
async fn test_shutdown_detaches() {
    let host = SimulatedHost::new();
    let bridge = host.session.bridge();
    let log = MidiEventLog::new();
    log.attach(bridge);

    assert!(!bridge.shutdown().await);
    assert!(handshake(&host).await);
    host.bridge_messages();

    assert!(bridge.shutdown().await);
    assert_eq!(bridge.state(), BridgeState::Uninitialized);
    assert_eq!(host.bridge_messages(), vec![json!({"type": "system", "action": "shutdown", "data": {}})]);

    host.bridge_message(json!({"type": "midi", "data": {"type": "noteOn", "note": 1}}));
    assert!(log.is_empty());
}
