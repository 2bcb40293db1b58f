//! Message-typed bridge for Tether.
//!
//! A higher-level façade over the host connection for application code: typed
//! audio/parameter/effect/MIDI/analysis/system messages, a readiness handshake with an
//! outbound queue, handlers keyed by message kind, and request helpers that give up after
//! a timeout.
//!
//! ## Usage
//!
//! ```ignore
//! use tether_bridge::{BridgeConfig, MessageBridge, MessageKind};
//!
//! let bridge = MessageBridge::over_backend(backend.clone(), BridgeConfig::default());
//! bridge.play_sample(0, None); // queued until the host is ready
//!
//! if bridge.initialize().await {
//!     let inputs = bridge.midi_input_devices().await;
//!     let _sub = bridge.on(MessageKind::Midi, |event| println!("{event:?}"));
//! }
//! ```

pub mod error;
pub use error::{Error, Result};

mod config;
pub use config::BridgeConfig;

mod settings;
pub use settings::{EngineSettings, EngineSettingsPatch};

pub mod message;
pub use message::{
    AnalysisResult, AnalysisType, AudioDevices, BridgeMessage, DeviceList, HostEvent,
    MessageKind, MidiEvent, MidiEventKind,
};

mod port;
pub use port::{
    BusPort, HostPort, BRIDGE_INIT_EVENT_ID, BRIDGE_MESSAGE_EVENT_ID, BRIDGE_READY_EVENT_ID,
};

mod bridge;
pub use bridge::{BridgeState, HandlerSubscription, MessageBridge};

mod midi_log;
pub use midi_log::{LoggedMidiEvent, MidiEventLog, MIDI_LOG_CAPACITY};
