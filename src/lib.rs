//! # Tether - UI ↔ host control synchronization
//!
//! Keeps a UI running in a sandboxed content view in step with the native process that
//! owns the real-time audio engine. Everything crosses one string-serialized message
//! channel.
//!
//! ## Architecture
//!
//! Tether is an umbrella crate that coordinates:
//! - **tether-core** - Event bus, listener lists, call correlation, native function proxies
//! - **tether-controls** - Slider / toggle / combo box mirrors, hover index reporting
//! - **tether-bridge** - Message-typed bridge (queued sends, engine settings, device requests)
//!
//! ## Quick Start
//!
//! ```ignore
//! use tether::prelude::*;
//!
//! let session = Tether::builder()
//!     .manifest_json(init_data)
//!     .channel(webview_channel)
//!     .build()?;
//!
//! // Host-registered function
//! let greeting = session.native_function("sayHello").call(vec!["world".into()]).await?;
//!
//! // Control mirrors
//! let gain = session.controls().slider("gain");
//! gain.set_normalised_value(0.5)?;
//!
//! // Message-typed bridge
//! if session.bridge().initialize().await {
//!     session.bridge().send_midi_note(60, 100, 0);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Everything (`full`)
//! - `controls` - Control state mirrors
//! - `bridge` - Message-typed bridge

/// Re-export of tether-core for direct access
pub use tether_core as core;

pub use tether_core::{
    Backend, DetachedChannel, EventBus, EventSubscription, HostManifest, ListenerId,
    ListenerList, MemoryChannel, MessageChannel, NativeFunction, PendingCall, Platform, Value,
};

// Control mirrors
#[cfg(feature = "controls")]
pub use tether_controls as controls;

#[cfg(feature = "controls")]
pub use tether_controls::{
    ComboBoxProperties, ComboBoxState, ControlParameterIndex, ControlParameterIndexUpdater,
    ControlRegistry, ElementTree, SliderProperties, SliderState, ToggleProperties, ToggleState,
};

// Message-typed bridge
#[cfg(feature = "bridge")]
pub use tether_bridge as bridge;

#[cfg(feature = "bridge")]
pub use tether_bridge::{
    BridgeConfig, BridgeMessage, BridgeState, EngineSettings, EngineSettingsPatch, HostEvent,
    HostPort, MessageBridge, MessageKind, MidiEventLog,
};

mod error;
pub use error::{Error, Result};

mod builder;
mod session;

pub use builder::TetherBuilder;
pub use session::Tether;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{Tether, TetherBuilder};

    pub use crate::core::{Backend, HostManifest, MemoryChannel, MessageChannel, Value};

    #[cfg(feature = "controls")]
    pub use crate::controls::{ComboBoxState, ControlRegistry, SliderState, ToggleState};

    #[cfg(feature = "bridge")]
    pub use crate::bridge::{BridgeConfig, MessageBridge, MessageKind};
}
