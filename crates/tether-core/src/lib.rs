//! Host channel core for Tether.
//!
//! Turns the asynchronous, string-serialized message channel between a sandboxed UI and
//! its native host into ordinary subscriptions and awaitable function calls.
//!
//! - [`ListenerList`]: ordered callback lists
//! - [`EventBus`]: event-id routing for inbound traffic, envelope posting for outbound
//! - [`CallCorrelator`] / [`PendingCall`]: request/response matching by call id
//! - [`NativeFunction`]: awaitable proxies for host-registered functions
//! - [`Backend`]: the context object tying one host connection together
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tether_core::{Backend, HostManifest, MemoryChannel};
//!
//! let channel = Arc::new(MemoryChannel::new());
//! let backend = Arc::new(Backend::new(HostManifest::default(), channel));
//!
//! let say_hello = backend.native_function("sayHello");
//! let greeting = say_hello.call(vec!["world".into()]).await?;
//! ```

pub mod error;
pub use error::{Error, Result};

mod listener;
pub use listener::{Listener, ListenerId, ListenerList};

pub mod protocol;
pub use protocol::{
    CompletionPayload, Envelope, InvokeRequest, COMPLETE_EVENT_ID,
    CONTROL_PARAMETER_INDEX_CHANGED_EVENT_ID, INVOKE_EVENT_ID,
};

mod channel;
pub use channel::{DetachedChannel, MemoryChannel, MessageChannel};

mod bus;
pub use bus::{EventBus, EventSubscription};

mod correlator;
pub use correlator::{CallCorrelator, CallId, PendingCall};

mod manifest;
pub use manifest::{HostManifest, Platform};

mod backend;
pub use backend::Backend;

mod native;
pub use native::NativeFunction;

pub use serde_json::Value;
