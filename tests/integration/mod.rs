//! Integration test modules for Tether
//!
//! - native: call correlation over the channel
//! - controls: mirror synchronisation and hover reporting
//! - bridge: readiness handshake, queueing, device requests, shutdown
//! - session: builder, manifest and detached behaviour

pub mod bridge;
pub mod controls;
pub mod native;
pub mod session;
