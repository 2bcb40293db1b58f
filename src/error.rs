//! Centralized error type for the tether umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] tether_core::Error),

    #[cfg(feature = "bridge")]
    #[error("Bridge: {0}")]
    Bridge(#[from] tether_bridge::Error),

    #[error("Invalid host manifest: {0}")]
    Manifest(String),
}

pub type Result<T> = std::result::Result<T, Error>;
