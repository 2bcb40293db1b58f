//! Error types for the host channel core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Native call rejected: {0}")]
    CallRejected(String),

    #[error("Native call abandoned before the host replied")]
    CallAbandoned,
}

pub type Result<T> = std::result::Result<T, Error>;
