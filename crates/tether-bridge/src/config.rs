//! Bridge configuration.

use crate::error::{Error, Result};
use crate::settings::EngineSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a [`MessageBridge`](crate::MessageBridge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Messages held before the host is ready; the oldest is dropped beyond this.
    pub queue_capacity: usize,
    /// How long device requests wait for the host's answer.
    pub request_timeout_ms: u64,
    /// Settings pushed to the host on readiness.
    pub engine_settings: EngineSettings,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            request_timeout_ms: 2000,
            engine_settings: EngineSettings::default(),
        }
    }
}

impl BridgeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(Error::InvalidConfig(
                "queueCapacity must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "requestTimeoutMs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
