//! Audio engine settings pushed to the host.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettings {
    pub buffer_size: u32,
    pub sample_rate: u32,
    pub use_low_latency: bool,
    pub enable_multithreading: bool,
    pub realtime_priority: bool,
    pub dithering: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            buffer_size: 512,
            sample_rate: 48000,
            use_low_latency: true,
            enable_multithreading: true,
            realtime_priority: true,
            dithering: true,
        }
    }
}

/// Partial update for [`EngineSettings`]; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_low_latency: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_multithreading: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realtime_priority: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dithering: Option<bool>,
}

impl EngineSettingsPatch {
    pub fn buffer_size(mut self, buffer_size: u32) -> Self {
        self.buffer_size = Some(buffer_size);
        self
    }

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    pub fn use_low_latency(mut self, enabled: bool) -> Self {
        self.use_low_latency = Some(enabled);
        self
    }

    pub fn enable_multithreading(mut self, enabled: bool) -> Self {
        self.enable_multithreading = Some(enabled);
        self
    }

    pub fn realtime_priority(mut self, enabled: bool) -> Self {
        self.realtime_priority = Some(enabled);
        self
    }

    pub fn dithering(mut self, enabled: bool) -> Self {
        self.dithering = Some(enabled);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl EngineSettings {
    pub fn apply(&mut self, patch: &EngineSettingsPatch) {
        if let Some(v) = patch.buffer_size {
            self.buffer_size = v;
        }
        if let Some(v) = patch.sample_rate {
            self.sample_rate = v;
        }
        if let Some(v) = patch.use_low_latency {
            self.use_low_latency = v;
        }
        if let Some(v) = patch.enable_multithreading {
            self.enable_multithreading = v;
        }
        if let Some(v) = patch.realtime_priority {
            self.realtime_priority = v;
        }
        if let Some(v) = patch.dithering {
            self.dithering = v;
        }
    }
}
