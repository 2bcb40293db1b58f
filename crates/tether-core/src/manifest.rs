//! Host manifest: the names and platform the host declares at session start.
//!
//! Read once when mirrors and native functions are constructed, for warnings only.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostManifest {
    #[serde(rename = "__juce__platform", default)]
    pub platform: Vec<String>,
    #[serde(rename = "__juce__functions", default)]
    pub functions: Vec<String>,
    #[serde(rename = "__juce__registeredGlobalEventIds", default)]
    pub registered_global_event_ids: Vec<String>,
    #[serde(rename = "__juce__sliders", default)]
    pub sliders: Vec<String>,
    #[serde(rename = "__juce__toggles", default)]
    pub toggles: Vec<String>,
    #[serde(rename = "__juce__comboBoxes", default)]
    pub combo_boxes: Vec<String>,
}

/// Platform identifiers the host may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Android,
    MacOs,
    Ios,
    Linux,
}

impl Platform {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "windows" => Some(Self::Windows),
            "android" => Some(Self::Android),
            "macos" => Some(Self::MacOs),
            "ios" => Some(Self::Ios),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }

    /// Origin under which the host serves resources on this platform.
    pub fn resource_origin(self) -> &'static str {
        match self {
            Self::Windows | Self::Android => "https://juce.backend/",
            Self::MacOs | Self::Ios | Self::Linux => "juce://juce.backend/",
        }
    }
}

impl HostManifest {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform.first().and_then(|id| Platform::from_id(id))
    }

    pub fn declares_function(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f == name)
    }

    pub fn declares_slider(&self, name: &str) -> bool {
        self.sliders.iter().any(|s| s == name)
    }

    pub fn declares_toggle(&self, name: &str) -> bool {
        self.toggles.iter().any(|t| t == name)
    }

    pub fn declares_combo_box(&self, name: &str) -> bool {
        self.combo_boxes.iter().any(|c| c == name)
    }

    /// Address under which the host's resource provider serves `path`.
    ///
    /// Without a recognised platform the path is returned unchanged.
    pub fn resource_address(&self, path: &str) -> String {
        match self.platform() {
            Some(platform) => format!("{}{}", platform.resource_origin(), path),
            None => {
                tracing::warn!(path, "resource address requested, but no native backend is detected");
                path.to_string()
            }
        }
    }
}
