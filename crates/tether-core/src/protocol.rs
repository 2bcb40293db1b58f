//! Wire protocol shared by the UI and the host.
//!
//! Both directions use the same envelope, serialized as JSON text:
//! `{"eventId": "...", "payload": ...}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Native function invocation request.
pub const INVOKE_EVENT_ID: &str = "__juce__invoke";

/// Native function result, payload `{promiseId, result}`.
pub const COMPLETE_EVENT_ID: &str = "__juce__complete";

/// Hover index report, payload is the annotated index or `-1`.
pub const CONTROL_PARAMETER_INDEX_CHANGED_EVENT_ID: &str = "__juce__controlParameterIndexChanged";

/// Message envelope crossing the channel in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub event_id: String,
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    pub fn new(event_id: impl Into<String>, payload: Value) -> Self {
        Self {
            event_id: event_id.into(),
            payload,
        }
    }

    pub fn to_text(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_text(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidEnvelope(e.to_string()))
    }
}

/// Payload of an [`INVOKE_EVENT_ID`] event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeRequest {
    pub name: String,
    pub params: Vec<Value>,
    pub result_id: u64,
}

/// Payload of a [`COMPLETE_EVENT_ID`] event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionPayload {
    pub promise_id: u64,
    #[serde(default)]
    pub result: Value,
}
