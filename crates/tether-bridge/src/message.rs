//! Typed messages exchanged with the host.
//!
//! Both directions use JSON objects tagged by a `type` field. Outbound traffic is a
//! [`BridgeMessage`]; inbound traffic is parsed into a [`HostEvent`].

use crate::error::{Error, Result};
use crate::settings::EngineSettings;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Value of the `type` field, used to route inbound events to handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    Audio,
    Parameter,
    Effect,
    Midi,
    Analysis,
    EngineSettings,
    System,
    MidiDeviceList,
    DeviceList,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Audio => "audio",
            MessageKind::Parameter => "parameter",
            MessageKind::Effect => "effect",
            MessageKind::Midi => "midi",
            MessageKind::Analysis => "analysis",
            MessageKind::EngineSettings => "engineSettings",
            MessageKind::System => "system",
            MessageKind::MidiDeviceList => "midiDeviceList",
            MessageKind::DeviceList => "deviceList",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Some(match tag {
            "audio" => MessageKind::Audio,
            "parameter" => MessageKind::Parameter,
            "effect" => MessageKind::Effect,
            "midi" => MessageKind::Midi,
            "analysis" => MessageKind::Analysis,
            "engineSettings" => MessageKind::EngineSettings,
            "system" => MessageKind::System,
            "midiDeviceList" => MessageKind::MidiDeviceList,
            "deviceList" => MessageKind::DeviceList,
            _ => return None,
        })
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AudioAction {
    Load,
    Play,
    Stop,
    SetParameter,
    Unload,
    GetDevices,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioMessage {
    pub action: AudioAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad_id: Option<u32>,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterMessage {
    pub pad_id: u32,
    pub parameter: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectMessage {
    pub pad_id: u32,
    pub effect: String,
    pub parameter: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MidiAction {
    NoteOn,
    NoteOff,
    ControlChange,
    GetInputs,
    SelectInput,
}

/// Payload of an outbound MIDI message. Only the fields relevant to the action are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MidiData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiMessage {
    pub action: MidiAction,
    #[serde(default)]
    pub data: MidiData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisAction {
    Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisType {
    Spectrum,
    Waveform,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub analysis_type: AnalysisType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisMessage {
    pub action: AnalysisAction,
    pub data: AnalysisRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettingsMessage {
    pub data: EngineSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SystemAction {
    Shutdown,
    ReleaseResources,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMessage {
    pub action: SystemAction,
    #[serde(default)]
    pub data: Value,
}

/// Message sent from the UI to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BridgeMessage {
    Audio(AudioMessage),
    Parameter(ParameterMessage),
    Effect(EffectMessage),
    Midi(MidiMessage),
    Analysis(AnalysisMessage),
    EngineSettings(EngineSettingsMessage),
    System(SystemMessage),
}

impl BridgeMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            BridgeMessage::Audio(_) => MessageKind::Audio,
            BridgeMessage::Parameter(_) => MessageKind::Parameter,
            BridgeMessage::Effect(_) => MessageKind::Effect,
            BridgeMessage::Midi(_) => MessageKind::Midi,
            BridgeMessage::Analysis(_) => MessageKind::Analysis,
            BridgeMessage::EngineSettings(_) => MessageKind::EngineSettings,
            BridgeMessage::System(_) => MessageKind::System,
        }
    }

    pub fn to_text(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn audio(action: AudioAction, pad_id: Option<u32>, data: Value) -> Self {
        BridgeMessage::Audio(AudioMessage {
            action,
            pad_id,
            data,
        })
    }

    pub fn midi(action: MidiAction, data: MidiData) -> Self {
        BridgeMessage::Midi(MidiMessage { action, data })
    }

    pub fn engine_settings(settings: EngineSettings) -> Self {
        BridgeMessage::EngineSettings(EngineSettingsMessage { data: settings })
    }

    pub fn system(action: SystemAction) -> Self {
        BridgeMessage::System(SystemMessage {
            action,
            data: json!({}),
        })
    }
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MidiEventKind {
    NoteOn,
    NoteOff,
    ControlChange,
}

/// MIDI event observed by the host (from a hardware input, for instance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MidiEvent {
    #[serde(rename = "type")]
    pub kind: MidiEventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u8>,
    #[serde(default)]
    pub channel: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioDevices {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceList {
    pub device_type: String,
    #[serde(default)]
    pub data: AudioDevices,
}

/// Analysis frame computed by the host for one pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub analysis_type: AnalysisType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad_id: Option<u32>,
    #[serde(default)]
    pub data: Vec<f32>,
}

#[derive(Deserialize)]
struct Tagged<T> {
    data: T,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct MidiInputs {
    inputs: Vec<String>,
}

/// Event received from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Midi(MidiEvent),
    MidiDeviceList(Vec<String>),
    DeviceList(DeviceList),
    Analysis(AnalysisResult),
    /// Any other known kind; carries the whole message object.
    Other { kind: MessageKind, message: Value },
}

impl HostEvent {
    /// Parse one inbound message.
    ///
    /// An unrecognised `type` yields [`Error::UnknownMessageType`]; a recognised type with
    /// the wrong shape yields [`Error::Serialization`].
    pub fn parse(text: &str) -> Result<Self> {
        let message: Value = serde_json::from_str(text)?;
        let tag = message
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let kind =
            MessageKind::parse(tag).ok_or_else(|| Error::UnknownMessageType(tag.to_string()))?;

        Ok(match kind {
            MessageKind::Midi => {
                HostEvent::Midi(serde_json::from_value::<Tagged<MidiEvent>>(message)?.data)
            }
            MessageKind::MidiDeviceList => HostEvent::MidiDeviceList(
                serde_json::from_value::<Tagged<MidiInputs>>(message)?
                    .data
                    .inputs,
            ),
            MessageKind::DeviceList => HostEvent::DeviceList(serde_json::from_value(message)?),
            // Fields sit on the message itself, or nested under `data` as an object.
            MessageKind::Analysis => HostEvent::Analysis(match message.get("data") {
                Some(Value::Object(_)) => {
                    serde_json::from_value::<Tagged<AnalysisResult>>(message)?.data
                }
                _ => serde_json::from_value(message)?,
            }),
            kind => HostEvent::Other { kind, message },
        })
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            HostEvent::Midi(_) => MessageKind::Midi,
            HostEvent::MidiDeviceList(_) => MessageKind::MidiDeviceList,
            HostEvent::DeviceList(_) => MessageKind::DeviceList,
            HostEvent::Analysis(_) => MessageKind::Analysis,
            HostEvent::Other { kind, .. } => *kind,
        }
    }
}
