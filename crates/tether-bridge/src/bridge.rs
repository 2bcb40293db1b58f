//! Message-typed bridge between the UI and the host's audio engine.
//!
//! Outbound messages are queued until the host reports readiness, then flushed in
//! submission order exactly once. Inbound messages are routed to handlers by
//! [`MessageKind`]. Requests that expect an answer (device enumeration) race a one-shot
//! handler against the configured timeout.

use crate::config::BridgeConfig;
use crate::message::{
    AnalysisAction, AnalysisMessage, AnalysisRequest, AnalysisType, AudioAction, AudioDevices,
    BridgeMessage, EffectMessage, HostEvent, MessageKind, MidiAction, MidiData, ParameterMessage,
    SystemAction,
};
use crate::port::{BusPort, HostPort};
use crate::settings::{EngineSettings, EngineSettingsPatch};
use crate::Error;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tether_core::{Backend, ListenerId, ListenerList};
use tokio::sync::oneshot;

/// Readiness of the host side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Uninitialized,
    Initializing,
    Ready,
}

/// Handle for a handler registered with [`MessageBridge::on`].
#[must_use = "dropping the handle keeps the handler registered"]
pub struct HandlerSubscription {
    kind: MessageKind,
    id: ListenerId,
    handlers: Arc<ListenerList<HostEvent>>,
}

impl HandlerSubscription {
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn unsubscribe(self) {
        self.handlers.remove(self.id);
    }
}

impl std::fmt::Debug for HandlerSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerSubscription")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}

struct Inner {
    state: BridgeState,
    /// Inbound messages are only dispatched while attached.
    listening: bool,
    /// Set while the pre-readiness queue is being drained.
    flushing: bool,
    queue: VecDeque<BridgeMessage>,
    ready_waiters: Vec<oneshot::Sender<bool>>,
    engine_settings: EngineSettings,
}

pub struct MessageBridge {
    port: Option<Arc<dyn HostPort>>,
    config: BridgeConfig,
    inner: Mutex<Inner>,
    handlers: Mutex<HashMap<MessageKind, Arc<ListenerList<HostEvent>>>>,
}

impl MessageBridge {
    /// `port` is `None` when the hosting environment exposes no bridge object; the bridge
    /// then answers `false` or empty to every readiness and capability query.
    pub fn new(port: Option<Arc<dyn HostPort>>, config: BridgeConfig) -> Self {
        if port.is_none() {
            tracing::warn!("Host bridge not available; messages will be queued but never sent");
        }
        if let Err(e) = config.validate() {
            tracing::warn!(error = %e, "Invalid bridge configuration");
        }
        let engine_settings = config.engine_settings.clone();
        Self {
            port,
            config,
            inner: Mutex::new(Inner {
                state: BridgeState::Uninitialized,
                listening: false,
                flushing: false,
                queue: VecDeque::new(),
                ready_waiters: Vec::new(),
                engine_settings,
            }),
            handlers: Mutex::new(HashMap::new()),
        }
    }

    /// Bridge that reaches the host through `backend`'s event bus.
    pub fn over_backend(backend: Arc<Backend>, config: BridgeConfig) -> Arc<Self> {
        if !backend.is_available() {
            return Arc::new(Self::new(None, config));
        }
        let port = Arc::new(BusPort::new(backend));
        let bridge = Arc::new(Self::new(Some(Arc::clone(&port) as Arc<dyn HostPort>), config));
        port.attach(&bridge);
        bridge
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn state(&self) -> BridgeState {
        self.inner.lock().state
    }

    /// Whether a host port exists at all.
    pub fn is_available(&self) -> bool {
        self.port.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.port.is_some() && self.state() == BridgeState::Ready
    }

    /// Number of messages waiting for readiness.
    pub fn queued_len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// Start (or join) the readiness handshake.
    ///
    /// Resolves `true` once the host calls [`notify_ready`](Self::notify_ready), immediately
    /// if already ready, and `false` without a host port or if [`shutdown`](Self::shutdown)
    /// abandons the handshake.
    pub async fn initialize(&self) -> bool {
        let Some(port) = self.port.as_ref() else {
            tracing::debug!("Host bridge not available");
            return false;
        };

        let (tx, rx) = oneshot::channel();
        let start_handshake = {
            let mut inner = self.inner.lock();
            match inner.state {
                BridgeState::Ready => return true,
                BridgeState::Initializing => {
                    inner.ready_waiters.push(tx);
                    false
                }
                BridgeState::Uninitialized => {
                    inner.state = BridgeState::Initializing;
                    inner.listening = true;
                    inner.ready_waiters.push(tx);
                    true
                }
            }
        };

        if start_handshake {
            tracing::debug!("Initializing host bridge");
            port.init();
        }

        rx.await.unwrap_or(false)
    }

    /// Called by the host once it is ready to receive messages.
    pub fn notify_ready(&self) {
        let Some(port) = self.port.as_ref() else {
            return;
        };
        {
            let mut inner = self.inner.lock();
            if inner.state != BridgeState::Initializing || inner.flushing {
                tracing::debug!(state = ?inner.state, "Ignoring unexpected ready notification");
                return;
            }
            inner.flushing = true;
        }

        // Drain one message at a time so sends racing the flush queue up behind it.
        let mut flushed = 0usize;
        let (settings, waiters) = loop {
            let next = {
                let mut inner = self.inner.lock();
                match inner.queue.pop_front() {
                    Some(message) => message,
                    None => {
                        inner.state = BridgeState::Ready;
                        inner.flushing = false;
                        break (
                            inner.engine_settings.clone(),
                            std::mem::take(&mut inner.ready_waiters),
                        );
                    }
                }
            };
            post(port, &next);
            flushed += 1;
        };
        tracing::debug!(flushed, "Host bridge ready");

        post(port, &BridgeMessage::engine_settings(settings));
        for waiter in waiters {
            let _ = waiter.send(true);
        }
    }

    /// Send a message now if ready, otherwise queue it.
    ///
    /// The queue holds at most `queueCapacity` messages; beyond that the oldest is dropped.
    pub fn send(&self, message: BridgeMessage) {
        let port = {
            let mut inner = self.inner.lock();
            match self.port.as_ref() {
                Some(port) if inner.state == BridgeState::Ready => Arc::clone(port),
                _ => {
                    if inner.queue.len() >= self.config.queue_capacity {
                        if let Some(dropped) = inner.queue.pop_front() {
                            tracing::warn!(
                                kind = %dropped.kind(),
                                capacity = self.config.queue_capacity,
                                "Outbound queue full, dropping oldest message"
                            );
                        }
                    }
                    inner.queue.push_back(message);
                    return;
                }
            }
        };
        post(&port, &message);
    }

    /// Register a handler for inbound messages of `kind`. Handlers of the same kind run in
    /// registration order.
    pub fn on<F>(&self, kind: MessageKind, handler: F) -> HandlerSubscription
    where
        F: Fn(&HostEvent) + Send + Sync + 'static,
    {
        let handlers = Arc::clone(self.handlers.lock().entry(kind).or_default());
        let id = handlers.add(handler);
        HandlerSubscription { kind, id, handlers }
    }

    pub fn handler_count(&self, kind: MessageKind) -> usize {
        self.handlers.lock().get(&kind).map_or(0, |list| list.len())
    }

    /// Host entry point for one serialized message.
    ///
    /// Ignored until [`initialize`](Self::initialize) attaches the bridge and after
    /// [`shutdown`](Self::shutdown). Unknown types are dropped; malformed ones are logged.
    pub fn receive(&self, text: &str) {
        if !self.inner.lock().listening {
            return;
        }
        match HostEvent::parse(text) {
            Ok(event) => self.dispatch(&event),
            Err(Error::UnknownMessageType(_)) => {}
            Err(e) => tracing::warn!(error = %e, "Dropping malformed host message"),
        }
    }

    fn dispatch(&self, event: &HostEvent) {
        let handlers = self.handlers.lock().get(&event.kind()).cloned();
        if let Some(handlers) = handlers {
            handlers.call_all(event);
        }
    }

    // -----------------------------------------------------------------------
    // Engine settings
    // -----------------------------------------------------------------------

    pub fn engine_settings(&self) -> EngineSettings {
        self.inner.lock().engine_settings.clone()
    }

    /// Merge `patch` into the current settings and push them to the host if ready.
    pub fn update_engine_settings(&self, patch: &EngineSettingsPatch) {
        let settings = {
            let mut inner = self.inner.lock();
            inner.engine_settings.apply(patch);
            inner.engine_settings.clone()
        };
        if self.is_ready() {
            self.send(BridgeMessage::engine_settings(settings));
        }
    }

    /// Restore the settings the bridge was configured with and push them if ready.
    pub fn reset_engine_settings(&self) {
        let settings = self.config.engine_settings.clone();
        self.inner.lock().engine_settings = settings.clone();
        if self.is_ready() {
            self.send(BridgeMessage::engine_settings(settings));
        }
    }

    // -----------------------------------------------------------------------
    // Requests
    // -----------------------------------------------------------------------

    /// Send `message` and wait for the first event of `kind` that `extract` accepts.
    ///
    /// The temporary handler is removed whether the answer arrives or the wait times out.
    async fn request<T, F>(&self, kind: MessageKind, message: BridgeMessage, extract: F) -> Option<T>
    where
        T: Send + 'static,
        F: Fn(&HostEvent) -> Option<T> + Send + Sync + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let tx = Mutex::new(Some(tx));
        let subscription = self.on(kind, move |event| {
            if let Some(answer) = extract(event) {
                if let Some(tx) = tx.lock().take() {
                    let _ = tx.send(answer);
                }
            }
        });

        self.send(message);
        let result = tokio::time::timeout(self.config.request_timeout(), rx).await;
        subscription.unsubscribe();

        match result {
            Ok(Ok(answer)) => Some(answer),
            _ => {
                tracing::debug!(%kind, "No answer from host before timeout");
                None
            }
        }
    }

    /// MIDI input device names, or empty if not ready or the host does not answer in time.
    pub async fn midi_input_devices(&self) -> Vec<String> {
        if !self.is_ready() {
            return Vec::new();
        }
        let message = BridgeMessage::midi(MidiAction::GetInputs, MidiData::default());
        self.request(MessageKind::MidiDeviceList, message, |event| match event {
            HostEvent::MidiDeviceList(inputs) => Some(inputs.clone()),
            _ => None,
        })
        .await
        .unwrap_or_default()
    }

    /// Audio device names, or empty lists if not ready or the host does not answer in time.
    pub async fn audio_devices(&self) -> AudioDevices {
        if !self.is_ready() {
            return AudioDevices::default();
        }
        let message = BridgeMessage::audio(AudioAction::GetDevices, None, json!({}));
        self.request(MessageKind::DeviceList, message, |event| match event {
            HostEvent::DeviceList(list) if list.device_type == "audio" => Some(list.data.clone()),
            _ => None,
        })
        .await
        .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Convenience senders
    // -----------------------------------------------------------------------

    /// Message data is `{buffer, ...sample_info}`; a `buffer` key in `sample_info` wins.
    pub fn load_sample(&self, pad_id: u32, buffer: &[f32], sample_info: Value) {
        let mut data = Map::new();
        data.insert("buffer".to_string(), json!(buffer));
        if let Value::Object(fields) = sample_info {
            data.extend(fields);
        }
        self.send(BridgeMessage::audio(
            AudioAction::Load,
            Some(pad_id),
            Value::Object(data),
        ));
    }

    pub fn play_sample(&self, pad_id: u32, note_info: Option<Value>) {
        let data = note_info.unwrap_or_else(|| json!({}));
        self.send(BridgeMessage::audio(AudioAction::Play, Some(pad_id), data));
    }

    pub fn stop_sample(&self, pad_id: u32) {
        self.send(BridgeMessage::audio(AudioAction::Stop, Some(pad_id), json!({})));
    }

    pub fn set_sample_parameter(&self, pad_id: u32, parameter: impl Into<String>, value: f64) {
        self.send(BridgeMessage::Parameter(ParameterMessage {
            pad_id,
            parameter: parameter.into(),
            value,
        }));
    }

    pub fn set_effect_parameter(
        &self,
        pad_id: u32,
        effect: impl Into<String>,
        parameter: impl Into<String>,
        value: f64,
        enabled: Option<bool>,
    ) {
        self.send(BridgeMessage::Effect(EffectMessage {
            pad_id,
            effect: effect.into(),
            parameter: parameter.into(),
            value,
            enabled,
        }));
    }

    pub fn send_midi_note(&self, note: u8, velocity: u8, channel: u8) {
        self.send(BridgeMessage::midi(
            MidiAction::NoteOn,
            MidiData {
                note: Some(note),
                velocity: Some(velocity),
                channel: Some(channel),
                ..Default::default()
            },
        ));
    }

    pub fn release_midi_note(&self, note: u8, channel: u8) {
        self.send(BridgeMessage::midi(
            MidiAction::NoteOff,
            MidiData {
                note: Some(note),
                channel: Some(channel),
                ..Default::default()
            },
        ));
    }

    pub fn send_midi_control_change(&self, controller: u8, value: u8, channel: u8) {
        self.send(BridgeMessage::midi(
            MidiAction::ControlChange,
            MidiData {
                controller: Some(controller),
                value: Some(value),
                channel: Some(channel),
                ..Default::default()
            },
        ));
    }

    /// Select the MIDI input by name; `None` deselects. Ignored unless ready.
    pub fn select_midi_input_device(&self, device_name: Option<&str>) {
        if !self.is_ready() {
            return;
        }
        self.send(BridgeMessage::midi(
            MidiAction::SelectInput,
            MidiData {
                device_name: Some(device_name.unwrap_or_default().to_string()),
                ..Default::default()
            },
        ));
    }

    pub fn request_analysis(&self, analysis_type: AnalysisType, pad_id: Option<u32>) {
        self.send(BridgeMessage::Analysis(AnalysisMessage {
            action: AnalysisAction::Request,
            data: AnalysisRequest {
                analysis_type,
                pad_id,
            },
        }));
    }

    /// Ask the host to free engine resources. Ignored unless ready.
    pub fn release_resources(&self) {
        if !self.is_ready() {
            return;
        }
        self.send(BridgeMessage::system(SystemAction::ReleaseResources));
    }

    /// Tell the host to shut down and stop handling inbound messages.
    ///
    /// Returns `false` unless ready. A handshake still waiting for the host is abandoned:
    /// pending [`initialize`](Self::initialize) calls resolve `false` and queued messages stay
    /// queued for the next handshake.
    pub async fn shutdown(&self) -> bool {
        if !self.is_ready() {
            self.abandon_handshake();
            return false;
        }
        self.send(BridgeMessage::system(SystemAction::Shutdown));

        let mut inner = self.inner.lock();
        inner.listening = false;
        inner.state = BridgeState::Uninitialized;
        tracing::debug!("Host bridge shut down");
        true
    }

    fn abandon_handshake(&self) {
        let waiters = {
            let mut inner = self.inner.lock();
            if inner.state != BridgeState::Initializing || inner.flushing {
                return;
            }
            inner.state = BridgeState::Uninitialized;
            inner.listening = false;
            std::mem::take(&mut inner.ready_waiters)
        };
        tracing::debug!(waiters = waiters.len(), "Host bridge handshake abandoned");
        for waiter in waiters {
            let _ = waiter.send(false);
        }
    }
}

fn post(port: &Arc<dyn HostPort>, message: &BridgeMessage) {
    let result = message.to_text().and_then(|text| {
        tracing::trace!(kind = %message.kind(), "send");
        port.send_message(text)
    });
    if let Err(e) = result {
        tracing::warn!(kind = %message.kind(), error = %e, "Failed to send message to host");
    }
}

impl std::fmt::Debug for MessageBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("MessageBridge")
            .field("available", &self.port.is_some())
            .field("state", &inner.state)
            .field("queued", &inner.queue.len())
            .finish()
    }
}
