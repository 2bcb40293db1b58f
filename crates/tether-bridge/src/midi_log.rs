//! Rolling log of MIDI events reported by the host.

use crate::bridge::{HandlerSubscription, MessageBridge};
use crate::message::{HostEvent, MessageKind, MidiEvent};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

pub const MIDI_LOG_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedMidiEvent {
    pub event: MidiEvent,
    pub received_at: Instant,
}

/// Keeps the most recent [`MIDI_LOG_CAPACITY`] MIDI events seen on a bridge.
pub struct MidiEventLog {
    events: Arc<Mutex<VecDeque<LoggedMidiEvent>>>,
    subscription: Mutex<Option<HandlerSubscription>>,
}

impl MidiEventLog {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(MIDI_LOG_CAPACITY))),
            subscription: Mutex::new(None),
        }
    }

    /// Start recording MIDI events from `bridge`, replacing any previous attachment.
    pub fn attach(&self, bridge: &MessageBridge) {
        let events = Arc::clone(&self.events);
        let subscription = bridge.on(MessageKind::Midi, move |event| {
            let HostEvent::Midi(midi) = event else {
                return;
            };
            let mut events = events.lock();
            if events.len() == MIDI_LOG_CAPACITY {
                events.pop_front();
            }
            events.push_back(LoggedMidiEvent {
                event: midi.clone(),
                received_at: Instant::now(),
            });
        });
        if let Some(previous) = self.subscription.lock().replace(subscription) {
            previous.unsubscribe();
        }
    }

    pub fn detach(&self) {
        if let Some(subscription) = self.subscription.lock().take() {
            subscription.unsubscribe();
        }
    }

    /// Oldest first.
    pub fn events(&self) -> Vec<LoggedMidiEvent> {
        self.events.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for MidiEventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MidiEventLog {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for MidiEventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MidiEventLog")
            .field("events", &self.len())
            .field("attached", &self.subscription.lock().is_some())
            .finish()
    }
}
