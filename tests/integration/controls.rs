//! Control mirror integration tests

use crate::helpers::tolerances::FLOAT_EPSILON;
use crate::helpers::*;
use approx::assert_relative_eq;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tether::core::CONTROL_PARAMETER_INDEX_CHANGED_EVENT_ID;
use tether::{ControlParameterIndexUpdater, ElementTree};

/// A slider only moves once the host confirms the snapped value.
#[test]
fn test_slider_confirmed_by_host_echo() {
    let host = SimulatedHost::new();
    let gain = host.session.controls().slider("gain");

    let requests = host.outbound();
    assert_eq!(requests[0].event_id, "__juce__slidergain");
    assert_eq!(requests[0].payload, json!({"eventType": "requestInitialUpdate"}));

    host.emit(
        "__juce__slidergain",
        json!({"eventType": "propertiesChanged", "start": 20.0, "end": 100.0, "skew": 1.0,
               "interval": 10.0, "name": "Gain", "parameterIndex": 3}),
    );
    assert_eq!(gain.properties().parameter_index, 3);

    gain.set_normalised_value(0.55).unwrap();
    assert_relative_eq!(gain.scaled_value(), 0.0, epsilon = FLOAT_EPSILON);

    host.echo_control_values();
    assert_relative_eq!(gain.scaled_value(), 60.0, epsilon = FLOAT_EPSILON);
    assert_relative_eq!(gain.normalised_value(), 0.5, epsilon = FLOAT_EPSILON);
}

/// Every holder of a name shares one mirror and sees the same host updates.
#[test]
fn test_mirror_identity_across_holders() {
    let host = SimulatedHost::new();
    let a = host.session.controls().slider("cutoff");
    let b = host.session.controls().slider("cutoff");
    assert!(Arc::ptr_eq(&a, &b));

    // One initial update request per mirror, not per lookup.
    assert_eq!(host.outbound().len(), 1);

    let notified = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notified);
    b.value_changed().add(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    host.emit("__juce__slidercutoff", json!({"eventType": "valueChanged", "value": 0.25}));
    assert_relative_eq!(a.scaled_value(), 0.25, epsilon = FLOAT_EPSILON);
    assert_eq!(notified.load(Ordering::SeqCst), 1);
}

/// Toggles and combo boxes apply locally before the host answers.
#[test]
fn test_optimistic_toggle_and_combo_box() {
    let host = SimulatedHost::new();
    let bypass = host.session.controls().toggle("bypass");
    let mode = host.session.controls().combo_box("mode");

    host.emit(
        "__juce__comboBoxmode",
        json!({"eventType": "propertiesChanged", "name": "Mode", "parameterIndex": 1,
               "choices": ["Clean", "Warm", "Crunch"]}),
    );
    host.outbound();

    bypass.set_value(true).unwrap();
    mode.set_choice_index(2).unwrap();
    assert!(bypass.value());
    assert_eq!(mode.selected_choice().as_deref(), Some("Crunch"));

    let sent: HashMap<String, serde_json::Value> = host
        .outbound()
        .into_iter()
        .map(|e| (e.event_id, e.payload))
        .collect();
    assert_eq!(sent["__juce__togglebypass"], json!({"eventType": "valueChanged", "value": true}));
    assert_eq!(sent["__juce__comboBoxmode"], json!({"eventType": "valueChanged", "value": 1.0}));

    // Host disagrees and wins.
    host.emit("__juce__togglebypass", json!({"eventType": "valueChanged", "value": false}));
    host.emit("__juce__comboBoxmode", json!({"eventType": "valueChanged", "value": 0.5}));
    assert!(!bypass.value());
    assert_eq!(mode.choice_index(), 1);
}

/// Declared controls are created up front and request their initial state.
#[test]
fn test_declared_controls_created_by_builder() {
    let host = SimulatedHost::with_builder(
        tether::Tether::builder()
            .manifest(test_manifest())
            .declared_controls(),
    );

    let mut slider_names = host.session.controls().slider_names();
    slider_names.sort();
    assert_eq!(slider_names, vec!["cutoff", "gain"]);
    assert_eq!(host.session.controls().toggle_names(), vec!["bypass"]);
    assert_eq!(host.session.controls().combo_box_names(), vec!["mode"]);

    let requests = host.outbound();
    assert_eq!(requests.len(), 4);
    assert!(requests
        .iter()
        .all(|e| e.payload == json!({"eventType": "requestInitialUpdate"})));
}

/// Element tree: a root with two annotated knobs, each wrapping an unannotated label.
struct PluginPage {
    parents: HashMap<u32, u32>,
    annotations: HashMap<u32, String>,
}

impl PluginPage {
    const ROOT: u32 = 0;

    fn new() -> Self {
        Self {
            parents: HashMap::from([(1, 0), (2, 0), (11, 1), (21, 2)]),
            annotations: HashMap::from([(1, "0".to_string()), (2, "4".to_string())]),
        }
    }
}

impl ElementTree for PluginPage {
    type Element = u32;

    fn element_from_point(&self, x: f64, _y: f64) -> Option<u32> {
        match x as i64 {
            0..=9 => Some(Self::ROOT),
            10..=19 => Some(11),
            20..=29 => Some(1),
            30..=39 => Some(21),
            _ => None,
        }
    }

    fn parent(&self, element: &u32) -> Option<u32> {
        self.parents.get(element).copied()
    }

    fn is_root(&self, element: &u32) -> bool {
        *element == Self::ROOT
    }

    fn attribute(&self, element: &u32, name: &str) -> Option<String> {
        (name == "data-parameter-index")
            .then(|| self.annotations.get(element).cloned())
            .flatten()
    }
}

/// Hovering reports the nearest annotated ancestor's index once per change.
#[test]
fn test_hover_reports_parameter_index() {
    let host = SimulatedHost::new();
    let page = PluginPage::new();
    let backend = host.session.backend();
    let mut updater = ControlParameterIndexUpdater::new("data-parameter-index");

    // Label inside knob 1, then knob 1 itself: same index, one report.
    assert!(updater.handle_pointer_move(backend, &page, 15.0, 0.0).unwrap());
    assert!(!updater.handle_pointer_move(backend, &page, 25.0, 0.0).unwrap());
    // Label inside knob 2.
    assert!(updater.handle_pointer_move(backend, &page, 35.0, 0.0).unwrap());
    // Background.
    assert!(updater.handle_pointer_move(backend, &page, 5.0, 0.0).unwrap());

    let reported: Vec<_> = host
        .outbound()
        .into_iter()
        .inspect(|e| assert_eq!(e.event_id, CONTROL_PARAMETER_INDEX_CHANGED_EVENT_ID))
        .map(|e| e.payload)
        .collect();
    assert_eq!(reported, vec![json!("0"), json!("4"), json!(-1)]);
}
