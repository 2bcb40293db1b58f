//! Control state mirrors for Tether.
//!
//! Each mirror tracks one named host control over the backend's event bus:
//!
//! - [`SliderState`]: continuous, skewed and optionally stepped; values are confirmed by the host
//! - [`ToggleState`]: boolean, applied locally right away
//! - [`ComboBoxState`]: choice index over a normalised host value
//!
//! [`ControlRegistry`] caches one mirror per name, and [`ControlParameterIndexUpdater`]
//! reports the hovered control's parameter index back to the host.
//!
//! ## Usage
//!
//! ```ignore
//! use tether_controls::ControlRegistry;
//!
//! let controls = ControlRegistry::new(backend.clone());
//! let gain = controls.slider("gain");
//! gain.value_changed().add(|_| println!("gain moved"));
//! gain.set_normalised_value(0.5)?;
//! ```

mod control;
pub use control::{
    ControlKind, PROPERTIES_CHANGED, REQUEST_INITIAL_UPDATE, SLIDER_DRAG_ENDED,
    SLIDER_DRAG_STARTED, VALUE_CHANGED,
};

mod slider;
pub use slider::{SliderProperties, SliderState};

mod toggle;
pub use toggle::{ToggleProperties, ToggleState};

mod combo_box;
pub use combo_box::{ComboBoxProperties, ComboBoxState};

mod registry;
pub use registry::ControlRegistry;

pub mod hover;
pub use hover::{ControlParameterIndex, ControlParameterIndexUpdater, ElementTree};
