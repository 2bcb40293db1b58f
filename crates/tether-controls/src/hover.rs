//! Reports the control parameter index of whatever is under the pointer.
//!
//! The host uses the reported index to map its own focus and automation
//! gestures onto the UI element currently hovered.

use serde::{Serialize, Serializer};
use tether_core::{Backend, Result, CONTROL_PARAMETER_INDEX_CHANGED_EVENT_ID};

/// Read-only view of the UI document the tracker walks.
pub trait ElementTree {
    /// Element handle; equality must mean "same element".
    type Element: Clone + PartialEq;

    fn element_from_point(&self, x: f64, y: f64) -> Option<Self::Element>;

    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// The document root is never inspected for annotations.
    fn is_root(&self, element: &Self::Element) -> bool;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;
}

/// Index reported to the host: the annotation's text, or `-1` when nothing annotated is hovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlParameterIndex {
    Annotated(String),
    None,
}

impl Serialize for ControlParameterIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ControlParameterIndex::Annotated(index) => serializer.serialize_str(index),
            ControlParameterIndex::None => serializer.serialize_i64(-1),
        }
    }
}

/// Call [`handle_pointer_move`](Self::handle_pointer_move) on every pointer-move event.
///
/// Deduplicates twice: by hovered element, then by resolved index.
#[derive(Debug)]
pub struct ControlParameterIndexUpdater<E> {
    annotation: String,
    last_element: Option<E>,
    last_reported: Option<ControlParameterIndex>,
}

impl<E: Clone + PartialEq> ControlParameterIndexUpdater<E> {
    /// `annotation` is the attribute name carrying the parameter index.
    pub fn new(annotation: impl Into<String>) -> Self {
        Self {
            annotation: annotation.into(),
            last_element: None,
            last_reported: None,
        }
    }

    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    pub fn last_reported(&self) -> Option<&ControlParameterIndex> {
        self.last_reported.as_ref()
    }

    /// Returns `true` if an index change was sent to the host.
    pub fn handle_pointer_move<T>(
        &mut self,
        backend: &Backend,
        tree: &T,
        x: f64,
        y: f64,
    ) -> Result<bool>
    where
        T: ElementTree<Element = E>,
    {
        let element = tree.element_from_point(x, y);
        if element == self.last_element {
            return Ok(false);
        }

        let index = match &element {
            Some(element) => self.resolve(tree, element),
            None => ControlParameterIndex::None,
        };
        self.last_element = element;

        if self.last_reported.as_ref() == Some(&index) {
            return Ok(false);
        }

        tracing::trace!(?index, "control parameter index changed");
        backend.emit(
            CONTROL_PARAMETER_INDEX_CHANGED_EVENT_ID,
            serde_json::to_value(&index)?,
        )?;
        self.last_reported = Some(index);
        Ok(true)
    }

    fn resolve<T>(&self, tree: &T, element: &E) -> ControlParameterIndex
    where
        T: ElementTree<Element = E>,
    {
        let mut current = Some(element.clone());
        while let Some(candidate) = current {
            if tree.is_root(&candidate) {
                break;
            }
            if let Some(index) = tree.attribute(&candidate, &self.annotation) {
                return ControlParameterIndex::Annotated(index);
            }
            current = tree.parent(&candidate);
        }
        ControlParameterIndex::None
    }
}
