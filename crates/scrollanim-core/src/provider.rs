//! Host interfaces.
//!
//! The engine never touches a document directly. Scroll offsets, element
//! geometry and CSS values come in through [`ViewportProvider`] and
//! [`ElementGeometryProvider`]; computed values go out through
//! [`PropertyWriter`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle for an element owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Scroll position and visible size of the scrolling viewport.
pub trait ViewportProvider {
    fn scroll_top(&self) -> f64;
    fn scroll_left(&self) -> f64;
    fn viewport_width(&self) -> f64;
    fn viewport_height(&self) -> f64;
}

/// Geometry and style reads for individual elements.
///
/// Offsets are in document coordinates.
pub trait ElementGeometryProvider {
    /// Whether the host knows the element at all.
    fn contains(&self, element: &ElementId) -> bool;
    fn offset_top(&self, element: &ElementId) -> f64;
    fn offset_left(&self, element: &ElementId) -> f64;
    fn height(&self, element: &ElementId) -> f64;
    /// Width including padding and border.
    fn outer_width(&self, element: &ElementId) -> f64;
    /// Current computed value of a CSS property, if any.
    fn css_value(&self, element: &ElementId, property: &str) -> Option<String>;
}

/// Sink for computed property values.
pub trait PropertyWriter {
    fn apply(&mut self, element: &ElementId, property: &str, value: &str);
}
