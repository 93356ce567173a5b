//! In-memory host for running the engine without a document.
//!
//! [`StaticDocument`] answers viewport and geometry queries from plain data
//! and [`WriteLog`] records property writes. Committing a log feeds the
//! written values back into the document's CSS maps, so later snapshots see
//! them. Layout is not modelled: writes never move an element.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::provider::{ElementGeometryProvider, ElementId, PropertyWriter, ViewportProvider};

/// Geometry and CSS values of one element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticElement {
    pub offset_top: f64,
    pub offset_left: f64,
    pub height: f64,
    pub outer_width: f64,
    pub css: BTreeMap<String, String>,
}

impl StaticElement {
    pub fn new(offset_top: f64, offset_left: f64, height: f64, outer_width: f64) -> Self {
        Self {
            offset_top,
            offset_left,
            height,
            outer_width,
            css: BTreeMap::new(),
        }
    }

    pub fn with_css(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.css.insert(property.into(), value.into());
        self
    }
}

/// A scrollable page described by data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticDocument {
    pub scroll_top: f64,
    pub scroll_left: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub elements: BTreeMap<ElementId, StaticElement>,
}

impl StaticDocument {
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            viewport_width,
            viewport_height,
            ..Self::default()
        }
    }

    pub fn with_element(mut self, id: impl Into<ElementId>, element: StaticElement) -> Self {
        self.elements.insert(id.into(), element);
        self
    }

    pub fn scroll_to(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top;
    }

    pub fn resize(&mut self, viewport_width: f64, viewport_height: f64) {
        self.viewport_width = viewport_width;
        self.viewport_height = viewport_height;
    }

    pub fn element(&self, id: &ElementId) -> Option<&StaticElement> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut StaticElement> {
        self.elements.get_mut(id)
    }

    pub fn css(&self, id: &ElementId, property: &str) -> Option<&str> {
        self.elements.get(id)?.css.get(property).map(String::as_str)
    }

    /// Apply and drain every write in `log`. Returns how many were applied.
    ///
    /// Writes for unknown elements are dropped.
    pub fn commit(&mut self, log: &mut WriteLog) -> usize {
        let mut applied = 0;
        for write in log.take() {
            if let Some(element) = self.elements.get_mut(&write.element) {
                element.css.insert(write.property, write.value);
                applied += 1;
            }
        }
        applied
    }
}

impl ViewportProvider for StaticDocument {
    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
}

impl ElementGeometryProvider for StaticDocument {
    fn contains(&self, element: &ElementId) -> bool {
        self.elements.contains_key(element)
    }

    fn offset_top(&self, element: &ElementId) -> f64 {
        self.elements.get(element).map_or(0.0, |e| e.offset_top)
    }

    fn offset_left(&self, element: &ElementId) -> f64 {
        self.elements.get(element).map_or(0.0, |e| e.offset_left)
    }

    fn height(&self, element: &ElementId) -> f64 {
        self.elements.get(element).map_or(0.0, |e| e.height)
    }

    fn outer_width(&self, element: &ElementId) -> f64 {
        self.elements.get(element).map_or(0.0, |e| e.outer_width)
    }

    fn css_value(&self, element: &ElementId, property: &str) -> Option<String> {
        self.css(element, property).map(str::to_string)
    }
}

/// A property write as received by [`WriteLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedWrite {
    pub element: ElementId,
    pub property: String,
    pub value: String,
}

/// Records every write in order.
#[derive(Debug, Clone, Default)]
pub struct WriteLog {
    writes: Vec<AppliedWrite>,
}

impl WriteLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> &[AppliedWrite] {
        &self.writes
    }

    /// Drain the recorded writes.
    pub fn take(&mut self) -> Vec<AppliedWrite> {
        std::mem::take(&mut self.writes)
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Most recent value written to `property` of `element`.
    pub fn last_value(&self, element: &ElementId, property: &str) -> Option<&str> {
        self.writes
            .iter()
            .rev()
            .find(|w| &w.element == element && w.property == property)
            .map(|w| w.value.as_str())
    }
}

impl PropertyWriter for WriteLog {
    fn apply(&mut self, element: &ElementId, property: &str, value: &str) {
        self.writes.push(AppliedWrite {
            element: element.clone(),
            property: property.to_string(),
            value: value.to_string(),
        });
    }
}
