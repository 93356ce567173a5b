//! Per-element binding state.
//!
//! An `ElementBinding` owns the validated settings for one element, the
//! snapshot of the element's CSS values taken when it was bound, and the last
//! progress that was applied. The snapshot supplies fallback start/end values
//! for animations that leave a bound unset.

use std::collections::HashMap;

use tracing::trace;

use super::interpolate::{FrameContext, apply_animations};
use super::types::{Animation, BindingSettings};
use crate::area::ViewportArea;
use crate::color::{CssColor, parse_color};
use crate::error::{ConfigError, Result};
use crate::progress::{ReferencePoint, combined_progress};
use crate::provider::{ElementGeometryProvider, ElementId, PropertyWriter};

/// Progress stored before the first computation. Outside `[0, 1]`, so the
/// first computation always writes.
pub const UNSET_PROGRESS: f64 = -1.0;

/// A CSS value captured at bind time, parsed for its animation type.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotValue {
    Number(f64),
    Color(CssColor),
    Raw(String),
}

/// Initial geometry and CSS values of an element.
#[derive(Debug, Clone, Default)]
pub struct PropertySnapshot {
    /// Document offset of the element's top edge when bound.
    pub offset_top: f64,
    /// Document offset of the element's left edge when bound.
    pub offset_left: f64,
    values: HashMap<String, SnapshotValue>,
}

impl PropertySnapshot {
    pub fn new(offset_top: f64, offset_left: f64) -> Self {
        Self {
            offset_top,
            offset_left,
            values: HashMap::new(),
        }
    }

    /// Read the current value of every animated property of `element`.
    ///
    /// `integer` properties keep their leading integer, `number` properties
    /// their leading float, `color` properties their parsed color. Values that
    /// do not parse are left out. When several animations drive the same
    /// property, the last one decides how it is parsed.
    pub fn capture(
        element: &ElementId,
        animations: &[Animation],
        geometry: &dyn ElementGeometryProvider,
    ) -> Self {
        let mut snapshot = Self::new(geometry.offset_top(element), geometry.offset_left(element));
        for animation in animations {
            let Some(property) = animation.property() else {
                continue;
            };
            let Some(css) = geometry.css_value(element, property) else {
                snapshot.values.remove(property);
                continue;
            };
            let value = match animation {
                Animation::Integer { .. } => parse_leading_int(&css).map(SnapshotValue::Number),
                Animation::Number { .. } => parse_leading_float(&css).map(SnapshotValue::Number),
                Animation::Color { .. } => Some(SnapshotValue::Color(parse_color(&css))),
                Animation::Sequence { .. } | Animation::Custom { .. } => {
                    Some(SnapshotValue::Raw(css))
                }
            };
            match value {
                Some(value) => {
                    snapshot.values.insert(property.to_string(), value);
                }
                None => {
                    snapshot.values.remove(property);
                }
            }
        }
        snapshot
    }

    pub fn set(&mut self, property: impl Into<String>, value: SnapshotValue) {
        self.values.insert(property.into(), value);
    }

    pub fn get(&self, property: &str) -> Option<&SnapshotValue> {
        self.values.get(property)
    }

    pub fn number(&self, property: &str) -> Option<f64> {
        match self.values.get(property) {
            Some(SnapshotValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn color(&self, property: &str) -> Option<CssColor> {
        match self.values.get(property) {
            Some(SnapshotValue::Color(c)) => Some(*c),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SnapshotValue)> {
        self.values.iter()
    }
}

/// Sign and leading digits of `s`, after leading whitespace.
fn numeric_prefix(s: &str) -> &str {
    let s = s.trim_start();
    let sign = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign..].bytes().take_while(u8::is_ascii_digit).count();
    &s[..sign + digits]
}

/// Leading base-10 integer: `"12px"` -> 12, `"-3.9"` -> -3, `"auto"` -> none.
pub fn parse_leading_int(s: &str) -> Option<f64> {
    numeric_prefix(s).parse::<i64>().ok().map(|n| n as f64)
}

/// Leading decimal number: `"0.5"` -> 0.5, `"1.5em"` -> 1.5, `".25"` -> 0.25.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(s.starts_with(['+', '-']));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}

/// Binding of one element to its animations.
#[derive(Debug, Clone)]
pub struct ElementBinding {
    element: ElementId,
    settings: BindingSettings,
    snapshot: PropertySnapshot,
    last_progress: f64,
}

impl ElementBinding {
    /// Bind `element`, snapshotting its current values.
    ///
    /// Fails if the element or its stake is unknown to `geometry`.
    pub fn new(
        element: ElementId,
        settings: BindingSettings,
        geometry: &dyn ElementGeometryProvider,
    ) -> Result<Self> {
        if !geometry.contains(&element) {
            return Err(ConfigError::UnknownElement(element));
        }
        if let Some(stake) = &settings.stake {
            if !geometry.contains(stake) {
                return Err(ConfigError::UnknownStake(stake.clone()));
            }
        }
        let snapshot = PropertySnapshot::capture(&element, &settings.animations, geometry);
        Ok(Self {
            element,
            settings,
            snapshot,
            last_progress: UNSET_PROGRESS,
        })
    }

    pub fn element(&self) -> &ElementId {
        &self.element
    }

    pub fn settings(&self) -> &BindingSettings {
        &self.settings
    }

    pub fn snapshot(&self) -> &PropertySnapshot {
        &self.snapshot
    }

    /// Last applied progress, or [`UNSET_PROGRESS`].
    pub fn last_progress(&self) -> f64 {
        self.last_progress
    }

    /// Live vertical extent of the stake, or of the element itself.
    pub fn reference_point(&self, geometry: &dyn ElementGeometryProvider) -> ReferencePoint {
        let point = self.settings.stake.as_ref().unwrap_or(&self.element);
        ReferencePoint::new(geometry.offset_top(point), geometry.height(point))
    }

    pub fn progress(&self, area: &ViewportArea, geometry: &dyn ElementGeometryProvider) -> f64 {
        combined_progress(
            self.reference_point(geometry),
            area,
            &self.settings.rep,
            self.settings.rew.as_ref(),
        )
    }

    /// Recompute progress and apply the animations if it changed.
    ///
    /// Returns whether anything was applied. Progress is compared exactly, so
    /// floating-point noise in the geometry can cause a redundant write.
    pub fn update(
        &mut self,
        area: &ViewportArea,
        geometry: &dyn ElementGeometryProvider,
        writer: &mut dyn PropertyWriter,
    ) -> bool {
        let progress = self.progress(area, geometry);
        if progress == self.last_progress {
            return false;
        }
        trace!(element = %self.element, progress, last = self.last_progress, "progress changed");

        let ctx = FrameContext {
            element: &self.element,
            settings: &self.settings,
            area: *area,
            outer_width: geometry.outer_width(&self.element),
        };
        for write in apply_animations(progress, &self.settings.animations, &self.snapshot, &ctx) {
            trace!(element = %self.element, property = %write.property, value = %write.value, "write");
            writer.apply(&self.element, &write.property, &write.value);
        }
        self.last_progress = progress;
        true
    }
}
