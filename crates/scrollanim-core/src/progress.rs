//! Scroll progress calculation.
//!
//! A range maps the distance between a reference point on the page and one
//! of the viewport's margins onto a progress value in `[0, 1]`:
//!
//! ```text
//!   dist < d0        -> 0.0
//!   d0 <= dist < d1  -> (dist - d0) / (d1 - d0)
//!   dist >= d1       -> 1.0
//! ```
//!
//! Two ranges are combined per binding. The reproduction range drives
//! progress from 0 to 1; once it completes, an optional rewind range drives
//! it back down to 0.

use serde::{Deserialize, Serialize};

use crate::area::ViewportArea;

/// Which edge of the reference point is compared against which viewport margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reference {
    /// Point top edge against viewport top.
    UpperTop,
    /// Point top edge against viewport bottom.
    #[default]
    UpperBottom,
    /// Point bottom edge against viewport top.
    BaseTop,
    /// Point bottom edge against viewport bottom.
    BaseBottom,
}

impl Reference {
    fn uses_point_top(self) -> bool {
        matches!(self, Self::UpperTop | Self::UpperBottom)
    }

    fn uses_viewport_top(self) -> bool {
        matches!(self, Self::UpperTop | Self::BaseTop)
    }
}

/// How range bounds are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeUnit {
    /// Bounds are absolute pixel distances.
    #[default]
    Px,
    /// Bounds are fractions of the viewport height.
    Fraction,
}

/// A resolved reproduction or rewind range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSpec {
    /// Distance at which progress is 0.
    pub start: f64,
    /// Distance at which progress reaches 1.
    pub end: f64,
    pub unit: RangeUnit,
    pub reference: Reference,
}

impl RangeSpec {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            unit: RangeUnit::Px,
            reference: Reference::UpperBottom,
        }
    }

    pub fn with_unit(mut self, unit: RangeUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.reference = reference;
        self
    }

    /// Resolve `(d0, d1)` in pixels for the given area.
    ///
    /// Fractions are scaled by the visible height and truncated toward zero.
    pub fn distances(&self, area: &ViewportArea) -> (f64, f64) {
        match self.unit {
            RangeUnit::Px => (self.start, self.end),
            RangeUnit::Fraction => {
                let height = area.height();
                ((self.start * height).trunc(), (self.end * height).trunc())
            }
        }
    }
}

impl Default for RangeSpec {
    fn default() -> Self {
        Self::new(0.0, 200.0)
    }
}

/// Vertical extent of the element used as reference point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReferencePoint {
    pub offset_top: f64,
    pub height: f64,
}

impl ReferencePoint {
    pub fn new(offset_top: f64, height: f64) -> Self {
        Self { offset_top, height }
    }
}

/// Progress of `point` through `range` for the visible `area`.
pub fn calculate_progress(point: ReferencePoint, area: &ViewportArea, range: &RangeSpec) -> f64 {
    let poi = if range.reference.uses_point_top() {
        point.offset_top
    } else {
        point.offset_top + point.height
    };
    let margin = if range.reference.uses_viewport_top() {
        area.y_min
    } else {
        area.y_max
    };
    let dist = margin - poi;

    // NaN distances fail every comparison and land on 0.
    let (d0, d1) = range.distances(area);
    if dist >= d0 {
        if dist >= d1 {
            1.0
        } else {
            (dist - d0) / (d1 - d0)
        }
    } else {
        0.0
    }
}

/// Two-phase progress: reproduction first, then the rewind range played backwards.
pub fn combined_progress(
    point: ReferencePoint,
    area: &ViewportArea,
    rep: &RangeSpec,
    rew: Option<&RangeSpec>,
) -> f64 {
    let progress = calculate_progress(point, area, rep);
    match rew {
        Some(rew) if progress >= 1.0 => 1.0 - calculate_progress(point, area, rew),
        _ => progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn area(y_min: f64, y_max: f64) -> ViewportArea {
        ViewportArea::new(0.0, y_min, 1280.0, y_max)
    }

    #[test]
    fn test_upper_bottom_scenario() {
        // Top edge at 750, viewport bottom at 800: 50px into a 200px range.
        let point = ReferencePoint::new(750.0, 40.0);
        let progress = calculate_progress(point, &area(0.0, 800.0), &RangeSpec::default());
        assert!(approx_eq(progress, 0.25));
    }

    #[test]
    fn test_below_start_is_zero() {
        let point = ReferencePoint::new(900.0, 40.0);
        let progress = calculate_progress(point, &area(0.0, 800.0), &RangeSpec::default());
        assert_eq!(progress, 0.0);
    }

    #[test]
    fn test_at_end_is_one() {
        let point = ReferencePoint::new(600.0, 40.0);
        let progress = calculate_progress(point, &area(0.0, 800.0), &RangeSpec::default());
        assert_eq!(progress, 1.0);
    }

    #[test]
    fn test_start_boundary_is_inclusive() {
        let point = ReferencePoint::new(800.0, 40.0);
        let progress = calculate_progress(point, &area(0.0, 800.0), &RangeSpec::default());
        assert_eq!(progress, 0.0);
        let range = RangeSpec::new(-10.0, 10.0);
        let progress = calculate_progress(point, &area(0.0, 800.0), &range);
        assert!(approx_eq(progress, 0.5));
    }

    #[test]
    fn test_nan_distance_is_zero() {
        let range = RangeSpec::default();
        let progress =
            calculate_progress(ReferencePoint::new(f64::NAN, 10.0), &area(0.0, 800.0), &range);
        assert_eq!(progress, 0.0);

        let progress = calculate_progress(ReferencePoint::new(750.0, 10.0), &area(0.0, f64::NAN), &range);
        assert_eq!(progress, 0.0);
    }

    #[test]
    fn test_monotonic_inside_range() {
        let range = RangeSpec::default();
        let mut last = -1.0;
        for top in (0..=80).rev().map(|i| 600.0 + f64::from(i) * 2.5) {
            let p = calculate_progress(ReferencePoint::new(top, 0.0), &area(0.0, 800.0), &range);
            assert!(p >= last, "progress must not decrease as the point rises");
            last = p;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_reference_edges() {
        let point = ReferencePoint::new(500.0, 100.0);
        let view = area(400.0, 1200.0);
        let range = RangeSpec::new(0.0, 1000.0);

        let upper_top = range.with_reference(Reference::UpperTop);
        assert!(approx_eq(calculate_progress(point, &view, &upper_top), 0.0));

        let base_top = range.with_reference(Reference::BaseTop);
        assert_eq!(calculate_progress(point, &view, &base_top), 0.0);

        let upper_bottom = range.with_reference(Reference::UpperBottom);
        assert!(approx_eq(calculate_progress(point, &view, &upper_bottom), 0.7));

        let base_bottom = range.with_reference(Reference::BaseBottom);
        assert!(approx_eq(calculate_progress(point, &view, &base_bottom), 0.6));
    }

    #[test]
    fn test_fraction_bounds_truncate() {
        // 0.333 * 700 = 233.1 -> 233
        let range = RangeSpec::new(0.0, 0.333).with_unit(RangeUnit::Fraction);
        assert_eq!(range.distances(&area(100.0, 800.0)), (0.0, 233.0));

        let point = ReferencePoint::new(800.0 - 116.5, 0.0);
        let progress = calculate_progress(point, &area(100.0, 800.0), &range);
        assert!(approx_eq(progress, 116.5 / 233.0));
    }

    #[test]
    fn test_rewind_applies_after_reproduction() {
        let rep = RangeSpec::default();
        let rew = RangeSpec::new(0.0, 100.0).with_reference(Reference::BaseTop);
        // Bottom edge 50px above the viewport top: halfway through the rewind.
        let point = ReferencePoint::new(900.0, 50.0);
        let view = area(1000.0, 1800.0);
        let progress = combined_progress(point, &view, &rep, Some(&rew));
        assert!(approx_eq(progress, 0.5));
    }

    #[test]
    fn test_without_rewind_stays_complete() {
        let rep = RangeSpec::default();
        let point = ReferencePoint::new(900.0, 50.0);
        let view = area(1000.0, 1800.0);
        assert_eq!(combined_progress(point, &view, &rep, None), 1.0);
    }

    #[test]
    fn test_rewind_ignored_until_reproduction_completes() {
        let rep = RangeSpec::default();
        let rew = RangeSpec::new(0.0, 100.0).with_reference(Reference::BaseTop);
        let point = ReferencePoint::new(750.0, 40.0);
        let progress = combined_progress(point, &area(0.0, 800.0), &rep, Some(&rew));
        assert!(approx_eq(progress, 0.25));
    }
}
