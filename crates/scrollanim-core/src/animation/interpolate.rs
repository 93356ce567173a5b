//! Interpolation of animation values against progress.
//!
//! This module provides the `Interpolate` trait for the blendable value types
//! and [`apply_animations`], which turns a progress value and a binding's
//! animations into concrete CSS property values.
//!
//! Blending uses `from * (1 - t) + to * t`. Integer and color outputs are
//! truncated toward zero; number outputs are emitted unrounded.

use tracing::{trace, warn};

use super::binding::PropertySnapshot;
use super::types::{Animation, BindingSettings, Position, PropertyWrite};
use crate::area::ViewportArea;
use crate::color::CssColor;
use crate::provider::ElementId;

/// Trait for types that can be blended between two values.
pub trait Interpolate: Sized {
    /// Returns `self` at `t = 0.0` and `to` at `t = 1.0`.
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        self * (1.0 - t) + to * t
    }
}

impl Interpolate for CssColor {
    /// Channels are blended independently and truncated. Alpha is dropped.
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        let channel = |i: usize| truncate((self.rgb[i] as f64).interpolate(&(to.rgb[i] as f64), t));
        Self::rgb(channel(0), channel(1), channel(2))
    }
}

/// Live state an animation may need beyond progress and snapshot.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub element: &'a ElementId,
    pub settings: &'a BindingSettings,
    pub area: ViewportArea,
    /// Current outer width of the animated element.
    pub outer_width: f64,
}

/// Compute property values for `animations` at `progress`.
///
/// Bounds left unset fall back to the snapshot value of the animated
/// property. `custom` animations run their action and contribute no value.
/// An animation whose values cannot be resolved is skipped with a warning.
pub fn apply_animations(
    progress: f64,
    animations: &[Animation],
    snapshot: &PropertySnapshot,
    ctx: &FrameContext<'_>,
) -> Vec<PropertyWrite> {
    animations
        .iter()
        .filter_map(|animation| interpolate_one(progress, animation, snapshot, ctx))
        .collect()
}

fn interpolate_one(
    progress: f64,
    animation: &Animation,
    snapshot: &PropertySnapshot,
    ctx: &FrameContext<'_>,
) -> Option<PropertyWrite> {
    match animation {
        Animation::Custom { action } => {
            trace!(element = %ctx.element, progress, "custom action");
            action.call(ctx.element, ctx.settings, progress);
            None
        }
        Animation::Number {
            property,
            start,
            end,
            unit,
        } => {
            let from = start.or_else(|| snapshot.number(property));
            let to = end.or_else(|| snapshot.number(property));
            let (Some(from), Some(to)) = (from, to) else {
                return unresolved(ctx, property);
            };
            let value = from.interpolate(&to, progress);
            Some(PropertyWrite::new(property, format!("{}{unit}", format_number(value))))
        }
        Animation::Integer {
            property,
            start,
            end,
            unit,
        } => {
            let from = start.or_else(|| snapshot.number(property).map(Position::Px));
            let to = end.or_else(|| snapshot.number(property).map(Position::Px));
            let offscreen = [from, to].iter().flatten().any(Position::is_offscreen);
            let value = if offscreen {
                offscreen_position(progress, property, from, to, snapshot, ctx)?
            } else {
                let (Some(Position::Px(from)), Some(Position::Px(to))) = (from, to) else {
                    return unresolved(ctx, property);
                };
                truncate(from.interpolate(&to, progress))
            };
            Some(PropertyWrite::new(property, format!("{value}{unit}")))
        }
        Animation::Color {
            property,
            start,
            end,
        } => {
            let from = start.or_else(|| snapshot.color(property));
            let to = end.or_else(|| snapshot.color(property));
            let (Some(from), Some(to)) = (from, to) else {
                return unresolved(ctx, property);
            };
            Some(PropertyWrite::new(property, from.interpolate(&to, progress).to_string()))
        }
        Animation::Sequence { property, values } => {
            let last = values.len().saturating_sub(1);
            let index = ((progress * last as f64) as usize).min(last);
            let value = values.get(index)?;
            Some(PropertyWrite::new(property, value.clone()))
        }
    }
}

/// Blend in viewport-absolute coordinates, then map back into the frame of
/// the `left` or `right` property.
///
/// Sentinels resolve against live geometry: `out-left` is one element width
/// left of the page origin, `out-right` is the viewport width. Any other
/// bound resolves to the element's snapshot offset.
fn offscreen_position(
    progress: f64,
    property: &str,
    from: Option<Position>,
    to: Option<Position>,
    snapshot: &PropertySnapshot,
    ctx: &FrameContext<'_>,
) -> Option<i64> {
    let resolve = |bound: Option<Position>| match bound {
        Some(Position::OutLeft) => -ctx.outer_width,
        Some(Position::OutRight) => ctx.area.width(),
        Some(Position::Px(_)) | None => snapshot.offset_left,
    };
    let absolute = resolve(from).interpolate(&resolve(to), progress);

    let Some(css) = snapshot.number(property) else {
        return unresolved(ctx, property);
    };
    let relative = match property {
        "left" => absolute - (snapshot.offset_left - css),
        _ => (snapshot.offset_left + css) - absolute,
    };
    Some(truncate(relative))
}

fn unresolved<T>(ctx: &FrameContext<'_>, property: &str) -> Option<T> {
    warn!(element = %ctx.element, property, "no usable value to interpolate; skipped");
    None
}

/// Truncate toward zero, like parsing the integer part of the value.
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

/// Shortest round-trip rendering of `value`, as CSS values are written by
/// script hosts: plain digits for magnitudes in `[1e-6, 1e21)`, exponent
/// form (`1e-7`, `1.5e+21`) outside it. Zero is always `"0"`.
fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !value.is_finite() || (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    let exp = format!("{value:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::binding::SnapshotValue;
    use crate::animation::types::Action;
    use std::cell::RefCell;
    use std::rc::Rc;

    const EPSILON: f64 = 0.0001;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn area() -> ViewportArea {
        ViewportArea::new(0.0, 0.0, 1000.0, 800.0)
    }

    fn run(progress: f64, animation: Animation, snapshot: &PropertySnapshot) -> Vec<PropertyWrite> {
        let element = ElementId::from("box");
        let settings = BindingSettings::default();
        let ctx = FrameContext {
            element: &element,
            settings: &settings,
            area: area(),
            outer_width: 120.0,
        };
        apply_animations(progress, &[animation], snapshot, &ctx)
    }

    fn value_at(progress: f64, animation: Animation, snapshot: &PropertySnapshot) -> String {
        let writes = run(progress, animation, snapshot);
        assert_eq!(writes.len(), 1, "expected exactly one write");
        writes[0].value.clone()
    }

    fn left_snapshot() -> PropertySnapshot {
        // Laid out at x=300 with `left: 50px` inside a container at x=250.
        let mut snapshot = PropertySnapshot::new(400.0, 300.0);
        snapshot.set("left", SnapshotValue::Number(50.0));
        snapshot.set("right", SnapshotValue::Number(20.0));
        snapshot
    }

    #[test]
    fn test_f64_interpolation() {
        assert!(approx_eq(0.0_f64.interpolate(&100.0, 0.25), 25.0));
        assert!(approx_eq((-50.0_f64).interpolate(&50.0, 0.5), 0.0));
        assert_eq!(3.0_f64.interpolate(&7.0, 1.0), 7.0);
    }

    #[test]
    fn test_color_interpolation_truncates() {
        let from = CssColor::rgb(255, 0, 0);
        let to = CssColor::rgba(0, 0, 255, 1);
        assert_eq!(from.interpolate(&to, 0.5), CssColor::rgb(127, 0, 127));
    }

    #[test]
    fn test_number_appends_unit() {
        let animation = Animation::Number {
            property: "opacity".to_string(),
            start: Some(0.0),
            end: Some(1.0),
            unit: String::new(),
        };
        let snapshot = PropertySnapshot::default();
        assert_eq!(value_at(0.25, animation.clone(), &snapshot), "0.25");
        assert_eq!(value_at(1.0, animation.clone(), &snapshot), "1");
        assert_eq!(value_at(0.0, animation, &snapshot), "0");
    }

    #[test]
    fn test_number_falls_back_to_snapshot() {
        let mut snapshot = PropertySnapshot::default();
        snapshot.set("font-size", SnapshotValue::Number(10.0));
        let animation = Animation::Number {
            property: "font-size".to_string(),
            start: None,
            end: Some(20.0),
            unit: "pt".to_string(),
        };
        assert_eq!(value_at(0.5, animation, &snapshot), "15pt");
    }

    #[test]
    fn test_missing_fallback_skips_write() {
        let animation = Animation::Number {
            property: "width".to_string(),
            start: None,
            end: Some(20.0),
            unit: "px".to_string(),
        };
        assert!(run(0.5, animation, &PropertySnapshot::default()).is_empty());
    }

    #[test]
    fn test_integer_truncates() {
        let animation = Animation::Integer {
            property: "top".to_string(),
            start: Some(Position::Px(0.0)),
            end: Some(Position::Px(-99.0)),
            unit: "px".to_string(),
        };
        assert_eq!(
            value_at(0.5, animation, &PropertySnapshot::default()),
            "-49px"
        );
    }

    #[test]
    fn test_out_left_to_snapshot() {
        let animation = Animation::Integer {
            property: "left".to_string(),
            start: Some(Position::OutLeft),
            end: Some(Position::Px(0.0)),
            unit: "px".to_string(),
        };
        let snapshot = left_snapshot();
        // -120 absolute, shifted into the container frame (300 - 50 = 250).
        assert_eq!(value_at(0.0, animation.clone(), &snapshot), "-370px");
        assert_eq!(value_at(1.0, animation.clone(), &snapshot), "50px");
        // Halfway: (-120 + 300) / 2 = 90 absolute -> -160 relative.
        assert_eq!(value_at(0.5, animation, &snapshot), "-160px");
    }

    #[test]
    fn test_out_right_on_right_property() {
        let animation = Animation::Integer {
            property: "right".to_string(),
            start: Some(Position::OutRight),
            end: None,
            unit: "px".to_string(),
        };
        let snapshot = left_snapshot();
        // (300 + 20) - 1000
        assert_eq!(value_at(0.0, animation.clone(), &snapshot), "-680px");
        assert_eq!(value_at(1.0, animation, &snapshot), "20px");
    }

    #[test]
    fn test_color_output_format() {
        let mut snapshot = PropertySnapshot::default();
        snapshot.set("color", SnapshotValue::Color(CssColor::rgb(0, 0, 0)));
        let animation = Animation::Color {
            property: "color".to_string(),
            start: None,
            end: Some(CssColor::rgb(200, 100, 51)),
        };
        assert_eq!(value_at(0.5, animation, &snapshot), "rgb(100,50,25)");
    }

    #[test]
    fn test_sequence_selection() {
        let animation = Animation::Sequence {
            property: "content".to_string(),
            values: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        };
        let snapshot = PropertySnapshot::default();
        assert_eq!(value_at(0.0, animation.clone(), &snapshot), "a");
        assert_eq!(value_at(0.5, animation.clone(), &snapshot), "b");
        assert_eq!(value_at(0.99, animation.clone(), &snapshot), "b");
        assert_eq!(value_at(1.0, animation, &snapshot), "c");
    }

    #[test]
    fn test_custom_runs_action_without_write() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let animation = Animation::Custom {
            action: Action::new(move |element, _, progress| {
                sink.borrow_mut().push((element.to_string(), progress));
            }),
        };
        assert!(run(0.75, animation, &PropertySnapshot::default()).is_empty());
        assert_eq!(*seen.borrow(), vec![("box".to_string(), 0.75)]);
    }

    #[test]
    fn test_number_formatting_switches_to_exponent() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(-2.5e-8), "-2.5e-8");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e22), "1.5e+22");
    }
}
