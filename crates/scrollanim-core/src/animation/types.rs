//! Canonical animation types.
//!
//! This module defines the runtime shape of a binding after its user options
//! have been normalized and validated:
//! - `Animation`: one property animation, one variant per canonical kind
//! - `Position`: integer bound that may be an off-screen sentinel
//! - `Action`: callback driven by `custom` animations
//! - `BindingSettings`: everything a binding needs to compute progress and values

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::color::CssColor;
use crate::progress::RangeSpec;
use crate::provider::ElementId;

/// Callback signature for `custom` animations.
pub type ActionCallback = dyn Fn(&ElementId, &BindingSettings, f64);

/// Named actions that `custom` animations can refer to.
pub type ActionTable = HashMap<String, Action>;

/// Shared handle to a custom animation callback.
///
/// The callback receives the animated element, the binding's settings and the
/// current progress. It owns all of its side effects.
#[derive(Clone)]
pub struct Action(Rc<ActionCallback>);

impl Action {
    pub fn new(callback: impl Fn(&ElementId, &BindingSettings, f64) + 'static) -> Self {
        Self(Rc::new(callback))
    }

    pub fn call(&self, element: &ElementId, settings: &BindingSettings, progress: f64) {
        (self.0)(element, settings, progress);
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// Bound of an `integer` animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// A plain value in the animation's unit.
    Px(f64),
    /// Fully outside the viewport, past its left edge.
    OutLeft,
    /// Fully outside the viewport, past its right edge.
    OutRight,
}

impl Position {
    pub fn is_offscreen(&self) -> bool {
        matches!(self, Self::OutLeft | Self::OutRight)
    }
}

/// A canonical property animation.
///
/// `None` bounds fall back to the element's snapshot value for the property.
#[derive(Debug, Clone)]
pub enum Animation {
    /// Linear blend emitted verbatim with the unit appended.
    Number {
        property: String,
        start: Option<f64>,
        end: Option<f64>,
        unit: String,
    },
    /// Linear blend truncated toward zero, with off-screen sentinel support.
    Integer {
        property: String,
        start: Option<Position>,
        end: Option<Position>,
        unit: String,
    },
    /// Per-channel RGB blend, emitted as `rgb(r,g,b)`.
    Color {
        property: String,
        start: Option<CssColor>,
        end: Option<CssColor>,
    },
    /// Discrete selection from an ordered, non-empty list.
    Sequence { property: String, values: Vec<String> },
    /// Hands progress to a callback and writes nothing itself.
    Custom { action: Action },
}

impl Animation {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number { .. } => "number",
            Self::Integer { .. } => "integer",
            Self::Color { .. } => "color",
            Self::Sequence { .. } => "sequence",
            Self::Custom { .. } => "custom",
        }
    }

    /// The CSS property this animation drives, if any.
    pub fn property(&self) -> Option<&str> {
        match self {
            Self::Number { property, .. }
            | Self::Integer { property, .. }
            | Self::Color { property, .. }
            | Self::Sequence { property, .. } => Some(property),
            Self::Custom { .. } => None,
        }
    }
}

/// Validated settings of one binding.
#[derive(Debug, Clone, Default)]
pub struct BindingSettings {
    /// Reproduction range.
    pub rep: RangeSpec,
    /// Rewind range; only present when both of its bounds were given.
    pub rew: Option<RangeSpec>,
    /// Element whose position drives progress instead of the bound element.
    pub stake: Option<ElementId>,
    pub animations: Vec<Animation>,
}

/// A single computed property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyWrite {
    pub property: String,
    pub value: String,
}

impl PropertyWrite {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}
