//! User-facing binding options.
//!
//! These types are serialization-focused: they accept the loose option shape
//! hosts write by hand (legacy type aliases, optional bounds, named actions)
//! and get converted once, at bind time, into [`BindingSettings`].
//!
//! # Example TOML
//!
//! ```toml
//! rep = { start = 0, end = 0.5, unit = "fraction" }
//! rew = { start = 0, end = 200, ref = "base-top" }
//!
//! [[animations]]
//! type = "fade"
//!
//! [[animations]]
//! type = "color"
//! property = "background-color"
//! start = "#f00"
//! end = "rgb(0,0,255)"
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

use super::types::{Action, ActionTable, Animation, BindingSettings, Position};
use crate::color::{CssColor, parse_color};
use crate::error::{ConfigError, Result};
use crate::progress::{RangeSpec, RangeUnit, Reference};
use crate::provider::ElementId;

const OUT_LEFT: &str = "out-left";
const OUT_RIGHT: &str = "out-right";

/// Animation type tag, including the legacy aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationKind {
    Number,
    Integer,
    Color,
    Sequence,
    Custom,
    /// Opacity from 0 to 1.
    Fade,
    /// Integer animation of `left` in pixels.
    Move,
    /// `move` entering from beyond the left edge.
    MoveLeft,
    /// `move` entering from beyond the right edge.
    MoveRight,
    /// Any tag not listed above. Such animations are skipped.
    #[serde(other)]
    Unknown,
}

/// A start or end value as written by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundValue {
    Number(f64),
    Text(String),
    List(Vec<ListItem>),
}

impl From<f64> for BoundValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for BoundValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<ListItem>> for BoundValue {
    fn from(items: Vec<ListItem>) -> Self {
        Self::List(items)
    }
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Entry of a list bound: a sequence value or a color channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    Number(f64),
    Text(String),
}

impl From<&str> for ListItem {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for ListItem {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for ListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Callback of a `custom` animation: given directly, or by registered name.
#[derive(Debug, Clone)]
pub enum ActionRef {
    Named(String),
    Callback(Action),
}

impl Serialize for ActionRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Named(name) => serializer.serialize_str(name),
            Self::Callback(_) => Err(serde::ser::Error::custom(
                "inline action callbacks cannot be serialized",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for ActionRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::Named)
    }
}

/// One requested animation, before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationDef {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AnimationKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<BoundValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<BoundValue>,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionRef>,
}

impl AnimationDef {
    pub fn new(kind: AnimationKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    pub fn with_start(mut self, start: impl Into<BoundValue>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_end(mut self, end: impl Into<BoundValue>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(ActionRef::Callback(action));
        self
    }

    pub fn with_action_named(mut self, name: impl Into<String>) -> Self {
        self.action = Some(ActionRef::Named(name.into()));
        self
    }

    /// Expand legacy aliases into canonical kinds and fill type defaults.
    ///
    /// - `fade`: `number` on `opacity`, bounds default to 0 and 1
    /// - `move`, `move-left`, `move-right`: `integer` on `left` in `px`; the
    ///   directional forms force an off-screen start
    /// - `integer`: unit defaults to `px`
    pub fn normalized(mut self) -> Self {
        match self.kind {
            Some(AnimationKind::Integer) => {
                if self.unit.is_empty() {
                    self.unit = "px".to_string();
                }
            }
            Some(AnimationKind::Fade) => {
                self.kind = Some(AnimationKind::Number);
                self.property = Some("opacity".to_string());
                self.start.get_or_insert(BoundValue::Number(0.0));
                self.end.get_or_insert(BoundValue::Number(1.0));
            }
            Some(kind @ (AnimationKind::Move | AnimationKind::MoveLeft | AnimationKind::MoveRight)) => {
                match kind {
                    AnimationKind::MoveLeft => self.start = Some(BoundValue::from(OUT_LEFT)),
                    AnimationKind::MoveRight => self.start = Some(BoundValue::from(OUT_RIGHT)),
                    _ => {}
                }
                self.property.get_or_insert_with(|| "left".to_string());
                if self.unit.is_empty() {
                    self.unit = "px".to_string();
                }
                self.kind = Some(AnimationKind::Integer);
            }
            _ => {}
        }
        self
    }
}

/// A range as written by the user; missing fields take phase defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeDef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<RangeUnit>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
}

impl RangeDef {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    pub fn with_unit(mut self, unit: RangeUnit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Reproduction range: defaults to `{0, 200, px, upper-bottom}`.
    pub fn reproduction(&self) -> RangeSpec {
        RangeSpec {
            start: self.start.unwrap_or(0.0),
            end: self.end.unwrap_or(200.0),
            unit: self.unit.unwrap_or(RangeUnit::Px),
            reference: self.reference.unwrap_or(Reference::UpperBottom),
        }
    }

    /// Rewind range: only defined when both bounds are given.
    pub fn rewind(&self) -> Option<RangeSpec> {
        let (start, end) = (self.start?, self.end?);
        Some(RangeSpec {
            start,
            end,
            unit: self.unit.unwrap_or(RangeUnit::Px),
            reference: self.reference.unwrap_or(Reference::BaseTop),
        })
    }
}

/// Options for binding one element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingOptions {
    pub rep: RangeDef,
    pub rew: RangeDef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stake: Option<ElementId>,
    /// Shorthand for a single animation; appended after `animations`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationDef>,
    pub animations: Vec<AnimationDef>,
}

impl BindingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rep(mut self, rep: RangeDef) -> Self {
        self.rep = rep;
        self
    }

    pub fn with_rew(mut self, rew: RangeDef) -> Self {
        self.rew = rew;
        self
    }

    pub fn with_stake(mut self, stake: impl Into<ElementId>) -> Self {
        self.stake = Some(stake.into());
        self
    }

    pub fn with_animation(mut self, animation: AnimationDef) -> Self {
        self.animations.push(animation);
        self
    }

    /// Validate and normalize into runtime settings.
    ///
    /// Animations with a missing or unrecognized type are dropped with a
    /// warning; everything else that is malformed is an error.
    pub fn into_settings(self, actions: &ActionTable) -> Result<BindingSettings> {
        let rep = self.rep.reproduction();
        check_range("reproduction", &rep)?;

        let rew = self.rew.rewind();
        match &rew {
            Some(range) => check_range("rewind", range)?,
            None if self.rew.start.is_some() || self.rew.end.is_some() => {
                debug!("rewind range needs both bounds; rewind disabled");
            }
            None => {}
        }

        let mut animations = Vec::new();
        let defs = self.animations.into_iter().chain(self.animation);
        for (index, def) in defs.enumerate() {
            if let Some(animation) = canonical(index, def, actions)? {
                animations.push(animation);
            }
        }

        Ok(BindingSettings {
            rep,
            rew,
            stake: self.stake,
            animations,
        })
    }
}

fn check_range(phase: &'static str, range: &RangeSpec) -> Result<()> {
    let degenerate =
        !range.start.is_finite() || !range.end.is_finite() || range.start == range.end;
    if degenerate {
        return Err(ConfigError::DegenerateRange {
            phase,
            start: range.start,
            end: range.end,
        });
    }
    Ok(())
}

fn canonical(index: usize, def: AnimationDef, actions: &ActionTable) -> Result<Option<Animation>> {
    let def = def.normalized();
    let animation = match def.kind {
        Some(AnimationKind::Custom) => {
            let action = match def.action {
                Some(ActionRef::Callback(action)) => action,
                Some(ActionRef::Named(name)) => match actions.get(&name) {
                    Some(action) => action.clone(),
                    None => return Err(ConfigError::UnknownAction(name)),
                },
                None => return Err(ConfigError::MissingAction { index }),
            };
            Animation::Custom { action }
        }
        Some(AnimationKind::Number) => Animation::Number {
            property: require_property(index, "number", def.property)?,
            start: number_bound(index, def.start)?,
            end: number_bound(index, def.end)?,
            unit: def.unit,
        },
        Some(AnimationKind::Integer) => {
            let property = require_property(index, "integer", def.property)?;
            let start = position_bound(index, def.start)?;
            let end = position_bound(index, def.end)?;
            let offscreen = [start, end].iter().flatten().any(Position::is_offscreen);
            if offscreen && property != "left" && property != "right" {
                return Err(ConfigError::SentinelProperty { index, property });
            }
            Animation::Integer {
                property,
                start,
                end,
                unit: def.unit,
            }
        }
        Some(AnimationKind::Color) => Animation::Color {
            property: require_property(index, "color", def.property)?,
            start: color_bound(index, def.start)?,
            end: color_bound(index, def.end)?,
        },
        Some(AnimationKind::Sequence) => {
            let property = require_property(index, "sequence", def.property)?;
            let values = match def.end {
                Some(BoundValue::List(items)) => items.iter().map(ListItem::to_string).collect(),
                Some(other) => {
                    return Err(ConfigError::InvalidBound {
                        index,
                        value: other.to_string(),
                    });
                }
                None => Vec::new(),
            };
            if values.is_empty() {
                return Err(ConfigError::EmptySequence { index });
            }
            Animation::Sequence { property, values }
        }
        // Aliases are gone after normalization.
        Some(_) | None => {
            warn!(index, kind = ?def.kind, "unrecognized animation type; skipped");
            return Ok(None);
        }
    };
    Ok(Some(animation))
}

fn require_property(index: usize, kind: &'static str, property: Option<String>) -> Result<String> {
    property
        .filter(|p| !p.is_empty())
        .ok_or(ConfigError::MissingProperty { index, kind })
}

fn invalid(index: usize, value: &BoundValue) -> ConfigError {
    ConfigError::InvalidBound {
        index,
        value: value.to_string(),
    }
}

fn number_bound(index: usize, bound: Option<BoundValue>) -> Result<Option<f64>> {
    match bound {
        None => Ok(None),
        Some(BoundValue::Number(n)) => Ok(Some(n)),
        Some(other) => Err(invalid(index, &other)),
    }
}

fn position_bound(index: usize, bound: Option<BoundValue>) -> Result<Option<Position>> {
    match bound {
        None => Ok(None),
        Some(BoundValue::Number(n)) => Ok(Some(Position::Px(n))),
        Some(BoundValue::Text(s)) if s == OUT_LEFT => Ok(Some(Position::OutLeft)),
        Some(BoundValue::Text(s)) if s == OUT_RIGHT => Ok(Some(Position::OutRight)),
        Some(other) => Err(invalid(index, &other)),
    }
}

/// Colors are given as CSS strings or as `[r, g, b]` / `[r, g, b, a]` lists.
fn color_bound(index: usize, bound: Option<BoundValue>) -> Result<Option<CssColor>> {
    match bound {
        None => Ok(None),
        Some(BoundValue::Text(s)) => Ok(Some(parse_color(&s))),
        Some(BoundValue::List(items)) => {
            let channels: Option<Vec<i64>> = items
                .iter()
                .map(|item| match item {
                    ListItem::Number(n) => Some(n.trunc() as i64),
                    ListItem::Text(_) => None,
                })
                .collect();
            match channels.as_deref() {
                Some(&[r, g, b]) => Ok(Some(CssColor::rgb(r, g, b))),
                Some(&[r, g, b, a]) => Ok(Some(CssColor::rgba(r, g, b, a))),
                _ => Err(invalid(index, &BoundValue::List(items))),
            }
        }
        Some(other) => Err(invalid(index, &other)),
    }
}
