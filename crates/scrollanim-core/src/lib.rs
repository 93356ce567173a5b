//! Scroll-driven animation engine.
//!
//! For every bound element the engine turns the current scroll position into
//! a progress value in `[0, 1]` and maps it onto CSS property values. The
//! host supplies scroll state and element geometry through the traits in
//! [`provider`] and calls [`ScrollAnimator::on_viewport_changed`] whenever the
//! page scrolls or the viewport is resized.
//!
//! ```ignore
//! use scrollanim_core::{AnimationDef, AnimationKind, BindingOptions, ScrollAnimator};
//!
//! let mut animator = ScrollAnimator::new();
//! animator.bind(
//!     "hero",
//!     BindingOptions::new().with_animation(AnimationDef::new(AnimationKind::Fade)),
//!     &document,
//! )?;
//! animator.on_viewport_changed(&document, &document, &mut writer);
//! ```

pub mod animation;
pub mod area;
pub mod color;
pub mod error;
pub mod headless;
pub mod progress;
pub mod provider;

pub use animation::{
    Action, Animation, AnimationDef, AnimationKind, BindingOptions, BindingSettings, ElementBinding,
    Position, PropertyWrite, RangeDef, ScrollAnimator,
};
pub use area::{ViewportArea, compute_active_area};
pub use color::{CssColor, parse_color};
pub use error::{ConfigError, Result};
pub use progress::{RangeSpec, RangeUnit, Reference, ReferencePoint, calculate_progress, combined_progress};
pub use provider::{ElementGeometryProvider, ElementId, PropertyWriter, ViewportProvider};
