//! Scroll-driven property animations.
//!
//! This module provides:
//! - **Schema**: user options with legacy aliases, normalized at bind time
//! - **Interpolation**: typed blending of numbers, integers, colors and sequences
//! - **Bindings**: per-element snapshot and last-applied progress
//! - **Animator**: the registry that recomputes every binding on viewport change
//!
//! # Architecture
//!
//! ```text
//! ScrollAnimator
//!   ├── ActionTable (named custom callbacks)
//!   └── ElementBinding per element
//!         ├── BindingSettings (ranges, stake, canonical animations)
//!         ├── PropertySnapshot (fallback values)
//!         └── last_progress
//! ```

pub mod binding;
pub mod interpolate;
pub mod manager;
pub mod schema;
pub mod types;

pub use binding::{ElementBinding, PropertySnapshot, SnapshotValue, UNSET_PROGRESS};
pub use interpolate::{FrameContext, Interpolate, apply_animations};
pub use manager::ScrollAnimator;
pub use schema::{ActionRef, AnimationDef, AnimationKind, BindingOptions, BoundValue, ListItem, RangeDef};
pub use types::{Action, ActionTable, Animation, BindingSettings, Position, PropertyWrite};
