//! Error types for binding configuration.

use thiserror::Error;

use crate::provider::ElementId;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while turning user options into a live binding.
///
/// Per-frame computation never fails; everything that can be rejected is
/// rejected here, once, when an element is bound.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A range whose bounds coincide or are not finite.
    #[error("{phase} range has degenerate bounds (start={start}, end={end})")]
    DegenerateRange {
        phase: &'static str,
        start: f64,
        end: f64,
    },

    /// The stake element is unknown to the geometry provider.
    #[error("stake element `{0}` not found")]
    UnknownStake(ElementId),

    /// The bound element is unknown to the geometry provider.
    #[error("element `{0}` not found")]
    UnknownElement(ElementId),

    /// The element already carries a binding.
    #[error("element `{0}` is already bound")]
    AlreadyBound(ElementId),

    /// A `custom` animation without a callback.
    #[error("animation #{index}: custom animation has no action")]
    MissingAction { index: usize },

    /// A named action that was never registered.
    #[error("action `{0}` is not registered")]
    UnknownAction(String),

    /// A property-driving animation without a property name.
    #[error("animation #{index}: {kind} animation has no property")]
    MissingProperty { index: usize, kind: &'static str },

    /// A `sequence` animation with nothing to select from.
    #[error("animation #{index}: sequence has no values")]
    EmptySequence { index: usize },

    /// Off-screen sentinels only make sense for `left` and `right`.
    #[error("animation #{index}: off-screen bounds cannot drive `{property}`")]
    SentinelProperty { index: usize, property: String },

    /// A bound of the wrong shape for the animation type.
    #[error("animation #{index}: invalid bound {value}")]
    InvalidBound { index: usize, value: String },
}
