//! Scrollanim configuration system
//!
//! This crate loads a headless scroll scenario from `scrollanim.toml`: the
//! simulated page (viewport and elements), the sweep to run over it, and the
//! bindings to register. Environment variables can override the sweep and
//! viewport settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use scrollanim_core::BindingOptions;
use scrollanim_core::headless::StaticDocument;
use scrollanim_core::provider::ElementId;

/// Default config file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "scrollanim.toml";

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScrollAnimConfig {
    /// Scroll sweep settings
    pub sweep: SweepConfig,
    /// Simulated page
    pub document: StaticDocument,
    /// Elements to animate
    #[serde(rename = "binding")]
    pub bindings: Vec<BindingConfig>,
}

/// Scroll sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Distance scrolled between notifications
    pub step: f64,
    /// Last scroll position of the sweep
    pub max: f64,
}

/// One bound element and its options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingConfig {
    pub element: ElementId,
    #[serde(flatten)]
    pub options: BindingOptions,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            step: 50.0,
            max: 2000.0,
        }
    }
}

impl ScrollAnimConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `scrollanim.toml` from the current directory, or defaults if it is
    /// missing or invalid
    pub fn load_or_default() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_FILE).unwrap_or_default()
    }

    /// Load configuration from a TOML file, or defaults if it does not exist
    ///
    /// Unreadable or malformed files are still errors.
    pub fn load_if_present<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        match Self::load_from_file(path) {
            Err(ConfigLoadError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Unparseable values are ignored.
    pub fn merge_with_env(&mut self) {
        if let Some(width) = env_f64("SCROLLANIM_VIEWPORT_WIDTH") {
            self.document.viewport_width = width;
        }
        if let Some(height) = env_f64("SCROLLANIM_VIEWPORT_HEIGHT") {
            self.document.viewport_height = height;
        }
        if let Some(left) = env_f64("SCROLLANIM_SCROLL_LEFT") {
            self.document.scroll_left = left;
        }
        if let Some(step) = env_f64("SCROLLANIM_SCROLL_STEP") {
            self.sweep.step = step;
        }
        if let Some(max) = env_f64("SCROLLANIM_SCROLL_MAX") {
            self.sweep.max = max;
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from `path` when given, otherwise `scrollanim.toml` (defaults
    ///    if that file is missing)
    /// 2. Override with environment variables if present
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_if_present(DEFAULT_CONFIG_FILE)?,
        };
        config.merge_with_env();
        Ok(config)
    }

    /// Scroll positions visited by the sweep, starting at 0.
    ///
    /// A non-positive step yields only the starting position.
    pub fn scroll_positions(&self) -> Vec<f64> {
        let mut positions = vec![0.0];
        if self.sweep.step <= 0.0 || !self.sweep.step.is_finite() {
            return positions;
        }
        let mut top = self.sweep.step;
        while top <= self.sweep.max {
            positions.push(top);
            top += self.sweep.step;
        }
        positions
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok()?.trim().parse().ok()
}
