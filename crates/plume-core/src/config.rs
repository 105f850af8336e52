//! Editor configuration.

use crate::history::MAX_UNDO_HISTORY;
use crate::overlay::MIN_GRID_SPACING;
use crate::shapes::SerializableColor;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Largest accepted export oversampling factor.
pub const MAX_EXPORT_MULTIPLIER: u32 = 16;

/// Tunables for an editing session. Every field has a default, so a config
/// file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas width in pixels.
    pub canvas_width: f64,
    /// Canvas height in pixels.
    pub canvas_height: f64,
    /// Maximum undo entries, including the initial state.
    pub history_limit: usize,
    /// Pixels added on both axes per successive paste.
    pub paste_offset: f64,
    /// Oversampling for raster and document export.
    pub export_multiplier: u32,
    /// Grid line spacing in pixels.
    pub grid_spacing: f64,
    /// Font size for new text and for unparseable size input.
    pub default_font_size: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Canvas background; `None` is transparent.
    pub background: Option<SerializableColor>,
    /// Hit-test tolerance in world pixels.
    pub hit_tolerance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            history_limit: MAX_UNDO_HISTORY,
            paste_offset: 10.0,
            export_multiplier: 3,
            grid_spacing: 20.0,
            default_font_size: 24.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
            background: None,
            hit_tolerance: 3.0,
        }
    }
}

impl EditorConfig {
    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        log::debug!("Loading config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values the editor cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(self.canvas_width) && positive(self.canvas_height)) {
            return invalid("canvas size", "must be positive");
        }
        if self.history_limit == 0 {
            return invalid("history_limit", "must be at least 1");
        }
        if !(1..=MAX_EXPORT_MULTIPLIER).contains(&self.export_multiplier) {
            return invalid("export_multiplier", "must be between 1 and 16");
        }
        if self.grid_spacing.is_nan() || self.grid_spacing < MIN_GRID_SPACING {
            return invalid("grid_spacing", "must be at least 1 pixel");
        }
        if self.default_font_size <= 0.0 {
            return invalid("default_font_size", "must be positive");
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= 1.0 && self.max_zoom >= 1.0) {
            return invalid("zoom bounds", "must bracket 1.0");
        }
        Ok(())
    }
}
