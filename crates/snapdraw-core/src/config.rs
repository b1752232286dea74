//! Canvas configuration: snapping thresholds, viewport limits, history
//! depth and pen defaults.

use crate::history::{DEFAULT_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY};
use crate::stroke::{DEFAULT_PEN_WIDTH, MAX_PEN_WIDTH, MIN_PEN_WIDTH, SerializableColor};
use crate::viewport::{DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Grid spacing in screen pixels.
pub const DEFAULT_GRID_SPACING_PX: f64 = 40.0;
/// Max world distance for the ruler to snap onto a grid intersection.
pub const DEFAULT_GRID_SNAP_THRESHOLD: f64 = 8.0;
/// Rotation snap threshold at scale 1, in degrees.
pub const DEFAULT_ROTATION_SNAP_THRESHOLD_DEG: f64 = 6.0;
/// Protractor snap threshold, in degrees.
pub const DEFAULT_PROTRACTOR_SNAP_THRESHOLD_DEG: f64 = 1.0;
/// Drawn length of the ruler.
pub const DEFAULT_RULER_LENGTH: f64 = 800.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    Invalid(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for a drawing canvas.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Global snapping switch.
    pub snap_enabled: bool,
    /// Whether the renderer should draw the grid.
    pub show_grid: bool,
    /// Grid spacing in screen pixels.
    pub grid_spacing_px: f64,
    /// Max world distance for grid snapping.
    pub grid_snap_threshold: f64,
    /// Rotation snap threshold at scale 1, in degrees.
    pub rotation_snap_threshold_deg: f64,
    /// Protractor snap threshold, in degrees.
    pub protractor_snap_threshold_deg: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Number of undo states kept.
    pub history_capacity: usize,
    pub pen_color: SerializableColor,
    pub pen_width: f64,
    /// Initial ruler position, world space.
    pub ruler_center: Point,
    /// Initial set-square position, world space.
    pub set_square_center: Point,
    pub ruler_length: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            snap_enabled: true,
            show_grid: true,
            grid_spacing_px: DEFAULT_GRID_SPACING_PX,
            grid_snap_threshold: DEFAULT_GRID_SNAP_THRESHOLD,
            rotation_snap_threshold_deg: DEFAULT_ROTATION_SNAP_THRESHOLD_DEG,
            protractor_snap_threshold_deg: DEFAULT_PROTRACTOR_SNAP_THRESHOLD_DEG,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            pen_color: SerializableColor::black(),
            pen_width: DEFAULT_PEN_WIDTH,
            ruler_center: Point::new(400.0, 400.0),
            set_square_center: Point::new(600.0, 600.0),
            ruler_length: DEFAULT_RULER_LENGTH,
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialization(e.to_string()))
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        let finite = [
            ("grid_spacing_px", self.grid_spacing_px),
            ("grid_snap_threshold", self.grid_snap_threshold),
            ("rotation_snap_threshold_deg", self.rotation_snap_threshold_deg),
            ("protractor_snap_threshold_deg", self.protractor_snap_threshold_deg),
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("pen_width", self.pen_width),
            ("ruler_length", self.ruler_length),
            ("ruler_center.x", self.ruler_center.x),
            ("ruler_center.y", self.ruler_center.y),
            ("set_square_center.x", self.set_square_center.x),
            ("set_square_center.y", self.set_square_center.y),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be finite")));
        }

        if self.min_scale <= 0.0 || self.min_scale > self.max_scale {
            return Err(invalid(format!(
                "scale range [{}, {}] must satisfy 0 < min <= max",
                self.min_scale, self.max_scale
            )));
        }
        if self.grid_spacing_px <= 0.0 {
            return Err(invalid(format!("grid_spacing_px must be positive, got {}", self.grid_spacing_px)));
        }
        if self.grid_snap_threshold < 0.0
            || self.rotation_snap_threshold_deg < 0.0
            || self.protractor_snap_threshold_deg < 0.0
        {
            return Err(invalid("snap thresholds must not be negative".to_string()));
        }
        if !(1..=MAX_HISTORY_CAPACITY).contains(&self.history_capacity) {
            return Err(invalid(format!(
                "history_capacity must be within [1, {MAX_HISTORY_CAPACITY}], got {}",
                self.history_capacity
            )));
        }
        if !(MIN_PEN_WIDTH..=MAX_PEN_WIDTH).contains(&self.pen_width) {
            return Err(invalid(format!(
                "pen_width must be within [{MIN_PEN_WIDTH}, {MAX_PEN_WIDTH}], got {}",
                self.pen_width
            )));
        }
        if self.ruler_length <= 0.0 {
            return Err(invalid("ruler_length must be positive".to_string()));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    log::warn!("Rejected canvas config: {}", message);
    ConfigError::Invalid(message)
}
