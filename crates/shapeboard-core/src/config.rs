//! Canvas configuration.

use crate::error::ConfigError;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Tunable limits and sizes for a canvas.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Width of the bounded drawing area in world units.
    pub canvas_width: f64,
    /// Height of the bounded drawing area in world units.
    pub canvas_height: f64,
    /// Initial viewport width in screen pixels.
    pub viewport_width: f64,
    /// Initial viewport height in screen pixels.
    pub viewport_height: f64,
    /// Smallest allowed zoom factor.
    pub min_zoom: f64,
    /// Largest allowed zoom factor.
    pub max_zoom: f64,
    /// Distance (in world units) within which a dragged edge snaps to a guide.
    pub guideline_offset: f64,
    /// Floor applied to width/height/radius after every resize.
    pub min_shape_size: f64,
    /// Number of undo states kept.
    pub undo_limit: usize,
    /// Whether guide snapping starts enabled.
    pub snapping: bool,
    /// Keep dragged shapes inside the canvas bounds.
    pub keep_in_bounds: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            canvas_width: 4000.0,
            canvas_height: 4000.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
            min_zoom: 0.18,
            max_zoom: 5.0,
            guideline_offset: crate::snap::GUIDELINE_OFFSET,
            min_shape_size: crate::shapes::MIN_SHAPE_SIZE,
            undo_limit: 50,
            snapping: true,
            keep_in_bounds: true,
        }
    }
}

impl CanvasConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check that the limits are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(ConfigError::Invalid("canvas size must be positive".into()));
        }
        if self.min_zoom <= 0.0 || self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "zoom range [{}, {}] is empty or non-positive",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.guideline_offset < 0.0 || self.min_shape_size < 0.0 {
            return Err(ConfigError::Invalid(
                "guideline offset and minimum size cannot be negative".into(),
            ));
        }
        Ok(())
    }

    /// Canvas bounds as a size.
    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    /// Viewport as a size.
    pub fn viewport_size(&self) -> Size {
        Size::new(self.viewport_width, self.viewport_height)
    }
}
