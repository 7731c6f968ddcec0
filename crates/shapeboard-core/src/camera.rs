//! Camera module for pan/zoom transforms.

use crate::config::CanvasConfig;
use crate::error::Rejection;
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom factor applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.05;

/// Camera manages the view transform for the canvas.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and world coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%)
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.18,
            max_zoom: 5.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera using the zoom bounds from `config`.
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            ..Self::default()
        }
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Keep the canvas covering the viewport: each offset component stays in
    /// `[-(canvas - viewport), 0]`, collapsing to 0 when the viewport is larger.
    pub fn clamp_pan(&mut self, viewport: Size, canvas: Size) {
        let min_x = -(canvas.width - viewport.width).max(0.0);
        let min_y = -(canvas.height - viewport.height).max(0.0);
        self.offset.x = self.offset.x.clamp(min_x, 0.0);
        self.offset.y = self.offset.y.clamp(min_y, 0.0);
    }

    /// Pan the camera by a delta in screen coordinates, then clamp.
    pub fn pan(&mut self, delta: Vec2, viewport: Size, canvas: Size) {
        self.offset += delta;
        self.clamp_pan(viewport, canvas);
    }

    /// Set the zoom level, keeping the world point under `screen_point` fixed.
    ///
    /// A zoom outside `[min_zoom, max_zoom]` is rejected and leaves the camera unchanged.
    pub fn set_zoom_at(&mut self, screen_point: Point, new_zoom: f64) -> Result<(), Rejection> {
        if !new_zoom.is_finite() || new_zoom < self.min_zoom || new_zoom > self.max_zoom {
            log::warn!("Zoom {} rejected, allowed range is [{}, {}]", new_zoom, self.min_zoom, self.max_zoom);
            return Err(Rejection::ZoomOutOfRange {
                requested: new_zoom,
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        self.apply_zoom(screen_point, new_zoom);
        Ok(())
    }

    /// Zoom by one wheel notch at `screen_point`: in for negative `delta_y`, out
    /// otherwise. The result is clamped to the zoom bounds.
    pub fn wheel_zoom(&mut self, screen_point: Point, delta_y: f64) {
        if delta_y == 0.0 {
            return;
        }
        let factor = if delta_y < 0.0 { WHEEL_ZOOM_STEP } else { 1.0 / WHEEL_ZOOM_STEP };
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        self.apply_zoom(screen_point, new_zoom);
    }

    fn apply_zoom(&mut self, screen_point: Point, new_zoom: f64) {
        // Convert screen point to world before zoom
        let world_point = self.screen_to_world(screen_point);

        self.zoom = new_zoom;

        // Adjust offset so world_point stays at screen_point
        let new_screen = self.world_to_screen(world_point);
        self.offset += screen_point - new_screen;
        log::debug!("Zoom {:.3} at ({:.1}, {:.1})", self.zoom, screen_point.x, screen_point.y);
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }
}
