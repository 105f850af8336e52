//! View transform for zoom and pan.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom factor applied per wheel step towards the user.
pub const WHEEL_ZOOM_IN: f64 = 1.1;
/// Zoom factor applied per wheel step away from the user.
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Maps canvas (world) coordinates to the viewport. Exports always render
/// through the default, identity camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Screen-space pan.
    pub offset: Vec2,
    /// 1.0 is actual size.
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::with_bounds(0.1, 10.0)
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity camera with the given zoom limits.
    pub fn with_bounds(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom,
            max_zoom,
        }
    }

    /// World to screen.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.transform().inverse() * screen_point
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Shift the view by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Multiply the zoom by `factor`, within limits, so that whatever is
    /// under `anchor` stays there.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        let zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let pinned = self.screen_to_world(anchor);
        self.zoom = zoom;
        self.offset += anchor - self.world_to_screen(pinned);
    }

    /// Apply one wheel step. Positive `delta_y` scrolls away and zooms out.
    pub fn wheel_zoom(&mut self, screen_point: Point, delta_y: f64) {
        let factor = if delta_y > 0.0 {
            WHEEL_ZOOM_OUT
        } else {
            WHEEL_ZOOM_IN
        };
        self.zoom_at(screen_point, factor);
    }

    /// Reset camera to the identity transform.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }

    pub fn is_identity(&self) -> bool {
        self.offset == Vec2::ZERO && (self.zoom - 1.0).abs() < f64::EPSILON
    }
}
