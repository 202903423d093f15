//! Pan/zoom state of the canvas and the screen/drawing space mapping.
//!
//! Screen coordinates are relative to the top-left corner of the canvas
//! element. Drawing coordinates are where shapes live. The two are related by
//! `screen = drawing * zoom + pan`.

use crate::config::ZoomConfig;
use crate::geometry::Point;

/// Represents pan/zoom transform state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Transform {
    /// Create a new transform with the given zoom and pan.
    pub fn new(zoom: f32, pan_x: f32, pan_y: f32) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// Create an identity transform (zoom=1, no pan).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    pub fn to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.zoom + self.pan_x, p.y * self.zoom + self.pan_y)
    }

    pub fn to_drawing(&self, p: Point) -> Point {
        Point::new((p.x - self.pan_x) / self.zoom, (p.y - self.pan_y) / self.zoom)
    }

    /// Calculate zoom-to-cursor transformation.
    ///
    /// The drawing-space point under `cursor` before the zoom is under
    /// `cursor` again afterwards.
    pub fn zoom_to_cursor(&self, new_zoom: f32, cursor: Point) -> Transform {
        let anchor = self.to_drawing(cursor);

        Transform {
            zoom: new_zoom,
            pan_x: cursor.x - anchor.x * new_zoom,
            pan_y: cursor.y - anchor.y * new_zoom,
        }
    }

    /// Apply a pan delta to the transform.
    pub fn pan_by(&self, dx: f32, dy: f32) -> Transform {
        Transform {
            zoom: self.zoom,
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Viewport controller: owns the transform and enforces the zoom bounds.
#[derive(Debug, Clone)]
pub struct Viewport {
    transform: Transform,
    width: f32,
    height: f32,
    limits: ZoomConfig,
}

impl Viewport {
    pub fn new(width: u32, height: u32, limits: ZoomConfig) -> Self {
        Self {
            transform: Transform::identity(),
            width: width as f32,
            height: height as f32,
            limits,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.transform.zoom
    }

    pub fn pan(&self) -> (f32, f32) {
        (self.transform.pan_x, self.transform.pan_y)
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Canvas centre in screen coordinates.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn is_identity(&self) -> bool {
        self.transform == Transform::identity()
    }

    fn clamp(&self, zoom: f32) -> f32 {
        zoom.clamp(self.limits.min, self.limits.max)
    }

    /// Zoom to `target` (clamped) keeping `screen` fixed.
    ///
    /// Returns false and leaves the transform untouched when the clamped
    /// zoom equals the current one. Infinite targets clamp to the bounds.
    pub fn zoom_to_point(&mut self, screen: Point, target: f32) -> bool {
        if target.is_nan() || !screen.is_finite() {
            return false;
        }
        let zoom = self.clamp(target);
        if zoom == self.transform.zoom {
            return false;
        }
        self.transform = self.transform.zoom_to_cursor(zoom, screen);
        log::debug!(
            "🔍 Zoom {:.3} at ({:.1}, {:.1}), pan ({:.1}, {:.1})",
            zoom,
            screen.x,
            screen.y,
            self.transform.pan_x,
            self.transform.pan_y
        );
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        let target = self.transform.zoom + self.limits.step;
        self.zoom_to_point(self.center(), target)
    }

    pub fn zoom_out(&mut self) -> bool {
        let target = self.transform.zoom - self.limits.step;
        self.zoom_to_point(self.center(), target)
    }

    /// Exponential wheel zoom around the cursor.
    pub fn wheel(&mut self, screen: Point, delta_y: f32) -> bool {
        let target = self.transform.zoom * self.limits.wheel_base.powf(delta_y);
        self.zoom_to_point(screen, target)
    }

    pub fn reset(&mut self) {
        self.transform = Transform::identity();
        log::debug!("🔍 Viewport reset");
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.transform = self.transform.pan_by(dx, dy);
        log::trace!("✋ Pan ({:.1}, {:.1})", self.transform.pan_x, self.transform.pan_y);
    }

    pub fn screen_to_drawing(&self, screen: Point) -> Point {
        self.transform.to_drawing(screen)
    }

    pub fn drawing_to_screen(&self, drawing: Point) -> Point {
        self.transform.to_screen(drawing)
    }
}
