//! Screen ↔ drawing-space coordinate transforms.
//!
//! A layer's element is centered on the workspace origin, scaled by the zoom
//! factor and rotated about its own center. Drawing space is the layer's
//! untransformed raster frame: origin at the top-left, one unit per canvas
//! pixel at zoom 1.
//!
//! [`screen_to_drawing`] floors each axis to two decimals after undoing the
//! rotation, so repeated captures of nearly identical input land on the same
//! stored coordinates. [`drawing_to_screen`] is its exact inverse without the
//! rounding step.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use crate::consts::CAPTURE_PRECISION;
use crate::geom::{Point, Rect, Size};

/// The workspace values a transform depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    /// Workspace viewport bounds.
    pub bounds: Rect,
    /// Pan origin in cartesian space.
    pub origin: Point,
    /// Rotation in degrees, `[0, 360)`.
    pub rotation: f64,
    /// Zoom factor.
    pub zoom: f64,
}

impl Default for View {
    fn default() -> Self {
        Self { bounds: Rect::default(), origin: Point::default(), rotation: 0.0, zoom: 1.0 }
    }
}

impl View {
    /// Screen position of the workspace origin, which is also every layer's center.
    #[must_use]
    pub fn center(&self) -> Point {
        self.origin.to_screen(self.bounds)
    }

    #[must_use]
    pub fn screen_to_drawing(&self, screen: Point, canvas_size: Size) -> Point {
        screen_to_drawing(screen, self.origin, self.bounds, self.rotation, self.zoom, canvas_size)
    }

    #[must_use]
    pub fn drawing_to_screen(&self, drawing: Point, canvas_size: Size) -> Point {
        drawing_to_screen(drawing, self.origin, self.bounds, self.rotation, self.zoom, canvas_size)
    }

    #[must_use]
    pub fn layer_top_left(&self, canvas_size: Size) -> Point {
        layer_top_left(self.origin, self.bounds, self.zoom, canvas_size)
    }
}

/// Map a workspace-relative screen point into a layer's drawing space.
#[must_use]
pub fn screen_to_drawing(
    screen: Point,
    origin: Point,
    bounds: Rect,
    rotation_deg: f64,
    zoom: f64,
    canvas_size: Size,
) -> Point {
    let center = origin.to_screen(bounds);
    let unzoomed = (screen - center).scale(1.0 / zoom);
    let local = inverse_rotate(unzoomed, rotation_deg);
    let snapped = Point::new(floor_precision(local.x), floor_precision(local.y));
    snapped + canvas_size.half()
}

/// Map a drawing-space point back onto the screen.
#[must_use]
pub fn drawing_to_screen(
    drawing: Point,
    origin: Point,
    bounds: Rect,
    rotation_deg: f64,
    zoom: f64,
    canvas_size: Size,
) -> Point {
    let center = origin.to_screen(bounds);
    let local = drawing - canvas_size.half();
    rotate(local, rotation_deg).scale(zoom) + center
}

/// Screen position of a layer element's top-left corner before rotation.
#[must_use]
pub fn layer_top_left(origin: Point, bounds: Rect, zoom: f64, canvas_size: Size) -> Point {
    origin.to_screen(bounds) - canvas_size.scale(zoom).half()
}

/// Rotate `point` about the origin by `deg`, clockwise on a y-down screen.
#[must_use]
pub fn rotate(point: Point, deg: f64) -> Point {
    let (sin, cos) = deg.to_radians().sin_cos();
    Point::new(point.x * cos - point.y * sin, point.x * sin + point.y * cos)
}

/// Undo [`rotate`].
#[must_use]
pub fn inverse_rotate(point: Point, deg: f64) -> Point {
    let (sin, cos) = deg.to_radians().sin_cos();
    Point::new(point.x * cos + point.y * sin, -point.x * sin + point.y * cos)
}

/// Floor to two decimal places.
#[must_use]
pub fn floor_precision(value: f64) -> f64 {
    (value * CAPTURE_PRECISION).floor() / CAPTURE_PRECISION
}
