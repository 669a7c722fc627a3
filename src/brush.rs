//! Brushes, dab geometry and stroke interpolation.
//!
//! A brush turns a position and a size into a dab: one or more filled shapes
//! appended to a [`DabPath`]. Live drawing stamps one dab at a time through
//! [`Brush::mark`]; replay collects every dab of a stroke into a single path
//! and fills it once, so overlapping dabs never double up their alpha.

#[cfg(test)]
#[path = "brush_test.rs"]
mod brush_test;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

use crate::color::Color;
use crate::consts::{DEFAULT_BRUSH_SIZE, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use crate::geom::Point;
use crate::surface::{RasterContext, SurfaceError};

// ── Dab geometry ────────────────────────────────────────────────

/// One filled shape, in backing-pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DabShape {
    Circle { center: Point, radius: f64 },
    /// Closed polygon through the given vertices.
    Polygon(Vec<Point>),
}

/// A union of dab shapes filled with one color and the nonzero rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DabPath {
    shapes: Vec<DabShape>,
}

impl DabPath {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, shape: DabShape) {
        self.shapes.push(shape);
    }

    #[must_use]
    pub fn shapes(&self) -> &[DabShape] {
        &self.shapes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

// ── Brush capability ────────────────────────────────────────────

/// A drawing tool.
///
/// Sizes are in drawing units; the raster scale is applied by [`Brush::mark`]
/// and by replay, never by the brush state itself.
pub trait Brush {
    /// Stable identifier recorded on every stroke.
    fn id(&self) -> &str;

    fn size(&self) -> f64;

    /// Set the size; implementations clamp to `[MIN_BRUSH_SIZE, MAX_BRUSH_SIZE]`.
    fn set_size(&mut self, size: f64);

    fn color(&self) -> Color;

    fn set_color(&mut self, color: Color);

    /// Append the dab for `position` at `size` to `path`. Both are already scaled.
    fn create_dab(&self, position: Point, size: f64, path: &mut DabPath);

    /// Stamp one dab at a drawing-space `position` with the current size and color.
    ///
    /// # Errors
    ///
    /// Returns whatever the context's fill reports.
    fn mark(&self, ctx: &mut dyn RasterContext, position: Point) -> Result<(), SurfaceError> {
        let scale = ctx.scale();
        let mut path = DabPath::new();
        self.create_dab(position.scale(scale), self.size() * scale, &mut path);
        ctx.fill_path(&path, self.color())
    }
}

/// A brush shared between the toolbar side and the drawing layers.
pub type SharedBrush = Rc<RefCell<dyn Brush>>;

/// Wrap a brush for sharing.
pub fn share<B: Brush + 'static>(brush: B) -> SharedBrush {
    Rc::new(RefCell::new(brush))
}

/// Clamp a requested size into the supported range. NaN becomes the default size.
#[must_use]
pub fn clamp_size(size: f64) -> f64 {
    if size.is_nan() { DEFAULT_BRUSH_SIZE } else { size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE) }
}

// ── Built-in brushes ────────────────────────────────────────────

/// Filled circle whose diameter is the brush size.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundBrush {
    size: f64,
    color: Color,
}

impl RoundBrush {
    pub const ID: &'static str = "round";

    #[must_use]
    pub fn new(size: f64, color: Color) -> Self {
        Self { size: clamp_size(size), color }
    }
}

impl Default for RoundBrush {
    fn default() -> Self {
        Self::new(DEFAULT_BRUSH_SIZE, Color::BLACK)
    }
}

impl Brush for RoundBrush {
    fn id(&self) -> &str {
        Self::ID
    }

    fn size(&self) -> f64 {
        self.size
    }

    fn set_size(&mut self, size: f64) {
        self.size = clamp_size(size);
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn create_dab(&self, position: Point, size: f64, path: &mut DabPath) {
        round_dab(position, size, path);
    }
}

/// Axis-aligned square whose side is the brush size.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareBrush {
    size: f64,
    color: Color,
}

impl SquareBrush {
    pub const ID: &'static str = "square";

    #[must_use]
    pub fn new(size: f64, color: Color) -> Self {
        Self { size: clamp_size(size), color }
    }
}

impl Brush for SquareBrush {
    fn id(&self) -> &str {
        Self::ID
    }

    fn size(&self) -> f64 {
        self.size
    }

    fn set_size(&mut self, size: f64) {
        self.size = clamp_size(size);
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn create_dab(&self, position: Point, size: f64, path: &mut DabPath) {
        square_dab(position, size, path);
    }
}

fn round_dab(position: Point, size: f64, path: &mut DabPath) {
    path.push(DabShape::Circle { center: position, radius: size / 2.0 });
}

fn square_dab(position: Point, size: f64, path: &mut DabPath) {
    let h = size / 2.0;
    path.push(DabShape::Polygon(vec![
        Point::new(position.x - h, position.y - h),
        Point::new(position.x + h, position.y - h),
        Point::new(position.x + h, position.y + h),
        Point::new(position.x - h, position.y + h),
    ]));
}

/// Append a dab for a stroke recorded with `brush_id`.
///
/// The active brush draws its own strokes. Strokes made with another built-in
/// brush use that brush's shape; unknown ids fall back to a round dab.
pub fn create_dab_for(active: &dyn Brush, brush_id: &str, position: Point, size: f64, path: &mut DabPath) {
    if active.id() == brush_id {
        active.create_dab(position, size, path);
        return;
    }
    match brush_id {
        RoundBrush::ID => round_dab(position, size, path),
        SquareBrush::ID => square_dab(position, size, path),
        other => {
            warn!(brush_id = %other, "brush: unknown id, replaying as round");
            round_dab(position, size, path);
        }
    }
}

// ── Interpolation ───────────────────────────────────────────────

/// Distance between dabs for a brush of `size` drawing units.
#[must_use]
pub fn dab_spacing(size: f64, divisor: f64) -> f64 {
    size / divisor
}

/// Evenly spaced points from `start` to `end`, both included.
///
/// Yields `ceil(distance / spacing)` points starting at `start`, followed by
/// `end` itself. A zero-length segment or a non-positive spacing yields only
/// `end`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn interpolate(start: Point, end: Point, spacing: f64) -> Vec<Point> {
    let distance = start.distance_to(end);
    if distance <= 0.0 || !spacing.is_finite() || spacing <= 0.0 {
        return vec![end];
    }
    let count = (distance / spacing).ceil() as usize;
    let mut points = Vec::with_capacity(count + 1);
    for i in 0..count {
        let t = i as f64 / count as f64;
        points.push(Point::new(start.x + (end.x - start.x) * t, start.y + (end.y - start.y) * t));
    }
    points.push(end);
    points
}
