//! Native raster backend on top of `tiny-skia`.
//!
//! Used by native hosts and by every rendering test. Style is recorded rather
//! than applied since there is no element to place.

#[cfg(test)]
#[path = "pixmap_test.rs"]
mod pixmap_test;

use tiny_skia::{FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Transform};

use super::{LayerStyle, RasterContext, Surface, SurfaceError};
use crate::brush::{DabPath, DabShape};
use crate::color::Color;

/// In-memory RGBA surface.
#[derive(Debug, Clone)]
pub struct PixmapSurface {
    pixmap: Pixmap,
    scale: f64,
    style: LayerStyle,
}

impl PixmapSurface {
    /// Allocate a transparent surface at scale 1.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidSize`] for a zero or oversized store.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        Ok(Self { pixmap: allocate(width, height)?, scale: 1.0, style: LayerStyle::default() })
    }

    /// Last style applied by the owning layer.
    #[must_use]
    pub fn style(&self) -> &LayerStyle {
        &self.style
    }

    /// Straight-alpha color of one backing pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color { red: c.red(), green: c.green(), blue: c.blue(), alpha: c.alpha() })
    }

    /// Raw premultiplied RGBA bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }
}

impl RasterContext for PixmapSurface {
    fn scale(&self) -> f64 {
        self.scale
    }

    fn fill_path(&mut self, path: &DabPath, color: Color) -> Result<(), SurfaceError> {
        let Some(path) = to_skia_path(path) else {
            return Ok(());
        };
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.red, color.green, color.blue, color.alpha);
        paint.anti_alias = true;
        self.pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        Ok(())
    }
}

impl Surface for PixmapSurface {
    type Snapshot = Pixmap;

    fn backing_size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn resize(&mut self, width: u32, height: u32, scale: f64) -> Result<(), SurfaceError> {
        self.pixmap = allocate(width, height)?;
        self.scale = scale;
        Ok(())
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn fill_background(&mut self, color: Color) -> Result<(), SurfaceError> {
        self.pixmap.fill(tiny_skia::Color::from_rgba8(color.red, color.green, color.blue, color.alpha));
        Ok(())
    }

    fn snapshot(&self) -> Result<Pixmap, SurfaceError> {
        Ok(self.pixmap.clone())
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw_snapshot(&mut self, snapshot: &Pixmap) -> Result<(), SurfaceError> {
        let sx = self.pixmap.width() as f32 / snapshot.width() as f32;
        let sy = self.pixmap.height() as f32 / snapshot.height() as f32;
        let paint = PixmapPaint { quality: FilterQuality::Bilinear, ..PixmapPaint::default() };
        self.pixmap.draw_pixmap(0, 0, snapshot.as_ref(), &paint, Transform::from_scale(sx, sy), None);
        Ok(())
    }

    fn apply_style(&mut self, style: &LayerStyle) -> Result<(), SurfaceError> {
        self.style = *style;
        Ok(())
    }
}

fn allocate(width: u32, height: u32) -> Result<Pixmap, SurfaceError> {
    Pixmap::new(width, height)
        .ok_or(SurfaceError::InvalidSize { width: f64::from(width), height: f64::from(height) })
}

#[allow(clippy::cast_possible_truncation)]
fn to_skia_path(path: &DabPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for shape in path.shapes() {
        match shape {
            DabShape::Circle { center, radius } => {
                pb.push_circle(center.x as f32, center.y as f32, *radius as f32);
            }
            DabShape::Polygon(points) => {
                let mut points = points.iter();
                let Some(first) = points.next() else {
                    continue;
                };
                pb.move_to(first.x as f32, first.y as f32);
                for p in points {
                    pb.line_to(p.x as f32, p.y as f32);
                }
                pb.close();
            }
        }
    }
    pb.finish()
}
