//! Raster surface abstraction.
//!
//! A [`Surface`] is the backing store of one layer: a pixel buffer, the
//! element that shows it, and a uniform scale from drawing units to backing
//! pixels. All geometry handed to a surface is already in backing pixels;
//! the surface never applies a transform of its own.
//!
//! Two backends exist: [`pixmap::PixmapSurface`] (tiny-skia, native and
//! tests) and `crate::web::CanvasSurface` (an `HtmlCanvasElement`, `web` feature).

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

pub mod pixmap;

use crate::brush::DabPath;
use crate::color::Color;
use crate::geom::Size;

const PIXEL_EPSILON: f64 = 1e-6;

/// Error returned by surface operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// The requested backing store cannot be allocated.
    #[error("invalid backing size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    /// The host returned no 2D context for the canvas.
    #[error("2d rendering context unavailable")]
    MissingContext,
    /// A host canvas call failed.
    #[error("canvas call failed: {0}")]
    Host(String),
}

/// How the host should sample the layer element when it is scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageRendering {
    #[default]
    Auto,
    Pixelated,
}

impl ImageRendering {
    /// CSS `image-rendering` value.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Pixelated => "pixelated",
        }
    }
}

/// Visual placement of a layer's element inside the workspace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    /// Left edge in workspace pixels.
    pub left: f64,
    /// Top edge in workspace pixels.
    pub top: f64,
    /// Displayed width (canvas width × zoom).
    pub width: f64,
    /// Displayed height (canvas height × zoom).
    pub height: f64,
    /// Visual rotation in degrees about the element center.
    pub rotation: f64,
    /// Whether the element receives pointer events.
    pub pointer_events: bool,
    pub image_rendering: ImageRendering,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            pointer_events: true,
            image_rendering: ImageRendering::Auto,
        }
    }
}

impl LayerStyle {
    /// CSS `transform` value.
    #[must_use]
    pub fn transform_css(&self) -> String {
        format!("rotate({}deg)", self.rotation)
    }

    /// CSS `pointer-events` value.
    #[must_use]
    pub fn pointer_events_css(&self) -> &'static str {
        if self.pointer_events { "auto" } else { "none" }
    }
}

/// The part of a surface a brush needs to stamp dabs.
pub trait RasterContext {
    /// Backing pixels per drawing unit.
    fn scale(&self) -> f64;

    /// Fill every shape of `path` as one nonzero-winding path.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Host`] if the host rejects the path.
    fn fill_path(&mut self, path: &DabPath, color: Color) -> Result<(), SurfaceError>;
}

/// A layer's backing store.
pub trait Surface: RasterContext {
    /// Off-screen copy of the current pixels.
    type Snapshot;

    /// Current backing-store dimensions in pixels.
    fn backing_size(&self) -> (u32, u32);

    /// Reallocate the backing store. Contents are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidSize`] if the store cannot be allocated.
    fn resize(&mut self, width: u32, height: u32, scale: f64) -> Result<(), SurfaceError>;

    /// Make every pixel transparent.
    fn clear(&mut self);

    /// Fill the whole backing store with `color`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Host`] if the host call fails.
    fn fill_background(&mut self, color: Color) -> Result<(), SurfaceError>;

    /// Copy the current pixels at their native resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy cannot be allocated.
    fn snapshot(&self) -> Result<Self::Snapshot, SurfaceError>;

    /// Draw `snapshot` stretched over the whole backing store.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Host`] if the host call fails.
    fn draw_snapshot(&mut self, snapshot: &Self::Snapshot) -> Result<(), SurfaceError>;

    /// Apply placement to the element that shows this surface.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Host`] if the host rejects a style property.
    fn apply_style(&mut self, style: &LayerStyle) -> Result<(), SurfaceError>;
}

/// Backing-store dimensions for `size` drawing units at `scale` pixels per unit.
///
/// # Errors
///
/// Returns [`SurfaceError::InvalidSize`] for empty, non-finite or oversized results.
pub fn backing_dimensions(size: Size, scale: f64) -> Result<(u32, u32), SurfaceError> {
    let scaled = size.scale(scale);
    let invalid = || SurfaceError::InvalidSize { width: scaled.width, height: scaled.height };
    let width = to_pixels(scaled.width).ok_or_else(invalid)?;
    let height = to_pixels(scaled.height).ok_or_else(invalid)?;
    Ok((width, height))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_pixels(value: f64) -> Option<u32> {
    // Absorb float noise such as 800 * 1.1 = 880.0000000000001.
    let ceiled = (value - PIXEL_EPSILON).ceil();
    if ceiled.is_finite() && ceiled >= 1.0 && ceiled <= f64::from(u32::MAX) {
        Some(ceiled as u32)
    } else {
        None
    }
}
