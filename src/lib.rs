//! Infinite-canvas workspace and stroke replay engine.
//!
//! A workspace viewport holds a stack of drawing layers the size of a fixed
//! project canvas. The user pans (space + drag), zooms (ctrl + wheel) and
//! rotates (`[` / `]`) the whole stack, and paints on any layer with a shared
//! brush. Layers record every stroke as vector dab positions, so after a zoom
//! settles they reallocate their raster at the new resolution and replay the
//! strokes sharply instead of scaling pixels.
//!
//! The engine core is plain Rust and renders through the [`surface::Surface`]
//! trait; [`surface::pixmap::PixmapSurface`] is the native raster used in
//! tests. With the `web` feature, [`web`] adds a `<canvas>` surface and the
//! DOM wiring for the browser.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`workspace`] | Pan / zoom / rotation gestures and [`workspace::WorkspaceEvent`]s |
//! | [`layer`] | Drawing layers: view mirroring, stroke capture, replay |
//! | [`project`] | Canvas size, shared brush and the ordered layer list |
//! | [`brush`] | Brush trait, round and square brushes, dab interpolation |
//! | [`stroke`] | Recorded strokes and the per-layer stroke log |
//! | [`transform`] | Screen ↔ cartesian ↔ drawing-space mapping for a [`transform::View`] |
//! | [`surface`] | Raster surface trait, layer element style, tiny-skia backend |
//! | [`status`] | Zoom / origin / rotation readout |
//! | [`observe`] | Single-threaded publish/subscribe |
//! | [`input`] | Keys, modifiers, wheel deltas and cursors |
//! | [`color`] | Hex and HSL colors |
//! | [`geom`] | Points, sizes and rectangles |
//! | [`config`] | Engine configuration from env or JSON |
//! | [`consts`] | Shared numeric constants (zoom limits, steps, brush sizes) |
//! | [`error`] | Crate error type |

pub mod brush;
pub mod color;
pub mod config;
pub mod consts;
pub mod error;
pub mod geom;
pub mod input;
pub mod layer;
pub mod observe;
pub mod project;
pub mod status;
pub mod stroke;
pub mod surface;
pub mod transform;
#[cfg(feature = "web")]
pub mod web;
pub mod workspace;

pub use error::{Error, Result};
