//! Shared numeric constants for the engine.
//!
//! These are the defaults behind [`crate::config::EngineConfig`]; hosts that
//! need different values override them through the config rather than here.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest allowed workspace zoom factor.
pub const ZOOM_MIN: f64 = 0.3;

/// Largest allowed workspace zoom factor.
pub const ZOOM_MAX: f64 = 8.0;

/// Zoom change per pixel of ctrl-wheel delta. A `deltaY` of -100 zooms in by 0.1.
pub const ZOOM_WHEEL_SENSITIVITY: f64 = 0.001;

/// Quiescence window after the last qualifying wheel tick before a zoom session ends.
pub const ZOOM_SETTLE_MS: f64 = 200.0;

/// Zoom factor at and above which layers switch to nearest-neighbour sampling.
pub const PIXELATED_ZOOM_THRESHOLD: f64 = 2.0;

// ── Rotation ────────────────────────────────────────────────────

/// Degrees added or removed by one bracket key press.
pub const ROTATION_STEP_DEG: f64 = 15.0;

/// Full turn in degrees.
pub const FULL_TURN_DEG: f64 = 360.0;

// ── Brush and capture ───────────────────────────────────────────

/// Dab spacing is `brush size / DAB_SPACING_DIVISOR`.
pub const DAB_SPACING_DIVISOR: f64 = 5.0;

/// Captured drawing coordinates are floored to `1 / CAPTURE_PRECISION`.
pub const CAPTURE_PRECISION: f64 = 100.0;

/// Smallest brush diameter in drawing units.
pub const MIN_BRUSH_SIZE: f64 = 1.0;

/// Largest brush diameter in drawing units.
pub const MAX_BRUSH_SIZE: f64 = 500.0;

/// Diameter of the default brush in drawing units.
pub const DEFAULT_BRUSH_SIZE: f64 = 10.0;

// ── Layers ──────────────────────────────────────────────────────

/// Default project canvas width in drawing units.
pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;

/// Default project canvas height in drawing units.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 500.0;
