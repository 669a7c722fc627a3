//! Engine configuration.
//!
//! Every knob has a default from [`crate::consts`]. Native hosts can override
//! them with `EASEL_*` environment variables; browser hosts pass a JSON object
//! instead. Unknown or unparsable environment values fall back to the default
//! with a warning, while JSON input is strict.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::Color;
use crate::consts::{
    DAB_SPACING_DIVISOR, ROTATION_STEP_DEG, ZOOM_MAX, ZOOM_MIN, ZOOM_SETTLE_MS, ZOOM_WHEEL_SENSITIVITY,
};

/// Error returned by [`EngineConfig::validate`] and [`EngineConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON input could not be deserialized.
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    /// `zoom_min` must be positive and not greater than `zoom_max`.
    #[error("invalid zoom range: min {min}, max {max}")]
    InvalidZoomRange { min: f64, max: f64 },
    /// A field that must be strictly positive was not.
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

/// Tunable engine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lower zoom clamp.
    pub zoom_min: f64,
    /// Upper zoom clamp.
    pub zoom_max: f64,
    /// Zoom change per pixel of ctrl-wheel delta.
    pub wheel_sensitivity: f64,
    /// Milliseconds without a qualifying wheel tick before a zoom session ends.
    pub zoom_settle_ms: f64,
    /// Degrees per bracket key press.
    pub rotation_step_deg: f64,
    /// Dab spacing is `brush size / dab_spacing_divisor`.
    pub dab_spacing_divisor: f64,
    /// Fill drawn beneath every layer's strokes.
    pub background: Color,
    /// Backing-store pixels per CSS pixel.
    pub device_pixel_ratio: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            wheel_sensitivity: ZOOM_WHEEL_SENSITIVITY,
            zoom_settle_ms: ZOOM_SETTLE_MS,
            rotation_step_deg: ROTATION_STEP_DEG,
            dab_spacing_divisor: DAB_SPACING_DIVISOR,
            background: Color::WHITE,
            device_pixel_ratio: 1.0,
        }
    }
}

impl EngineConfig {
    /// Read overrides from `EASEL_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| if let Ok(value) = std::env::var(key) { Some(value) } else { None })
    }

    /// Build a config from an arbitrary key lookup (environment, query string, test map).
    ///
    /// A combination that fails [`EngineConfig::validate`] is discarded as a
    /// whole and the defaults are returned.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let config = Self {
            zoom_min: env_parse(&lookup, "EASEL_ZOOM_MIN", d.zoom_min),
            zoom_max: env_parse(&lookup, "EASEL_ZOOM_MAX", d.zoom_max),
            wheel_sensitivity: env_parse(&lookup, "EASEL_WHEEL_SENSITIVITY", d.wheel_sensitivity),
            zoom_settle_ms: env_parse(&lookup, "EASEL_ZOOM_SETTLE_MS", d.zoom_settle_ms),
            rotation_step_deg: env_parse(&lookup, "EASEL_ROTATION_STEP_DEG", d.rotation_step_deg),
            dab_spacing_divisor: env_parse(&lookup, "EASEL_DAB_SPACING_DIVISOR", d.dab_spacing_divisor),
            background: env_parse(&lookup, "EASEL_BACKGROUND", d.background),
            device_pixel_ratio: env_parse(&lookup, "EASEL_DEVICE_PIXEL_RATIO", d.device_pixel_ratio),
        };
        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(error = %e, "config: invalid overrides, using defaults");
                d
            }
        }
    }

    /// Parse a JSON object; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input and the
    /// [`EngineConfig::validate`] errors for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidZoomRange`] or [`ConfigError::NonPositive`].
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.zoom_min > 0.0 && self.zoom_min <= self.zoom_max) {
            return Err(ConfigError::InvalidZoomRange { min: self.zoom_min, max: self.zoom_max });
        }
        for (field, value) in [
            ("wheel_sensitivity", self.wheel_sensitivity),
            ("zoom_settle_ms", self.zoom_settle_ms),
            ("rotation_step_deg", self.rotation_step_deg),
            ("dab_spacing_divisor", self.dab_spacing_divisor),
            ("device_pixel_ratio", self.device_pixel_ratio),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        Ok(())
    }
}

fn env_parse<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(%key, value = %raw, "config: unparsable value, using default");
            default
        }
    }
}
