//! Crate-level error type.
//!
//! Each module owns a narrow error enum; this type aggregates them so that
//! observer callbacks and the project/workspace plumbing can propagate any of
//! them with `?`.

use crate::color::ColorError;
use crate::config::ConfigError;
use crate::layer::LayerId;
use crate::surface::SurfaceError;

/// Any error the engine can surface to its host.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A user-supplied color string could not be parsed.
    #[error(transparent)]
    Color(#[from] ColorError),
    /// A raster surface could not be created or resized.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    /// Engine configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The layer is not part of the project.
    #[error("unknown layer: {0}")]
    UnknownLayer(LayerId),
    /// A subscriber tried to re-enter state that is mid-update.
    #[error("{0} is already borrowed by an event in progress")]
    Reentrant(&'static str),
}

/// Shorthand used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
