//! Crate-wide error type.

use thiserror::Error;

use crate::core::direction::DirectionError;
use crate::geometry::GeometryError;
use crate::input::ActionConfigError;

/// Any error raised by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Geometry contract violation
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Invalid or unusable direction
    #[error(transparent)]
    Direction(#[from] DirectionError),

    /// Inconsistent action configuration
    #[error(transparent)]
    ActionConfig(#[from] ActionConfigError),
}

/// Result alias using the crate-wide [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
