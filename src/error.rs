use thiserror::Error;

use crate::occluder::OccluderId;

/// Top-level error type for the sightline crate.
#[derive(Debug, Error)]
pub enum SightlineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sweep(#[from] SweepError),
}

/// Errors raised while validating a sweep request, before any geometry runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("origin ({x}, {y}) is not finite")]
    NonFiniteOrigin { x: f64, y: f64 },

    #[error("radius {0} must be finite and non-negative")]
    InvalidRadius(f64),

    #[error("field-of-view angle {0} must be in (0, 360] degrees")]
    InvalidAngle(f64),

    #[error("rotation {0} must be finite")]
    InvalidRotation(f64),

    #[error("bounds must be finite with min < max, got ({min_x}, {min_y})..({max_x}, {max_y})")]
    InvalidBounds {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },

    #[error("origin ({x}, {y}) must lie strictly inside the bounds when the radius is unlimited")]
    OriginOutsideBounds { x: f64, y: f64 },

    #[error("iteration cap must be positive")]
    ZeroIterationCap,
}

/// Failures detected while a sweep is running.
///
/// These never escape as `Err`: the sweep stops and reports the error on the
/// partial [`VisibilityPolygon`](crate::sweep::VisibilityPolygon).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    #[error(
        "occluders {first:?} and {second:?} cross while both are active at sweep angle {angle}"
    )]
    CrossingOccluders {
        first: Option<OccluderId>,
        second: Option<OccluderId>,
        angle: f64,
    },

    #[error("{stage} exceeded the iteration cap of {limit}")]
    IterationLimit { stage: &'static str, limit: usize },
}

/// Convenience type alias for results using [`SightlineError`].
pub type Result<T> = std::result::Result<T, SightlineError>;
