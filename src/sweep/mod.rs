pub mod angle;
pub mod config;
pub mod endpoint;
pub mod engine;
pub mod observer;
pub mod polygon;
pub mod potential_list;
pub mod prepare;
pub mod radius;
pub mod segment_order;

pub use angle::AngleLimiter;
pub use config::{Bounds, PaddingMode, SweepConfig};
pub use observer::{EndpointEvent, EndpointState, NoopObserver, RecordingObserver, SweepObserver};
pub use polygon::VisibilityPolygon;
pub use segment_order::{blocks_point, in_front_of, SegmentOrder};

use tracing::debug;

use crate::error::Result;
use crate::math::Point2;
use crate::occluder::OccluderStore;

use engine::SweepEngine;
use endpoint::sweep_events;
use prepare::prepare_segments;

/// Computes the region visible from one origin.
///
/// The occluder store is only borrowed, so one store can be swept from many
/// origins, including from several threads at once.
#[derive(Debug, Clone, Copy)]
pub struct VisibilitySweep {
    origin: Point2,
    config: SweepConfig,
}

impl VisibilitySweep {
    /// Creates a new sweep from `origin` with the given configuration.
    ///
    /// Nothing is validated until [`compute`](Self::compute).
    #[must_use]
    pub fn new(origin: Point2, config: SweepConfig) -> Self {
        Self { origin, config }
    }

    /// Returns the point the view is computed from.
    #[must_use]
    pub fn origin(&self) -> Point2 {
        self.origin
    }

    /// Returns the sweep configuration.
    #[must_use]
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Runs the sweep.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`](crate::error::ConfigError) for an invalid
    /// configuration. Failures during the sweep are not errors: they are
    /// reported on [`VisibilityPolygon::aborted`].
    pub fn compute(&self, store: &OccluderStore) -> Result<VisibilityPolygon> {
        self.compute_with_observer(store, &mut NoopObserver)
    }

    /// Runs the sweep, reporting progress to `observer`.
    ///
    /// # Errors
    ///
    /// Same as [`compute`](Self::compute).
    pub fn compute_with_observer<O: SweepObserver>(
        &self,
        store: &OccluderStore,
        observer: &mut O,
    ) -> Result<VisibilityPolygon> {
        self.config.validate(&self.origin)?;
        let limiter = AngleLimiter::new(self.config.angle_deg, self.config.rotation_deg);
        let segments = prepare_segments(store, &self.origin, &self.config, &limiter);
        if segments.is_empty() && self.config.effective_radius().is_none() {
            debug!(origin = ?self.origin, "nothing bounds the view");
            return Ok(VisibilityPolygon::default());
        }
        let events = sweep_events(&segments, &self.origin, &limiter);
        let engine = SweepEngine::new(self.origin, limiter, &segments, &self.config, observer);
        Ok(engine.run(&events))
    }
}
