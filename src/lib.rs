pub mod error;
pub mod math;
pub mod occluder;
pub mod sweep;

pub use error::{ConfigError, Result, SightlineError, SweepError};
pub use math::Point2;
pub use occluder::{Blocking, Channel, Facing, Occluder, OccluderId, OccluderStore};
pub use sweep::{SweepConfig, VisibilityPolygon, VisibilitySweep};
