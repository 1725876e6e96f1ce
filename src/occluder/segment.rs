use crate::math::orientation::{orientation, Orientation};
use crate::math::{points_equal, Point2};

use super::blocking::{Blocking, Channel, ChannelBlocking, Facing};

slotmap::new_key_type! {
    /// Unique identifier for an occluder in the occluder store.
    pub struct OccluderId;
}

/// Where an occluder came from.
///
/// Every occluder shares one record layout; the sweep only looks at geometry
/// and blocking, the tag is carried for diagnostics and observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OccluderKind {
    /// Supplied by the host scene.
    #[default]
    Wall,
    /// Synthetic edge of the world bounds.
    Boundary,
    /// Piece of a host occluder clipped to the radius circle.
    RadiusFragment,
}

/// A line segment that may block visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct Occluder {
    pub a: Point2,
    pub b: Point2,
    pub blocking: ChannelBlocking,
    pub facing: Facing,
    /// Open occluders (e.g. open doors) never block.
    pub open: bool,
    pub kind: OccluderKind,
}

impl Occluder {
    /// Creates a closed, two-sided wall that blocks every channel normally.
    #[must_use]
    pub fn new(a: Point2, b: Point2) -> Self {
        Self {
            a,
            b,
            blocking: ChannelBlocking::default(),
            facing: Facing::Both,
            open: false,
            kind: OccluderKind::Wall,
        }
    }

    /// Creates a wall with `blocking` on every channel.
    #[must_use]
    pub fn with_blocking(a: Point2, b: Point2, blocking: Blocking) -> Self {
        Self {
            blocking: ChannelBlocking::uniform(blocking),
            ..Self::new(a, b)
        }
    }

    /// Creates a terrain wall on every channel.
    #[must_use]
    pub fn terrain(a: Point2, b: Point2) -> Self {
        Self::with_blocking(a, b, Blocking::Terrain)
    }

    /// Makes the occluder one-sided.
    #[must_use]
    pub fn facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    /// Marks the occluder open, like a door; open occluders never block.
    #[must_use]
    pub fn opened(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    /// Zero-length occluders are dropped before sweeping.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        points_equal(&self.a, &self.b)
    }

    /// Which side of `a -> b` the point `p` lies on.
    #[must_use]
    pub fn side_of(&self, p: &Point2) -> Orientation {
        orientation(&self.a, &self.b, p)
    }

    /// Whether this occluder blocks `channel` for a viewer standing at `origin`.
    #[must_use]
    pub fn blocks_from(&self, channel: Channel, origin: &Point2) -> bool {
        if self.open || !self.blocking.get(channel).blocks() {
            return false;
        }
        match self.facing {
            Facing::Both => true,
            Facing::Left => self.side_of(origin) == Orientation::CounterClockwise,
            Facing::Right => self.side_of(origin) == Orientation::Clockwise,
        }
    }
}
