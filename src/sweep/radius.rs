//! Clipping against the radius circle and arc padding along it.

use crate::error::SweepError;
use crate::math::arc_2d::{bezier_arc, linear_arc, linear_arc_count};
use crate::math::intersect_2d::line_circle_params;
use crate::math::{Point2, TOLERANCE};

use super::config::{PaddingMode, SweepConfig, MIN_DENSITY};

/// Outcome of clipping one segment to the disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clipped {
    /// Entirely inside; keep the segment as is.
    Inside,
    /// Crosses the circle; only this piece lies inside.
    Piece(Point2, Point2),
    /// Entirely outside.
    Outside,
}

/// Clips segment `a -> b` to the disk of `radius` around `center`.
///
/// A segment crossing the circle twice keeps its chord; the two outside
/// pieces are dropped.
#[must_use]
pub fn clip_to_disk(a: &Point2, b: &Point2, center: &Point2, radius: f64) -> Clipped {
    let Some((t0, t1)) = line_circle_params(a, b, center, radius) else {
        return Clipped::Outside;
    };
    let lo = t0.max(0.0);
    let hi = t1.min(1.0);
    if hi - lo <= TOLERANCE {
        return Clipped::Outside;
    }
    if lo <= 0.0 && hi >= 1.0 {
        return Clipped::Inside;
    }
    let d = b - a;
    Clipped::Piece(a + d * lo, a + d * hi)
}

/// Generates arc points along the radius circle for gaps in the frontier.
#[derive(Debug, Clone, Copy)]
pub struct ArcPadder {
    center: Point2,
    radius: f64,
    mode: PaddingMode,
    segment_angle: f64,
    points_per_quadrant: usize,
    limit: usize,
}

impl ArcPadder {
    /// Creates a padder for the circle of `radius` around `center`, with the
    /// padding mode, density and iteration cap of `config`.
    #[must_use]
    pub fn new(center: Point2, radius: f64, config: &SweepConfig) -> Self {
        Self {
            center,
            radius,
            mode: config.padding,
            segment_angle: config.padding_angle(),
            points_per_quadrant: config.density.max(MIN_DENSITY) / 2,
            limit: config.max_iterations,
        }
    }

    /// Radius of the circle being padded.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Interior arc points from absolute angle `start` through `sweep`
    /// radians of increasing angle.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::IterationLimit`] if the arc would need more
    /// points than the iteration cap allows.
    pub fn pad(&self, start: f64, sweep: f64) -> Result<Vec<Point2>, SweepError> {
        if sweep <= 0.0 {
            return Ok(Vec::new());
        }
        let expected = match self.mode {
            PaddingMode::Linear => linear_arc_count(sweep, self.segment_angle),
            PaddingMode::Bezier => self.points_per_quadrant.saturating_mul(5),
        };
        if expected > self.limit {
            return Err(SweepError::IterationLimit {
                stage: "arc padding",
                limit: self.limit,
            });
        }
        let points = match self.mode {
            PaddingMode::Linear => {
                linear_arc(&self.center, self.radius, start, sweep, self.segment_angle)
            }
            PaddingMode::Bezier => bezier_arc(
                &self.center,
                self.radius,
                start,
                sweep,
                self.points_per_quadrant,
            ),
        };
        Ok(points)
    }
}
