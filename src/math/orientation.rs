//! Orientation (turn direction) of three points.
//!
//! Every side-of-line decision in the sweep goes through [`orientation`]. The
//! fast floating-point determinant is trusted only when it clears a forward
//! error bound; near zero the exact adaptive predicate from `robust` decides,
//! so shared endpoints never produce spurious crossings.

use robust::Coord;

use super::Point2;

/// Relative error bound of the fast determinant (Shewchuk's `ccwerrboundA`).
const CCW_ERR_BOUND: f64 = (3.0 + 16.0 * f64::EPSILON) * f64::EPSILON;

/// Turn direction of `p1 -> p2 -> p3` in a y-up frame.
///
/// In screen coordinates (y down) the names swap visually: a sweep that
/// increases `atan2` turns `CounterClockwise` here and clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

/// Twice the signed area of the triangle `p1, p2, p3`.
///
/// Positive when counter-clockwise, negative when clockwise, zero when
/// collinear. The sign is exact.
#[must_use]
pub fn orient2d(p1: &Point2, p2: &Point2, p3: &Point2) -> f64 {
    let det_left = (p1.x - p3.x) * (p2.y - p3.y);
    let det_right = (p1.y - p3.y) * (p2.x - p3.x);
    let det = det_left - det_right;

    let bound = CCW_ERR_BOUND * (det_left.abs() + det_right.abs());
    if det.abs() > bound {
        return det;
    }

    robust::orient2d(
        Coord { x: p1.x, y: p1.y },
        Coord { x: p2.x, y: p2.y },
        Coord { x: p3.x, y: p3.y },
    )
}

/// Classifies the sign of [`orient2d`].
#[must_use]
pub fn orientation(p1: &Point2, p2: &Point2, p3: &Point2) -> Orientation {
    let det = orient2d(p1, p2, p3);
    if det > 0.0 {
        Orientation::CounterClockwise
    } else if det < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}
