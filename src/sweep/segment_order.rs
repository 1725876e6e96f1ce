//! The "in front of" relation between two occluders as seen from the origin.
//!
//! The relation is only meaningful for segments that straddle a common sweep
//! ray; it is not a global order. Genuine interior crossings are reported as
//! [`SegmentOrder::Crosses`] and never adjudicated here.

use crate::math::orientation::{orientation, Orientation};
use crate::math::{points_equal, Point2};

/// Distance a shared endpoint is moved along its own segment before the side
/// tests run.
const NUDGE_DISTANCE: f64 = 1e-4;

/// Result of comparing two segments from the origin's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentOrder {
    /// The first segment hides the second.
    InFront,
    /// The second segment hides the first.
    Behind,
    /// The segments intersect in their interiors.
    Crosses,
}

impl SegmentOrder {
    /// The order seen from the other segment.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::InFront => Self::Behind,
            Self::Behind => Self::InFront,
            Self::Crosses => Self::Crosses,
        }
    }
}

/// Moves `p` toward `toward` by [`NUDGE_DISTANCE`], at most halfway.
fn nudge(p: &Point2, toward: &Point2) -> Point2 {
    let d = toward - p;
    let len = d.norm();
    if len == 0.0 {
        return *p;
    }
    p + d * (NUDGE_DISTANCE / len).min(0.5)
}

/// Test points for `seg`, with any endpoint shared with `reference` nudged
/// along `seg` away from the joint.
fn test_points(seg: &[Point2; 2], reference: &[Point2; 2]) -> [Point2; 2] {
    let shared = |p: &Point2| reference.iter().any(|r| points_equal(p, r));
    let [a, b] = *seg;
    match (shared(&a), shared(&b)) {
        (true, false) => [nudge(&a, &b), b],
        (false, true) => [a, nudge(&b, &a)],
        _ => [a, b],
    }
}

/// Where the test points of `other` fall relative to the line of `reference`,
/// measured against the side the origin is on.
enum SideClass {
    /// Every non-collinear test point is across the line from the origin.
    Far,
    /// Every non-collinear test point is on the origin's side.
    Near,
    /// Test points on both sides, or the origin is on the line.
    Split,
    /// Every test point is on the line.
    OnLine,
}

fn classify(reference: &[Point2; 2], other: &[Point2; 2], origin: &Point2) -> SideClass {
    let origin_side = orientation(&reference[0], &reference[1], origin);
    if origin_side == Orientation::Collinear {
        return SideClass::Split;
    }
    let pts = test_points(other, reference);
    let mut far = false;
    let mut near = false;
    for p in &pts {
        let side = orientation(&reference[0], &reference[1], p);
        if side == Orientation::Collinear {
            continue;
        }
        if side == origin_side {
            near = true;
        } else {
            far = true;
        }
    }
    match (far, near) {
        (true, false) => SideClass::Far,
        (false, true) => SideClass::Near,
        (false, false) => SideClass::OnLine,
        (true, true) => SideClass::Split,
    }
}

/// Decides whether `s1` is in front of `s2` as seen from `origin`.
///
/// Both segments are expected to straddle a common ray from `origin`.
#[must_use]
pub fn in_front_of(s1: &[Point2; 2], s2: &[Point2; 2], origin: &Point2) -> SegmentOrder {
    match classify(s1, s2, origin) {
        SideClass::Far => return SegmentOrder::InFront,
        SideClass::Near => return SegmentOrder::Behind,
        SideClass::OnLine => return collinear_order(s1, s2, origin),
        SideClass::Split => {}
    }
    match classify(s2, s1, origin) {
        SideClass::Far => SegmentOrder::Behind,
        SideClass::Near => SegmentOrder::InFront,
        SideClass::OnLine => collinear_order(s1, s2, origin),
        SideClass::Split => SegmentOrder::Crosses,
    }
}

/// Orders two segments lying on one line by their nearest endpoints.
fn collinear_order(s1: &[Point2; 2], s2: &[Point2; 2], origin: &Point2) -> SegmentOrder {
    let nearest = |s: &[Point2; 2]| {
        (s[0] - origin)
            .norm_squared()
            .min((s[1] - origin).norm_squared())
    };
    if nearest(s1) <= nearest(s2) {
        SegmentOrder::InFront
    } else {
        SegmentOrder::Behind
    }
}

/// Whether `seg` hides `point` from `origin`.
///
/// True when `point` lies strictly across the segment's line from the origin
/// and inside the segment's angular span.
#[must_use]
pub fn blocks_point(seg: &[Point2; 2], point: &Point2, origin: &Point2) -> bool {
    let [a, b] = seg;
    let turn = orientation(origin, a, b);
    if turn == Orientation::Collinear {
        return false;
    }
    let within = |from: &Point2, to: &Point2| {
        let o = orientation(origin, from, to);
        o == turn || o == Orientation::Collinear
    };
    if !within(a, point) || !within(point, b) {
        return false;
    }
    let origin_side = orientation(a, b, origin);
    let point_side = orientation(a, b, point);
    point_side != Orientation::Collinear && point_side != origin_side
}
