pub mod arc_2d;
pub mod intersect_2d;
pub mod orientation;
pub mod polygon_2d;

use std::f64::consts::PI;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global tolerance for determinant and parameter comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Two points closer than this are the same point.
///
/// Coarser than [`TOLERANCE`] so that coordinates produced by intersection
/// arithmetic still merge with the input endpoints they should coincide with.
pub const POINT_TOLERANCE: f64 = 1e-7;

/// Epsilon-tolerant point equality.
#[must_use]
pub fn points_equal(a: &Point2, b: &Point2) -> bool {
    (a - b).norm_squared() < POINT_TOLERANCE * POINT_TOLERANCE
}

/// Normalizes an angle to [0, 2pi).
#[must_use]
pub fn normalize_angle(a: f64) -> f64 {
    let two_pi = 2.0 * PI;
    let r = a.rem_euclid(two_pi);
    // rem_euclid can round up to exactly 2pi for tiny negative inputs.
    if r >= two_pi {
        0.0
    } else {
        r
    }
}

/// Angle of `p` as seen from `origin`, in (-pi, pi].
#[must_use]
pub fn angle_from(origin: &Point2, p: &Point2) -> f64 {
    (p.y - origin.y).atan2(p.x - origin.x)
}

/// Point at `distance` from `origin` in direction `angle`.
#[must_use]
pub fn point_at_angle(origin: &Point2, angle: f64, distance: f64) -> Point2 {
    Point2::new(
        origin.x + distance * angle.cos(),
        origin.y + distance * angle.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalize_wraps_negative() {
        assert_relative_eq!(normalize_angle(-PI / 2.0), 1.5 * PI);
        assert_relative_eq!(normalize_angle(2.0 * PI), 0.0);
        assert!(normalize_angle(-1e-300) < 2.0 * PI);
    }

    #[test]
    fn points_equal_within_tolerance() {
        let a = Point2::new(10.0, 10.0);
        assert!(points_equal(&a, &Point2::new(10.0 + 1e-9, 10.0)));
        assert!(!points_equal(&a, &Point2::new(10.001, 10.0)));
    }

    #[test]
    fn point_at_angle_round_trips() {
        let o = Point2::new(1.0, 2.0);
        let p = point_at_angle(&o, 0.75, 5.0);
        assert_relative_eq!(angle_from(&o, &p), 0.75, epsilon = 1e-12);
        assert_relative_eq!((p - o).norm(), 5.0, epsilon = 1e-12);
    }
}
