/// Circular-arc sampling for padding polygon boundaries.
///
/// Angles follow `atan2`; an arc runs from `start_angle` through increasing
/// angle for `sweep` radians. Returned points exclude both arc ends.
use std::f64::consts::{FRAC_PI_2, PI};

use super::{normalize_angle, point_at_angle, Point2};

/// Control-point offset of the cubic Bezier closest to a unit quarter circle.
///
/// See <https://spencermortensen.com/articles/bezier-circle/>.
const BEZIER_QUARTER_C: f64 = 0.551_915_024_494;

/// Angular slack when deciding whether a sample lies strictly inside an arc.
const ARC_ANGLE_EPS: f64 = 1e-9;

/// Number of interior points [`linear_arc`] produces for this sweep.
#[must_use]
pub fn linear_arc_count(sweep: f64, segment_angle: f64) -> usize {
    if sweep <= 0.0 || segment_angle <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (sweep / segment_angle).floor() as usize;
    n.saturating_sub(1)
}

/// Samples an arc by stepping the angle evenly.
///
/// The sweep is divided into `floor(sweep / segment_angle)` equal steps.
#[must_use]
pub fn linear_arc(
    center: &Point2,
    radius: f64,
    start_angle: f64,
    sweep: f64,
    segment_angle: f64,
) -> Vec<Point2> {
    let count = linear_arc_count(sweep, segment_angle);
    if count == 0 {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let delta = sweep / (count + 1) as f64;
    (1..=count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = start_angle + delta * i as f64;
            point_at_angle(center, angle, radius)
        })
        .collect()
}

/// Point on the unit cubic Bezier quarter circle from `(1, 0)` to `(0, 1)`.
#[must_use]
pub fn bezier_quarter_point(t: f64) -> (f64, f64) {
    let s = 1.0 - t;
    let c3 = 3.0 * BEZIER_QUARTER_C;
    let x = s * s * s + 3.0 * s * s * t + c3 * s * t * t;
    let y = c3 * s * s * t + 3.0 * s * t * t + t * t * t;
    (x, y)
}

/// Rotates a unit-circle point by `quarter_turns * pi/2` using exact swaps.
fn rotate_quarter_turns(p: (f64, f64), quarter_turns: usize) -> (f64, f64) {
    match quarter_turns % 4 {
        0 => p,
        1 => (-p.1, p.0),
        2 => (-p.0, -p.1),
        _ => (p.1, -p.0),
    }
}

/// Samples an arc with a piecewise cubic Bezier approximation.
///
/// Each quadrant of the circle is one cubic curve sampled at
/// `points_per_quadrant` evenly spaced parameters; samples outside the arc are
/// discarded. Output is ordered along the arc.
#[must_use]
pub fn bezier_arc(
    center: &Point2,
    radius: f64,
    start_angle: f64,
    sweep: f64,
    points_per_quadrant: usize,
) -> Vec<Point2> {
    if sweep <= ARC_ANGLE_EPS || points_per_quadrant == 0 || radius <= 0.0 {
        return Vec::new();
    }
    let start = normalize_angle(start_angle);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let first_quadrant = (start / FRAC_PI_2).floor() as usize;
    #[allow(clippy::cast_precision_loss)]
    let covered = start - first_quadrant as f64 * FRAC_PI_2 + sweep.min(2.0 * PI);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let quadrants = ((covered / FRAC_PI_2).ceil() as usize).clamp(1, 5);

    let mut samples: Vec<(f64, Point2)> = Vec::new();
    for q in first_quadrant..first_quadrant + quadrants {
        for k in 0..points_per_quadrant {
            #[allow(clippy::cast_precision_loss)]
            let t = k as f64 / points_per_quadrant as f64;
            let (ux, uy) = rotate_quarter_turns(bezier_quarter_point(t), q);
            let offset = normalize_angle(uy.atan2(ux) - start);
            if offset > ARC_ANGLE_EPS && offset < sweep - ARC_ANGLE_EPS {
                let p = Point2::new(center.x + ux * radius, center.y + uy * radius);
                samples.push((offset, p));
            }
        }
    }
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));
    samples.dedup_by(|a, b| (a.0 - b.0).abs() < ARC_ANGLE_EPS);
    samples.into_iter().map(|(_, p)| p).collect()
}
