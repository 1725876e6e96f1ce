use super::{Point2, Vector2, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.perp(d2);
    if cross.abs() < TOLERANCE * d1.norm() * d2.norm() {
        return None;
    }
    let diff = p2 - p1;
    let t = diff.perp(d2) / cross;
    let u = diff.perp(d1) / cross;
    Some((t, u))
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
/// Parallel (including collinear) segments report no intersection.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;
    let (t, u) = line_line_intersect_2d(a0, &da, b0, &db)?;

    // Use a small epsilon to include endpoints.
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t_clamped = t.clamp(0.0, 1.0);
        Some((a0 + da * t_clamped, t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Intersection of the ray `origin + t * dir` (`t >= 0`) with segment `a -> b`.
///
/// Returns the hit point and the ray parameter `t`.
#[must_use]
pub fn ray_segment_intersect(
    origin: &Point2,
    dir: &Vector2,
    a: &Point2,
    b: &Point2,
) -> Option<(Point2, f64)> {
    let seg = b - a;
    let (t, u) = line_line_intersect_2d(origin, dir, a, &seg)?;
    let eps = TOLERANCE * 100.0;
    if t < -eps || u < -eps || u > 1.0 + eps {
        return None;
    }
    // Evaluate on the segment so the hit lies exactly on the occluder's line.
    Some((a + seg * u.clamp(0.0, 1.0), t.max(0.0)))
}

/// Intersection of the infinite line `origin + t * dir` with the infinite line
/// through `a` and `b`, evaluated on `a -> b`.
///
/// Unlike [`ray_segment_intersect`] the segment parameter is not bounded; the
/// sweep uses this for occluders already known to straddle the ray, where
/// rounding can push the parameter a hair outside `[0, 1]`.
#[must_use]
pub fn ray_line_hit(origin: &Point2, dir: &Vector2, a: &Point2, b: &Point2) -> Option<Point2> {
    let seg = b - a;
    let (_, u) = line_line_intersect_2d(origin, dir, a, &seg)?;
    Some(a + seg * u.clamp(0.0, 1.0))
}

/// Parameters where the infinite line through `a` and `b` meets a circle.
///
/// Returns `(t0, t1)` with `t0 <= t1` (parameters along `a -> b`, unbounded),
/// or `None` when the line misses or only grazes the circle.
#[must_use]
pub fn line_circle_params(
    a: &Point2,
    b: &Point2,
    center: &Point2,
    radius: f64,
) -> Option<(f64, f64)> {
    let d = b - a;
    let seg_len_sq = d.norm_squared();
    if seg_len_sq < TOLERANCE * TOLERANCE || radius < TOLERANCE {
        return None;
    }

    // Substitute the parametric line into the circle equation:
    // |a + t*d - c|^2 = r^2
    let f = a - center;
    let qa = seg_len_sq;
    let qb = 2.0 * f.dot(&d);
    let qc = f.norm_squared() - radius * radius;
    let discriminant = qb * qb - 4.0 * qa * qc;
    if discriminant <= 0.0 {
        return None;
    }
    let disc_sqrt = discriminant.sqrt();
    Some(((-qb - disc_sqrt) / (2.0 * qa), (-qb + disc_sqrt) / (2.0 * qa)))
}
