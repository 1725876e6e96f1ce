use std::f64::consts::{PI, TAU};

use crate::math::{normalize_angle, Point2, Vector2};

/// Relative angles this close to a full turn are folded onto the start ray.
pub const ANGLE_EPS: f64 = 1e-12;

/// The angular window a sweep covers.
///
/// Absolute angles are `atan2` values. Inside the sweep every angle is
/// relative to the window start, in `[0, 2pi)`, increasing with `atan2`
/// (clockwise on a y-down screen).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleLimiter {
    a_min: f64,
    span: f64,
    limited: bool,
}

impl AngleLimiter {
    /// Builds the window for a field of view of `angle_deg` facing
    /// `rotation_deg`. A view of 360 degrees or more is unlimited and starts
    /// due west.
    #[must_use]
    pub fn new(angle_deg: f64, rotation_deg: f64) -> Self {
        if angle_deg >= 360.0 {
            return Self::unlimited();
        }
        let a_min = (rotation_deg + 90.0 - angle_deg / 2.0).to_radians();
        Self {
            a_min: normalize_angle(a_min + PI) - PI,
            span: angle_deg.to_radians(),
            limited: true,
        }
    }

    /// A full turn starting due west.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            a_min: -PI,
            span: TAU,
            limited: false,
        }
    }

    /// Returns `true` when the window is narrower than a full turn.
    #[must_use]
    pub fn is_limited(&self) -> bool {
        self.limited
    }

    /// Absolute start angle of the window.
    #[must_use]
    pub fn a_min(&self) -> f64 {
        self.a_min
    }

    /// Absolute end angle of the window.
    #[must_use]
    pub fn a_max(&self) -> f64 {
        self.a_min + self.span
    }

    /// Angular width of the window in radians.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.span
    }

    /// Maps an absolute angle to the sweep's relative domain.
    #[must_use]
    pub fn normalize(&self, angle: f64) -> f64 {
        let rel = normalize_angle(angle - self.a_min);
        if rel > TAU - ANGLE_EPS {
            0.0
        } else {
            rel
        }
    }

    /// Relative angle of `p` as seen from `origin`.
    #[must_use]
    pub fn angle_of(&self, origin: &Point2, p: &Point2) -> f64 {
        self.normalize((p.y - origin.y).atan2(p.x - origin.x))
    }

    /// Absolute angle of a relative one.
    #[must_use]
    pub fn absolute(&self, rel: f64) -> f64 {
        self.a_min + rel
    }

    /// Whether a relative angle lies inside the window.
    #[must_use]
    pub fn contains(&self, rel: f64) -> bool {
        !self.limited || rel <= self.span + ANGLE_EPS
    }

    /// Whether a relative angle sits on the closing boundary ray.
    #[must_use]
    pub fn is_at_end(&self, rel: f64) -> bool {
        self.limited && rel >= self.span - ANGLE_EPS
    }

    /// Unit direction of the ray at a relative angle.
    #[must_use]
    pub fn direction(&self, rel: f64) -> Vector2 {
        let a = self.absolute(rel);
        Vector2::new(a.cos(), a.sin())
    }

    /// Directions of the opening and closing boundary rays, if limited.
    #[must_use]
    pub fn boundary_rays(&self) -> Option<(Vector2, Vector2)> {
        self.limited
            .then(|| (self.direction(0.0), self.direction(self.span)))
    }

    /// Drops items whose relative angle falls outside the window.
    pub fn trim<T>(&self, items: &mut Vec<T>, angle: impl Fn(&T) -> f64) {
        if self.limited {
            items.retain(|item| self.contains(angle(item)));
        }
    }
}

impl Default for AngleLimiter {
    fn default() -> Self {
        Self::unlimited()
    }
}
