use crate::error::ConfigError;
use crate::math::Point2;
use crate::occluder::Channel;

/// Smallest padding density accepted; lower values are raised to this.
pub const MIN_DENSITY: usize = 6;

/// How gaps at the radius boundary are filled with arc points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingMode {
    /// Evenly stepped angles.
    #[default]
    Linear,
    /// Samples of a cubic Bezier quarter-circle per quadrant.
    Bezier,
}

/// Axis-aligned world rectangle, turned into four boundary occluders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point2,
    pub max: Point2,
}

impl Bounds {
    /// Creates bounds from the minimum and maximum corners.
    #[must_use]
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle containing all `points`, or `None` if empty.
    #[must_use]
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Point2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut b = Self::new(first, first);
        for p in iter {
            b.min.x = b.min.x.min(p.x);
            b.min.y = b.min.y.min(p.y);
            b.max.x = b.max.x.max(p.x);
            b.max.y = b.max.y.max(p.y);
        }
        Some(b)
    }

    /// Grows the rectangle by `margin` on every side.
    #[must_use]
    pub fn padded(self, margin: f64) -> Self {
        Self {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Extent along x.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along y.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Whether `p` is strictly inside.
    #[must_use]
    pub fn contains_strict(&self, p: &Point2) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }

    /// Corners in boundary order.
    #[must_use]
    pub fn corners(&self) -> [Point2; 4] {
        [
            self.min,
            Point2::new(self.max.x, self.min.y),
            self.max,
            Point2::new(self.min.x, self.max.y),
        ]
    }
}

/// Parameters of one visibility sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    /// Which blocking classification of each occluder applies.
    pub channel: Channel,
    /// Field-of-view width in degrees; 360 is unlimited.
    pub angle_deg: f64,
    /// Facing rotation in degrees; 0 faces +y.
    pub rotation_deg: f64,
    /// Limiting radius; `None` or `0` is unlimited.
    pub radius: Option<f64>,
    /// Arc padding points per half-turn.
    pub density: usize,
    pub padding: PaddingMode,
    /// World rectangle. Derived from the occluders when absent and the radius
    /// is unlimited.
    pub bounds: Option<Bounds>,
    /// Cap on processed sweep events and on generated padding points.
    pub max_iterations: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            channel: Channel::Sight,
            angle_deg: 360.0,
            rotation_deg: 0.0,
            radius: None,
            density: 12,
            padding: PaddingMode::Linear,
            bounds: None,
            max_iterations: 100_000,
        }
    }
}

impl SweepConfig {
    /// Sets the channel occluders are tested against.
    #[must_use]
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    /// Limits the view to `angle_deg` degrees facing `rotation_deg`.
    #[must_use]
    pub fn with_angle(mut self, angle_deg: f64, rotation_deg: f64) -> Self {
        self.angle_deg = angle_deg;
        self.rotation_deg = rotation_deg;
        self
    }

    /// Limits the view distance. Zero means unlimited.
    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Sets the arc padding density in points per half-turn.
    #[must_use]
    pub fn with_density(mut self, density: usize) -> Self {
        self.density = density;
        self
    }

    /// Sets how gaps on the radius circle are filled.
    #[must_use]
    pub fn with_padding(mut self, padding: PaddingMode) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the world rectangle.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Sets the iteration cap for the sweep and arc padding.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// The radius as used by the sweep: `None` when unlimited.
    #[must_use]
    pub fn effective_radius(&self) -> Option<f64> {
        self.radius.filter(|r| *r > 0.0)
    }

    /// Padding angle between arc points, in radians.
    #[must_use]
    pub fn padding_angle(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let density = self.density.max(MIN_DENSITY) as f64;
        std::f64::consts::PI / density
    }

    /// Checks the configuration for a sweep from `origin`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self, origin: &Point2) -> Result<(), ConfigError> {
        if !origin.x.is_finite() || !origin.y.is_finite() {
            return Err(ConfigError::NonFiniteOrigin {
                x: origin.x,
                y: origin.y,
            });
        }
        if let Some(r) = self.radius {
            if !r.is_finite() || r < 0.0 {
                return Err(ConfigError::InvalidRadius(r));
            }
        }
        if !self.angle_deg.is_finite() || self.angle_deg <= 0.0 || self.angle_deg > 360.0 {
            return Err(ConfigError::InvalidAngle(self.angle_deg));
        }
        if !self.rotation_deg.is_finite() {
            return Err(ConfigError::InvalidRotation(self.rotation_deg));
        }
        if let Some(b) = &self.bounds {
            let finite = [b.min.x, b.min.y, b.max.x, b.max.y]
                .iter()
                .all(|v| v.is_finite());
            if !finite || b.min.x >= b.max.x || b.min.y >= b.max.y {
                return Err(ConfigError::InvalidBounds {
                    min_x: b.min.x,
                    min_y: b.min.y,
                    max_x: b.max.x,
                    max_y: b.max.y,
                });
            }
            if self.effective_radius().is_none() && !b.contains_strict(origin) {
                return Err(ConfigError::OriginOutsideBounds {
                    x: origin.x,
                    y: origin.y,
                });
            }
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterationCap);
        }
        Ok(())
    }
}
