use crate::error::SweepError;
use crate::math::polygon_2d::{point_in_polygon, signed_area_2d};
use crate::math::Point2;

/// The visible region as a closed vertex sequence.
///
/// The last vertex connects back to the first. An angle-limited polygon
/// starts and ends with the origin. An empty polygon means nothing bounds
/// the view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityPolygon {
    pub points: Vec<Point2>,
    /// Set when the sweep stopped early; `points` then holds the vertices
    /// produced up to that moment.
    pub aborted: Option<SweepError>,
}

impl VisibilityPolygon {
    /// Returns `true` when the sweep ran to the end.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Coordinates as `[x0, y0, x1, y1, ...]`.
    #[must_use]
    pub fn to_flat(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Unsigned enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area_2d(&self.points).abs()
    }

    /// Whether `p` lies inside the visible region.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        point_in_polygon(p, &self.points)
    }
}
