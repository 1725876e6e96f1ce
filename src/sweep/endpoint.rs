//! The endpoint index: merged points, their angles, and incident segments.

use std::cmp::Ordering;
use std::collections::HashMap;

use slotmap::SlotMap;
use tracing::debug;

use crate::math::orientation::{orientation, Orientation};
use crate::math::{Point2, POINT_TOLERANCE};

use super::angle::AngleLimiter;
use super::prepare::{SegmentId, SweepSegment};
use super::segment_order::{in_front_of, SegmentOrder};

/// Snaps nearly-coincident points onto one canonical coordinate.
///
/// Points are bucketed on a grid of [`POINT_TOLERANCE`] cells; a lookup
/// checks the surrounding cells, so any two points closer than the tolerance
/// resolve to whichever of them was seen first.
#[derive(Debug, Default)]
pub struct PointMerger {
    points: Vec<Point2>,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl PointMerger {
    /// Creates an empty merger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell(p: &Point2) -> (i64, i64) {
        (
            (p.x / POINT_TOLERANCE).floor() as i64,
            (p.y / POINT_TOLERANCE).floor() as i64,
        )
    }

    /// Returns the canonical coordinate for `p`, registering it if new.
    pub fn canonical(&mut self, p: Point2) -> Point2 {
        let (cx, cy) = Self::cell(&p);
        let tol_sq = POINT_TOLERANCE * POINT_TOLERANCE;
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(indices) = self.cells.get(&(cx + dx, cy + dy)) {
                    for &i in indices {
                        if (self.points[i] - p).norm_squared() < tol_sq {
                            return self.points[i];
                        }
                    }
                }
            }
        }
        self.cells.entry((cx, cy)).or_default().push(self.points.len());
        self.points.push(p);
        p
    }

    /// Number of distinct points seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One sweep event: a merged point and every segment starting or ending on
/// its ray.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub point: Point2,
    /// Relative sweep angle in `[0, 2pi)`.
    pub angle: f64,
    pub incident: Vec<SegmentId>,
    /// Further points exactly co-angular with `point`, folded into this event.
    pub collapsed: Vec<Point2>,
}

impl Endpoint {
    /// Whether segment `id` ends at this event.
    #[must_use]
    pub fn is_incident(&self, id: SegmentId) -> bool {
        self.incident.contains(&id)
    }
}

fn bits(p: &Point2) -> (u64, u64) {
    (p.x.to_bits(), p.y.to_bits())
}

/// Builds one endpoint per distinct segment end.
///
/// Segment coordinates are expected to be canonical already, so coincident
/// ends compare bit-for-bit equal.
#[must_use]
pub fn build_endpoints(segments: &SlotMap<SegmentId, SweepSegment>) -> Vec<Endpoint> {
    let mut index: HashMap<(u64, u64), usize> = HashMap::new();
    let mut endpoints: Vec<Endpoint> = Vec::new();
    for (id, seg) in segments {
        for (p, angle) in [(seg.a, seg.a_angle), (seg.b, seg.b_angle)] {
            let slot = *index.entry(bits(&p)).or_insert_with(|| {
                endpoints.push(Endpoint {
                    point: p,
                    angle,
                    incident: Vec::new(),
                    collapsed: Vec::new(),
                });
                endpoints.len() - 1
            });
            endpoints[slot].incident.push(id);
        }
    }
    endpoints
}

/// Sweep order of two endpoints: by angle, then by turn direction for equal
/// float angles, then nearest first.
fn sweep_order(a: &Endpoint, b: &Endpoint, origin: &Point2) -> Ordering {
    a.angle.total_cmp(&b.angle).then_with(|| {
        match orientation(origin, &a.point, &b.point) {
            Orientation::CounterClockwise => Ordering::Less,
            Orientation::Clockwise => Ordering::Greater,
            Orientation::Collinear => (a.point - origin)
                .norm_squared()
                .total_cmp(&(b.point - origin).norm_squared()),
        }
    })
}

/// Whether `p` and `q` lie on the same ray from `origin`.
#[must_use]
pub fn co_angular(origin: &Point2, p: &Point2, q: &Point2) -> bool {
    orientation(origin, p, q) == Orientation::Collinear && (p - origin).dot(&(q - origin)) > 0.0
}

/// Sorts endpoints into sweep order and folds exactly co-angular endpoints
/// into the nearest one.
///
/// Only the nearest point of a co-angular run is processed as the event; the
/// incident segments of the others are merged into it so that list
/// membership stays complete.
#[must_use]
pub fn sort_and_group(mut endpoints: Vec<Endpoint>, origin: &Point2) -> Vec<Endpoint> {
    endpoints.sort_by(|a, b| sweep_order(a, b, origin));
    let mut events: Vec<Endpoint> = Vec::with_capacity(endpoints.len());
    for ep in endpoints {
        if let Some(last) = events.last_mut() {
            if co_angular(origin, &last.point, &ep.point) {
                let mut folded = ep.point;
                if (ep.point - origin).norm_squared() < (last.point - origin).norm_squared() {
                    folded = last.point;
                    last.point = ep.point;
                    last.angle = ep.angle;
                }
                debug!(
                    kept = ?last.point,
                    collapsed = ?folded,
                    angle = last.angle,
                    "co-angular endpoints folded into one event"
                );
                last.incident.extend(ep.incident);
                last.collapsed.push(folded);
                continue;
            }
        }
        events.push(ep);
    }
    events
}

/// Builds, trims and orders the events of one sweep.
#[must_use]
pub fn sweep_events(
    segments: &SlotMap<SegmentId, SweepSegment>,
    origin: &Point2,
    limiter: &AngleLimiter,
) -> Vec<Endpoint> {
    let mut endpoints = build_endpoints(segments);
    let total = endpoints.len();
    limiter.trim(&mut endpoints, |ep| ep.angle);
    let events = sort_and_group(endpoints, origin);
    debug!(
        endpoints = total,
        events = events.len(),
        "endpoint index built"
    );
    events
}

/// Whether an endpoint is hidden by the terrain rule.
///
/// Excluded when the incident segments include terrain but nothing opaque,
/// and there is either exactly one terrain segment, or exactly two that are
/// symmetric from the origin: neither is strictly in front of the other.
#[must_use]
pub fn terrain_excluded(
    endpoint: &Endpoint,
    segments: &SlotMap<SegmentId, SweepSegment>,
    origin: &Point2,
) -> bool {
    let incident: Vec<&SweepSegment> = endpoint
        .incident
        .iter()
        .filter_map(|id| segments.get(*id))
        .collect();
    if incident.iter().any(|s| s.is_opaque()) {
        return false;
    }
    let terrain: Vec<&SweepSegment> = incident.into_iter().filter(|s| s.is_terrain()).collect();
    match terrain.as_slice() {
        [_] => true,
        [s1, s2] => {
            let forward = in_front_of(&s1.points(), &s2.points(), origin);
            let backward = in_front_of(&s2.points(), &s1.points(), origin);
            let strictly_ordered = matches!(
                (forward, backward),
                (SegmentOrder::InFront, SegmentOrder::Behind)
                    | (SegmentOrder::Behind, SegmentOrder::InFront)
            );
            !strictly_ordered
        }
        _ => false,
    }
}
