//! Turns the occluder snapshot into the sweep's working segments.
//!
//! Pipeline: channel filter, world boundary, radius clip, intersection
//! splitting, point merging, orientation around the origin. Everything
//! produced here is local to one sweep.

use slotmap::SlotMap;
use tracing::debug;

use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::orientation::{orientation, Orientation};
use crate::math::{normalize_angle, points_equal, Point2, POINT_TOLERANCE, TOLERANCE};
use crate::occluder::{Blocking, OccluderId, OccluderKind, OccluderStore};

use super::angle::{AngleLimiter, ANGLE_EPS};
use super::config::{Bounds, SweepConfig};
use super::endpoint::{co_angular, PointMerger};
use super::radius::{clip_to_disk, Clipped};

slotmap::new_key_type! {
    /// Identifier of a working segment within one sweep.
    pub struct SegmentId;
}

/// A working segment, oriented so the sweep meets `a` before `b`.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSegment {
    /// Occluder this segment was cut from; `None` for world boundary edges.
    pub source: Option<OccluderId>,
    pub kind: OccluderKind,
    /// Leading end.
    pub a: Point2,
    /// Trailing end.
    pub b: Point2,
    /// Blocking for the sweep's channel.
    pub blocking: Blocking,
    pub a_angle: f64,
    pub b_angle: f64,
}

impl SweepSegment {
    /// Orients `p -> q` around `origin`.
    ///
    /// Returns `None` for segments seen edge-on, including ones whose angular
    /// span is lost to rounding.
    #[must_use]
    pub fn oriented(
        source: Option<OccluderId>,
        kind: OccluderKind,
        p: Point2,
        q: Point2,
        blocking: Blocking,
        origin: &Point2,
        limiter: &AngleLimiter,
    ) -> Option<Self> {
        let (a, b) = match orientation(origin, &p, &q) {
            Orientation::CounterClockwise => (p, q),
            Orientation::Clockwise => (q, p),
            Orientation::Collinear => return None,
        };
        let a_angle = limiter.angle_of(origin, &a);
        let b_angle = limiter.angle_of(origin, &b);
        let span = normalize_angle(b_angle - a_angle);
        if span < ANGLE_EPS || span >= std::f64::consts::PI {
            return None;
        }
        Some(Self {
            source,
            kind,
            a,
            b,
            blocking,
            a_angle,
            b_angle,
        })
    }

    /// Both ends, leading first.
    #[must_use]
    pub fn points(&self) -> [Point2; 2] {
        [self.a, self.b]
    }

    /// Returns `true` for partially blocking segments.
    #[must_use]
    pub fn is_terrain(&self) -> bool {
        self.blocking.is_terrain()
    }

    /// Returns `true` for fully blocking segments, including world edges.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.blocking == Blocking::Normal
    }

    /// Whether the segment already spans the ray the sweep starts on.
    #[must_use]
    pub fn straddles_start(&self) -> bool {
        self.a_angle > self.b_angle
    }

    /// This segment's end lying on the ray through `point`.
    #[must_use]
    pub fn end_on_ray(&self, point: &Point2, origin: &Point2) -> Point2 {
        if co_angular(origin, point, &self.a) {
            self.a
        } else {
            self.b
        }
    }

    /// The end opposite the one on the ray through `point`.
    #[must_use]
    pub fn far_end(&self, point: &Point2, origin: &Point2) -> Point2 {
        if co_angular(origin, point, &self.a) {
            self.b
        } else {
            self.a
        }
    }
}

/// A segment before orientation.
#[derive(Debug, Clone, Copy)]
struct RawSegment {
    source: Option<OccluderId>,
    kind: OccluderKind,
    a: Point2,
    b: Point2,
    blocking: Blocking,
}

fn candidates(store: &OccluderStore, origin: &Point2, config: &SweepConfig) -> Vec<RawSegment> {
    store
        .iter()
        .filter(|(_, o)| !o.is_degenerate() && o.blocks_from(config.channel, origin))
        .map(|(id, o)| RawSegment {
            source: Some(id),
            kind: o.kind,
            a: o.a,
            b: o.b,
            blocking: o.blocking.get(config.channel),
        })
        .collect()
}

/// World rectangle for the sweep: configured, or derived from the occluders
/// when neither bounds nor a radius limit the view.
fn world_bounds(raw: &[RawSegment], origin: &Point2, config: &SweepConfig) -> Option<Bounds> {
    if config.bounds.is_some() || config.effective_radius().is_some() {
        return config.bounds;
    }
    if raw.is_empty() {
        return None;
    }
    let pts: Vec<Point2> = raw
        .iter()
        .flat_map(|s| [s.a, s.b])
        .chain(std::iter::once(*origin))
        .collect();
    let b = Bounds::enclosing(&pts)?;
    let margin = b.width().max(b.height()).max(1.0);
    Some(b.padded(margin))
}

fn boundary_edges(bounds: &Bounds) -> impl Iterator<Item = RawSegment> {
    let c = bounds.corners();
    (0..4).map(move |i| RawSegment {
        source: None,
        kind: OccluderKind::Boundary,
        a: c[i],
        b: c[(i + 1) % 4],
        blocking: Blocking::Normal,
    })
}

fn clip_all(raw: Vec<RawSegment>, origin: &Point2, radius: f64) -> Vec<RawSegment> {
    raw.into_iter()
        .filter_map(|s| match clip_to_disk(&s.a, &s.b, origin, radius) {
            Clipped::Inside => Some(s),
            Clipped::Piece(a, b) => Some(RawSegment {
                a,
                b,
                kind: OccluderKind::RadiusFragment,
                ..s
            }),
            Clipped::Outside => None,
        })
        .collect()
}

/// Axis-aligned box of one raw segment, widened by the split tolerance.
#[derive(Debug, Clone, Copy)]
struct Extent {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Extent {
    fn of(s: &RawSegment, pad: f64) -> Self {
        Self {
            min_x: s.a.x.min(s.b.x) - pad,
            max_x: s.a.x.max(s.b.x) + pad,
            min_y: s.a.y.min(s.b.y) - pad,
            max_y: s.a.y.max(s.b.y) + pad,
        }
    }

    fn overlaps_y(&self, other: &Self) -> bool {
        self.min_y <= other.max_y && other.min_y <= self.max_y
    }
}

/// Pairs of segments whose boxes overlap, found by sweeping along x.
///
/// Segments enter in order of `min_x`; the active set only holds segments
/// whose x range still reaches the current one.
fn candidate_pairs(raw: &[RawSegment], pad: f64) -> Vec<(usize, usize)> {
    let extents: Vec<Extent> = raw.iter().map(|s| Extent::of(s, pad)).collect();
    let mut order: Vec<usize> = (0..raw.len()).collect();
    order.sort_by(|&i, &j| extents[i].min_x.total_cmp(&extents[j].min_x));

    let mut active: Vec<usize> = Vec::new();
    let mut pairs = Vec::new();
    for &i in &order {
        let e = extents[i];
        active.retain(|&j| extents[j].max_x >= e.min_x);
        for &j in &active {
            if e.overlaps_y(&extents[j]) {
                pairs.push((i.min(j), i.max(j)));
            }
        }
        active.push(i);
    }
    pairs
}

/// Splits segments at every interior crossing and T-junction, so that two
/// pieces only ever meet at shared ends.
fn split_at_intersections(raw: &[RawSegment]) -> Vec<RawSegment> {
    let eps = TOLERANCE * 10.0;
    let interior = |t: f64| t > eps && t < 1.0 - eps;
    let mut splits: Vec<Vec<(f64, Point2)>> = vec![Vec::new(); raw.len()];

    for (i, j) in candidate_pairs(raw, POINT_TOLERANCE) {
        let (si, sj) = (&raw[i], &raw[j]);
        if let Some((pt, t, u)) = segment_segment_intersect_2d(&si.a, &si.b, &sj.a, &sj.b) {
            if interior(t) {
                splits[i].push((t, pt));
            }
            if interior(u) {
                splits[j].push((u, pt));
            }
        }
    }

    let mut out = Vec::with_capacity(raw.len());
    for (seg, mut cuts) in raw.iter().zip(splits) {
        cuts.sort_by(|x, y| x.0.total_cmp(&y.0));
        let mut start = seg.a;
        for (_, p) in cuts.into_iter().chain(std::iter::once((1.0, seg.b))) {
            if !points_equal(&start, &p) {
                out.push(RawSegment { a: start, b: p, ..*seg });
            }
            start = p;
        }
    }
    out
}

/// Builds the working segments for a sweep from `origin`.
#[must_use]
pub fn prepare_segments(
    store: &OccluderStore,
    origin: &Point2,
    config: &SweepConfig,
    limiter: &AngleLimiter,
) -> SlotMap<SegmentId, SweepSegment> {
    let mut raw = candidates(store, origin, config);
    let included = raw.len();
    if let Some(bounds) = world_bounds(&raw, origin, config) {
        raw.extend(boundary_edges(&bounds));
    }
    if let Some(r) = config.effective_radius() {
        raw = clip_all(raw, origin, r);
    }
    let split = split_at_intersections(&raw);

    let mut merger = PointMerger::new();
    let mut segments = SlotMap::with_key();
    let mut edge_on = 0usize;
    for s in split {
        let a = merger.canonical(s.a);
        let b = merger.canonical(s.b);
        if a == b {
            continue;
        }
        match SweepSegment::oriented(s.source, s.kind, a, b, s.blocking, origin, limiter) {
            Some(seg) => {
                segments.insert(seg);
            }
            None => edge_on += 1,
        }
    }
    debug!(
        occluders = store.len(),
        included,
        pieces = segments.len(),
        edge_on,
        "segments prepared"
    );
    segments
}
