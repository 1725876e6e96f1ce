//! The angular sweep.
//!
//! The engine walks the events in angular order and tracks the effective
//! blocker (see [`PotentialOccluderList::effective_blocker`]) before and after
//! each event. A change of blocker is a corner of the visible region: the ray
//! through the event is cut by the old blocker and by the new one, and both
//! cuts become vertices. Where no blocker exists the view reaches the radius
//! circle and the gap is filled with arc padding.

use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use crate::error::SweepError;
use crate::math::intersect_2d::{ray_line_hit, ray_segment_intersect};
use crate::math::polygon_2d::push_distinct;
use crate::math::{point_at_angle, points_equal, Point2, Vector2};

use super::angle::{AngleLimiter, ANGLE_EPS};
use super::config::SweepConfig;
use super::endpoint::{terrain_excluded, Endpoint};
use super::observer::{EndpointEvent, EndpointState, SweepObserver};
use super::polygon::VisibilityPolygon;
use super::potential_list::PotentialOccluderList;
use super::prepare::{SegmentId, SweepSegment};
use super::radius::ArcPadder;
use super::segment_order::blocks_point;

/// Runs one sweep over prepared segments and sorted events.
pub struct SweepEngine<'s, 'o, O: SweepObserver> {
    origin: Point2,
    limiter: AngleLimiter,
    segments: &'s SlotMap<SegmentId, SweepSegment>,
    list: PotentialOccluderList<'s>,
    padder: Option<ArcPadder>,
    max_iterations: usize,
    iterations: usize,
    points: Vec<Point2>,
    /// Relative angle at which the frontier fell onto the radius circle.
    gap_start: Option<f64>,
    observer: &'o mut O,
}

impl<'s, 'o, O: SweepObserver> SweepEngine<'s, 'o, O> {
    /// Creates an engine over prepared segments; `observer` receives every event.
    #[must_use]
    pub fn new(
        origin: Point2,
        limiter: AngleLimiter,
        segments: &'s SlotMap<SegmentId, SweepSegment>,
        config: &SweepConfig,
        observer: &'o mut O,
    ) -> Self {
        Self {
            origin,
            limiter,
            segments,
            list: PotentialOccluderList::new(segments, origin),
            padder: config
                .effective_radius()
                .map(|r| ArcPadder::new(origin, r, config)),
            max_iterations: config.max_iterations,
            iterations: 0,
            points: Vec::new(),
            gap_start: None,
            observer,
        }
    }

    /// Sweeps `events` and returns the polygon.
    ///
    /// Failures stop the sweep; whatever was built so far is returned with
    /// the error attached.
    #[must_use]
    pub fn run(mut self, events: &[Endpoint]) -> VisibilityPolygon {
        debug!(
            segments = self.segments.len(),
            events = events.len(),
            limited = self.limiter.is_limited(),
            radius = self.padder.map(|p| p.radius()),
            "sweep started"
        );
        let aborted = match self.sweep(events) {
            Ok(()) => None,
            Err(err) => {
                warn!(
                    error = %err,
                    vertices = self.points.len(),
                    "sweep aborted, returning partial polygon"
                );
                Some(err)
            }
        };
        VisibilityPolygon {
            points: self.points,
            aborted,
        }
    }

    fn sweep(&mut self, events: &[Endpoint]) -> Result<(), SweepError> {
        let seeds: Vec<SegmentId> = self
            .segments
            .iter()
            .filter(|(_, s)| s.straddles_start())
            .map(|(id, _)| id)
            .collect();
        self.list.add_occluders(&seeds, 0.0)?;

        if self.limiter.is_limited() {
            let start_len = events
                .iter()
                .take_while(|ep| ep.angle <= ANGLE_EPS)
                .count();
            let end_len = events[start_len..]
                .iter()
                .rev()
                .take_while(|ep| self.limiter.is_at_end(ep.angle))
                .count();
            let (start, rest) = events.split_at(start_len);
            let (middle, end) = rest.split_at(rest.len() - end_len);
            self.open_window(start)?;
            self.process(middle)?;
            self.close_window(end)
        } else {
            self.open_full_turn();
            self.process(events)?;
            self.close_full_turn()
        }
    }

    fn iterate(&mut self) -> Result<(), SweepError> {
        self.iterations += 1;
        if self.iterations > self.max_iterations {
            return Err(SweepError::IterationLimit {
                stage: "sweep",
                limit: self.max_iterations,
            });
        }
        Ok(())
    }

    fn emit(&mut self, p: Point2) {
        if push_distinct(&mut self.points, p) {
            self.observer.vertex_emitted(&p);
        }
    }

    /// Where the ray at `angle` (through `dir`) meets `blocker`.
    ///
    /// Segments with an end on the ray of one of the `at` events resolve to
    /// that exact end. No blocker means the radius circle.
    fn hit(
        &self,
        blocker: Option<SegmentId>,
        angle: f64,
        dir: &Vector2,
        at: &[Endpoint],
    ) -> Option<Point2> {
        let Some(id) = blocker else {
            let padder = self.padder?;
            return Some(point_at_angle(
                &self.origin,
                self.limiter.absolute(angle),
                padder.radius(),
            ));
        };
        let seg = self.segments.get(id)?;
        if let Some(ep) = at.iter().find(|ep| ep.is_incident(id)) {
            return Some(seg.end_on_ray(&ep.point, &self.origin));
        }
        ray_segment_intersect(&self.origin, dir, &seg.a, &seg.b)
            .map(|(p, _)| p)
            .or_else(|| ray_line_hit(&self.origin, dir, &seg.a, &seg.b))
    }

    /// Pads the open gap on the radius circle up to `angle`.
    fn close_gap(&mut self, angle: f64) -> Result<(), SweepError> {
        let (Some(start), Some(padder)) = (self.gap_start.take(), self.padder) else {
            return Ok(());
        };
        let points = padder.pad(self.limiter.absolute(start), angle - start)?;
        if !points.is_empty() {
            self.observer.padding_inserted(&points);
            for p in points {
                self.emit(p);
            }
        }
        Ok(())
    }

    /// Emits the cuts of the old and new blocker on one ray.
    ///
    /// A cut landing on `excluded` is dropped; the other cut is kept.
    fn transition(
        &mut self,
        before: Option<SegmentId>,
        after: Option<SegmentId>,
        angle: f64,
        dir: &Vector2,
        at: &[Endpoint],
        excluded: Option<&Point2>,
    ) -> Result<(), SweepError> {
        let hit_before = self.hit(before, angle, dir, at);
        let hit_after = self.hit(after, angle, dir, at);
        if before.is_none() {
            self.close_gap(angle)?;
        }
        for p in [hit_before, hit_after].into_iter().flatten() {
            if excluded.is_some_and(|q| points_equal(q, &p)) {
                continue;
            }
            self.emit(p);
        }
        if after.is_none() && self.padder.is_some() {
            self.gap_start = Some(angle);
        }
        Ok(())
    }

    /// Emits the frontier point on the opening ray; the circle opens a gap.
    fn begin_frontier(&mut self, dir: &Vector2, at: &[Endpoint]) -> Option<Point2> {
        let blocker = self.list.effective_blocker();
        let hit = self.hit(blocker, 0.0, dir, at);
        if let Some(p) = hit {
            self.emit(p);
        }
        if blocker.is_none() && self.padder.is_some() {
            self.gap_start = Some(0.0);
        }
        hit
    }

    fn report_start(&mut self, point: Point2, incident: usize) {
        self.observer.endpoint_processed(&EndpointEvent {
            point,
            angle: 0.0,
            state: EndpointState::Start,
            terrain_excluded: false,
            occluded: false,
            incident,
            collapsed: 0,
        });
    }

    fn open_window(&mut self, start: &[Endpoint]) -> Result<(), SweepError> {
        self.emit(self.origin);
        for ep in start {
            self.iterate()?;
            self.list.update_walls_from_endpoint(ep)?;
        }
        let dir = self.limiter.direction(0.0);
        let hit = self.begin_frontier(&dir, start);
        let incident = start.iter().map(|ep| ep.incident.len()).sum();
        self.report_start(hit.unwrap_or(self.origin), incident);
        Ok(())
    }

    /// Applies the events on the closing ray and closes the wedge.
    ///
    /// The frontier just before the ray is always emitted. The one after the
    /// events only when it is nearer, so the closing edge runs straight back
    /// toward the origin.
    fn close_window(&mut self, end: &[Endpoint]) -> Result<(), SweepError> {
        let angle = self.limiter.span();
        let dir = self.limiter.direction(angle);
        let before = self.list.effective_blocker();
        for ep in end {
            self.iterate()?;
            self.list.update_walls_from_endpoint(ep)?;
        }
        let after = self.list.effective_blocker();
        if before.is_none() {
            self.close_gap(angle)?;
        }

        let origin = self.origin;
        let reach = |p: Option<Point2>| p.map_or(f64::INFINITY, |p| (p - origin).norm());
        let hit_before = self.hit(before, angle, &dir, end);
        let hit_after = self
            .hit(after, angle, &dir, end)
            .filter(|p| reach(Some(*p)) < reach(hit_before));
        let excluded: Vec<Point2> = end
            .iter()
            .filter(|ep| terrain_excluded(ep, self.segments, &origin))
            .map(|ep| ep.point)
            .collect();
        for p in [hit_before, hit_after].into_iter().flatten() {
            if !excluded.iter().any(|q| points_equal(q, &p)) {
                self.emit(p);
            }
        }
        // The wedge closes back at the origin.
        self.emit(origin);
        Ok(())
    }

    fn open_full_turn(&mut self) {
        let dir = self.limiter.direction(0.0);
        let blocker = self.list.effective_blocker();
        // Only a gap on the circle needs a vertex on the opening ray.
        let hit = if blocker.is_none() {
            self.begin_frontier(&dir, &[])
        } else {
            self.hit(blocker, 0.0, &dir, &[])
        };
        self.report_start(hit.unwrap_or(self.origin), 0);
    }

    fn close_full_turn(&mut self) -> Result<(), SweepError> {
        if self.gap_start.is_some() {
            self.close_gap(std::f64::consts::TAU)?;
        }
        if self.points.len() > 1 {
            let first = self.points[0];
            if self
                .points
                .last()
                .is_some_and(|last| points_equal(last, &first))
            {
                self.points.pop();
            }
        }
        Ok(())
    }

    fn process(&mut self, events: &[Endpoint]) -> Result<(), SweepError> {
        for ep in events {
            self.iterate()?;
            let before = self.list.effective_blocker();
            let occluded = before
                .and_then(|id| self.segments.get(id))
                .is_some_and(|s| blocks_point(&s.points(), &ep.point, &self.origin));
            let update = self.list.update_walls_from_endpoint(ep)?;
            let after = self.list.effective_blocker();

            let state = if before == after {
                EndpointState::Behind
            } else if before.is_some_and(|id| update.removed.contains(&id)) {
                EndpointState::EndOfWall
            } else {
                EndpointState::InFront
            };
            let excluded = terrain_excluded(ep, self.segments, &self.origin);
            if state != EndpointState::Behind {
                let dir = ep.point - self.origin;
                let skip = excluded.then_some(&ep.point);
                self.transition(before, after, ep.angle, &dir, std::slice::from_ref(ep), skip)?;
            }
            trace!(
                point = ?ep.point,
                angle = ep.angle,
                ?state,
                added = update.added.len(),
                removed = update.removed.len(),
                active = self.list.len(),
                terrain_excluded = excluded,
                "endpoint processed"
            );
            self.observer.endpoint_processed(&EndpointEvent {
                point: ep.point,
                angle: ep.angle,
                state,
                terrain_excluded: excluded,
                occluded,
                incident: ep.incident.len(),
                collapsed: ep.collapsed.len(),
            });
        }
        Ok(())
    }
}
