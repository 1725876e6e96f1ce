//! The front-to-back list of segments straddling the current sweep ray.

use slotmap::SlotMap;

use crate::error::SweepError;
use crate::math::orientation::{orientation, Orientation};
use crate::math::Point2;

use super::endpoint::Endpoint;
use super::prepare::{SegmentId, SweepSegment};
use super::segment_order::{in_front_of, SegmentOrder};

/// Membership changes caused by one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WallUpdate {
    pub added: Vec<SegmentId>,
    pub removed: Vec<SegmentId>,
}

/// Segments whose angular span currently contains the sweep ray, nearest
/// first.
///
/// The order is only locally valid: it holds for the members present at the
/// same time, which is all the sweep ever compares.
#[derive(Debug, Clone)]
pub struct PotentialOccluderList<'a> {
    segments: &'a SlotMap<SegmentId, SweepSegment>,
    origin: Point2,
    members: Vec<SegmentId>,
}

impl<'a> PotentialOccluderList<'a> {
    /// Creates an empty list over the working segments of one sweep from
    /// `origin`.
    #[must_use]
    pub fn new(segments: &'a SlotMap<SegmentId, SweepSegment>, origin: Point2) -> Self {
        Self {
            segments,
            origin,
            members: Vec::new(),
        }
    }

    /// Number of segments currently in play.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` when no segment straddles the current ray.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `id` is in play.
    #[must_use]
    pub fn contains(&self, id: SegmentId) -> bool {
        self.members.contains(&id)
    }

    /// Members in front-to-back order.
    #[must_use]
    pub fn members(&self) -> &[SegmentId] {
        &self.members
    }

    /// Looks up a working segment by id.
    #[must_use]
    pub fn segment(&self, id: SegmentId) -> Option<&'a SweepSegment> {
        self.segments.get(id)
    }

    fn crossing(&self, first: SegmentId, second: SegmentId, angle: f64) -> SweepError {
        SweepError::CrossingOccluders {
            first: self.segments.get(first).and_then(|s| s.source),
            second: self.segments.get(second).and_then(|s| s.source),
            angle,
        }
    }

    fn insert_one(&mut self, id: SegmentId, angle: f64) -> Result<(), SweepError> {
        let Some(new_seg) = self.segments.get(id) else {
            return Ok(());
        };
        let pts = new_seg.points();
        let mut lo = 0;
        let mut hi = self.members.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let member = self.members[mid];
            let Some(member_seg) = self.segments.get(member) else {
                lo = mid + 1;
                continue;
            };
            match in_front_of(&member_seg.points(), &pts, &self.origin) {
                SegmentOrder::InFront => lo = mid + 1,
                SegmentOrder::Behind => hi = mid,
                SegmentOrder::Crosses => return Err(self.crossing(member, id, angle)),
            }
        }
        self.members.insert(lo, id);
        Ok(())
    }

    /// Inserts segments by binary search on the "in front of" relation.
    ///
    /// `angle` is the current relative sweep angle, reported on failure.
    /// Segments already present are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::CrossingOccluders`] if a new segment crosses a
    /// member in its interior.
    pub fn add_occluders(&mut self, ids: &[SegmentId], angle: f64) -> Result<(), SweepError> {
        for &id in ids {
            if !self.contains(id) {
                self.insert_one(id, angle)?;
            }
        }
        Ok(())
    }

    /// Removes a segment; returns whether it was present.
    pub fn remove_occluder(&mut self, id: SegmentId) -> bool {
        match self.members.iter().position(|m| *m == id) {
            Some(pos) => {
                self.members.remove(pos);
                true
            }
            None => false,
        }
    }

    /// The nearest member, or with `skip_terrain` the nearest opaque one.
    #[must_use]
    pub fn closest(&self, skip_terrain: bool) -> Option<SegmentId> {
        self.members
            .iter()
            .copied()
            .find(|id| !skip_terrain || self.segments.get(*id).is_some_and(|s| !s.is_terrain()))
    }

    /// The member directly behind the nearest one.
    #[must_use]
    pub fn second_closest(&self) -> Option<SegmentId> {
        self.members.get(1).copied()
    }

    /// The segment bounding what the origin sees along the current ray.
    ///
    /// An opaque nearest member bounds the view; a terrain one is seen
    /// through, one level deep, to the member behind it.
    #[must_use]
    pub fn effective_blocker(&self) -> Option<SegmentId> {
        let closest = self.closest(false)?;
        if self.segments.get(closest).is_some_and(SweepSegment::is_terrain) {
            self.second_closest()
        } else {
            Some(closest)
        }
    }

    /// Applies the membership changes of one endpoint.
    ///
    /// A segment whose far end lies behind the sweep ends here and is
    /// removed; one whose far end lies ahead starts here and is inserted.
    /// All removals happen before any insertion.
    ///
    /// # Errors
    ///
    /// Propagates [`SweepError::CrossingOccluders`] from insertion.
    pub fn update_walls_from_endpoint(
        &mut self,
        endpoint: &Endpoint,
    ) -> Result<WallUpdate, SweepError> {
        let mut update = WallUpdate::default();
        for &id in &endpoint.incident {
            let Some(seg) = self.segments.get(id) else {
                continue;
            };
            let far = seg.far_end(&endpoint.point, &self.origin);
            match orientation(&self.origin, &endpoint.point, &far) {
                Orientation::CounterClockwise => update.added.push(id),
                Orientation::Clockwise => update.removed.push(id),
                Orientation::Collinear => {}
            }
        }
        update.removed.retain(|id| self.remove_occluder(*id));
        self.add_occluders(&update.added, endpoint.angle)?;
        Ok(update)
    }
}
