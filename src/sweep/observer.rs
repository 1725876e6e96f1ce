use crate::math::Point2;

/// How the sweep classified an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    /// The opening ray, before any ordinary endpoint.
    Start,
    /// Something nearer than the previous blocker appeared.
    InFront,
    /// The previous blocker ended here.
    EndOfWall,
    /// Hidden behind the current blocker; no vertex.
    Behind,
}

/// What the sweep did at one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointEvent {
    pub point: Point2,
    /// Relative sweep angle.
    pub angle: f64,
    pub state: EndpointState,
    /// The terrain rule excludes this endpoint.
    pub terrain_excluded: bool,
    /// The blocker in effect before the endpoint hides it.
    pub occluded: bool,
    /// Incident segments, including those of folded co-angular points.
    pub incident: usize,
    /// Co-angular points folded into this event.
    pub collapsed: usize,
}

/// Optional hooks into a running sweep. Every method defaults to a no-op.
pub trait SweepObserver {
    fn endpoint_processed(&mut self, _event: &EndpointEvent) {}

    fn vertex_emitted(&mut self, _vertex: &Point2) {}

    fn padding_inserted(&mut self, _points: &[Point2]) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SweepObserver for NoopObserver {}

/// Observer that keeps every callback, for inspection after the sweep.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub events: Vec<EndpointEvent>,
    pub vertices: Vec<Point2>,
    pub padding: Vec<Vec<Point2>>,
}

impl SweepObserver for RecordingObserver {
    fn endpoint_processed(&mut self, event: &EndpointEvent) {
        self.events.push(event.clone());
    }

    fn vertex_emitted(&mut self, vertex: &Point2) {
        self.vertices.push(*vertex);
    }

    fn padding_inserted(&mut self, points: &[Point2]) {
        self.padding.push(points.to_vec());
    }
}
