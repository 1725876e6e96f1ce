#![allow(clippy::unwrap_used)]

use sightline::error::SweepError;
use sightline::math::{points_equal, Point2};
use sightline::occluder::{Blocking, Facing, Occluder, OccluderStore};
use sightline::sweep::{
    Bounds, EndpointState, PaddingMode, RecordingObserver, SweepConfig, VisibilityPolygon,
    VisibilitySweep,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn p(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}

fn boxed(half: f64) -> SweepConfig {
    SweepConfig::default().with_bounds(Bounds::new(p(-half, -half), p(half, half)))
}

fn sweep(origin: Point2, config: SweepConfig, store: &OccluderStore) -> VisibilityPolygon {
    init_tracing();
    VisibilitySweep::new(origin, config).compute(store).unwrap()
}

fn observe(
    origin: Point2,
    config: SweepConfig,
    store: &OccluderStore,
) -> (VisibilityPolygon, RecordingObserver) {
    init_tracing();
    let mut observer = RecordingObserver::default();
    let poly = VisibilitySweep::new(origin, config)
        .compute_with_observer(store, &mut observer)
        .unwrap();
    (poly, observer)
}

fn has_vertex(poly: &VisibilityPolygon, q: Point2) -> bool {
    poly.points.iter().any(|v| (v - q).norm() < 1e-6)
}

fn assert_no_consecutive_duplicates(poly: &VisibilityPolygon, wedge: bool) {
    for w in poly.points.windows(2) {
        assert!(!points_equal(&w[0], &w[1]), "duplicate vertex {:?}", w[0]);
    }
    if !wedge && poly.points.len() > 1 {
        let first = poly.points[0];
        let last = poly.points[poly.points.len() - 1];
        assert!(!points_equal(&first, &last), "closing duplicate {first:?}");
    }
}

fn store_of(occluders: impl IntoIterator<Item = Occluder>) -> OccluderStore {
    occluders.into_iter().collect()
}

// ── Empty scenes ──

#[test]
fn no_occluders_no_limits_is_empty() {
    let poly = sweep(p(3.0, 4.0), SweepConfig::default(), &OccluderStore::new());
    assert!(poly.is_empty());
    assert!(poly.is_complete());
}

#[test]
fn only_open_occluders_is_empty() {
    let store = store_of([Occluder::new(p(-5.0, 10.0), p(5.0, 10.0)).opened(true)]);
    assert!(sweep(p(0.0, 0.0), SweepConfig::default(), &store).is_empty());
}

#[test]
fn radius_without_occluders_is_a_circle() {
    let origin = p(10.0, 20.0);
    let radius = 50.0;
    let poly = sweep(origin, SweepConfig::default().with_radius(radius), &OccluderStore::new());
    assert!(poly.is_complete());
    assert!(poly.len() >= 20, "only {} vertices", poly.len());
    for v in &poly.points {
        assert!(((v - origin).norm() - radius).abs() < 1e-9, "{v:?} off the circle");
    }
    assert_no_consecutive_duplicates(&poly, false);
    // Within a few percent of the true disk area.
    let disk = std::f64::consts::PI * radius * radius;
    assert!((poly.area() - disk).abs() / disk < 0.03, "area {}", poly.area());
}

#[test]
fn bezier_padding_circle() {
    let origin = p(0.0, 0.0);
    let config = SweepConfig::default()
        .with_radius(10.0)
        .with_padding(PaddingMode::Bezier);
    let poly = sweep(origin, config, &OccluderStore::new());
    assert!(poly.len() >= 12);
    for v in &poly.points {
        assert!(((v - origin).norm() - 10.0).abs() < 10.0 * 2e-4);
    }
    assert_no_consecutive_duplicates(&poly, false);
}

#[test]
fn limited_wedge_on_the_circle() {
    let origin = p(0.0, 0.0);
    let config = SweepConfig::default().with_radius(10.0).with_angle(90.0, 0.0);
    let poly = sweep(origin, config, &OccluderStore::new());
    assert_eq!(poly.points.first(), Some(&origin));
    assert_eq!(poly.points.last(), Some(&origin));
    let arc = &poly.points[1..poly.len() - 1];
    assert!(arc.len() >= 3);
    for v in arc {
        assert!(((v - origin).norm() - 10.0).abs() < 1e-9);
        // Rotation 0 faces +y.
        assert!(v.y > 0.0);
    }
    assert_no_consecutive_duplicates(&poly, true);
}

// ── Shadows ──

#[test]
fn single_wall_casts_a_shadow() {
    let store = store_of([Occluder::new(p(-5.0, 10.0), p(5.0, 10.0))]);
    let poly = sweep(p(0.0, 0.0), SweepConfig::default(), &store);
    assert!(poly.is_complete());
    assert!(has_vertex(&poly, p(5.0, 10.0)));
    assert!(has_vertex(&poly, p(-5.0, 10.0)));
    // Derived world edge at y = 20: the shadow reaches it.
    assert!(has_vertex(&poly, p(10.0, 20.0)));
    assert!(has_vertex(&poly, p(-10.0, 20.0)));
    assert!(poly.contains(&p(0.0, 5.0)));
    assert!(poly.contains(&p(8.0, 15.0)));
    assert!(!poly.contains(&p(0.0, 15.0)));
    assert_no_consecutive_duplicates(&poly, false);
}

// ── Terrain ──

fn terrain_v(left: Blocking) -> OccluderStore {
    store_of([
        Occluder::terrain(p(5.0, 15.0), p(0.0, 10.0)),
        Occluder::with_blocking(p(0.0, 10.0), p(-5.0, 15.0), left),
    ])
}

#[test]
fn symmetric_terrain_vertex_is_excluded() {
    let tip = p(0.0, 10.0);
    let (poly, observer) = observe(p(0.0, 0.0), boxed(100.0), &terrain_v(Blocking::Terrain));
    assert!(!has_vertex(&poly, tip));
    let event = observer.events.iter().find(|e| e.point == tip).unwrap();
    assert!(event.terrain_excluded);
    assert_eq!(event.state, EndpointState::Behind);
    // A single layer of terrain is seen through: only the box remains.
    assert_eq!(poly.len(), 4);
}

#[test]
fn opaque_arm_makes_the_vertex_visible() {
    let tip = p(0.0, 10.0);
    let (poly, observer) = observe(p(0.0, 0.0), boxed(100.0), &terrain_v(Blocking::Normal));
    assert!(has_vertex(&poly, tip));
    let event = observer.events.iter().find(|e| e.point == tip).unwrap();
    assert!(!event.terrain_excluded);
    assert_eq!(event.state, EndpointState::InFront);
    // The ray through the tip continues to the far wall of the box.
    assert!(has_vertex(&poly, p(0.0, 100.0)));
}

// ── Angle windows ──

#[test]
fn window_opens_on_the_ray_hit() {
    let origin = p(0.0, 0.0);
    let store = store_of([Occluder::new(p(12.0, 4.0), p(4.0, 12.0))]);
    let config = boxed(50.0).with_angle(90.0, 0.0);
    let poly = sweep(origin, config, &store);
    assert!(poly.is_complete());
    assert_eq!(poly.points[0], origin);
    assert!((poly.points[1] - p(8.0, 8.0)).norm() < 1e-9, "{:?}", poly.points[1]);
    assert!(!has_vertex(&poly, p(12.0, 4.0)));
    assert!(has_vertex(&poly, p(4.0, 12.0)));
    assert!(has_vertex(&poly, p(-50.0, 50.0)));
    assert_eq!(poly.points.last(), Some(&origin));
    assert_no_consecutive_duplicates(&poly, true);
}

// ── General properties ──

fn cluttered_room() -> OccluderStore {
    store_of([
        Occluder::new(p(-30.0, 20.0), p(10.0, 25.0)),
        Occluder::new(p(15.0, -5.0), p(25.0, 30.0)),
        Occluder::new(p(-20.0, -30.0), p(-5.0, -12.0)),
        Occluder::terrain(p(-40.0, -5.0), p(-25.0, 8.0)),
        Occluder::new(p(5.0, -20.0), p(30.0, -35.0)).facing(Facing::Left),
        Occluder::new(p(-10.0, 35.0), p(-10.0, 60.0)),
    ])
}

#[test]
fn outputs_have_no_consecutive_duplicates() {
    let store = cluttered_room();
    let origin = p(1.0, 2.0);
    let configs = [
        (boxed(80.0), false),
        (SweepConfig::default(), false),
        (SweepConfig::default().with_radius(28.0), false),
        (boxed(80.0).with_angle(120.0, 30.0), true),
        (SweepConfig::default().with_radius(28.0).with_angle(200.0, -90.0), true),
    ];
    for (config, wedge) in configs {
        let poly = sweep(origin, config, &store);
        assert!(poly.is_complete(), "{config:?}: {:?}", poly.aborted);
        assert!(poly.len() >= 3);
        assert_no_consecutive_duplicates(&poly, wedge);
    }
}

#[test]
fn radius_limits_every_vertex() {
    let origin = p(1.0, 2.0);
    let poly = sweep(origin, SweepConfig::default().with_radius(28.0), &cluttered_room());
    for v in &poly.points {
        assert!((v - origin).norm() <= 28.0 + 1e-9, "{v:?} beyond radius");
    }
}

#[test]
fn wall_crossing_the_circle_meets_it_at_its_chord_ends() {
    let origin = p(0.0, 0.0);
    let store = store_of([Occluder::new(p(-30.0, 10.0), p(30.0, 10.0))]);
    let poly = sweep(origin, SweepConfig::default().with_radius(20.0), &store);
    let half_chord = (20.0f64 * 20.0 - 100.0).sqrt();
    assert!(has_vertex(&poly, p(half_chord, 10.0)));
    assert!(has_vertex(&poly, p(-half_chord, 10.0)));
    assert!(!poly.contains(&p(0.0, 15.0)));
    assert!(poly.contains(&p(0.0, -15.0)));
    assert_no_consecutive_duplicates(&poly, false);
}

#[test]
fn sweep_is_deterministic() {
    let store = cluttered_room();
    let config = SweepConfig::default().with_radius(40.0);
    let first = sweep(p(1.0, 2.0), config, &store);
    let second = sweep(p(1.0, 2.0), config, &store);
    assert_eq!(first, second);
}

#[test]
fn event_angles_strictly_increase() {
    let (_, observer) = observe(p(1.0, 2.0), boxed(80.0), &cluttered_room());
    let angles: Vec<f64> = observer
        .events
        .iter()
        .filter(|e| e.state != EndpointState::Start)
        .map(|e| e.angle)
        .collect();
    assert!(angles.len() > 10);
    for w in angles.windows(2) {
        assert!(w[0] < w[1], "{} then {}", w[0], w[1]);
    }
}

#[test]
fn crossing_walls_are_resolved_by_splitting() {
    let store = store_of([
        Occluder::new(p(-5.0, 10.0), p(5.0, 20.0)),
        Occluder::new(p(-5.0, 20.0), p(5.0, 10.0)),
    ]);
    let poly = sweep(p(0.0, 0.0), boxed(100.0), &store);
    assert!(poly.is_complete());
    assert!(has_vertex(&poly, p(0.0, 15.0)));
    assert!(has_vertex(&poly, p(5.0, 10.0)));
    assert!(has_vertex(&poly, p(-5.0, 10.0)));
    assert!(!poly.contains(&p(0.0, 17.0)));
}

#[test]
fn open_occluders_change_nothing() {
    let origin = p(1.0, 2.0);
    let base = cluttered_room();
    let mut with_door = cluttered_room();
    with_door.insert(Occluder::new(p(-3.0, 5.0), p(6.0, 5.0)).opened(true));
    assert_eq!(
        sweep(origin, boxed(80.0), &base).points,
        sweep(origin, boxed(80.0), &with_door).points
    );
}

#[test]
fn iteration_cap_aborts_with_partial_result() {
    let poly = sweep(p(1.0, 2.0), boxed(80.0).with_max_iterations(3), &cluttered_room());
    assert!(!poly.is_complete());
    assert!(matches!(
        poly.aborted,
        Some(SweepError::IterationLimit { stage: "sweep", limit: 3 })
    ));
}

#[test]
fn one_store_many_origins_in_parallel() {
    let store = cluttered_room();
    let origins = [p(1.0, 2.0), p(-15.0, 10.0), p(20.0, -10.0), p(0.0, -25.0)];
    let sequential: Vec<VisibilityPolygon> = origins
        .iter()
        .map(|o| sweep(*o, boxed(80.0), &store))
        .collect();
    let parallel: Vec<VisibilityPolygon> = std::thread::scope(|s| {
        let handles: Vec<_> = origins
            .iter()
            .map(|o| {
                let store = &store;
                s.spawn(move || sweep(*o, boxed(80.0), store))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(sequential, parallel);
}

// ── Co-angular endpoints ──

#[test]
fn co_angular_endpoints_keep_the_farther_wall() {
    // The near wall ends at (-5, 10); the far wall starts at (-10, 20) on the
    // same ray. Both are folded into one event.
    let store = store_of([
        Occluder::new(p(5.0, 10.0), p(-5.0, 10.0)),
        Occluder::new(p(-10.0, 20.0), p(-30.0, 20.0)),
    ]);
    let (poly, observer) = observe(p(0.0, 0.0), boxed(100.0), &store);
    let folded: Vec<_> = observer.events.iter().filter(|e| e.collapsed > 0).collect();
    assert_eq!(folded.len(), 1);
    assert_eq!(folded[0].point, p(-5.0, 10.0));
    assert_eq!(folded[0].collapsed, 1);
    assert_eq!(folded[0].incident, 2);
    assert_eq!(folded[0].state, EndpointState::EndOfWall);
    assert!(has_vertex(&poly, p(-5.0, 10.0)));
    assert!(has_vertex(&poly, p(-10.0, 20.0)));
    assert!(has_vertex(&poly, p(-30.0, 20.0)));
}

// ── Terrain exclusion ──

#[test]
fn three_terrain_walls_at_one_endpoint() {
    let tip = p(0.0, 10.0);
    let store = store_of([
        Occluder::terrain(tip, p(6.0, 14.0)),
        Occluder::terrain(tip, p(-6.0, 14.0)),
        Occluder::terrain(tip, p(3.0, 20.0)),
    ]);
    let (poly, observer) = observe(p(0.0, 0.0), boxed(100.0), &store);
    let event = observer.events.iter().find(|e| e.point == tip).unwrap();
    assert!(!event.terrain_excluded);
    // The middle arm is seen through the right one; the tip where it ends is
    // a vertex, its lone far end is excluded.
    assert!(has_vertex(&poly, tip));
    let far = observer.events.iter().find(|e| e.point == p(3.0, 20.0)).unwrap();
    assert!(far.terrain_excluded);
    assert!(!has_vertex(&poly, p(3.0, 20.0)));
    assert!(!has_vertex(&poly, p(6.0, 14.0)));
    assert!(!has_vertex(&poly, p(-6.0, 14.0)));
    // Both cuts on the far wall remain.
    assert!(has_vertex(&poly, p(15.0, 100.0)));
    assert!(has_vertex(&poly, p(0.0, 100.0)));
}

#[test]
fn terrain_with_one_sided_opaque_wall() {
    let tip = p(0.0, 10.0);
    let scene = |facing| {
        store_of([
            Occluder::terrain(p(5.0, 15.0), tip),
            // The origin is on the left of this wall's direction.
            Occluder::new(tip, p(-5.0, 15.0)).facing(facing),
        ])
    };

    let (poly, observer) = observe(p(0.0, 0.0), boxed(100.0), &scene(Facing::Left));
    let event = observer.events.iter().find(|e| e.point == tip).unwrap();
    assert!(!event.terrain_excluded);
    assert!(has_vertex(&poly, tip));

    let (poly, observer) = observe(p(0.0, 0.0), boxed(100.0), &scene(Facing::Right));
    let event = observer.events.iter().find(|e| e.point == tip).unwrap();
    assert!(event.terrain_excluded);
    assert!(!has_vertex(&poly, tip));
}

#[test]
fn excluded_terrain_endpoints_are_never_emitted() {
    let (poly, observer) = observe(p(1.0, 2.0), boxed(80.0), &cluttered_room());
    for event in observer.events.iter().filter(|e| e.terrain_excluded) {
        assert!(!has_vertex(&poly, event.point), "{:?} emitted", event.point);
    }
}

#[test]
fn terrain_behind_terrain_keeps_the_far_cuts_only() {
    let store = store_of([
        Occluder::terrain(p(-10.0, 10.0), p(10.0, 10.0)),
        Occluder::terrain(p(-5.0, 20.0), p(5.0, 20.0)),
    ]);
    let (poly, observer) = observe(p(0.0, 0.0), boxed(100.0), &store);
    // Each end of the second layer has a single terrain wall, so both are
    // excluded even though that layer is the frontier between them.
    for end in [p(5.0, 20.0), p(-5.0, 20.0)] {
        let event = observer.events.iter().find(|e| e.point == end).unwrap();
        assert!(event.terrain_excluded);
        assert_ne!(event.state, EndpointState::Behind);
        assert!(!has_vertex(&poly, end));
    }
    // The cuts on the box edge behind are still emitted.
    assert!(has_vertex(&poly, p(25.0, 100.0)));
    assert!(has_vertex(&poly, p(-25.0, 100.0)));
    assert!(poly.contains(&p(0.0, 15.0)));
    assert!(poly.is_complete());
}

// ── Closing ray ──

#[test]
fn wall_starting_on_the_closing_ray_bounds_the_wedge() {
    let origin = p(0.0, 0.0);
    // Starts on the 135 degree ray and runs out of the window.
    let store = store_of([Occluder::new(p(-3.0, 3.0), p(-6.0, 3.0))]);
    let (poly, observer) = observe(origin, boxed(50.0).with_angle(90.0, 0.0), &store);
    assert!(poly.is_complete());
    let n = poly.len();
    assert_eq!(poly.points[n - 1], origin);
    assert!((poly.points[n - 2] - p(-3.0, 3.0)).norm() < 1e-9);
    assert!((poly.points[n - 3] - p(-50.0, 50.0)).norm() < 1e-9);
    assert!((poly.area() - 2500.0).abs() < 1e-6);
    assert!(observer.vertices.contains(&p(-3.0, 3.0)));
    assert_no_consecutive_duplicates(&poly, true);
}

#[test]
fn wall_ending_on_the_closing_ray_is_the_last_cut() {
    let origin = p(0.0, 0.0);
    // Ends on the 135 degree ray; the box corner behind it is not emitted.
    let store = store_of([Occluder::new(p(0.0, 3.0), p(-3.0, 3.0))]);
    let poly = sweep(origin, boxed(50.0).with_angle(90.0, 0.0), &store);
    let n = poly.len();
    assert_eq!(poly.points[n - 1], origin);
    assert!((poly.points[n - 2] - p(-3.0, 3.0)).norm() < 1e-9);
    assert!(!has_vertex(&poly, p(-50.0, 50.0)));
    assert_no_consecutive_duplicates(&poly, true);
}
