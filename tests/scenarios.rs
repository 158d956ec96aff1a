//! End-to-end flows: gesture or animation → mux → rig → camera.

use std::f64::consts::FRAC_PI_2;

use board_camera::{
    AnimationAndLockMux, BoardCamera, Boundaries, Camera, CameraMux, CameraRig, HandlerConfig, InputFlowState, Point,
    Relay, ZoomAnchor, ZoomBoundaries,
};
use board_camera::camera::CameraState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn bounded_rig(config: HandlerConfig) -> CameraRig<BoardCamera> {
    let camera = BoardCamera::new(1000.0, 1000.0).with_boundaries(Boundaries::new(pt(-500.0, -500.0), pt(500.0, 500.0)));
    CameraRig::with_config(camera, config)
}

#[test]
fn pan_past_boundary_stops_at_edge() {
    init_tracing();
    let mut rig = bounded_rig(HandlerConfig { limit_entire_view_port: false, ..HandlerConfig::default() });
    rig.pan_by_world(pt(600.0, 0.0)).unwrap();
    assert_eq!(rig.camera().position(), pt(500.0, 0.0));
}

#[test]
fn relay_forwards_every_gesture() {
    init_tracing();
    let mut mux: Box<dyn CameraMux> = Box::new(Relay);
    let mut rig = CameraRig::new(BoardCamera::default());

    for _ in 0..3 {
        if let Some(out) = mux.notify_pan_input(pt(10.0, -5.0)).passed() {
            rig.apply_pan(out).unwrap();
        }
    }
    if let Some(out) = mux.notify_rotation_input(FRAC_PI_2).passed() {
        rig.apply_rotation(out).unwrap();
    }
    assert_eq!(rig.camera().position(), pt(30.0, -15.0));
    assert!((rig.camera().rotation() - FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn user_drag_interrupts_fly_to_animation() {
    init_tracing();
    let mut mux = AnimationAndLockMux::new();
    let mut rig = CameraRig::new(BoardCamera::default());

    mux.initiate_pan_transition().unwrap();
    for step in 1..=3 {
        let target = pt(f64::from(step) * 100.0, 0.0);
        let verdict = mux.notify_pan_to_animation_input(target);
        assert!(verdict.allow_pass_through);
        rig.apply_pan(verdict.output).unwrap();
    }
    assert_eq!(rig.camera().position(), pt(300.0, 0.0));

    // The user grabs the canvas mid-flight.
    let drag = mux.notify_pan_input(pt(-20.0, 0.0));
    rig.apply_pan(drag.output).unwrap();
    assert_eq!(mux.pan_state_machine().state(), InputFlowState::AcceptingUserInput);

    // Later animation frames are refused and must not be applied.
    let late = mux.notify_pan_to_animation_input(pt(400.0, 0.0));
    assert!(late.passed().is_none());
    assert_eq!(rig.camera().position(), pt(280.0, 0.0));
}

#[test]
fn follow_object_locks_out_user_until_unlocked() {
    init_tracing();
    let mut mux = AnimationAndLockMux::new();
    let mut rig = CameraRig::new(BoardCamera::default());

    for x in [10.0, 20.0, 30.0] {
        let verdict = mux.notify_locked_on_object_pan_input(pt(x, x));
        rig.apply_pan(verdict.passed().unwrap()).unwrap();
    }
    let zoom = mux.notify_locked_on_object_zoom_input(2.0, Some(ZoomAnchor::World(pt(30.0, 30.0))));
    rig.apply_zoom(zoom.passed().unwrap()).unwrap();

    assert!(mux.notify_pan_input(pt(100.0, 0.0)).passed().is_none());
    assert!(mux.notify_zoom_input(0.5, Point::ZERO).passed().is_none());
    assert_eq!(rig.camera().position(), pt(30.0, 30.0));
    assert!((rig.camera().zoom_level() - 2.0).abs() < 1e-12);

    mux.unlock_pan().unwrap();
    let drag = mux.notify_pan_input(pt(5.0, 0.0));
    rig.apply_pan(drag.passed().unwrap()).unwrap();
    assert_eq!(rig.camera().position(), pt(35.0, 30.0));
}

#[test]
fn gestures_within_a_frame_resolve_once_per_tick() {
    init_tracing();
    let mut mux = AnimationAndLockMux::new();
    let mut rig = CameraRig::new(BoardCamera::default());
    let pans = std::rc::Rc::new(std::cell::RefCell::new(0_u32));
    let counter = std::rc::Rc::clone(&pans);
    rig.camera_mut().on(board_camera::CameraEventKind::Pan, move |_| *counter.borrow_mut() += 1);

    // Frame 1: five pointer moves.
    for _ in 0..5 {
        rig.queue_pan(mux.notify_pan_input(pt(2.0, 1.0)).output);
    }
    assert_eq!(rig.camera().position(), Point::ZERO);
    rig.update().unwrap();
    assert_eq!(rig.camera().position(), pt(10.0, 5.0));
    assert_eq!(*pans.borrow(), 1);

    // Frame 2: nothing queued.
    rig.update().unwrap();
    assert_eq!(*pans.borrow(), 1);

    // Frame 3: a wheel zoom burst about one viewport point.
    let anchor = pt(250.0, -100.0);
    let before = rig.camera().view_port_to_world(anchor);
    for _ in 0..4 {
        rig.queue_zoom(mux.notify_zoom_input(0.125, anchor).output);
    }
    rig.update().unwrap();
    assert!((rig.camera().zoom_level() - 1.5).abs() < 1e-12);
    assert!(rig.camera().view_port_to_world(anchor).approx_eq(before, 1e-6));
}

#[test]
fn zoom_out_under_entire_view_port_limit_stays_inside() {
    init_tracing();
    let camera = BoardCamera::new(400.0, 300.0)
        .with_boundaries(Boundaries::new(pt(-500.0, -500.0), pt(500.0, 500.0)))
        .with_zoom_boundaries(ZoomBoundaries::new(0.5, 8.0));
    let mut rig = CameraRig::new(camera);
    rig.zoom_to(4.0).unwrap();
    rig.pan_by_world(pt(480.0, 480.0)).unwrap();
    rig.zoom_to_at(1.0, pt(200.0, 150.0)).unwrap();

    let state = rig.camera().state();
    for corner in [pt(-200.0, -150.0), pt(200.0, -150.0), pt(200.0, 150.0), pt(-200.0, 150.0)] {
        let world = state.view_port_to_world(corner);
        assert!(world.x.abs() <= 500.0 + 1e-6 && world.y.abs() <= 500.0 + 1e-6, "{corner:?} -> {world:?}");
    }
}

#[test]
fn random_anchors_stay_put() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(0x00C0_FFEE);
    for _ in 0..200 {
        let state = CameraState {
            position: pt(rng.random_range(-1000.0..1000.0), rng.random_range(-1000.0..1000.0)),
            zoom_level: rng.random_range(0.2..5.0),
            rotation: rng.random_range(0.0..std::f64::consts::TAU),
            ..CameraState::default()
        };
        let anchor = pt(rng.random_range(-500.0..500.0), rng.random_range(-500.0..500.0));
        let target = rng.random_range(0.2..5.0);

        let mut rig = CameraRig::new(BoardCamera::from_state(state));
        let before = rig.camera().view_port_to_world(anchor);
        rig.zoom_to_at(target, anchor).unwrap();
        let after = rig.camera().view_port_to_world(anchor);
        assert!(after.approx_eq(before, 1e-6), "{state:?} anchor {anchor:?} zoom {target}: {before:?} -> {after:?}");

        let world_anchor = before;
        let on_screen = rig.camera().world_to_view_port(world_anchor);
        rig.zoom_by_at_world(rng.random_range(-0.1..1.0), world_anchor).unwrap();
        assert!(rig.camera().world_to_view_port(world_anchor).approx_eq(on_screen, 1e-6));
    }
}
