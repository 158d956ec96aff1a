use serde_json::json;

use super::*;
use crate::camera::{CameraState, ZoomBoundaries};
use crate::config::HandlerConfig;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn ctx_at(zoom_level: f64, bounds: Option<ZoomBoundaries>, config: HandlerConfig) -> HandlerContext {
    let camera = CameraState { zoom_level, zoom_boundaries: bounds, ..CameraState::default() };
    HandlerContext::new(camera, config)
}

fn max_only(max: f64) -> Option<ZoomBoundaries> {
    Some(ZoomBoundaries { min: None, max: Some(max) })
}

// =============================================================
// Clamping
// =============================================================

#[test]
fn zoom_by_converges_on_upper_limit() {
    let c = ctx_at(2.8, max_only(3.0), HandlerConfig::default());
    let delta = clamp_zoom_by(0.5, &c);
    assert!(approx_eq(delta, 0.2), "{delta}");
    assert!(2.8 + delta <= 3.0 + EPSILON);
}

#[test]
fn zoom_by_converges_on_lower_limit() {
    let bounds = Some(ZoomBoundaries { min: Some(0.5), max: None });
    let c = ctx_at(0.7, bounds, HandlerConfig::default());
    assert!(approx_eq(clamp_zoom_by(-1.0, &c), -0.2));
}

#[test]
fn zoom_by_inside_limits_is_unchanged() {
    let c = ctx_at(1.0, Some(ZoomBoundaries::new(0.1, 10.0)), HandlerConfig::default());
    assert!(approx_eq(clamp_zoom_by(0.5, &c), 0.5));
}

#[test]
fn zoom_to_clamps_both_sides() {
    let c = ctx_at(1.0, Some(ZoomBoundaries::new(0.5, 4.0)), HandlerConfig::default());
    assert!(approx_eq(clamp_zoom_to(10.0, &c), 4.0));
    assert!(approx_eq(clamp_zoom_to(0.1, &c), 0.5));
    assert!(approx_eq(clamp_zoom_to(2.0, &c), 2.0));
}

#[test]
fn clamp_disabled_passes_through() {
    let config = HandlerConfig { clamp_zoom: false, ..HandlerConfig::default() };
    let c = ctx_at(2.8, max_only(3.0), config);
    assert!(approx_eq(clamp_zoom_by(0.5, &c), 0.5));
    assert!(approx_eq(clamp_zoom_to(9.0, &c), 9.0));
}

#[test]
fn no_boundaries_passes_through() {
    let c = ctx_at(1.0, None, HandlerConfig::default());
    assert!(approx_eq(clamp_zoom_to(50.0, &c), 50.0));
}

// =============================================================
// Restriction
// =============================================================

#[test]
fn restriction_vetoes_both_forms() {
    let config = HandlerConfig { restrict_zoom: true, ..HandlerConfig::default() };
    let c = ctx_at(1.5, None, config);
    assert!(approx_eq(restrict_zoom_to(3.0, &c), 1.5));
    assert!(approx_eq(restrict_zoom_by(0.4, &c), 0.0));
}

#[test]
fn restriction_off_passes_through() {
    let c = ctx_at(1.5, None, HandlerConfig::default());
    assert!(approx_eq(restrict_zoom_to(3.0, &c), 3.0));
    assert!(approx_eq(restrict_zoom_by(0.4, &c), 0.4));
}

#[test]
fn restriction_wins_over_clamping_in_chains() {
    let config = HandlerConfig { restrict_zoom: true, ..HandlerConfig::default() };
    let c = ctx_at(1.5, Some(ZoomBoundaries::new(2.0, 4.0)), config);
    assert!(approx_eq(zoom_to_chain().run(3.0, &c), 1.5));
    assert!(approx_eq(zoom_by_chain().run(1.0, &c), 0.0));
}

#[test]
fn chains_clamp_when_unrestricted() {
    let c = ctx_at(2.8, max_only(3.0), HandlerConfig::default());
    assert!(approx_eq(zoom_by_chain().run(0.5, &c), 0.2));
    assert!(approx_eq(zoom_to_chain().run(5.0, &c), 3.0));
}

// =============================================================
// Anchors
// =============================================================

#[test]
fn anchor_space_comparison() {
    let vp = ZoomAnchor::ViewPort(Point::new(1.0, 2.0));
    let world = ZoomAnchor::World(Point::new(1.0, 2.0));
    assert!(vp.same_space(ZoomAnchor::ViewPort(Point::ZERO)));
    assert!(!vp.same_space(world));
    assert_eq!(world.point(), Point::new(1.0, 2.0));
}

#[test]
fn anchor_serializes_with_space_tag() {
    let value = serde_json::to_value(ZoomAnchor::World(Point::new(3.0, 4.0))).unwrap();
    assert_eq!(value, json!({ "space": "world", "point": { "x": 3.0, "y": 4.0 } }));
}
