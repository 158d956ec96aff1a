//! Rotation handlers: restriction, then clamping on the normalized circle.

#[cfg(test)]
#[path = "rotation_test.rs"]
mod rotation_test;

use crate::math::{angle_span, normalize_angle};
use crate::pipeline::{HandlerChain, HandlerContext};

#[must_use]
pub fn restrict_rotate_to(target: f64, ctx: &HandlerContext) -> f64 {
    if ctx.config.restrict_rotation { ctx.camera.rotation } else { target }
}

#[must_use]
pub fn restrict_rotate_by(delta: f64, ctx: &HandlerContext) -> f64 {
    if ctx.config.restrict_rotation { 0.0 } else { delta }
}

fn clamp_angle(angle: f64, ctx: &HandlerContext) -> f64 {
    let angle = normalize_angle(angle);
    match ctx.camera.rotation_boundaries {
        Some(bounds) => bounds.clamp(angle),
        None => angle,
    }
}

/// Rotate-to clamping stage. The result is normalized into `[0, 2π)`.
#[must_use]
pub fn clamp_rotate_to(target: f64, ctx: &HandlerContext) -> f64 {
    if !ctx.config.clamp_rotation {
        return target;
    }
    clamp_angle(target, ctx)
}

/// Rotate-by clamping stage.
///
/// The returned delta is the signed shortest span from the current rotation
/// to the clamped target, so a boundary is approached from the near side.
#[must_use]
pub fn clamp_rotate_by(delta: f64, ctx: &HandlerContext) -> f64 {
    if !ctx.config.clamp_rotation {
        return delta;
    }
    let current = ctx.camera.rotation;
    angle_span(current, clamp_angle(current + delta, ctx))
}

/// Default rotate-to pipeline: restrict, then clamp.
#[must_use]
pub fn rotate_to_chain() -> HandlerChain<f64, HandlerContext> {
    HandlerChain::new().with(restrict_rotate_to).with(clamp_rotate_to)
}

/// Default rotate-by pipeline: restrict, then clamp.
#[must_use]
pub fn rotate_by_chain() -> HandlerChain<f64, HandlerContext> {
    HandlerChain::new().with(restrict_rotate_by).with(clamp_rotate_by)
}
