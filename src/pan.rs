//! Pan handlers: restriction then clamping, for deltas and absolute destinations.
//!
//! Restriction always works on a world-space delta. `pan_to` destinations are
//! turned into a delta from the current position, restricted, and re-added, so
//! an axis lock behaves the same whichever call style the caller uses.
//! Clamping then bounds the resulting position; for `pan_by` the clamped
//! position is turned back into a delta, truncating an overshoot instead of
//! rejecting it.

#[cfg(test)]
#[path = "pan_test.rs"]
mod pan_test;

use crate::camera::{Boundaries, CameraState};
use crate::config::HandlerConfig;
use crate::math::Point;
use crate::pipeline::{HandlerChain, HandlerContext};

// =============================================================================
// RESTRICTION
// =============================================================================

/// Remove the components of `delta` that the configuration forbids.
///
/// Locking both world axes, or both camera-relative axes, zeroes the delta
/// outright. Locking the relative x axis keeps only the projection onto the
/// camera's rotated up vector; locking relative y keeps only the projection
/// onto the rotated right vector.
#[must_use]
pub fn restrict_delta(delta: Point, rotation: f64, config: &HandlerConfig) -> Point {
    if config.restrict_x_translation && config.restrict_y_translation {
        return Point::ZERO;
    }
    if config.restrict_relative_x_translation && config.restrict_relative_y_translation {
        return Point::ZERO;
    }

    let mut out = delta;
    if config.restrict_x_translation {
        out.x = 0.0;
    }
    if config.restrict_y_translation {
        out.y = 0.0;
    }
    if config.restrict_relative_x_translation {
        let up = Point::new(0.0, 1.0).rotate(rotation);
        out = up * up.dot(out);
    }
    if config.restrict_relative_y_translation {
        let right = Point::new(1.0, 0.0).rotate(rotation);
        out = right * right.dot(out);
    }
    out
}

/// Pan-by restriction stage.
#[must_use]
pub fn restrict_pan_by(delta: Point, ctx: &HandlerContext) -> Point {
    restrict_delta(delta, ctx.camera.rotation, &ctx.config)
}

/// Pan-to restriction stage.
#[must_use]
pub fn restrict_pan_to(destination: Point, ctx: &HandlerContext) -> Point {
    let current = ctx.camera.position;
    current + restrict_delta(destination - current, ctx.camera.rotation, &ctx.config)
}

// =============================================================================
// CLAMPING
// =============================================================================

/// Half extents of the world-space box that encloses the rotated, zoomed viewport.
#[must_use]
pub fn view_port_half_extents(camera: &CameraState) -> Point {
    let width = camera.view_port_width / camera.zoom_level;
    let height = camera.view_port_height / camera.zoom_level;
    let (sin, cos) = camera.rotation.sin_cos();
    Point::new(
        ((width * cos).abs() + (height * sin).abs()) * 0.5,
        ((width * sin).abs() + (height * cos).abs()) * 0.5,
    )
}

/// Clamp a camera position so every corner of the viewport stays inside `boundaries`.
///
/// On an axis where the viewport is wider than the boundary, the camera is
/// centred between the two limits.
#[must_use]
pub fn clamp_position_entire_view_port(position: Point, camera: &CameraState, boundaries: &Boundaries) -> Point {
    let half = view_port_half_extents(camera);
    Point::new(
        clamp_axis(position.x, boundaries.min.map(|p| p.x), boundaries.max.map(|p| p.x), half.x),
        clamp_axis(position.y, boundaries.min.map(|p| p.y), boundaries.max.map(|p| p.y), half.y),
    )
}

fn clamp_axis(value: f64, min: Option<f64>, max: Option<f64>, half: f64) -> f64 {
    let low = min.map(|m| m + half);
    let high = max.map(|m| m - half);
    if let (Some(low), Some(high)) = (low, high) {
        if low > high {
            return (low + high) * 0.5;
        }
    }
    let mut out = value;
    if let Some(low) = low {
        out = out.max(low);
    }
    if let Some(high) = high {
        out = out.min(high);
    }
    out
}

/// Bound a candidate camera position according to the configuration.
#[must_use]
pub fn clamp_position(position: Point, camera: &CameraState, config: &HandlerConfig) -> Point {
    if !config.clamp_translation {
        return position;
    }
    let Some(boundaries) = camera.boundaries else {
        return position;
    };
    if config.limit_entire_view_port {
        clamp_position_entire_view_port(position, camera, &boundaries)
    } else {
        boundaries.clamp(position)
    }
}

/// Pan-by clamping stage: truncate the delta at the boundary.
#[must_use]
pub fn clamp_pan_by(delta: Point, ctx: &HandlerContext) -> Point {
    if !ctx.config.clamp_translation {
        return delta;
    }
    let current = ctx.camera.position;
    clamp_position(current + delta, &ctx.camera, &ctx.config) - current
}

/// Pan-to clamping stage.
#[must_use]
pub fn clamp_pan_to(destination: Point, ctx: &HandlerContext) -> Point {
    clamp_position(destination, &ctx.camera, &ctx.config)
}

// =============================================================================
// CHAINS
// =============================================================================

/// Default pan-by pipeline: restrict, then clamp.
#[must_use]
pub fn pan_by_chain() -> HandlerChain<Point, HandlerContext> {
    HandlerChain::new().with(restrict_pan_by).with(clamp_pan_by)
}

/// Default pan-to pipeline: restrict, then clamp.
#[must_use]
pub fn pan_to_chain() -> HandlerChain<Point, HandlerContext> {
    HandlerChain::new().with(restrict_pan_to).with(clamp_pan_to)
}
