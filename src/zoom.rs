//! Zoom handlers. Clamping runs first and restriction last, so a restricted
//! zoom stays vetoed whatever the limits say.

#[cfg(test)]
#[path = "zoom_test.rs"]
mod zoom_test;

use serde::{Deserialize, Serialize};

use crate::math::Point;
use crate::pipeline::{HandlerChain, HandlerContext};

/// The point a zoom keeps visually stationary, tagged with the space it is given in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "space", content = "point", rename_all = "camelCase")]
pub enum ZoomAnchor {
    ViewPort(Point),
    World(Point),
}

impl ZoomAnchor {
    #[must_use]
    pub fn point(self) -> Point {
        match self {
            Self::ViewPort(p) | Self::World(p) => p,
        }
    }

    /// Whether two anchors are expressed in the same coordinate space.
    #[must_use]
    pub fn same_space(self, other: Self) -> bool {
        matches!((self, other), (Self::ViewPort(_), Self::ViewPort(_)) | (Self::World(_), Self::World(_)))
    }
}

fn clamp_level(zoom_level: f64, ctx: &HandlerContext) -> f64 {
    match ctx.camera.zoom_boundaries {
        Some(bounds) => bounds.clamp(zoom_level),
        None => zoom_level,
    }
}

/// Zoom-to clamping stage.
#[must_use]
pub fn clamp_zoom_to(target: f64, ctx: &HandlerContext) -> f64 {
    if !ctx.config.clamp_zoom {
        return target;
    }
    clamp_level(target, ctx)
}

/// Zoom-by clamping stage: the delta that lands on the clamped level.
#[must_use]
pub fn clamp_zoom_by(delta: f64, ctx: &HandlerContext) -> f64 {
    if !ctx.config.clamp_zoom {
        return delta;
    }
    let current = ctx.camera.zoom_level;
    clamp_level(current + delta, ctx) - current
}

#[must_use]
pub fn restrict_zoom_to(target: f64, ctx: &HandlerContext) -> f64 {
    if ctx.config.restrict_zoom { ctx.camera.zoom_level } else { target }
}

#[must_use]
pub fn restrict_zoom_by(delta: f64, ctx: &HandlerContext) -> f64 {
    if ctx.config.restrict_zoom { 0.0 } else { delta }
}

/// Default zoom-to pipeline: clamp, then restrict.
#[must_use]
pub fn zoom_to_chain() -> HandlerChain<f64, HandlerContext> {
    HandlerChain::new().with(clamp_zoom_to).with(restrict_zoom_to)
}

/// Default zoom-by pipeline: clamp, then restrict.
#[must_use]
pub fn zoom_by_chain() -> HandlerChain<f64, HandlerContext> {
    HandlerChain::new().with(clamp_zoom_by).with(restrict_zoom_by)
}
