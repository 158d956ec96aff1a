//! The camera rig: the single mutation surface for a [`Camera`].
//!
//! Every operation snapshots the camera and the current [`HandlerConfig`],
//! runs the matching handler chain, and commits the result through the
//! camera's setters. A refused setter surfaces as a [`RigError`].
//!
//! Zooming about an anchor keeps the anchor visually still. For a viewport
//! anchor the rig compares the anchor's world position before and after the
//! zoom; for a world anchor it compares the anchor's viewport position. The
//! difference becomes a world-space pan that runs through the pan-by chain,
//! so boundary clamping still applies to the compensation. If the camera
//! refuses that pan, the zoom is rolled back before the error is returned;
//! rotation and its re-clamp are rolled back the same way.
//!
//! Requests can also be queued and resolved once per frame by [`CameraRig::update`].

#[cfg(test)]
#[path = "rig_test.rs"]
mod rig_test;

use tracing::{debug, trace};

use crate::batch::{CameraUpdateBatcher, Update, ZoomUpdate};
use crate::camera::Camera;
use crate::config::{HandlerConfig, HandlerConfigPatch};
use crate::consts::CHANGE_EPSILON;
use crate::flow::{PanOutput, RotateOutput, ZoomOutput};
use crate::math::Point;
use crate::pan::{pan_by_chain, pan_to_chain};
use crate::pipeline::{HandlerChain, HandlerContext};
use crate::rotation::{rotate_by_chain, rotate_to_chain};
use crate::zoom::{ZoomAnchor, zoom_by_chain, zoom_to_chain};

/// The camera refused a value the rig computed.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RigError {
    #[error("camera rejected position {requested:?}")]
    PositionRejected { requested: Point },
    #[error("camera rejected zoom level {requested}")]
    ZoomRejected { requested: f64 },
    #[error("camera rejected rotation {requested}")]
    RotationRejected { requested: f64 },
}

/// The six pipelines a rig runs. [`Default`] gives restriction and clamping
/// in the standard order; replace a chain to customise one operation family.
#[derive(Debug, Clone)]
pub struct RigHandlers {
    pub pan_by: HandlerChain<Point, HandlerContext>,
    pub pan_to: HandlerChain<Point, HandlerContext>,
    pub zoom_by: HandlerChain<f64, HandlerContext>,
    pub zoom_to: HandlerChain<f64, HandlerContext>,
    pub rotate_by: HandlerChain<f64, HandlerContext>,
    pub rotate_to: HandlerChain<f64, HandlerContext>,
}

impl Default for RigHandlers {
    fn default() -> Self {
        Self {
            pan_by: pan_by_chain(),
            pan_to: pan_to_chain(),
            zoom_by: zoom_by_chain(),
            zoom_to: zoom_to_chain(),
            rotate_by: rotate_by_chain(),
            rotate_to: rotate_to_chain(),
        }
    }
}

/// Drives a camera through the handler pipelines.
#[derive(Debug)]
pub struct CameraRig<C> {
    camera: C,
    config: HandlerConfig,
    handlers: RigHandlers,
    batcher: CameraUpdateBatcher,
}

impl<C: Camera> CameraRig<C> {
    /// A rig with the default configuration and handler chains.
    #[must_use]
    pub fn new(camera: C) -> Self {
        Self::with_config(camera, HandlerConfig::default())
    }

    #[must_use]
    pub fn with_config(camera: C, config: HandlerConfig) -> Self {
        Self { camera, config, handlers: RigHandlers::default(), batcher: CameraUpdateBatcher::new() }
    }

    #[must_use]
    pub fn with_handlers(mut self, handlers: RigHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn into_camera(self) -> C {
        self.camera
    }

    #[must_use]
    pub fn config(&self) -> HandlerConfig {
        self.config
    }

    pub fn set_config(&mut self, config: HandlerConfig) {
        self.config = config;
    }

    /// Shallow-merge `patch` into the configuration. Takes effect on the next operation.
    pub fn configure(&mut self, patch: &HandlerConfigPatch) {
        self.config.apply(patch);
        trace!(config = ?self.config, "rig: configured");
    }

    pub fn handlers(&self) -> &RigHandlers {
        &self.handlers
    }

    pub fn handlers_mut(&mut self) -> &mut RigHandlers {
        &mut self.handlers
    }

    #[must_use]
    pub fn has_pending_updates(&self) -> bool {
        self.batcher.has_pending_updates()
    }

    fn context(&self) -> HandlerContext {
        HandlerContext::new(self.camera.state(), self.config)
    }

    // -------------------------------------------------------------------------
    // Commit
    // -------------------------------------------------------------------------

    fn commit_position(&mut self, position: Point) -> Result<(), RigError> {
        if self.camera.set_position(position) {
            trace!(?position, "rig: position set");
            Ok(())
        } else {
            debug!(?position, "rig: camera rejected position");
            Err(RigError::PositionRejected { requested: position })
        }
    }

    fn commit_zoom(&mut self, zoom_level: f64) -> Result<(), RigError> {
        if self.camera.set_zoom_level(zoom_level) {
            trace!(zoom_level, "rig: zoom level set");
            Ok(())
        } else {
            debug!(zoom_level, "rig: camera rejected zoom level");
            Err(RigError::ZoomRejected { requested: zoom_level })
        }
    }

    fn commit_rotation(&mut self, rotation: f64) -> Result<(), RigError> {
        if self.camera.set_rotation(rotation) {
            trace!(rotation, "rig: rotation set");
            Ok(())
        } else {
            debug!(rotation, "rig: camera rejected rotation");
            Err(RigError::RotationRejected { requested: rotation })
        }
    }

    /// Undo a committed zoom whose follow-up pan was refused.
    fn restore_zoom(&mut self, zoom_level: f64) {
        if self.camera.set_zoom_level(zoom_level) {
            trace!(zoom_level, "rig: zoom level restored");
        } else {
            debug!(zoom_level, "rig: camera refused to restore zoom level");
        }
    }

    fn restore_rotation(&mut self, rotation: f64) {
        if self.camera.set_rotation(rotation) {
            trace!(rotation, "rig: rotation restored");
        } else {
            debug!(rotation, "rig: camera refused to restore rotation");
        }
    }

    // -------------------------------------------------------------------------
    // Pan
    // -------------------------------------------------------------------------

    /// Pan by a world-space delta.
    pub fn pan_by_world(&mut self, delta: Point) -> Result<(), RigError> {
        let ctx = self.context();
        let delta = self.handlers.pan_by.run(delta, &ctx);
        self.commit_position(ctx.camera.position + delta)
    }

    /// Move the camera centre to a world-space point.
    pub fn pan_to_world(&mut self, target: Point) -> Result<(), RigError> {
        let ctx = self.context();
        let destination = self.handlers.pan_to.run(target, &ctx);
        self.commit_position(destination)
    }

    /// Pan by a viewport-space delta, e.g. a pointer drag.
    pub fn pan_by_view_port(&mut self, delta: Point) -> Result<(), RigError> {
        let world = self.camera.state().view_port_delta_to_world(delta);
        self.pan_by_world(world)
    }

    /// Centre the camera on whatever world point is under `target` in the viewport.
    pub fn pan_to_view_port(&mut self, target: Point) -> Result<(), RigError> {
        let world = self.camera.view_port_to_world(target);
        self.pan_to_world(world)
    }

    // -------------------------------------------------------------------------
    // Zoom
    // -------------------------------------------------------------------------

    /// Zoom to `target` keeping the viewport centre fixed.
    pub fn zoom_to(&mut self, target: f64) -> Result<(), RigError> {
        let before = self.context();
        let zoom_level = self.handlers.zoom_to.run(target, &before);
        self.zoom_about_view_port(before, zoom_level, Point::ZERO)
    }

    /// Zoom by `delta` keeping the viewport centre fixed.
    pub fn zoom_by(&mut self, delta: f64) -> Result<(), RigError> {
        let before = self.context();
        let delta = self.handlers.zoom_by.run(delta, &before);
        self.zoom_about_view_port(before, before.camera.zoom_level + delta, Point::ZERO)
    }

    /// Zoom to `target` keeping the viewport point `anchor` fixed.
    pub fn zoom_to_at(&mut self, target: f64, anchor: Point) -> Result<(), RigError> {
        let before = self.context();
        let zoom_level = self.handlers.zoom_to.run(target, &before);
        self.zoom_about_view_port(before, zoom_level, anchor)
    }

    /// Zoom by `delta` keeping the viewport point `anchor` fixed.
    ///
    /// The delta is scaled by the current zoom level first, so a gesture of
    /// the same size feels the same at every scale.
    pub fn zoom_by_at(&mut self, delta: f64, anchor: Point) -> Result<(), RigError> {
        let scaled = delta * self.camera.zoom_level();
        self.zoom_by_at_scaled(scaled, anchor)
    }

    /// [`Self::zoom_by_at`] with a delta that is already in zoom-level units.
    fn zoom_by_at_scaled(&mut self, delta: f64, anchor: Point) -> Result<(), RigError> {
        let before = self.context();
        let delta = self.handlers.zoom_by.run(delta, &before);
        self.zoom_about_view_port(before, before.camera.zoom_level + delta, anchor)
    }

    /// Zoom to `target` keeping the world point `anchor` at the same place on screen.
    pub fn zoom_to_at_world(&mut self, target: f64, anchor: Point) -> Result<(), RigError> {
        let before = self.context();
        let zoom_level = self.handlers.zoom_to.run(target, &before);
        self.zoom_about_world(before, zoom_level, anchor)
    }

    /// Zoom by `delta` keeping the world point `anchor` at the same place on screen. Unscaled.
    pub fn zoom_by_at_world(&mut self, delta: f64, anchor: Point) -> Result<(), RigError> {
        let before = self.context();
        let delta = self.handlers.zoom_by.run(delta, &before);
        self.zoom_about_world(before, before.camera.zoom_level + delta, anchor)
    }

    fn zoom_about_view_port(&mut self, before: HandlerContext, zoom_level: f64, anchor: Point) -> Result<(), RigError> {
        if (zoom_level - before.camera.zoom_level).abs() <= CHANGE_EPSILON {
            return Ok(());
        }
        let anchor_before = before.camera.view_port_to_world(anchor);
        self.commit_zoom(zoom_level)?;

        let after = self.context();
        let anchor_after = after.camera.view_port_to_world(anchor);
        let compensation = self.handlers.pan_by.run(anchor_before - anchor_after, &after);
        self.commit_position(after.camera.position + compensation)
            .inspect_err(|_| self.restore_zoom(before.camera.zoom_level))
    }

    fn zoom_about_world(&mut self, before: HandlerContext, zoom_level: f64, anchor: Point) -> Result<(), RigError> {
        if (zoom_level - before.camera.zoom_level).abs() <= CHANGE_EPSILON {
            return Ok(());
        }
        let on_screen_before = before.camera.world_to_view_port(anchor);
        self.commit_zoom(zoom_level)?;

        let after = self.context();
        let on_screen_after = after.camera.world_to_view_port(anchor);
        let drift = after.camera.view_port_delta_to_world(on_screen_after - on_screen_before);
        let compensation = self.handlers.pan_by.run(drift, &after);
        self.commit_position(after.camera.position + compensation)
            .inspect_err(|_| self.restore_zoom(before.camera.zoom_level))
    }

    // -------------------------------------------------------------------------
    // Rotate
    // -------------------------------------------------------------------------

    pub fn rotate_by(&mut self, delta: f64) -> Result<(), RigError> {
        let ctx = self.context();
        let delta = self.handlers.rotate_by.run(delta, &ctx);
        self.commit_rotation(ctx.camera.rotation + delta)?;
        self.reclamp_after_rotation().inspect_err(|_| self.restore_rotation(ctx.camera.rotation))
    }

    pub fn rotate_to(&mut self, target: f64) -> Result<(), RigError> {
        let ctx = self.context();
        let rotation = self.handlers.rotate_to.run(target, &ctx);
        self.commit_rotation(rotation)?;
        self.reclamp_after_rotation().inspect_err(|_| self.restore_rotation(ctx.camera.rotation))
    }

    /// Rotating can swing viewport corners past the boundaries; pull the camera back in.
    fn reclamp_after_rotation(&mut self) -> Result<(), RigError> {
        if !self.config.limit_entire_view_port {
            return Ok(());
        }
        let ctx = self.context();
        let position = self.handlers.pan_to.run(ctx.camera.position, &ctx);
        if position.approx_eq(ctx.camera.position, CHANGE_EPSILON) {
            return Ok(());
        }
        self.commit_position(position)
    }

    // -------------------------------------------------------------------------
    // Mux outputs
    // -------------------------------------------------------------------------

    pub fn apply_pan(&mut self, output: PanOutput) -> Result<(), RigError> {
        match output {
            PanOutput::By { delta } => self.pan_by_world(delta),
            PanOutput::To { target } => self.pan_to_world(target),
        }
    }

    pub fn apply_zoom(&mut self, output: ZoomOutput) -> Result<(), RigError> {
        match output {
            ZoomOutput::By { delta, anchor: None } => self.zoom_by(delta),
            ZoomOutput::By { delta, anchor: Some(ZoomAnchor::ViewPort(p)) } => self.zoom_by_at(delta, p),
            ZoomOutput::By { delta, anchor: Some(ZoomAnchor::World(p)) } => self.zoom_by_at_world(delta, p),
            ZoomOutput::To { target, anchor: None } => self.zoom_to(target),
            ZoomOutput::To { target, anchor: Some(ZoomAnchor::ViewPort(p)) } => self.zoom_to_at(target, p),
            ZoomOutput::To { target, anchor: Some(ZoomAnchor::World(p)) } => self.zoom_to_at_world(target, p),
        }
    }

    pub fn apply_rotation(&mut self, output: RotateOutput) -> Result<(), RigError> {
        match output {
            RotateOutput::By { delta } => self.rotate_by(delta),
            RotateOutput::To { target } => self.rotate_to(target),
        }
    }

    pub fn queue_pan(&mut self, output: PanOutput) {
        match output {
            PanOutput::By { delta } => self.batcher.queue_position_update_by(delta),
            PanOutput::To { target } => self.batcher.queue_position_update_to(target),
        }
    }

    pub fn queue_zoom(&mut self, output: ZoomOutput) {
        match output {
            ZoomOutput::By { delta, anchor: Some(ZoomAnchor::ViewPort(p)) } => self.queue_zoom_by_at(delta, p),
            ZoomOutput::By { delta, anchor } => self.batcher.queue_zoom_update_by(delta, anchor),
            ZoomOutput::To { target, anchor } => self.batcher.queue_zoom_update_to(target, anchor),
        }
    }

    pub fn queue_rotation(&mut self, output: RotateOutput) {
        match output {
            RotateOutput::By { delta } => self.batcher.queue_rotation_update_by(delta),
            RotateOutput::To { target } => self.batcher.queue_rotation_update_to(target),
        }
    }

    // -------------------------------------------------------------------------
    // Queued operations
    // -------------------------------------------------------------------------

    pub fn queue_pan_by_world(&mut self, delta: Point) {
        self.batcher.queue_position_update_by(delta);
    }

    pub fn queue_pan_to_world(&mut self, target: Point) {
        self.batcher.queue_position_update_to(target);
    }

    /// Converted to world space with the camera as it is now, not at drain time.
    pub fn queue_pan_by_view_port(&mut self, delta: Point) {
        let world = self.camera.state().view_port_delta_to_world(delta);
        self.batcher.queue_position_update_by(world);
    }

    pub fn queue_zoom_by(&mut self, delta: f64) {
        self.batcher.queue_zoom_update_by(delta, None);
    }

    pub fn queue_zoom_to(&mut self, target: f64) {
        self.batcher.queue_zoom_update_to(target, None);
    }

    /// Scaled by the zoom level as it is now, like [`Self::zoom_by_at`], so the
    /// queued delta adds to a pending destination in zoom-level units.
    pub fn queue_zoom_by_at(&mut self, delta: f64, anchor: Point) {
        let scaled = delta * self.camera.zoom_level();
        self.batcher.queue_zoom_update_by(scaled, Some(ZoomAnchor::ViewPort(anchor)));
    }

    pub fn queue_zoom_to_at(&mut self, target: f64, anchor: Point) {
        self.batcher.queue_zoom_update_to(target, Some(ZoomAnchor::ViewPort(anchor)));
    }

    pub fn queue_zoom_by_at_world(&mut self, delta: f64, anchor: Point) {
        self.batcher.queue_zoom_update_by(delta, Some(ZoomAnchor::World(anchor)));
    }

    pub fn queue_zoom_to_at_world(&mut self, target: f64, anchor: Point) {
        self.batcher.queue_zoom_update_to(target, Some(ZoomAnchor::World(anchor)));
    }

    pub fn queue_rotate_by(&mut self, delta: f64) {
        self.batcher.queue_rotation_update_by(delta);
    }

    pub fn queue_rotate_to(&mut self, target: f64) {
        self.batcher.queue_rotation_update_to(target);
    }

    // -------------------------------------------------------------------------
    // Frame update
    // -------------------------------------------------------------------------

    /// Resolve queued requests: zoom, then position, then rotation.
    ///
    /// Every axis is drained even if an earlier one fails; the first failure is returned.
    pub fn update(&mut self) -> Result<(), RigError> {
        let zoom = self.update_zoom();
        let position = self.update_position();
        let rotation = self.update_rotation();
        zoom.and(position).and(rotation)
    }

    pub fn update_zoom(&mut self) -> Result<(), RigError> {
        let Some(ZoomUpdate { update, anchor }) = self.batcher.process_zoom_update() else {
            return Ok(());
        };
        trace!(?update, ?anchor, "rig: applying queued zoom");
        match (update, anchor) {
            (Update::Delta(delta), Some(ZoomAnchor::ViewPort(p))) => self.zoom_by_at_scaled(delta, p),
            (Update::Delta(delta), anchor) => self.apply_zoom(ZoomOutput::By { delta, anchor }),
            (Update::Destination(target), anchor) => self.apply_zoom(ZoomOutput::To { target, anchor }),
        }
    }

    pub fn update_position(&mut self) -> Result<(), RigError> {
        let Some(update) = self.batcher.process_position_update() else {
            return Ok(());
        };
        trace!(?update, "rig: applying queued pan");
        match update {
            Update::Delta(delta) => self.pan_by_world(delta),
            Update::Destination(target) => self.pan_to_world(target),
        }
    }

    pub fn update_rotation(&mut self) -> Result<(), RigError> {
        let Some(update) = self.batcher.process_rotation_update() else {
            return Ok(());
        };
        trace!(?update, "rig: applying queued rotation");
        match update {
            Update::Delta(delta) => self.rotate_by(delta),
            Update::Destination(target) => self.rotate_to(target),
        }
    }
}
