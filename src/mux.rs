//! The façade gesture and animation code talks to.
//!
//! A mux turns a raw notification into a verdict: whether the input may reach
//! the rig, and the payload to apply if it may. It never calls the rig itself.

#[cfg(test)]
#[path = "mux_test.rs"]
mod mux_test;

use tracing::debug;

use crate::flow::{
    FlowEvent, InputFlowMachine, PanEvent, PanOutput, PanStateMachine, RotateEvent, RotateOutput, RotateStateMachine,
    UnhandledEvent, ZoomEvent, ZoomOutput, ZoomStateMachine,
};
use crate::math::Point;
use crate::zoom::ZoomAnchor;

/// A mux verdict. `output` is the requested payload even when the input is blocked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuxOutput<O> {
    pub allow_pass_through: bool,
    pub output: O,
}

impl<O> MuxOutput<O> {
    #[must_use]
    pub fn pass(output: O) -> Self {
        Self { allow_pass_through: true, output }
    }

    #[must_use]
    pub fn blocked(output: O) -> Self {
        Self { allow_pass_through: false, output }
    }

    /// The payload if it may be applied.
    pub fn passed(self) -> Option<O> {
        self.allow_pass_through.then_some(self.output)
    }
}

/// Input notifications. Viewport points have their origin at the viewport centre.
pub trait CameraMux {
    /// User pan gesture, world-space delta.
    fn notify_pan_input(&mut self, delta: Point) -> MuxOutput<PanOutput>;

    /// Animation frame moving the camera to `target`.
    fn notify_pan_to_animation_input(&mut self, target: Point) -> MuxOutput<PanOutput>;

    /// User zoom gesture anchored at a viewport point.
    fn notify_zoom_input(&mut self, delta: f64, anchor: Point) -> MuxOutput<ZoomOutput>;

    /// Animation frame zooming to `target`, optionally anchored at a viewport point.
    fn notify_zoom_input_animation(&mut self, target: f64, anchor: Option<Point>) -> MuxOutput<ZoomOutput>;

    /// Animation frame zooming to `target`, optionally anchored at a world point.
    fn notify_zoom_input_animation_world(&mut self, target: f64, anchor: Option<Point>) -> MuxOutput<ZoomOutput>;

    /// User rotation gesture.
    fn notify_rotation_input(&mut self, delta: f64) -> MuxOutput<RotateOutput>;

    /// Animation frame rotating to `target`.
    fn notify_rotate_to_animation_input(&mut self, target: f64) -> MuxOutput<RotateOutput>;
}

// =============================================================================
// RELAY
// =============================================================================

/// Stateless mux that lets everything through.
#[derive(Debug, Clone, Copy, Default)]
pub struct Relay;

impl CameraMux for Relay {
    fn notify_pan_input(&mut self, delta: Point) -> MuxOutput<PanOutput> {
        MuxOutput::pass(PanOutput::By { delta })
    }

    fn notify_pan_to_animation_input(&mut self, target: Point) -> MuxOutput<PanOutput> {
        MuxOutput::pass(PanOutput::To { target })
    }

    fn notify_zoom_input(&mut self, delta: f64, anchor: Point) -> MuxOutput<ZoomOutput> {
        MuxOutput::pass(ZoomOutput::By { delta, anchor: Some(ZoomAnchor::ViewPort(anchor)) })
    }

    fn notify_zoom_input_animation(&mut self, target: f64, anchor: Option<Point>) -> MuxOutput<ZoomOutput> {
        MuxOutput::pass(ZoomOutput::To { target, anchor: anchor.map(ZoomAnchor::ViewPort) })
    }

    fn notify_zoom_input_animation_world(&mut self, target: f64, anchor: Option<Point>) -> MuxOutput<ZoomOutput> {
        MuxOutput::pass(ZoomOutput::To { target, anchor: anchor.map(ZoomAnchor::World) })
    }

    fn notify_rotation_input(&mut self, delta: f64) -> MuxOutput<RotateOutput> {
        MuxOutput::pass(RotateOutput::By { delta })
    }

    fn notify_rotate_to_animation_input(&mut self, target: f64) -> MuxOutput<RotateOutput> {
        MuxOutput::pass(RotateOutput::To { target })
    }
}

// =============================================================================
// ANIMATION AND LOCK
// =============================================================================

/// Mux gated by one input-flow machine per axis.
///
/// User gestures are fed as user events and animation frames as transition
/// events. Animation frames only pass once `initiate_*_transition` has moved
/// the axis into `TRANSITION`, and a user gesture during an animation
/// cancels it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationAndLockMux {
    pan: PanStateMachine,
    zoom: ZoomStateMachine,
    rotation: RotateStateMachine,
}

fn verdict<E: FlowEvent>(machine: &mut InputFlowMachine<E>, event: E, requested: E::Output) -> MuxOutput<E::Output> {
    match machine.happens(event) {
        Ok(Some(output)) => MuxOutput::pass(output),
        Ok(None) => MuxOutput::blocked(requested),
        Err(err) => {
            debug!(%err, "camera mux: input blocked");
            MuxOutput::blocked(requested)
        }
    }
}

impl AnimationAndLockMux {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initiate_pan_transition(&mut self) -> Result<(), UnhandledEvent> {
        self.pan.happens(PanEvent::InitiateTransition).map(drop)
    }

    pub fn initiate_zoom_transition(&mut self) -> Result<(), UnhandledEvent> {
        self.zoom.happens(ZoomEvent::InitiateTransition).map(drop)
    }

    pub fn initiate_rotate_transition(&mut self) -> Result<(), UnhandledEvent> {
        self.rotation.happens(RotateEvent::InitiateTransition).map(drop)
    }

    /// Follow-object pan. Locks the pan axis.
    pub fn notify_locked_on_object_pan_input(&mut self, target: Point) -> MuxOutput<PanOutput> {
        verdict(&mut self.pan, PanEvent::LockedOnObjectPanTo { target }, PanOutput::To { target })
    }

    /// Follow-object zoom. Locks the zoom axis.
    pub fn notify_locked_on_object_zoom_input(&mut self, target: f64, anchor: Option<ZoomAnchor>) -> MuxOutput<ZoomOutput> {
        verdict(
            &mut self.zoom,
            ZoomEvent::LockedOnObjectZoomTo { target, anchor },
            ZoomOutput::To { target, anchor },
        )
    }

    /// Follow-object rotation. Locks the rotation axis.
    pub fn notify_locked_on_object_rotate_input(&mut self, target: f64) -> MuxOutput<RotateOutput> {
        verdict(
            &mut self.rotation,
            RotateEvent::LockedOnObjectRotateTo { target },
            RotateOutput::To { target },
        )
    }

    pub fn unlock_pan(&mut self) -> Result<(), UnhandledEvent> {
        self.pan.happens(PanEvent::Unlock).map(drop)
    }

    pub fn unlock_zoom(&mut self) -> Result<(), UnhandledEvent> {
        self.zoom.happens(ZoomEvent::Unlock).map(drop)
    }

    pub fn unlock_rotation(&mut self) -> Result<(), UnhandledEvent> {
        self.rotation.happens(RotateEvent::Unlock).map(drop)
    }

    #[must_use]
    pub fn pan_state_machine(&self) -> &PanStateMachine {
        &self.pan
    }

    pub fn pan_state_machine_mut(&mut self) -> &mut PanStateMachine {
        &mut self.pan
    }

    #[must_use]
    pub fn zoom_state_machine(&self) -> &ZoomStateMachine {
        &self.zoom
    }

    pub fn zoom_state_machine_mut(&mut self) -> &mut ZoomStateMachine {
        &mut self.zoom
    }

    #[must_use]
    pub fn rotate_state_machine(&self) -> &RotateStateMachine {
        &self.rotation
    }

    pub fn rotate_state_machine_mut(&mut self) -> &mut RotateStateMachine {
        &mut self.rotation
    }
}

impl CameraMux for AnimationAndLockMux {
    fn notify_pan_input(&mut self, delta: Point) -> MuxOutput<PanOutput> {
        verdict(&mut self.pan, PanEvent::UserPanBy { delta }, PanOutput::By { delta })
    }

    fn notify_pan_to_animation_input(&mut self, target: Point) -> MuxOutput<PanOutput> {
        verdict(&mut self.pan, PanEvent::TransitionPanTo { target }, PanOutput::To { target })
    }

    fn notify_zoom_input(&mut self, delta: f64, anchor: Point) -> MuxOutput<ZoomOutput> {
        let anchor = Some(ZoomAnchor::ViewPort(anchor));
        verdict(&mut self.zoom, ZoomEvent::UserZoomBy { delta, anchor }, ZoomOutput::By { delta, anchor })
    }

    fn notify_zoom_input_animation(&mut self, target: f64, anchor: Option<Point>) -> MuxOutput<ZoomOutput> {
        let anchor = anchor.map(ZoomAnchor::ViewPort);
        verdict(&mut self.zoom, ZoomEvent::TransitionZoomTo { target, anchor }, ZoomOutput::To { target, anchor })
    }

    fn notify_zoom_input_animation_world(&mut self, target: f64, anchor: Option<Point>) -> MuxOutput<ZoomOutput> {
        let anchor = anchor.map(ZoomAnchor::World);
        verdict(&mut self.zoom, ZoomEvent::TransitionZoomTo { target, anchor }, ZoomOutput::To { target, anchor })
    }

    fn notify_rotation_input(&mut self, delta: f64) -> MuxOutput<RotateOutput> {
        verdict(&mut self.rotation, RotateEvent::UserRotateBy { delta }, RotateOutput::By { delta })
    }

    fn notify_rotate_to_animation_input(&mut self, target: f64) -> MuxOutput<RotateOutput> {
        verdict(&mut self.rotation, RotateEvent::TransitionRotateTo { target }, RotateOutput::To { target })
    }
}
