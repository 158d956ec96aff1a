//! Input-flow state machines for the pan, zoom and rotate axes.
//!
//! Every axis runs the same three-state machine. What differs is the event
//! vocabulary and the payload the machine hands back, so the machine is
//! generic over a [`FlowEvent`] and the transition table is keyed on the
//! event's [`EventSource`].
//!
//! | State | Source | Output | Next |
//! |---|---|---|---|
//! | `ACCEPTING_USER_INPUT` | user | pass-through | `ACCEPTING_USER_INPUT` |
//! | `ACCEPTING_USER_INPUT` | locked-on-object | pass-through | `LOCKED_ON_OBJECT` |
//! | `ACCEPTING_USER_INPUT` | initiate transition | none | `TRANSITION` |
//! | `TRANSITION` | user | pass-through | `ACCEPTING_USER_INPUT` |
//! | `TRANSITION` | transition | pass-through | `TRANSITION` |
//! | `TRANSITION` | locked-on-object | pass-through | `LOCKED_ON_OBJECT` |
//! | `LOCKED_ON_OBJECT` | locked-on-object | pass-through | `LOCKED_ON_OBJECT` |
//! | `LOCKED_ON_OBJECT` | unlock | none | `ACCEPTING_USER_INPUT` |
//!
//! Any other pair is unhandled: `happens` returns [`UnhandledEvent`] and the
//! state does not change. The machines never touch the camera; callers apply
//! the returned output through the rig.

#[cfg(test)]
#[path = "flow_test.rs"]
mod flow_test;

use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::math::Point;
use crate::zoom::ZoomAnchor;

// =============================================================================
// STATES AND SOURCES
// =============================================================================

/// Current mode of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputFlowState {
    /// Direct user gestures move the camera.
    #[default]
    AcceptingUserInput,
    /// An animation is driving the camera; user input interrupts it.
    Transition,
    /// The camera follows an object; only follow updates and unlock are accepted.
    LockedOnObject,
}

impl InputFlowState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AcceptingUserInput => "ACCEPTING_USER_INPUT",
            Self::Transition => "TRANSITION",
            Self::LockedOnObject => "LOCKED_ON_OBJECT",
        }
    }
}

impl fmt::Display for InputFlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who produced an event. The transition table only looks at this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    User,
    Transition,
    LockedOnObject,
    InitiateTransition,
    Unlock,
}

/// Which camera axis a machine governs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Pan,
    Zoom,
    Rotate,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pan => "pan",
            Self::Zoom => "zoom",
            Self::Rotate => "rotate",
        })
    }
}

/// The current state has no row for the event. Recoverable; the state is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{axis} input flow: event {event} is not handled in state {state}")]
pub struct UnhandledEvent {
    pub axis: Axis,
    pub state: InputFlowState,
    pub event: &'static str,
}

// =============================================================================
// TRANSITION TABLE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Reaction {
    pass_through: bool,
    next: InputFlowState,
}

const fn pass(next: InputFlowState) -> Option<Reaction> {
    Some(Reaction { pass_through: true, next })
}

const fn silent(next: InputFlowState) -> Option<Reaction> {
    Some(Reaction { pass_through: false, next })
}

fn reaction(state: InputFlowState, source: EventSource) -> Option<Reaction> {
    use EventSource as S;
    use InputFlowState::{AcceptingUserInput, LockedOnObject, Transition};

    match (state, source) {
        (AcceptingUserInput, S::User) => pass(AcceptingUserInput),
        (AcceptingUserInput, S::LockedOnObject) => pass(LockedOnObject),
        (AcceptingUserInput, S::InitiateTransition) => silent(Transition),
        (AcceptingUserInput, S::Transition | S::Unlock) => None,

        (Transition, S::User) => pass(AcceptingUserInput),
        (Transition, S::Transition) => pass(Transition),
        (Transition, S::LockedOnObject) => pass(LockedOnObject),
        (Transition, S::InitiateTransition | S::Unlock) => None,

        (LockedOnObject, S::LockedOnObject) => pass(LockedOnObject),
        (LockedOnObject, S::Unlock) => silent(AcceptingUserInput),
        (LockedOnObject, S::User | S::Transition | S::InitiateTransition) => None,
    }
}

// =============================================================================
// MACHINE
// =============================================================================

/// An event one axis machine understands.
pub trait FlowEvent: Copy + fmt::Debug {
    /// Payload handed back when the event passes through.
    type Output;

    const AXIS: Axis;

    fn source(&self) -> EventSource;

    /// Stable event name used in logs and [`UnhandledEvent`].
    fn name(&self) -> &'static str;

    /// The pass-through payload. Control events carry none.
    fn into_output(self) -> Option<Self::Output>;
}

/// Three-state input gate for one axis.
#[derive(Debug, Clone, Copy)]
pub struct InputFlowMachine<E> {
    state: InputFlowState,
    _event: PhantomData<E>,
}

impl<E> Default for InputFlowMachine<E> {
    fn default() -> Self {
        Self { state: InputFlowState::default(), _event: PhantomData }
    }
}

impl<E: FlowEvent> InputFlowMachine<E> {
    /// A machine in `ACCEPTING_USER_INPUT`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> InputFlowState {
        self.state
    }

    /// Whether the current state has a row for `event`.
    #[must_use]
    pub fn accepts(&self, event: &E) -> bool {
        reaction(self.state, event.source()).is_some()
    }

    /// Feed one event.
    ///
    /// Returns the pass-through payload (`Some`) or `None` for a handled
    /// control event. An event without a row in the current state is
    /// returned as [`UnhandledEvent`] and leaves the state alone.
    pub fn happens(&mut self, event: E) -> Result<Option<E::Output>, UnhandledEvent> {
        let Some(step) = reaction(self.state, event.source()) else {
            debug!(axis = %E::AXIS, state = %self.state, event = event.name(), "input flow: unhandled event");
            return Err(UnhandledEvent { axis: E::AXIS, state: self.state, event: event.name() });
        };

        if step.next != self.state {
            trace!(axis = %E::AXIS, from = %self.state, to = %step.next, event = event.name(), "input flow: transition");
        }
        self.state = step.next;

        Ok(if step.pass_through { event.into_output() } else { None })
    }
}

// =============================================================================
// PAN
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanEvent {
    UserPanBy { delta: Point },
    UserPanTo { target: Point },
    TransitionPanBy { delta: Point },
    TransitionPanTo { target: Point },
    LockedOnObjectPanBy { delta: Point },
    LockedOnObjectPanTo { target: Point },
    InitiateTransition,
    Unlock,
}

/// Validated pan payload, world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanOutput {
    By { delta: Point },
    To { target: Point },
}

impl FlowEvent for PanEvent {
    type Output = PanOutput;
    const AXIS: Axis = Axis::Pan;

    fn source(&self) -> EventSource {
        match self {
            Self::UserPanBy { .. } | Self::UserPanTo { .. } => EventSource::User,
            Self::TransitionPanBy { .. } | Self::TransitionPanTo { .. } => EventSource::Transition,
            Self::LockedOnObjectPanBy { .. } | Self::LockedOnObjectPanTo { .. } => EventSource::LockedOnObject,
            Self::InitiateTransition => EventSource::InitiateTransition,
            Self::Unlock => EventSource::Unlock,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::UserPanBy { .. } => "userPanByInput",
            Self::UserPanTo { .. } => "userPanToInput",
            Self::TransitionPanBy { .. } => "transitionPanByInput",
            Self::TransitionPanTo { .. } => "transitionPanToInput",
            Self::LockedOnObjectPanBy { .. } => "lockedOnObjectPanByInput",
            Self::LockedOnObjectPanTo { .. } => "lockedOnObjectPanToInput",
            Self::InitiateTransition => "initiateTransition",
            Self::Unlock => "unlock",
        }
    }

    fn into_output(self) -> Option<PanOutput> {
        match self {
            Self::UserPanBy { delta } | Self::TransitionPanBy { delta } | Self::LockedOnObjectPanBy { delta } => {
                Some(PanOutput::By { delta })
            }
            Self::UserPanTo { target } | Self::TransitionPanTo { target } | Self::LockedOnObjectPanTo { target } => {
                Some(PanOutput::To { target })
            }
            Self::InitiateTransition | Self::Unlock => None,
        }
    }
}

// =============================================================================
// ZOOM
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomEvent {
    UserZoomBy { delta: f64, anchor: Option<ZoomAnchor> },
    UserZoomTo { target: f64, anchor: Option<ZoomAnchor> },
    TransitionZoomBy { delta: f64, anchor: Option<ZoomAnchor> },
    TransitionZoomTo { target: f64, anchor: Option<ZoomAnchor> },
    LockedOnObjectZoomBy { delta: f64, anchor: Option<ZoomAnchor> },
    LockedOnObjectZoomTo { target: f64, anchor: Option<ZoomAnchor> },
    InitiateTransition,
    Unlock,
}

/// Validated zoom payload. Without an anchor the zoom keeps the viewport centre fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomOutput {
    By { delta: f64, anchor: Option<ZoomAnchor> },
    To { target: f64, anchor: Option<ZoomAnchor> },
}

impl FlowEvent for ZoomEvent {
    type Output = ZoomOutput;
    const AXIS: Axis = Axis::Zoom;

    fn source(&self) -> EventSource {
        match self {
            Self::UserZoomBy { .. } | Self::UserZoomTo { .. } => EventSource::User,
            Self::TransitionZoomBy { .. } | Self::TransitionZoomTo { .. } => EventSource::Transition,
            Self::LockedOnObjectZoomBy { .. } | Self::LockedOnObjectZoomTo { .. } => EventSource::LockedOnObject,
            Self::InitiateTransition => EventSource::InitiateTransition,
            Self::Unlock => EventSource::Unlock,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::UserZoomBy { .. } => "userZoomByInput",
            Self::UserZoomTo { .. } => "userZoomToInput",
            Self::TransitionZoomBy { .. } => "transitionZoomByInput",
            Self::TransitionZoomTo { .. } => "transitionZoomToInput",
            Self::LockedOnObjectZoomBy { .. } => "lockedOnObjectZoomByInput",
            Self::LockedOnObjectZoomTo { .. } => "lockedOnObjectZoomToInput",
            Self::InitiateTransition => "initiateTransition",
            Self::Unlock => "unlock",
        }
    }

    fn into_output(self) -> Option<ZoomOutput> {
        match self {
            Self::UserZoomBy { delta, anchor }
            | Self::TransitionZoomBy { delta, anchor }
            | Self::LockedOnObjectZoomBy { delta, anchor } => Some(ZoomOutput::By { delta, anchor }),
            Self::UserZoomTo { target, anchor }
            | Self::TransitionZoomTo { target, anchor }
            | Self::LockedOnObjectZoomTo { target, anchor } => Some(ZoomOutput::To { target, anchor }),
            Self::InitiateTransition | Self::Unlock => None,
        }
    }
}

// =============================================================================
// ROTATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotateEvent {
    UserRotateBy { delta: f64 },
    UserRotateTo { target: f64 },
    TransitionRotateBy { delta: f64 },
    TransitionRotateTo { target: f64 },
    LockedOnObjectRotateBy { delta: f64 },
    LockedOnObjectRotateTo { target: f64 },
    InitiateTransition,
    Unlock,
}

/// Validated rotation payload, radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotateOutput {
    By { delta: f64 },
    To { target: f64 },
}

impl FlowEvent for RotateEvent {
    type Output = RotateOutput;
    const AXIS: Axis = Axis::Rotate;

    fn source(&self) -> EventSource {
        match self {
            Self::UserRotateBy { .. } | Self::UserRotateTo { .. } => EventSource::User,
            Self::TransitionRotateBy { .. } | Self::TransitionRotateTo { .. } => EventSource::Transition,
            Self::LockedOnObjectRotateBy { .. } | Self::LockedOnObjectRotateTo { .. } => EventSource::LockedOnObject,
            Self::InitiateTransition => EventSource::InitiateTransition,
            Self::Unlock => EventSource::Unlock,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::UserRotateBy { .. } => "userRotateByInput",
            Self::UserRotateTo { .. } => "userRotateToInput",
            Self::TransitionRotateBy { .. } => "transitionRotateByInput",
            Self::TransitionRotateTo { .. } => "transitionRotateToInput",
            Self::LockedOnObjectRotateBy { .. } => "lockedOnObjectRotateByInput",
            Self::LockedOnObjectRotateTo { .. } => "lockedOnObjectRotateToInput",
            Self::InitiateTransition => "initiateTransition",
            Self::Unlock => "unlock",
        }
    }

    fn into_output(self) -> Option<RotateOutput> {
        match self {
            Self::UserRotateBy { delta } | Self::TransitionRotateBy { delta } | Self::LockedOnObjectRotateBy { delta } => {
                Some(RotateOutput::By { delta })
            }
            Self::UserRotateTo { target } | Self::TransitionRotateTo { target } | Self::LockedOnObjectRotateTo { target } => {
                Some(RotateOutput::To { target })
            }
            Self::InitiateTransition | Self::Unlock => None,
        }
    }
}

pub type PanStateMachine = InputFlowMachine<PanEvent>;
pub type ZoomStateMachine = InputFlowMachine<ZoomEvent>;
pub type RotateStateMachine = InputFlowMachine<RotateEvent>;
