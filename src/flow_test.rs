use super::*;

use super::InputFlowState::{AcceptingUserInput, LockedOnObject, Transition};

const STATES: [InputFlowState; 3] = [AcceptingUserInput, Transition, LockedOnObject];

const SOURCES: [EventSource; 5] = [
    EventSource::User,
    EventSource::Transition,
    EventSource::LockedOnObject,
    EventSource::InitiateTransition,
    EventSource::Unlock,
];

/// (state, source, next state, emits output)
const HANDLED: [(InputFlowState, EventSource, InputFlowState, bool); 8] = [
    (AcceptingUserInput, EventSource::User, AcceptingUserInput, true),
    (AcceptingUserInput, EventSource::LockedOnObject, LockedOnObject, true),
    (AcceptingUserInput, EventSource::InitiateTransition, Transition, false),
    (Transition, EventSource::User, AcceptingUserInput, true),
    (Transition, EventSource::Transition, Transition, true),
    (Transition, EventSource::LockedOnObject, LockedOnObject, true),
    (LockedOnObject, EventSource::LockedOnObject, LockedOnObject, true),
    (LockedOnObject, EventSource::Unlock, AcceptingUserInput, false),
];

fn pan_sample(source: EventSource) -> PanEvent {
    let delta = Point::new(1.0, 2.0);
    match source {
        EventSource::User => PanEvent::UserPanBy { delta },
        EventSource::Transition => PanEvent::TransitionPanBy { delta },
        EventSource::LockedOnObject => PanEvent::LockedOnObjectPanBy { delta },
        EventSource::InitiateTransition => PanEvent::InitiateTransition,
        EventSource::Unlock => PanEvent::Unlock,
    }
}

fn zoom_sample(source: EventSource) -> ZoomEvent {
    let anchor = Some(ZoomAnchor::ViewPort(Point::new(5.0, 5.0)));
    match source {
        EventSource::User => ZoomEvent::UserZoomTo { target: 2.0, anchor },
        EventSource::Transition => ZoomEvent::TransitionZoomTo { target: 2.0, anchor },
        EventSource::LockedOnObject => ZoomEvent::LockedOnObjectZoomTo { target: 2.0, anchor },
        EventSource::InitiateTransition => ZoomEvent::InitiateTransition,
        EventSource::Unlock => ZoomEvent::Unlock,
    }
}

fn rotate_sample(source: EventSource) -> RotateEvent {
    match source {
        EventSource::User => RotateEvent::UserRotateBy { delta: 0.5 },
        EventSource::Transition => RotateEvent::TransitionRotateBy { delta: 0.5 },
        EventSource::LockedOnObject => RotateEvent::LockedOnObjectRotateBy { delta: 0.5 },
        EventSource::InitiateTransition => RotateEvent::InitiateTransition,
        EventSource::Unlock => RotateEvent::Unlock,
    }
}

/// Drive a fresh machine into `state` using only handled events.
fn machine_in<E: FlowEvent>(state: InputFlowState, sample: fn(EventSource) -> E) -> InputFlowMachine<E> {
    let mut machine = InputFlowMachine::new();
    match state {
        AcceptingUserInput => {}
        Transition => {
            machine.happens(sample(EventSource::InitiateTransition)).unwrap();
        }
        LockedOnObject => {
            machine.happens(sample(EventSource::LockedOnObject)).unwrap();
        }
    }
    assert_eq!(machine.state(), state);
    machine
}

fn check_table<E: FlowEvent>(sample: fn(EventSource) -> E) {
    for state in STATES {
        for source in SOURCES {
            let mut machine = machine_in(state, sample);
            let event = sample(source);
            let row = HANDLED.iter().find(|(s, src, _, _)| *s == state && *src == source);
            assert_eq!(machine.accepts(&event), row.is_some(), "{state} / {source:?}");

            match (row, machine.happens(event)) {
                (Some(&(_, _, next, emits)), Ok(output)) => {
                    assert_eq!(machine.state(), next, "{state} / {source:?}");
                    assert_eq!(output.is_some(), emits, "{state} / {source:?}");
                }
                (None, Err(err)) => {
                    assert_eq!(err.axis, E::AXIS);
                    assert_eq!(err.state, state);
                    assert_eq!(err.event, event.name());
                    assert_eq!(machine.state(), state, "unhandled event changed state");
                }
                (Some(_), Err(err)) => panic!("{state} / {source:?} should be handled: {err}"),
                (None, Ok(_)) => panic!("{state} / {source:?} should be unhandled"),
            }
        }
    }
}

// =============================================================
// Transition table
// =============================================================

#[test]
fn pan_machine_follows_table() {
    check_table(pan_sample);
}

#[test]
fn zoom_machine_follows_table() {
    check_table(zoom_sample);
}

#[test]
fn rotate_machine_follows_table() {
    check_table(rotate_sample);
}

#[test]
fn new_machine_accepts_user_input() {
    assert_eq!(PanStateMachine::new().state(), AcceptingUserInput);
    assert_eq!(ZoomStateMachine::default().state(), AcceptingUserInput);
    assert_eq!(RotateStateMachine::new().state(), AcceptingUserInput);
}

// =============================================================
// Payloads
// =============================================================

#[test]
fn pan_outputs_carry_payload() {
    let mut m = PanStateMachine::new();
    let target = Point::new(-3.0, 4.0);
    assert_eq!(m.happens(PanEvent::UserPanTo { target }), Ok(Some(PanOutput::To { target })));
    let delta = Point::new(1.0, 1.0);
    assert_eq!(m.happens(PanEvent::UserPanBy { delta }), Ok(Some(PanOutput::By { delta })));
}

#[test]
fn zoom_outputs_carry_anchor() {
    let mut m = ZoomStateMachine::new();
    let anchor = Some(ZoomAnchor::World(Point::new(10.0, 0.0)));
    assert_eq!(
        m.happens(ZoomEvent::UserZoomBy { delta: 0.25, anchor }),
        Ok(Some(ZoomOutput::By { delta: 0.25, anchor }))
    );
}

#[test]
fn rotate_outputs_carry_payload() {
    let mut m = RotateStateMachine::new();
    m.happens(RotateEvent::InitiateTransition).unwrap();
    assert_eq!(
        m.happens(RotateEvent::TransitionRotateTo { target: 1.0 }),
        Ok(Some(RotateOutput::To { target: 1.0 }))
    );
}

// =============================================================
// Scenarios
// =============================================================

#[test]
fn user_input_interrupts_animation() {
    let mut m = PanStateMachine::new();
    m.happens(PanEvent::InitiateTransition).unwrap();
    m.happens(PanEvent::TransitionPanBy { delta: Point::new(1.0, 0.0) }).unwrap();
    assert_eq!(m.state(), Transition);

    m.happens(PanEvent::UserPanBy { delta: Point::new(0.0, 1.0) }).unwrap();
    assert_eq!(m.state(), AcceptingUserInput);

    // The animation's next frame is now refused.
    let err = m.happens(PanEvent::TransitionPanBy { delta: Point::new(1.0, 0.0) }).unwrap_err();
    assert_eq!(err.event, "transitionPanByInput");
}

#[test]
fn user_input_while_locked_is_reported() {
    let mut m = ZoomStateMachine::new();
    m.happens(ZoomEvent::LockedOnObjectZoomTo { target: 3.0, anchor: None }).unwrap();
    let err = m.happens(ZoomEvent::UserZoomBy { delta: 0.1, anchor: None }).unwrap_err();
    assert_eq!(err.to_string(), "zoom input flow: event userZoomByInput is not handled in state LOCKED_ON_OBJECT");

    assert_eq!(m.happens(ZoomEvent::Unlock), Ok(None));
    assert!(m.happens(ZoomEvent::UserZoomBy { delta: 0.1, anchor: None }).unwrap().is_some());
}

#[test]
fn state_names_display() {
    assert_eq!(AcceptingUserInput.to_string(), "ACCEPTING_USER_INPUT");
    assert_eq!(Transition.to_string(), "TRANSITION");
    assert_eq!(LockedOnObject.to_string(), "LOCKED_ON_OBJECT");
}
