//! Camera input-flow control for a 2D board canvas.
//!
//! This crate decides which pan, zoom and rotate requests may move the camera
//! and then applies them under the configured constraints. Gesture and
//! animation code talks to a [`mux::CameraMux`]; accepted outputs go to a
//! [`rig::CameraRig`], which runs the handler pipelines and commits the result
//! to a [`camera::Camera`]. Rendering, DOM events and persistence live in the
//! host.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`rig`] | Mutation surface: pan/zoom/rotate, anchor-preserving zoom, frame updates |
//! | [`mux`] | Relay and animation/lock muxes that gate input |
//! | [`flow`] | Per-axis input-flow state machines |
//! | [`batch`] | Per-frame update coalescing |
//! | [`pan`] | Pan restriction and boundary clamping |
//! | [`zoom`] | Zoom clamping, restriction and anchors |
//! | [`rotation`] | Rotation restriction and arc clamping |
//! | [`pipeline`] | Handler chains and their context |
//! | [`camera`] | Camera capability, boundaries, reference camera |
//! | [`config`] | Handler configuration and partial updates |
//! | [`math`] | Points and angle helpers |
//! | [`consts`] | Shared numeric constants |

pub mod batch;
pub mod camera;
pub mod config;
pub mod consts;
pub mod flow;
pub mod math;
pub mod mux;
pub mod pan;
pub mod pipeline;
pub mod rig;
pub mod rotation;
pub mod zoom;

pub use camera::{BoardCamera, Boundaries, Camera, CameraEvent, CameraEventKind, RotationBoundaries, ZoomBoundaries};
pub use config::{HandlerConfig, HandlerConfigPatch};
pub use flow::{InputFlowState, PanStateMachine, RotateStateMachine, UnhandledEvent, ZoomStateMachine};
pub use math::Point;
pub use mux::{AnimationAndLockMux, CameraMux, MuxOutput, Relay};
pub use rig::{CameraRig, RigError, RigHandlers};
pub use zoom::ZoomAnchor;
