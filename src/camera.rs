//! The camera capability consumed by the rig, and a reference implementation.
//!
//! Viewport space has its origin at the centre of the viewport. A viewport
//! point maps to world space by undoing zoom, then rotation, then adding the
//! camera position:
//!
//! ```text
//! world    = position + rotate(viewport / zoom, rotation)
//! viewport = rotate(world - position, -rotation) * zoom
//! ```

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::f64::consts::TAU;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    BOUNDARY_TOLERANCE, CHANGE_EPSILON, DEFAULT_VIEW_PORT_HEIGHT, DEFAULT_VIEW_PORT_WIDTH, DEFAULT_ZOOM_LEVEL,
};
use crate::math::{Point, angle_span, normalize_angle};

// =============================================================================
// BOUNDARIES
// =============================================================================

/// World-space translation limits for the camera position. Either corner may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Boundaries {
    pub min: Option<Point>,
    pub max: Option<Point>,
}

impl Boundaries {
    #[must_use]
    pub fn new(min: Point, max: Point) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    /// Whether `point` lies inside the limits, allowing `tolerance` of slack on every side.
    #[must_use]
    pub fn contains(&self, point: Point, tolerance: f64) -> bool {
        let above_min = self
            .min
            .is_none_or(|min| point.x >= min.x - tolerance && point.y >= min.y - tolerance);
        let below_max = self
            .max
            .is_none_or(|max| point.x <= max.x + tolerance && point.y <= max.y + tolerance);
        above_min && below_max
    }

    /// Clamp each axis independently, skipping absent limits.
    #[must_use]
    pub fn clamp(&self, point: Point) -> Point {
        let mut out = point;
        if let Some(min) = self.min {
            out.x = out.x.max(min.x);
            out.y = out.y.max(min.y);
        }
        if let Some(max) = self.max {
            out.x = out.x.min(max.x);
            out.y = out.y.min(max.y);
        }
        out
    }
}

/// Zoom level limits. Either side may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoomBoundaries {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ZoomBoundaries {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    #[must_use]
    pub fn contains(&self, zoom_level: f64, tolerance: f64) -> bool {
        self.min.is_none_or(|min| zoom_level >= min - tolerance)
            && self.max.is_none_or(|max| zoom_level <= max + tolerance)
    }

    #[must_use]
    pub fn clamp(&self, zoom_level: f64) -> f64 {
        let mut out = zoom_level;
        if let Some(min) = self.min {
            out = out.max(min);
        }
        if let Some(max) = self.max {
            out = out.min(max);
        }
        out
    }
}

/// Rotation limits in radians.
///
/// The permitted range is the arc that starts at `min` (default `0`) and runs
/// counter-clockwise to `max` (default `2π`). When the normalized `min` is
/// greater than the normalized `max` the arc wraps through zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RotationBoundaries {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RotationBoundaries {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    /// Normalized `(start, end)` of the permitted arc.
    #[must_use]
    pub fn arc(&self) -> (f64, f64) {
        let start = self.min.map_or(0.0, normalize_angle);
        let end = self.max.map_or(TAU, normalize_angle);
        (start, end)
    }

    /// Whether the limits span the whole circle, e.g. `0..=2π`.
    #[must_use]
    pub fn is_full_circle(&self) -> bool {
        self.max.unwrap_or(TAU) - self.min.unwrap_or(0.0) >= TAU
    }

    /// Whether the (normalized) angle lies on the permitted arc.
    #[must_use]
    pub fn contains(&self, rotation: f64, tolerance: f64) -> bool {
        if self.is_full_circle() {
            return true;
        }
        let rotation = normalize_angle(rotation);
        let (start, end) = self.arc();
        let on_arc = if start <= end {
            rotation >= start && rotation <= end
        } else {
            rotation >= start || rotation <= end
        };
        on_arc
            || angle_span(rotation, start).abs() <= tolerance
            || angle_span(rotation, end).abs() <= tolerance
    }

    /// Snap an angle onto the permitted arc, choosing the angularly nearer end
    /// when it lies outside. Ties go to `min`.
    #[must_use]
    pub fn clamp(&self, rotation: f64) -> f64 {
        let rotation = normalize_angle(rotation);
        if self.contains(rotation, 0.0) {
            return rotation;
        }
        let (start, end) = self.arc();
        let to_start = angle_span(rotation, start).abs();
        let to_end = angle_span(rotation, end).abs();
        if to_end < to_start { normalize_angle(end) } else { start }
    }
}

// =============================================================================
// STATE SNAPSHOT
// =============================================================================

/// Everything the handler pipelines read from a camera, captured at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Point,
    pub zoom_level: f64,
    pub rotation: f64,
    pub view_port_width: f64,
    pub view_port_height: f64,
    pub boundaries: Option<Boundaries>,
    pub zoom_boundaries: Option<ZoomBoundaries>,
    pub rotation_boundaries: Option<RotationBoundaries>,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            zoom_level: DEFAULT_ZOOM_LEVEL,
            rotation: 0.0,
            view_port_width: DEFAULT_VIEW_PORT_WIDTH,
            view_port_height: DEFAULT_VIEW_PORT_HEIGHT,
            boundaries: None,
            zoom_boundaries: None,
            rotation_boundaries: None,
        }
    }
}

impl CameraState {
    /// Convert a viewport-space point (origin at viewport centre) to world space.
    #[must_use]
    pub fn view_port_to_world(&self, point: Point) -> Point {
        self.position + self.view_port_delta_to_world(point)
    }

    /// Convert a world-space point to viewport space (origin at viewport centre).
    #[must_use]
    pub fn world_to_view_port(&self, point: Point) -> Point {
        (point - self.position).rotate(-self.rotation) * self.zoom_level
    }

    /// Convert a viewport-space displacement into the world-space displacement it represents.
    #[must_use]
    pub fn view_port_delta_to_world(&self, delta: Point) -> Point {
        (delta / self.zoom_level).rotate(self.rotation)
    }

    /// The same snapshot with a different zoom level, used for "what if" conversions.
    #[must_use]
    pub fn with_zoom_level(self, zoom_level: f64) -> Self {
        Self { zoom_level, ..self }
    }
}

// =============================================================================
// CAMERA CAPABILITY
// =============================================================================

/// The camera storage the rig drives.
///
/// Setters return `false` when the camera refuses the value; the rig surfaces
/// that as a [`crate::rig::RigError`].
pub trait Camera {
    fn position(&self) -> Point;
    fn zoom_level(&self) -> f64;
    fn rotation(&self) -> f64;
    fn view_port_width(&self) -> f64;
    fn view_port_height(&self) -> f64;
    fn boundaries(&self) -> Option<Boundaries>;
    fn zoom_boundaries(&self) -> Option<ZoomBoundaries>;
    fn rotation_boundaries(&self) -> Option<RotationBoundaries>;

    fn set_position(&mut self, position: Point) -> bool;
    fn set_zoom_level(&mut self, zoom_level: f64) -> bool;
    fn set_rotation(&mut self, rotation: f64) -> bool;

    /// Snapshot of the current state.
    fn state(&self) -> CameraState {
        CameraState {
            position: self.position(),
            zoom_level: self.zoom_level(),
            rotation: self.rotation(),
            view_port_width: self.view_port_width(),
            view_port_height: self.view_port_height(),
            boundaries: self.boundaries(),
            zoom_boundaries: self.zoom_boundaries(),
            rotation_boundaries: self.rotation_boundaries(),
        }
    }

    fn view_port_to_world(&self, point: Point) -> Point {
        self.state().view_port_to_world(point)
    }

    fn world_to_view_port(&self, point: Point) -> Point {
        self.state().world_to_view_port(point)
    }
}

// =============================================================================
// CHANGE NOTIFICATION
// =============================================================================

/// A change the camera reports to its subscribers after an accepted setter call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraEvent {
    Pan { diff: Point, position: Point },
    Zoom { delta: f64, zoom_level: f64 },
    Rotate { delta: f64, rotation: f64 },
}

impl CameraEvent {
    #[must_use]
    pub fn kind(&self) -> CameraEventKind {
        match self {
            Self::Pan { .. } => CameraEventKind::Pan,
            Self::Zoom { .. } => CameraEventKind::Zoom,
            Self::Rotate { .. } => CameraEventKind::Rotate,
        }
    }
}

/// Which events a subscriber wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraEventKind {
    Pan,
    Zoom,
    Rotate,
    All,
}

impl CameraEventKind {
    fn matches(self, event: &CameraEvent) -> bool {
        self == Self::All || self == event.kind()
    }
}

/// Handle returned by [`BoardCamera::on`]; pass it to [`BoardCamera::off`] to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&CameraEvent)>;

// =============================================================================
// BOARD CAMERA
// =============================================================================

/// In-memory camera with boundary validation and change subscriptions.
///
/// Setters reject non-finite values, non-positive zoom levels and values
/// outside the configured boundaries. Values within
/// [`BOUNDARY_TOLERANCE`] of a limit are accepted and snapped onto it.
pub struct BoardCamera {
    state: CameraState,
    listeners: Vec<(SubscriptionId, CameraEventKind, Listener)>,
    next_subscription: u64,
}

impl Default for BoardCamera {
    fn default() -> Self {
        Self::from_state(CameraState::default())
    }
}

impl fmt::Debug for BoardCamera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardCamera")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl BoardCamera {
    /// A camera at the world origin, zoom 1, no rotation, with the given viewport size.
    #[must_use]
    pub fn new(view_port_width: f64, view_port_height: f64) -> Self {
        Self::from_state(CameraState {
            view_port_width,
            view_port_height,
            ..CameraState::default()
        })
    }

    /// Build a camera from a snapshot.
    ///
    /// Fields the setters would refuse are replaced by their defaults: a
    /// non-finite position, a non-finite or non-positive zoom level, a
    /// non-finite rotation or viewport size. The rotation is normalized.
    /// Boundaries are taken as given.
    #[must_use]
    pub fn from_state(state: CameraState) -> Self {
        Self { state: sanitize(state), listeners: Vec::new(), next_subscription: 0 }
    }

    #[must_use]
    pub fn with_boundaries(mut self, boundaries: Boundaries) -> Self {
        self.state.boundaries = Some(boundaries);
        self
    }

    #[must_use]
    pub fn with_zoom_boundaries(mut self, boundaries: ZoomBoundaries) -> Self {
        self.state.zoom_boundaries = Some(boundaries);
        self
    }

    #[must_use]
    pub fn with_rotation_boundaries(mut self, boundaries: RotationBoundaries) -> Self {
        self.state.rotation_boundaries = Some(boundaries);
        self
    }

    pub fn set_boundaries(&mut self, boundaries: Option<Boundaries>) {
        self.state.boundaries = boundaries;
    }

    pub fn set_zoom_boundaries(&mut self, boundaries: Option<ZoomBoundaries>) {
        self.state.zoom_boundaries = boundaries;
    }

    pub fn set_rotation_boundaries(&mut self, boundaries: Option<RotationBoundaries>) {
        self.state.rotation_boundaries = boundaries;
    }

    pub fn set_view_port_size(&mut self, width: f64, height: f64) {
        self.state.view_port_width = width;
        self.state.view_port_height = height;
    }

    /// Subscribe to camera changes of the given kind.
    pub fn on<F>(&mut self, kind: CameraEventKind, listener: F) -> SubscriptionId
    where
        F: FnMut(&CameraEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, kind, Box::new(listener)));
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _, _)| *sub != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: CameraEvent) {
        for (_, kind, listener) in &mut self.listeners {
            if kind.matches(&event) {
                listener(&event);
            }
        }
    }
}

fn sanitize(mut state: CameraState) -> CameraState {
    let defaults = CameraState::default();
    if !state.position.is_finite() {
        debug!(position = ?state.position, "camera: non-finite position replaced");
        state.position = defaults.position;
    }
    if !state.zoom_level.is_finite() || state.zoom_level <= 0.0 {
        debug!(zoom_level = state.zoom_level, "camera: invalid zoom level replaced");
        state.zoom_level = defaults.zoom_level;
    }
    state.rotation = if state.rotation.is_finite() {
        normalize_angle(state.rotation)
    } else {
        debug!(rotation = state.rotation, "camera: non-finite rotation replaced");
        defaults.rotation
    };
    if !state.view_port_width.is_finite() || !state.view_port_height.is_finite() {
        debug!(width = state.view_port_width, height = state.view_port_height, "camera: invalid viewport size replaced");
        state.view_port_width = defaults.view_port_width;
        state.view_port_height = defaults.view_port_height;
    }
    state
}

impl Camera for BoardCamera {
    fn position(&self) -> Point {
        self.state.position
    }

    fn zoom_level(&self) -> f64 {
        self.state.zoom_level
    }

    fn rotation(&self) -> f64 {
        self.state.rotation
    }

    fn view_port_width(&self) -> f64 {
        self.state.view_port_width
    }

    fn view_port_height(&self) -> f64 {
        self.state.view_port_height
    }

    fn boundaries(&self) -> Option<Boundaries> {
        self.state.boundaries
    }

    fn zoom_boundaries(&self) -> Option<ZoomBoundaries> {
        self.state.zoom_boundaries
    }

    fn rotation_boundaries(&self) -> Option<RotationBoundaries> {
        self.state.rotation_boundaries
    }

    fn set_position(&mut self, position: Point) -> bool {
        if !position.is_finite() {
            return false;
        }
        let position = match self.state.boundaries {
            Some(bounds) if !bounds.contains(position, BOUNDARY_TOLERANCE) => return false,
            Some(bounds) => bounds.clamp(position),
            None => position,
        };
        let diff = position - self.state.position;
        self.state.position = position;
        if diff.length() > CHANGE_EPSILON {
            self.emit(CameraEvent::Pan { diff, position });
        }
        true
    }

    fn set_zoom_level(&mut self, zoom_level: f64) -> bool {
        if !zoom_level.is_finite() || zoom_level <= 0.0 {
            return false;
        }
        let zoom_level = match self.state.zoom_boundaries {
            Some(bounds) if !bounds.contains(zoom_level, BOUNDARY_TOLERANCE) => return false,
            Some(bounds) => bounds.clamp(zoom_level),
            None => zoom_level,
        };
        let delta = zoom_level - self.state.zoom_level;
        self.state.zoom_level = zoom_level;
        if delta.abs() > CHANGE_EPSILON {
            self.emit(CameraEvent::Zoom { delta, zoom_level });
        }
        true
    }

    fn set_rotation(&mut self, rotation: f64) -> bool {
        if !rotation.is_finite() {
            return false;
        }
        let rotation = normalize_angle(rotation);
        let rotation = match self.state.rotation_boundaries {
            Some(bounds) if !bounds.contains(rotation, BOUNDARY_TOLERANCE) => return false,
            Some(bounds) => bounds.clamp(rotation),
            None => rotation,
        };
        let delta = angle_span(self.state.rotation, rotation);
        self.state.rotation = rotation;
        if delta.abs() > CHANGE_EPSILON {
            self.emit(CameraEvent::Rotate { delta, rotation });
        }
        true
    }

    fn state(&self) -> CameraState {
        self.state
    }
}
