//! Shared numeric constants for the camera crate.

// ── Camera validation ───────────────────────────────────────────

/// Slack allowed when [`crate::camera::BoardCamera`] checks a value against its
/// boundaries. Deltas computed as `clamped - current` and re-added to `current`
/// can land a few ulps outside a limit; values inside the slack are snapped onto it.
pub const BOUNDARY_TOLERANCE: f64 = 1e-6;

/// Changes smaller than this are not reported to camera subscribers.
pub const CHANGE_EPSILON: f64 = 1e-12;

// ── Defaults ────────────────────────────────────────────────────

/// Zoom level of a freshly constructed camera.
pub const DEFAULT_ZOOM_LEVEL: f64 = 1.0;

/// Viewport size of a camera constructed with [`crate::camera::BoardCamera::default`].
pub const DEFAULT_VIEW_PORT_WIDTH: f64 = 1000.0;
pub const DEFAULT_VIEW_PORT_HEIGHT: f64 = 1000.0;
