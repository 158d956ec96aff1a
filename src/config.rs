//! Handler configuration: the restriction and clamping switches the rig reads
//! on every operation.
//!
//! Both types serialize with camelCase keys so a host can keep them in the same
//! JSON documents it already uses for board settings:
//!
//! ```json
//! { "clampTranslation": true, "restrictRelativeXTranslation": true }
//! ```

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

/// Restriction (hard veto) and clamping (bounded) switches for each axis.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HandlerConfig {
    /// Clamp the camera position to the camera's translation boundaries.
    pub clamp_translation: bool,
    /// When clamping translation, keep the whole rotated viewport inside the
    /// boundaries instead of only its centre.
    pub limit_entire_view_port: bool,
    /// Forbid world-space movement along x.
    pub restrict_x_translation: bool,
    /// Forbid world-space movement along y.
    pub restrict_y_translation: bool,
    /// Forbid movement along the camera's (rotated) horizontal axis.
    pub restrict_relative_x_translation: bool,
    /// Forbid movement along the camera's (rotated) vertical axis.
    pub restrict_relative_y_translation: bool,
    pub clamp_zoom: bool,
    pub restrict_zoom: bool,
    pub clamp_rotation: bool,
    pub restrict_rotation: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            clamp_translation: true,
            limit_entire_view_port: true,
            restrict_x_translation: false,
            restrict_y_translation: false,
            restrict_relative_x_translation: false,
            restrict_relative_y_translation: false,
            clamp_zoom: true,
            restrict_zoom: false,
            clamp_rotation: true,
            restrict_rotation: false,
        }
    }
}

impl HandlerConfig {
    /// Shallow-merge a partial configuration. Absent fields keep their value.
    ///
    /// No validation happens here: contradictory combinations are resolved by
    /// the handlers themselves (restriction always wins over clamping).
    pub fn apply(&mut self, patch: &HandlerConfigPatch) {
        let HandlerConfigPatch {
            clamp_translation,
            limit_entire_view_port,
            restrict_x_translation,
            restrict_y_translation,
            restrict_relative_x_translation,
            restrict_relative_y_translation,
            clamp_zoom,
            restrict_zoom,
            clamp_rotation,
            restrict_rotation,
        } = *patch;

        merge(&mut self.clamp_translation, clamp_translation);
        merge(&mut self.limit_entire_view_port, limit_entire_view_port);
        merge(&mut self.restrict_x_translation, restrict_x_translation);
        merge(&mut self.restrict_y_translation, restrict_y_translation);
        merge(&mut self.restrict_relative_x_translation, restrict_relative_x_translation);
        merge(&mut self.restrict_relative_y_translation, restrict_relative_y_translation);
        merge(&mut self.clamp_zoom, clamp_zoom);
        merge(&mut self.restrict_zoom, restrict_zoom);
        merge(&mut self.clamp_rotation, clamp_rotation);
        merge(&mut self.restrict_rotation, restrict_rotation);
    }

    /// A copy with `patch` merged in.
    #[must_use]
    pub fn merged(mut self, patch: &HandlerConfigPatch) -> Self {
        self.apply(patch);
        self
    }
}

fn merge(slot: &mut bool, value: Option<bool>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// A partial [`HandlerConfig`]; `None` leaves the current value untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HandlerConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clamp_translation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_entire_view_port: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restrict_x_translation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restrict_y_translation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restrict_relative_x_translation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restrict_relative_y_translation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clamp_zoom: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restrict_zoom: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clamp_rotation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restrict_rotation: Option<bool>,
}

impl From<HandlerConfig> for HandlerConfigPatch {
    fn from(config: HandlerConfig) -> Self {
        Self {
            clamp_translation: Some(config.clamp_translation),
            limit_entire_view_port: Some(config.limit_entire_view_port),
            restrict_x_translation: Some(config.restrict_x_translation),
            restrict_y_translation: Some(config.restrict_y_translation),
            restrict_relative_x_translation: Some(config.restrict_relative_x_translation),
            restrict_relative_y_translation: Some(config.restrict_relative_y_translation),
            clamp_zoom: Some(config.clamp_zoom),
            restrict_zoom: Some(config.restrict_zoom),
            clamp_rotation: Some(config.clamp_rotation),
            restrict_rotation: Some(config.restrict_rotation),
        }
    }
}
