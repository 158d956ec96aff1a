//! Per-frame coalescing of camera requests.
//!
//! Each axis holds at most one pending update. Deltas accumulate, a
//! destination replaces whatever was pending, and a delta queued after a
//! destination nudges that destination. Draining takes the pending update
//! and leaves the queue empty.

#[cfg(test)]
#[path = "batch_test.rs"]
mod batch_test;

use std::ops::Add;

use tracing::{debug, trace};

use crate::math::Point;
use crate::zoom::ZoomAnchor;

/// A resolved operation for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Update<T> {
    Delta(T),
    Destination(T),
}

/// Single-slot queue for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateQueue<T> {
    pending: Option<Update<T>>,
}

impl<T> Default for UpdateQueue<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T: Copy + Add<Output = T>> UpdateQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_by(&mut self, delta: T) {
        self.pending = Some(match self.pending {
            None => Update::Delta(delta),
            Some(Update::Delta(pending)) => Update::Delta(pending + delta),
            Some(Update::Destination(pending)) => Update::Destination(pending + delta),
        });
    }

    pub fn queue_to(&mut self, destination: T) {
        self.pending = Some(Update::Destination(destination));
    }

    /// Take the pending update, if any.
    pub fn process(&mut self) -> Option<Update<T>> {
        self.pending.take()
    }

    #[must_use]
    pub fn pending(&self) -> Option<Update<T>> {
        self.pending
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

/// A drained zoom update together with the anchor it should preserve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomUpdate {
    pub update: Update<f64>,
    pub anchor: Option<ZoomAnchor>,
}

/// Zoom queue. Requests fall into three anchor spaces: unanchored, viewport
/// and world. Switching space drops whatever was pending before the new
/// request is queued; within a space the latest anchor wins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomUpdateQueue {
    queue: UpdateQueue<f64>,
    anchor: Option<ZoomAnchor>,
}

impl ZoomUpdateQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_by(&mut self, delta: f64, anchor: Option<ZoomAnchor>) {
        self.adopt_anchor(anchor);
        self.queue.queue_by(delta);
    }

    pub fn queue_to(&mut self, destination: f64, anchor: Option<ZoomAnchor>) {
        self.adopt_anchor(anchor);
        self.queue.queue_to(destination);
    }

    fn adopt_anchor(&mut self, anchor: Option<ZoomAnchor>) {
        if self.queue.is_pending() && !same_space(self.anchor, anchor) {
            debug!(previous = ?self.anchor, ?anchor, pending = ?self.queue.pending(), "zoom anchor space changed; dropping pending zoom");
            self.queue.clear();
        }
        self.anchor = anchor;
    }

    pub fn process(&mut self) -> Option<ZoomUpdate> {
        let anchor = self.anchor.take();
        self.queue.process().map(|update| ZoomUpdate { update, anchor })
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.queue.is_pending()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.anchor = None;
    }
}

fn same_space(a: Option<ZoomAnchor>, b: Option<ZoomAnchor>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.same_space(b),
        _ => false,
    }
}

/// One queue per camera axis, drained once per frame by the rig.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraUpdateBatcher {
    position: UpdateQueue<Point>,
    zoom: ZoomUpdateQueue,
    rotation: UpdateQueue<f64>,
}

impl CameraUpdateBatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_position_update_by(&mut self, delta: Point) {
        trace!(?delta, "queue position by");
        self.position.queue_by(delta);
    }

    pub fn queue_position_update_to(&mut self, destination: Point) {
        trace!(?destination, "queue position to");
        self.position.queue_to(destination);
    }

    pub fn queue_zoom_update_by(&mut self, delta: f64, anchor: Option<ZoomAnchor>) {
        trace!(delta, ?anchor, "queue zoom by");
        self.zoom.queue_by(delta, anchor);
    }

    pub fn queue_zoom_update_to(&mut self, destination: f64, anchor: Option<ZoomAnchor>) {
        trace!(destination, ?anchor, "queue zoom to");
        self.zoom.queue_to(destination, anchor);
    }

    pub fn queue_rotation_update_by(&mut self, delta: f64) {
        trace!(delta, "queue rotation by");
        self.rotation.queue_by(delta);
    }

    pub fn queue_rotation_update_to(&mut self, destination: f64) {
        trace!(destination, "queue rotation to");
        self.rotation.queue_to(destination);
    }

    pub fn process_position_update(&mut self) -> Option<Update<Point>> {
        self.position.process()
    }

    pub fn process_zoom_update(&mut self) -> Option<ZoomUpdate> {
        self.zoom.process()
    }

    pub fn process_rotation_update(&mut self) -> Option<Update<f64>> {
        self.rotation.process()
    }

    #[must_use]
    pub fn has_pending_updates(&self) -> bool {
        self.position.is_pending() || self.zoom.is_pending() || self.rotation.is_pending()
    }

    pub fn clear(&mut self) {
        self.position.clear();
        self.zoom.clear();
        self.rotation.clear();
    }
}
