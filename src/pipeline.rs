//! Ordered handler composition.
//!
//! A handler takes the value accumulated so far plus a read-only context and
//! returns the next value. A [`HandlerChain`] threads a value through its
//! handlers left to right. The context is never mutated; composition is total.

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;

use std::fmt;

use crate::camera::CameraState;
use crate::config::HandlerConfig;

/// One pipeline stage.
pub type Handler<V, C> = fn(V, &C) -> V;

/// The fixed arguments every camera handler receives: a snapshot of the camera
/// and the configuration as it stood when the operation started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlerContext {
    pub camera: CameraState,
    pub config: HandlerConfig,
}

impl HandlerContext {
    #[must_use]
    pub fn new(camera: CameraState, config: HandlerConfig) -> Self {
        Self { camera, config }
    }
}

/// An ordered list of handlers run as one function.
pub struct HandlerChain<V, C> {
    handlers: Vec<Handler<V, C>>,
}

impl<V, C> HandlerChain<V, C> {
    /// An empty chain; running it returns the input unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Builder form of [`HandlerChain::push`].
    #[must_use]
    pub fn with(mut self, handler: Handler<V, C>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Append a stage to the end of the chain.
    pub fn push(&mut self, handler: Handler<V, C>) {
        self.handlers.push(handler);
    }

    /// Thread `value` through every stage in order.
    pub fn run(&self, value: V, context: &C) -> V {
        self.handlers
            .iter()
            .fold(value, |acc, handler| handler(acc, context))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<V, C> Default for HandlerChain<V, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C> Clone for HandlerChain<V, C> {
    fn clone(&self) -> Self {
        Self { handlers: self.handlers.clone() }
    }
}

impl<V, C> fmt::Debug for HandlerChain<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerChain").field("stages", &self.handlers.len()).finish()
    }
}

impl<V, C> FromIterator<Handler<V, C>> for HandlerChain<V, C> {
    fn from_iter<I: IntoIterator<Item = Handler<V, C>>>(iter: I) -> Self {
        Self { handlers: iter.into_iter().collect() }
    }
}

/// Compose handlers into one chain, in the given order.
#[must_use]
pub fn create_handler_chain<V, C>(handlers: impl IntoIterator<Item = Handler<V, C>>) -> HandlerChain<V, C> {
    handlers.into_iter().collect()
}
