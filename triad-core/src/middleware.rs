//! Middleware trait for wrapping `ChronConnector` implementations.

use std::sync::Arc;

use crate::connector::ChronConnector;

/// Trait implemented by connector middleware layers.
///
/// A middleware consumes an inner `ChronConnector` and returns a wrapped connector
/// that augments its behavior (e.g., read-through caching).
pub trait Middleware: Send + Sync {
    /// Apply this middleware to wrap an inner connector and return the wrapped connector.
    fn apply(self: Box<Self>, inner: Arc<dyn ChronConnector>) -> Arc<dyn ChronConnector>;

    /// Layer name; the builder replaces layers by name.
    fn name(&self) -> &'static str;
}
