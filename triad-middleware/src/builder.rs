//! Builder for composing a chron connector with middleware layers.
//!
//! # Ordering
//!
//! Layers wrap the raw connector like an onion. The `layers` vector is kept
//! outermost-first (the last layer added is the outermost) and applied in
//! reverse by [`ConnectorBuilder::build`]:
//!
//! ```text
//! builder.layer(A).with_cache(..)
//!
//! Storage: [Cache, A]
//! Applied: Raw -> A -> Cache
//! Result:  Cache(A(Raw))
//! ```

use std::sync::Arc;

use triad_core::Middleware;
use triad_core::connector::ChronConnector;
use triad_types::CacheConfig;

use crate::cache::CacheMiddleware;

const CACHE_LAYER: &str = "CachingMiddleware";

/// Composes a raw connector with layered wrappers.
///
/// See the [module documentation](self) for ordering.
pub struct ConnectorBuilder {
    raw: Arc<dyn ChronConnector>,
    /// Outermost first.
    layers: Vec<Box<dyn Middleware>>,
}

impl ConnectorBuilder {
    /// Start from a raw, unwrapped connector.
    #[must_use]
    pub fn new(raw: Arc<dyn ChronConnector>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    /// Add or replace the read-through cache as the outermost layer.
    #[must_use]
    pub fn with_cache(mut self, cfg: &CacheConfig) -> Self {
        self.layers.retain(|m| m.name() != CACHE_LAYER);
        self.layers
            .insert(0, Box::new(CacheMiddleware::new(cfg.clone())));
        self
    }

    /// Remove the cache if present.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.layers.retain(|m| m.name() != CACHE_LAYER);
        self
    }

    /// Add an arbitrary layer at the outermost position.
    #[must_use]
    pub fn layer(mut self, layer: Box<dyn Middleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }

    /// Apply the layers innermost first and return the outermost connector.
    #[must_use]
    pub fn build(self) -> Arc<dyn ChronConnector> {
        let mut acc = Arc::clone(&self.raw);
        for m in self.layers.into_iter().rev() {
            acc = m.apply(acc);
        }
        acc
    }
}
