//! triad-core
//!
//! Core types, traits, and algorithms shared across the triad workspace.
//!
//! - `interval`: closed-open interval arithmetic used to bound hidden attributes.
//! - `connector`: the `ChronConnector` trait and capability provider traits.
//! - `classify`: feed text classification into renames and gains.
//! - `replay`: backward replay (`PlayerHistory`) and epochs (`PlayerComposition`).
//! - `snapshot`: versioned output rows and name lookup.
//! - `timeline`: the season-day calendar of observable points.
//!
//! Async runtime (Tokio)
//! ---------------------
//! Connector traits are `async_trait`s; implementations and the orchestrator
//! assume a Tokio 1.x runtime.
#![warn(missing_docs)]

pub mod classify;
/// Connector capability traits and the primary `ChronConnector` interface.
pub mod connector;
pub mod interval;
/// Middleware trait implemented by connector wrappers.
pub mod middleware;
pub mod replay;
pub mod snapshot;
pub mod timeline;

pub use classify::{FeedClassifier, FeedEvent, TeamGainPattern};
pub use connector::ChronConnector;
pub use interval::{Interval, IntervalError};
pub use middleware::Middleware;
pub use replay::{EpochPrior, Lifetime, PlayerComposition, PlayerHistory, ReplayState, Versions};
pub use snapshot::{NameHistory, PlayerSnapshot};
pub use timeline::Timeline;

pub use triad_types::*;
