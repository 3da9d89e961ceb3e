//! Triad reconstructs the hidden attributes of MMOLB players.
//!
//! Overview
//! - Fetches identities, clubhouse talk and feeds through a pluggable
//!   [`ChronConnector`](triad_core::ChronConnector).
//! - Replays each player's evidence newest to oldest, narrowing one interval
//!   per attribute and splitting the history into epochs at recompositions.
//! - Materializes every epoch into coalesced, versioned snapshots.
//!
//! Key behaviors
//! - A contradiction (two pieces of evidence that cannot both hold) aborts that
//!   player only; the batch records it in [`BatchReport::failures`].
//! - Every connector call is bounded by `TriadConfig::fetch_timeout`.
//! - Batch runs wrap the connector in an in-memory cache scoped to the run.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use triad::{CsvSink, Triangulator};
//! use triad_mock::MockConnector;
//!
//! let t = Triangulator::builder()
//!     .with_connector(Arc::new(MockConnector::new()))
//!     .build()?;
//! let mut sink = CsvSink::new(std::io::stdout());
//! let report = t.run_to_sink(&mut sink).await?;
//! println!("{}", report.stats());
//! ```
//!
//! See `triad/examples/` for a runnable demonstration.
#![warn(missing_docs)]

mod batch;
pub(crate) mod core;
mod sink;
mod triangulate;

pub use crate::batch::BatchReport;
pub use crate::core::{Triangulator, TriangulatorBuilder};
pub use crate::sink::{CsvSink, MemorySink, SnapshotSink};
pub use crate::triangulate::Triangulation;

pub use triad_middleware::{CacheMiddleware, ConnectorBuilder};

pub use triad_core::{
    Attribute, Backfill, BatchStats, BirthPrior, CacheConfig, ChronConnector, EntityKind,
    ExceptionTable, FeedClassifier, Interval, NameHistory, PlayerComposition, PlayerFailure,
    PlayerHistory, PlayerId, PlayerSnapshot, SeasonDay, Timeline, TriadConfig, TriadError,
};
