//! Batch driver over every player with appearances.

use futures::stream::{self, StreamExt};
use triad_core::connector::require;
use triad_core::{BatchStats, EntityKind, PlayerFailure, PlayerSnapshot, TriadError};

use crate::Triangulator;
use crate::sink::SnapshotSink;
use crate::triangulate::{Session, load_timeline};

/// Result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Snapshots of every triangulated player, in roster order and
    /// chronological per player.
    pub snapshots: Vec<PlayerSnapshot>,
    /// Players aborted by an error, in roster order.
    pub failures: Vec<PlayerFailure>,
    /// Players enumerated from the roster.
    pub players_total: usize,
    /// Players with no identity or talk.
    pub players_skipped: usize,
}

impl BatchReport {
    /// Summary counters.
    #[must_use]
    pub fn stats(&self) -> BatchStats {
        BatchStats {
            players_total: self.players_total,
            players_skipped: self.players_skipped,
            players_failed: self.failures.len(),
            snapshots: self.snapshots.len(),
        }
    }
}

impl Triangulator {
    /// Triangulate every player with appearances.
    ///
    /// Players run concurrently up to the configured limit; output keeps roster
    /// order. A player's error is recorded in [`BatchReport::failures`] and never
    /// aborts the run. The connector is wrapped in a cache that lives for this
    /// call only.
    ///
    /// # Errors
    /// Fails only when the calendar or the roster cannot be fetched.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "triad::batch::run_batch",
            skip(self),
            fields(concurrency = self.cfg.concurrency),
        )
    )]
    pub async fn run_batch(&self) -> Result<BatchReport, TriadError> {
        let mut session = Session::new(self, self.run_connector());
        let timeline = load_timeline(&session).await?;
        session.resolve(&timeline);

        let roster_provider = require(session.connector().as_roster_provider(), EntityKind::Roster)?;
        let roster = session
            .call("roster", roster_provider.players_with_appearances())
            .await?;

        let session = &session;
        let results: Vec<_> = stream::iter(roster)
            .map(|id| async move { session.triangulate(&id).await })
            .buffered(self.cfg.concurrency)
            .collect()
            .await;

        let mut report = BatchReport {
            players_total: results.len(),
            ..BatchReport::default()
        };
        for result in results {
            match result {
                Ok(t) if t.is_empty() => report.players_skipped += 1,
                Ok(t) => report.snapshots.extend(t.snapshots(&timeline)),
                Err(failure) => report.failures.push(failure),
            }
        }

        #[cfg(feature = "tracing")]
        {
            let stats = report.stats();
            tracing::info!(%stats, "batch finished");
            if !report.failures.is_empty() {
                tracing::warn!(failures = report.failures.len(), "players failed");
                for f in &report.failures {
                    tracing::warn!(
                        player_id = %f.player_id,
                        player_name = ?f.player_name,
                        message = %f.message,
                        "player failed"
                    );
                }
            }
        }
        Ok(report)
    }

    /// [`run_batch`](Self::run_batch), then write every snapshot to `sink`.
    ///
    /// # Errors
    /// As `run_batch`, plus the sink's write failures.
    pub async fn run_to_sink(&self, sink: &mut dyn SnapshotSink) -> Result<BatchReport, TriadError> {
        let report = self.run_batch().await?;
        for snapshot in &report.snapshots {
            sink.write(snapshot)?;
        }
        sink.finish()?;
        Ok(report)
    }
}
