//! Report envelopes produced by the batch driver.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TriadError;
use crate::records::PlayerId;

/// A player the batch driver could not triangulate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerFailure {
    /// Player that failed.
    pub player_id: PlayerId,
    /// Display name when it was known at the time of failure.
    pub player_name: Option<String>,
    /// Rendered error message.
    pub message: String,
    /// Underlying error.
    pub error: TriadError,
}

impl PlayerFailure {
    /// Build a failure record from the error that aborted the player.
    ///
    /// Contradictions carry the name of the epoch being replayed; it wins over
    /// the name passed in.
    #[must_use]
    pub fn new(player_id: PlayerId, player_name: Option<String>, error: TriadError) -> Self {
        let player_name = match &error {
            TriadError::ImpossibleInterval { player_name, .. } => Some(player_name.clone()),
            _ => player_name,
        };
        Self {
            player_id,
            player_name,
            message: error.to_string(),
            error,
        }
    }
}

impl fmt::Display for PlayerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.player_name {
            Some(name) => write!(f, "{name} ({}): {}", self.player_id, self.message),
            None => write!(f, "{}: {}", self.player_id, self.message),
        }
    }
}

impl std::error::Error for PlayerFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Counters summarizing a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchStats {
    /// Players enumerated from the roster.
    pub players_total: usize,
    /// Players with no identity or talk; they contribute no rows.
    pub players_skipped: usize,
    /// Players aborted by an error.
    pub players_failed: usize,
    /// Snapshot rows produced.
    pub snapshots: usize,
}

impl BatchStats {
    /// Players that produced a history (possibly empty of changes).
    #[must_use]
    pub const fn players_ok(&self) -> usize {
        self.players_total
            .saturating_sub(self.players_skipped)
            .saturating_sub(self.players_failed)
    }
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} players, {} triangulated, {} skipped, {} failed, {} snapshots",
            self.players_total,
            self.players_ok(),
            self.players_skipped,
            self.players_failed,
            self.snapshots
        )
    }
}
