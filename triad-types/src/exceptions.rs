//! Feed entries whose subject mismatch is a known renaming artifact.
//!
//! Some recompositions were written to the feed without a recomposition entry;
//! later gains then name the new identity while the feed still belongs to the
//! old one. Others were recorded twice. The table lists, per player, the feed
//! ordinals (0-based, oldest first) where a name mismatch must not open a new
//! epoch.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::TriadError;
use crate::records::PlayerId;

const CURATED: &str = include_str!("../data/recomp_exceptions.json");

/// Player id to the set of feed ordinals exempt from epoch splitting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExceptionTable(BTreeMap<PlayerId, BTreeSet<usize>>);

impl ExceptionTable {
    /// An empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// The curated table bundled with this crate.
    ///
    /// A malformed bundle yields an empty table and is logged as an error.
    #[must_use]
    pub fn curated() -> Self {
        Self::parse_or_empty(CURATED)
    }

    fn parse_or_empty(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|e| {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %e, "exception table is malformed; no exemptions apply");
            #[cfg(not(feature = "tracing"))]
            drop(e);
            Self::new()
        })
    }

    /// Parse a table from JSON of the form `{"<player id>": [ordinal, ...]}`.
    ///
    /// # Errors
    /// Returns `TriadError::Data` when the JSON is malformed.
    pub fn from_json(s: &str) -> Result<Self, TriadError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Exempt `ordinal` of `player`'s feed.
    #[must_use]
    pub fn with(mut self, player: impl Into<PlayerId>, ordinal: usize) -> Self {
        self.insert(player, ordinal);
        self
    }

    /// Exempt `ordinal` of `player`'s feed.
    pub fn insert(&mut self, player: impl Into<PlayerId>, ordinal: usize) {
        self.0.entry(player.into()).or_default().insert(ordinal);
    }

    /// Whether the entry at `ordinal` of `player`'s feed is exempt.
    #[must_use]
    pub fn is_exempt(&self, player: &PlayerId, ordinal: usize) -> bool {
        self.0.get(player).is_some_and(|s| s.contains(&ordinal))
    }

    /// Number of players with at least one exemption.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no player has exemptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curated_table_parses() {
        let t = ExceptionTable::curated();
        assert_eq!(t.len(), 13);
        assert!(t.is_exempt(&PlayerId::from("6840fa88896f631e9d688d28"), 18));
        assert!(!t.is_exempt(&PlayerId::from("6840fa88896f631e9d688d28"), 17));
        assert!(!t.is_exempt(&PlayerId::from("unknown"), 18));
    }

    #[test]
    fn malformed_table_falls_back_to_empty() {
        assert!(matches!(
            ExceptionTable::from_json("{\"p\": [1,"),
            Err(TriadError::Data(_))
        ));
        assert!(ExceptionTable::parse_or_empty("{\"p\": [1,").is_empty());
        assert_eq!(ExceptionTable::curated(), ExceptionTable::from_json(CURATED).unwrap());
    }
}
