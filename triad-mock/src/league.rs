use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use triad_core::{FeedEntry, PlayerId, PlayerRecord, SeasonDay, TalkRecord, TeamId};

/// In-memory league data served by [`MockConnector`](crate::MockConnector).
///
/// Versioned records are kept sorted by `valid_from`; feeds are kept in the
/// order given, which should be oldest first.
#[derive(Debug, Clone, Default)]
pub struct League {
    pub(crate) players: BTreeMap<PlayerId, Vec<PlayerRecord>>,
    pub(crate) talk: BTreeMap<PlayerId, Vec<TalkRecord>>,
    pub(crate) player_feeds: BTreeMap<PlayerId, Vec<FeedEntry>>,
    pub(crate) team_feeds: BTreeMap<TeamId, Vec<FeedEntry>>,
    pub(crate) roster: Vec<PlayerId>,
    pub(crate) calendar: Vec<(SeasonDay, DateTime<Utc>)>,
}

impl League {
    /// A league with no players and no calendar.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add an identity version for `id`.
    #[must_use]
    pub fn with_player(mut self, id: impl Into<PlayerId>, record: PlayerRecord) -> Self {
        let versions = self.players.entry(id.into()).or_default();
        versions.push(record);
        versions.sort_by_key(|r| r.valid_from);
        self
    }

    /// Add a talk version for `id`.
    #[must_use]
    pub fn with_talk(mut self, id: impl Into<PlayerId>, record: TalkRecord) -> Self {
        let versions = self.talk.entry(id.into()).or_default();
        versions.push(record);
        versions.sort_by_key(|r| r.valid_from);
        self
    }

    /// Replace a player's feed.
    #[must_use]
    pub fn with_player_feed(mut self, id: impl Into<PlayerId>, entries: Vec<FeedEntry>) -> Self {
        self.player_feeds.insert(id.into(), entries);
        self
    }

    /// Replace a team's feed.
    #[must_use]
    pub fn with_team_feed(mut self, team: impl Into<TeamId>, entries: Vec<FeedEntry>) -> Self {
        self.team_feeds.insert(team.into(), entries);
        self
    }

    /// Append a player to the appearance roster.
    #[must_use]
    pub fn enroll(mut self, id: impl Into<PlayerId>) -> Self {
        self.roster.push(id.into());
        self
    }

    /// Replace the season calendar.
    #[must_use]
    pub fn with_calendar(mut self, days: Vec<(SeasonDay, DateTime<Utc>)>) -> Self {
        self.calendar = days;
        self
    }

    /// Players on the appearance roster, in enrollment order.
    #[must_use]
    pub fn roster(&self) -> &[PlayerId] {
        &self.roster
    }
}

/// Version valid at-or-before `at`, or the latest when `at` is `None`.
pub(crate) fn version_at<T, F>(versions: &[T], at: Option<DateTime<Utc>>, valid_from: F) -> Option<&T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    match at {
        None => versions.last(),
        Some(t) => {
            let idx = versions.partition_point(|v| valid_from(v) <= t);
            idx.checked_sub(1).and_then(|i| versions.get(i))
        }
    }
}
