#![doc = include_str!("../README.md")]

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use triad_core::connector::{
    CalendarProvider, ChronConnector, FeedProvider, PlayerProvider, RosterProvider, TalkProvider,
};
use triad_core::{FeedEntry, PlayerId, PlayerRecord, SeasonDay, TalkRecord, TeamId, TriadError};

pub mod fixtures;
mod league;

pub use league::League;
use league::version_at;

const LATENCY: Duration = Duration::from_millis(200);

/// Mock connector serving an in-memory [`League`].
pub struct MockConnector {
    league: League,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Connector over the [fixture league](fixtures::league).
    #[must_use]
    pub fn new() -> Self {
        Self::from_league(fixtures::league())
    }

    /// Connector over caller-provided data.
    #[must_use]
    pub const fn from_league(league: League) -> Self {
        Self { league }
    }

    /// The data being served.
    #[must_use]
    pub const fn league(&self) -> &League {
        &self.league
    }

    async fn maybe_fail_or_delay(id: &str, capability: &'static str) -> Result<(), TriadError> {
        match id {
            fixtures::FAIL => Err(TriadError::connector(
                "triad-mock",
                format!("forced failure: {capability}"),
            )),
            fixtures::TIMEOUT => {
                tokio::time::sleep(LATENCY).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ChronConnector for MockConnector {
    fn name(&self) -> &'static str {
        "triad-mock"
    }

    fn as_player_provider(&self) -> Option<&dyn PlayerProvider> {
        Some(self as &dyn PlayerProvider)
    }
    fn as_talk_provider(&self) -> Option<&dyn TalkProvider> {
        Some(self as &dyn TalkProvider)
    }
    fn as_feed_provider(&self) -> Option<&dyn FeedProvider> {
        Some(self as &dyn FeedProvider)
    }
    fn as_roster_provider(&self) -> Option<&dyn RosterProvider> {
        Some(self as &dyn RosterProvider)
    }
    fn as_calendar_provider(&self) -> Option<&dyn CalendarProvider> {
        Some(self as &dyn CalendarProvider)
    }
}

#[async_trait]
impl PlayerProvider for MockConnector {
    async fn player(
        &self,
        id: &PlayerId,
        at: Option<DateTime<Utc>>,
    ) -> Result<Option<PlayerRecord>, TriadError> {
        Self::maybe_fail_or_delay(id.as_str(), "player").await?;
        Ok(self
            .league
            .players
            .get(id)
            .and_then(|v| version_at(v, at, |r| r.valid_from))
            .cloned())
    }

    async fn earliest_player(&self, id: &PlayerId) -> Result<Option<PlayerRecord>, TriadError> {
        Self::maybe_fail_or_delay(id.as_str(), "earliest-player").await?;
        Ok(self
            .league
            .players
            .get(id)
            .and_then(|v| v.first())
            .cloned())
    }

    async fn player_versions(&self, id: &PlayerId) -> Result<Vec<PlayerRecord>, TriadError> {
        Self::maybe_fail_or_delay(id.as_str(), "player-versions").await?;
        Ok(self.league.players.get(id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl TalkProvider for MockConnector {
    async fn talk(
        &self,
        id: &PlayerId,
        at: Option<DateTime<Utc>>,
    ) -> Result<Option<TalkRecord>, TriadError> {
        Self::maybe_fail_or_delay(id.as_str(), "talk").await?;
        Ok(self
            .league
            .talk
            .get(id)
            .and_then(|v| version_at(v, at, |r| r.valid_from))
            .cloned())
    }
}

#[async_trait]
impl FeedProvider for MockConnector {
    async fn player_feed(&self, id: &PlayerId) -> Result<Option<Vec<FeedEntry>>, TriadError> {
        Self::maybe_fail_or_delay(id.as_str(), "player-feed").await?;
        Ok(self.league.player_feeds.get(id).cloned())
    }

    async fn team_feed(&self, team: &TeamId) -> Result<Option<Vec<FeedEntry>>, TriadError> {
        Self::maybe_fail_or_delay(team.as_str(), "team-feed").await?;
        Ok(self.league.team_feeds.get(team).cloned())
    }
}

#[async_trait]
impl RosterProvider for MockConnector {
    async fn players_with_appearances(&self) -> Result<Vec<PlayerId>, TriadError> {
        Ok(self.league.roster.clone())
    }
}

#[async_trait]
impl CalendarProvider for MockConnector {
    async fn season_days(&self) -> Result<Vec<(SeasonDay, DateTime<Utc>)>, TriadError> {
        Ok(self.league.calendar.clone())
    }
}
