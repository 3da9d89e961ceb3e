use async_trait::async_trait;
use chrono::{DateTime, Utc};

use triad_types::{
    EntityKind, FeedEntry, PlayerId, PlayerRecord, SeasonDay, TalkRecord, TeamId, TriadError,
};

/// Focused role trait for connectors that serve versioned player identities.
#[async_trait]
pub trait PlayerProvider: Send + Sync {
    /// Fetch the identity version valid at-or-before `at`, or the latest when `at` is `None`.
    ///
    /// Returns `Ok(None)` when the player has no version at that time.
    async fn player(
        &self,
        id: &PlayerId,
        at: Option<DateTime<Utc>>,
    ) -> Result<Option<PlayerRecord>, TriadError>;

    /// Fetch the first known identity version.
    async fn earliest_player(&self, id: &PlayerId) -> Result<Option<PlayerRecord>, TriadError>;

    /// Fetch every identity version, oldest first.
    async fn player_versions(&self, id: &PlayerId) -> Result<Vec<PlayerRecord>, TriadError>;
}

/// Focused role trait for connectors that serve clubhouse talk.
#[async_trait]
pub trait TalkProvider: Send + Sync {
    /// Fetch the talk version valid at-or-before `at`, or the latest when `at` is `None`.
    async fn talk(
        &self,
        id: &PlayerId,
        at: Option<DateTime<Utc>>,
    ) -> Result<Option<TalkRecord>, TriadError>;
}

/// Focused role trait for connectors that serve narrative feeds.
///
/// Feeds are returned oldest first; `Ok(None)` means the entity has no feed.
#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Fetch a player's feed.
    async fn player_feed(&self, id: &PlayerId) -> Result<Option<Vec<FeedEntry>>, TriadError>;

    /// Fetch a team's feed.
    async fn team_feed(&self, team: &TeamId) -> Result<Option<Vec<FeedEntry>>, TriadError>;
}

/// Focused role trait for connectors that enumerate the league.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// Players with at least one appearance or plate appearance.
    async fn players_with_appearances(&self) -> Result<Vec<PlayerId>, TriadError>;
}

/// Focused role trait for connectors that serve the season calendar.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Every observed season day with the instant it started.
    async fn season_days(&self) -> Result<Vec<(SeasonDay, DateTime<Utc>)>, TriadError>;
}

/// Main connector trait implemented by chron data sources. Exposes capability discovery.
#[async_trait]
pub trait ChronConnector: Send + Sync {
    /// A stable identifier used in logs and error attribution.
    fn name(&self) -> &'static str;

    /// Advertise player identity capability.
    fn as_player_provider(&self) -> Option<&dyn PlayerProvider> {
        None
    }

    /// Advertise talk capability.
    fn as_talk_provider(&self) -> Option<&dyn TalkProvider> {
        None
    }

    /// Advertise feed capability.
    fn as_feed_provider(&self) -> Option<&dyn FeedProvider> {
        None
    }

    /// Advertise roster enumeration capability.
    fn as_roster_provider(&self) -> Option<&dyn RosterProvider> {
        None
    }

    /// Advertise calendar capability.
    fn as_calendar_provider(&self) -> Option<&dyn CalendarProvider> {
        None
    }
}

/// Resolve a capability accessor or fail with `TriadError::Unsupported` labelled by `kind`.
///
/// # Errors
/// Returns `TriadError::Unsupported` when `provider` is `None`.
pub fn require<T: ?Sized>(provider: Option<&T>, kind: EntityKind) -> Result<&T, TriadError> {
    provider.ok_or_else(|| TriadError::unsupported(kind.as_str()))
}

/// Generate `as_*_provider` accessors for a wrapper that implements
/// `ChronConnector` by delegating to an inner field.
#[macro_export]
macro_rules! chron_connector_accessors {
    ($inner:ident) => {
        fn as_player_provider(&self) -> Option<&dyn $crate::connector::PlayerProvider> {
            if self.$inner.as_player_provider().is_some() {
                Some(self as &dyn $crate::connector::PlayerProvider)
            } else {
                None
            }
        }
        fn as_talk_provider(&self) -> Option<&dyn $crate::connector::TalkProvider> {
            if self.$inner.as_talk_provider().is_some() {
                Some(self as &dyn $crate::connector::TalkProvider)
            } else {
                None
            }
        }
        fn as_feed_provider(&self) -> Option<&dyn $crate::connector::FeedProvider> {
            if self.$inner.as_feed_provider().is_some() {
                Some(self as &dyn $crate::connector::FeedProvider)
            } else {
                None
            }
        }
        fn as_roster_provider(&self) -> Option<&dyn $crate::connector::RosterProvider> {
            if self.$inner.as_roster_provider().is_some() {
                Some(self as &dyn $crate::connector::RosterProvider)
            } else {
                None
            }
        }
        fn as_calendar_provider(&self) -> Option<&dyn $crate::connector::CalendarProvider> {
            if self.$inner.as_calendar_provider().is_some() {
                Some(self as &dyn $crate::connector::CalendarProvider)
            } else {
                None
            }
        }
    };
}
