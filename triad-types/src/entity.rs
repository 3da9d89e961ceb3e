use core::fmt;
use serde::{Deserialize, Serialize};

/// Entity kinds served by chron connectors.
///
/// Used as capability labels in `Unsupported` errors, as cache partition keys
/// and in telemetry fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EntityKind {
    /// Versioned player identity (name, birth season, team).
    PlayerLite,
    /// Versioned clubhouse talk (star ratings).
    Talk,
    /// Narrative feed attached to a player.
    PlayerFeed,
    /// Narrative feed attached to a team.
    TeamFeed,
    /// League-wide enumeration of players with appearances.
    Roster,
    /// Season-day calendar.
    Calendar,
}

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::PlayerLite,
        Self::Talk,
        Self::PlayerFeed,
        Self::TeamFeed,
        Self::Roster,
        Self::Calendar,
    ];

    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlayerLite => "player-lite",
            Self::Talk => "talk",
            Self::PlayerFeed => "player-feed",
            Self::TeamFeed => "team-feed",
            Self::Roster => "roster",
            Self::Calendar => "calendar",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
