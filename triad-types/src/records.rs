//! Versioned entity records returned by chron connectors.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, Category, stars_to_rating};

/// Opaque player identifier (hex object id in the upstream data).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Construct a player id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Opaque team identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    /// Construct a team id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One version of a player's identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Start of this version's validity.
    pub valid_from: DateTime<Utc>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Season the player first appeared in.
    pub birth_season: u32,
    /// Team the player belonged to in this version, if any.
    pub team_id: Option<TeamId>,
}

impl PlayerRecord {
    /// Display name as it appears in feed text.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Star ratings for a single category of clubhouse talk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryTalk {
    /// Star strings keyed by attribute.
    pub stars: BTreeMap<Attribute, String>,
}

/// One version of a player's clubhouse talk: ordinal evidence for each attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkRecord {
    /// Start of this version's validity.
    pub valid_from: DateTime<Utc>,
    /// Talk payload grouped by category; categories may be missing.
    pub categories: BTreeMap<Category, CategoryTalk>,
}

impl TalkRecord {
    /// Flatten all categories into attribute ratings.
    #[must_use]
    pub fn ratings(&self) -> BTreeMap<Attribute, u32> {
        self.categories
            .values()
            .flat_map(|c| c.stars.iter())
            .map(|(attribute, stars)| (*attribute, stars_to_rating(stars)))
            .collect()
    }
}

/// A link from a feed entry to an entity it mentions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedLink {
    /// Linked entity kind, e.g. `player` or `team`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Linked entity id.
    pub id: String,
}

/// A single narrative entry of a player or team feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Time the entry was emitted.
    pub ts: DateTime<Utc>,
    /// Entry type, e.g. `augment`, `game`, `recomposition`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-form narrative text.
    pub text: String,
    /// Entities referenced by the entry.
    #[serde(default)]
    pub links: Vec<FeedLink>,
}

impl FeedEntry {
    /// Whether any link on this entry points at `id`.
    #[must_use]
    pub fn links_to(&self, id: &str) -> bool {
        self.links.iter().any(|l| l.id == id)
    }
}
