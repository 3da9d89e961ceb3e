//! Materialized per-version snapshots and display-name lookup.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use triad_types::{Attribute, AttributeTag, PlayerId, PlayerRecord};

use crate::interval::Interval;

/// Cell rendered when an attribute has no finite median.
pub const UNDEFINED_CELL: &str = "? ± inf";

/// Fixed leading output columns.
pub const LEADING_COLUMNS: [&str; 4] = ["player_id", "player_name", "valid_from", "valid_to"];

/// One versioned row of a player's reconstructed attributes.
#[derive(Debug, Clone)]
pub struct PlayerSnapshot<A = Attribute> {
    /// Player the row belongs to.
    pub player_id: PlayerId,
    /// Display name at the start of the version.
    pub player_name: String,
    /// First observable point of the version.
    pub valid_from: Option<DateTime<Utc>>,
    /// Last observable point of the version.
    pub valid_to: Option<DateTime<Utc>>,
    /// Bound for every attribute.
    pub attributes: BTreeMap<A, Interval>,
}

/// Equality ignores the validity range; it decides whether two points coalesce.
impl<A: AttributeTag> PartialEq for PlayerSnapshot<A> {
    fn eq(&self, other: &Self) -> bool {
        self.player_id == other.player_id
            && self.player_name == other.player_name
            && self.attributes == other.attributes
    }
}

impl<A: AttributeTag> PlayerSnapshot<A> {
    /// Output header: leading columns followed by every attribute name.
    #[must_use]
    pub fn header() -> Vec<String> {
        LEADING_COLUMNS
            .iter()
            .map(|c| (*c).to_string())
            .chain(A::all().iter().map(ToString::to_string))
            .collect()
    }

    /// The literal output row.
    ///
    /// Attribute cells are `"{median} ± {uncertainty}"`; attributes without a
    /// finite median render as [`UNDEFINED_CELL`].
    #[must_use]
    pub fn row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(LEADING_COLUMNS.len() + A::all().len());
        row.push(self.player_id.to_string());
        row.push(self.player_name.clone());
        row.push(render_ts(self.valid_from));
        row.push(render_ts(self.valid_to));
        for a in A::all() {
            let cell = self
                .interval(*a)
                .value()
                .unwrap_or_else(|_| UNDEFINED_CELL.to_string());
            row.push(cell);
        }
        row
    }

    /// Bound for `attribute`; the full domain when absent.
    #[must_use]
    pub fn interval(&self, attribute: A) -> Interval {
        self.attributes.get(&attribute).copied().unwrap_or_default()
    }

    /// Attributes whose bound has no finite median.
    #[must_use]
    pub fn undefined(&self) -> Vec<A> {
        A::all()
            .iter()
            .copied()
            .filter(|a| self.interval(*a).median().is_err())
            .collect()
    }
}

fn render_ts(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .unwrap_or_default()
}

/// A player's display names over time, built from identity versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameHistory {
    names: Vec<(DateTime<Utc>, String)>,
}

impl NameHistory {
    /// Build from identity versions in any order.
    #[must_use]
    pub fn from_records(records: &[PlayerRecord]) -> Self {
        let mut names: Vec<_> = records
            .iter()
            .map(|r| (r.valid_from, r.full_name()))
            .collect();
        names.sort_by_key(|(t, _)| *t);
        Self { names }
    }

    /// Name of the version valid at-or-before `t`.
    #[must_use]
    pub fn name_at(&self, t: DateTime<Utc>) -> Option<&str> {
        let idx = self.names.partition_point(|(from, _)| *from <= t);
        idx.checked_sub(1).map(|i| self.names[i].1.as_str())
    }

    /// True when no version is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(s, 0).unwrap()
    }

    fn record(at: i64, first: &str) -> PlayerRecord {
        PlayerRecord {
            valid_from: ts(at),
            first_name: first.into(),
            last_name: "Smith".into(),
            birth_season: 3,
            team_id: None,
        }
    }

    #[test]
    fn name_lookup_is_at_or_before() {
        let names = NameHistory::from_records(&[record(200, "Bob"), record(100, "Alice")]);
        assert_eq!(names.name_at(ts(50)), None);
        assert_eq!(names.name_at(ts(100)), Some("Alice Smith"));
        assert_eq!(names.name_at(ts(199)), Some("Alice Smith"));
        assert_eq!(names.name_at(ts(500)), Some("Bob Smith"));
    }

    #[test]
    fn equality_ignores_validity() {
        let a: PlayerSnapshot = PlayerSnapshot {
            player_id: PlayerId::from("p"),
            player_name: "A".into(),
            valid_from: Some(ts(1)),
            valid_to: Some(ts(2)),
            attributes: BTreeMap::new(),
        };
        let mut b = a.clone();
        b.valid_from = None;
        b.valid_to = Some(ts(9));
        assert_eq!(a, b);
        b.player_name = "B".into();
        assert_ne!(a, b);
    }

    #[test]
    fn row_renders_undefined_medians() {
        let mut attributes = BTreeMap::new();
        attributes.insert(Attribute::Aiming, Interval::from_rating(2));
        let s: PlayerSnapshot = PlayerSnapshot {
            player_id: PlayerId::from("p"),
            player_name: "A".into(),
            valid_from: Some(ts(0)),
            valid_to: None,
            attributes,
        };
        let row = s.row();
        assert_eq!(row.len(), 4 + Attribute::ALL.len());
        assert_eq!(row[2], "1970-01-01T00:00:00Z");
        assert_eq!(row[3], "");
        assert_eq!(row[4], "50 ± 12.5");
        assert_eq!(row[5], UNDEFINED_CELL);
        assert_eq!(s.undefined().len(), Attribute::ALL.len() - 1);
        assert_eq!(PlayerSnapshot::<Attribute>::header()[4], "Aiming");
    }
}
