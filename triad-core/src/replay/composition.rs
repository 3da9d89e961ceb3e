use std::collections::BTreeMap;
use std::collections::btree_map;
use std::iter::Peekable;

use chrono::{DateTime, Utc};
use triad_types::{Attribute, AttributeTag, PlayerId, TriadError};

use crate::interval::Interval;
use crate::snapshot::{NameHistory, PlayerSnapshot};
use crate::timeline::Timeline;

/// Time range an epoch was the player's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifetime {
    /// Start of the epoch.
    pub birth: DateTime<Utc>,
    /// End of the epoch; `None` while it is still current.
    pub death: Option<DateTime<Utc>>,
}

impl Lifetime {
    /// Whether `t` belongs to this epoch: `birth < t <= death`.
    ///
    /// Adjacent epochs share a boundary instant; it belongs to the older one.
    #[must_use]
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.birth < t && self.death.is_none_or(|d| t <= d)
    }

    /// Whether `t` lies in the closed range `[birth, death]`.
    #[must_use]
    pub fn covers(&self, t: DateTime<Utc>) -> bool {
        self.birth <= t && self.death.is_none_or(|d| t <= d)
    }
}

/// An immutable epoch of a player's history.
///
/// `initial_attributes` bound every attribute at `birth`; every later state is
/// the initial bound plus the bonuses logged up to that instant.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerComposition<A = Attribute> {
    /// Player the epoch belongs to.
    pub player_id: PlayerId,
    /// Identity name for the epoch.
    pub player_name: String,
    /// Time range of the epoch.
    pub lifetime: Lifetime,
    /// Bound of every attribute at birth.
    pub initial_attributes: BTreeMap<A, Interval>,
    /// Bonuses with `birth < t <= death`, keyed by timestamp.
    pub bonus_history: BTreeMap<DateTime<Utc>, Vec<(A, f64)>>,
}

impl<A: AttributeTag> PlayerComposition<A> {
    /// Whether `t` falls inside this epoch (see [`Lifetime::contains`]).
    #[must_use]
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.lifetime.contains(t)
    }

    /// Attribute bounds at `t`: initial bounds plus every bonus in `(birth, t]`.
    ///
    /// # Errors
    /// Returns `TriadError::NotAlive` when `t` is outside `[birth, death]`.
    pub fn attributes_at(&self, t: DateTime<Utc>) -> Result<BTreeMap<A, Interval>, TriadError> {
        if !self.lifetime.covers(t) {
            return Err(TriadError::NotAlive {
                player_id: self.player_id.clone(),
                at: t.to_rfc3339(),
            });
        }
        let mut attributes = self.initial_attributes.clone();
        for bonuses in self.bonus_history.range(..=t).map(|(_, b)| b) {
            apply(&mut attributes, bonuses);
        }
        Ok(attributes)
    }

    /// Coalesced snapshots at every observable point of the epoch.
    ///
    /// Points are the timeline instants in `(birth, death]`; an open epoch runs
    /// up to the latest known point.
    #[must_use]
    pub fn versions<'a>(
        &'a self,
        timeline: &'a Timeline,
        names: &'a NameHistory,
    ) -> Versions<'a, A> {
        Versions {
            composition: self,
            names,
            points: timeline.points_between(self.lifetime.birth, self.lifetime.death),
            next_point: 0,
            bonuses: self.bonus_history.iter().peekable(),
            current: self.initial_attributes.clone(),
            pending: None,
        }
    }
}

fn apply<A: AttributeTag>(attributes: &mut BTreeMap<A, Interval>, bonuses: &[(A, f64)]) {
    for (attribute, delta) in bonuses {
        let slot = attributes.entry(*attribute).or_default();
        *slot = *slot + *delta;
    }
}

/// Lazy, restartable iterator over an epoch's coalesced snapshots.
///
/// Consecutive points with equal snapshots collapse into one row spanning
/// `valid_from..=valid_to`. Holds at most one snapshot of lookahead.
#[derive(Debug, Clone)]
pub struct Versions<'a, A = Attribute> {
    composition: &'a PlayerComposition<A>,
    names: &'a NameHistory,
    points: &'a [DateTime<Utc>],
    next_point: usize,
    bonuses: Peekable<btree_map::Iter<'a, DateTime<Utc>, Vec<(A, f64)>>>,
    current: BTreeMap<A, Interval>,
    pending: Option<PlayerSnapshot<A>>,
}

impl<A: AttributeTag> Versions<'_, A> {
    fn snapshot_at(&mut self, t: DateTime<Utc>) -> PlayerSnapshot<A> {
        while let Some((_, bonuses)) = self.bonuses.next_if(|(at, _)| **at <= t) {
            apply(&mut self.current, bonuses);
        }
        let comp = self.composition;
        PlayerSnapshot {
            player_id: comp.player_id.clone(),
            player_name: self
                .names
                .name_at(t)
                .unwrap_or(&comp.player_name)
                .to_string(),
            valid_from: Some(t),
            valid_to: Some(t),
            attributes: self.current.clone(),
        }
    }
}

impl<A: AttributeTag> Iterator for Versions<'_, A> {
    type Item = PlayerSnapshot<A>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&t) = self.points.get(self.next_point) {
            self.next_point += 1;
            let snapshot = self.snapshot_at(t);
            if let Some(pending) = self.pending.as_mut()
                && *pending == snapshot
            {
                pending.valid_to = Some(t);
                continue;
            }
            if let Some(done) = self.pending.replace(snapshot) {
                return Some(done);
            }
        }
        self.pending.take()
    }
}
