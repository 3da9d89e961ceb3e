use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use triad_types::{Attribute, AttributeTag, PlayerId, TalkRecord, TriadError};

use super::composition::{Lifetime, PlayerComposition};
use crate::interval::{Interval, IntervalError};
use crate::snapshot::{NameHistory, PlayerSnapshot};
use crate::timeline::Timeline;

/// Upper bound every attribute of a freshly born epoch satisfies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochPrior {
    /// Epochs born at or after this instant receive the prior.
    pub from: DateTime<Utc>,
    /// Exclusive upper bound.
    pub upper: f64,
}

impl EpochPrior {
    fn applies_to(&self, birth: DateTime<Utc>) -> bool {
        birth >= self.from
    }
}

/// Lifecycle of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    /// Evidence is still being applied.
    Active,
    /// The oldest epoch has been finalized; the history is read-only.
    Done,
}

/// Backward replay state for one player.
///
/// Evidence is applied newest first. Each identity boundary finalizes the
/// epoch replayed so far into a [`PlayerComposition`]; `compositions()` is
/// therefore ordered newest epoch first.
#[derive(Debug, Clone)]
pub struct PlayerHistory<A = Attribute> {
    player_id: PlayerId,
    working_name: String,
    working: BTreeMap<A, Interval>,
    bonuses: Vec<(DateTime<Utc>, A, f64)>,
    epochs: Vec<PlayerComposition<A>>,
    last_birth: Option<DateTime<Utc>>,
    state: ReplayState,
}

impl<A: AttributeTag> PlayerHistory<A> {
    /// Start a replay for `player_id` under the player's latest name.
    pub fn new(player_id: PlayerId, working_name: impl Into<String>) -> Self {
        Self {
            player_id,
            working_name: working_name.into(),
            working: BTreeMap::new(),
            bonuses: Vec::new(),
            epochs: Vec::new(),
            last_birth: None,
            state: ReplayState::Active,
        }
    }

    /// A finished history with no epochs, for players with no evidence.
    pub fn empty(player_id: PlayerId, working_name: impl Into<String>) -> Self {
        let mut h = Self::new(player_id, working_name);
        h.state = ReplayState::Done;
        h
    }

    /// Player being replayed.
    #[must_use]
    pub const fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    /// Identity name of the epoch currently being replayed.
    #[must_use]
    pub fn working_name(&self) -> &str {
        &self.working_name
    }

    /// Switch the identity name of the epoch being replayed.
    pub fn set_working_name(&mut self, name: impl Into<String>) {
        self.working_name = name.into();
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ReplayState {
        self.state
    }

    /// Working bound of `attribute`; the full domain until first narrowed.
    #[must_use]
    pub fn working(&self, attribute: A) -> Interval {
        self.working.get(&attribute).copied().unwrap_or_default()
    }

    fn ensure_active(&self) -> Result<(), TriadError> {
        match self.state {
            ReplayState::Active => Ok(()),
            ReplayState::Done => Err(TriadError::InvalidArg(format!(
                "replay for {} is already finished",
                self.player_id
            ))),
        }
    }

    fn contradiction(&self, name: &str, attribute: A, e: &IntervalError) -> TriadError {
        TriadError::impossible_interval(
            self.player_id.clone(),
            name,
            attribute.to_string(),
            format!("error with {attribute}: {e}"),
        )
    }

    fn narrow_as<I>(&mut self, name: &str, bounds: I) -> Result<(), TriadError>
    where
        I: IntoIterator<Item = (A, Interval)>,
    {
        for (attribute, bound) in bounds {
            let narrowed = self
                .working(attribute)
                .intersect(bound)
                .map_err(|e| self.contradiction(name, attribute, &e))?;
            self.working.insert(attribute, narrowed);
        }
        Ok(())
    }

    /// Intersect each given bound into the working map.
    ///
    /// # Errors
    /// Returns `TriadError::ImpossibleInterval` naming the first attribute whose
    /// bounds are disjoint, and `InvalidArg` once the replay is finished.
    pub fn narrow<I>(&mut self, bounds: I) -> Result<(), TriadError>
    where
        I: IntoIterator<Item = (A, Interval)>,
    {
        self.ensure_active()?;
        let name = self.working_name.clone();
        self.narrow_as(&name, bounds)
    }

    /// Narrow by star ratings.
    ///
    /// # Errors
    /// As [`narrow`](Self::narrow).
    pub fn apply_ratings<I>(&mut self, ratings: I) -> Result<(), TriadError>
    where
        I: IntoIterator<Item = (A, u32)>,
    {
        self.narrow(
            ratings
                .into_iter()
                .map(|(a, r)| (a, Interval::from_rating(r))),
        )
    }

    /// Log a bonus and undo it on the working bound.
    ///
    /// The working bound describes the value *before* the bonus from here on,
    /// which is itself non-negative.
    ///
    /// # Errors
    /// Returns `TriadError::ImpossibleInterval` when the pre-bonus value would be
    /// negative, and `InvalidArg` once the replay is finished.
    pub fn add_bonus(
        &mut self,
        ts: DateTime<Utc>,
        attribute: A,
        delta: f64,
    ) -> Result<(), TriadError> {
        self.ensure_active()?;
        let before = (self.working(attribute) - delta)
            .intersect(Interval::DOMAIN)
            .map_err(|e| self.contradiction(&self.working_name, attribute, &e))?;
        self.working.insert(attribute, before);
        self.bonuses.push((ts, attribute, delta));
        Ok(())
    }

    /// Close the epoch being replayed at `birth` under `name`.
    ///
    /// The epoch ends where the previously finalized one began. It receives every
    /// logged bonus inside its lifetime; the working map is reset for the next
    /// older epoch.
    ///
    /// # Errors
    /// Returns `ImpossibleInterval` when the birth prior contradicts the working
    /// bounds, `Data` when `birth` is after the epoch's end, and `InvalidArg`
    /// once the replay is finished.
    pub fn finalize(
        &mut self,
        birth: DateTime<Utc>,
        name: &str,
        prior: Option<EpochPrior>,
    ) -> Result<(), TriadError> {
        self.ensure_active()?;
        if let Some(d) = self.last_birth
            && birth > d
        {
            return Err(TriadError::Data(format!(
                "epoch {name} of {} would be born at {birth} after it ends at {d}",
                self.player_id
            )));
        }
        self.close(birth, name, prior, false)
    }

    /// Finalize the oldest epoch under the working name and mark the replay done.
    ///
    /// `birth` is usually the first identity record, which can postdate evidence
    /// already replayed. A birth after the newer epoch's start is clamped to it,
    /// and bonuses logged at or before the birth are folded into the oldest
    /// epoch's initial bounds.
    ///
    /// # Errors
    /// Returns `ImpossibleInterval` when the birth prior contradicts the working
    /// bounds and `InvalidArg` once the replay is finished.
    pub fn finish(
        &mut self,
        birth: DateTime<Utc>,
        prior: Option<EpochPrior>,
    ) -> Result<(), TriadError> {
        self.ensure_active()?;
        let birth = match self.last_birth {
            Some(d) if birth > d => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    player_id = %self.player_id,
                    %birth,
                    clamped = %d,
                    "first identity record postdates replayed evidence"
                );
                d
            }
            _ => birth,
        };
        let name = self.working_name.clone();
        self.close(birth, &name, prior, true)?;
        self.state = ReplayState::Done;
        Ok(())
    }

    fn close(
        &mut self,
        birth: DateTime<Utc>,
        name: &str,
        prior: Option<EpochPrior>,
        oldest: bool,
    ) -> Result<(), TriadError> {
        let death = self.last_birth;
        if let Some(p) = prior
            && p.applies_to(birth)
        {
            let bound = Interval::new(0.0, p.upper)?;
            self.narrow_as(name, A::all().iter().map(|a| (*a, bound)))?;
        }

        let lifetime = Lifetime { birth, death };
        let mut bonus_history: BTreeMap<DateTime<Utc>, Vec<(A, f64)>> = BTreeMap::new();
        let mut older = Vec::with_capacity(self.bonuses.len());
        for (ts, attribute, delta) in self.bonuses.drain(..) {
            if lifetime.contains(ts) {
                bonus_history.entry(ts).or_default().push((attribute, delta));
            } else if ts <= birth {
                older.push((ts, attribute, delta));
            } else {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    player_id = %self.player_id,
                    %ts,
                    attribute = %attribute,
                    "dropping bonus after the end of the oldest open epoch"
                );
            }
        }

        let mut initial_attributes: BTreeMap<A, Interval> = A::all()
            .iter()
            .map(|a| (*a, self.working(*a)))
            .collect();
        if oldest {
            // Nothing older remains; the gains predate the birth.
            #[cfg(feature = "tracing")]
            if !older.is_empty() {
                tracing::debug!(
                    player_id = %self.player_id,
                    %birth,
                    bonuses = older.len(),
                    "folding bonuses logged before the first identity record"
                );
            }
            for (_, attribute, delta) in older.drain(..) {
                let slot = initial_attributes.entry(attribute).or_default();
                *slot = *slot + delta;
            }
        }
        self.bonuses = older;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            player_id = %self.player_id,
            epoch = name,
            %birth,
            death = ?death,
            bonuses = bonus_history.len(),
            "finalized epoch"
        );

        self.epochs.push(PlayerComposition {
            player_id: self.player_id.clone(),
            player_name: name.to_string(),
            lifetime,
            initial_attributes,
            bonus_history,
        });
        self.last_birth = Some(birth);
        self.working.clear();
        Ok(())
    }

    /// Finalized epochs, newest first.
    #[must_use]
    pub fn compositions(&self) -> &[PlayerComposition<A>] {
        &self.epochs
    }

    /// The epoch that owns instant `t`.
    #[must_use]
    pub fn composition_at(&self, t: DateTime<Utc>) -> Option<&PlayerComposition<A>> {
        self.epochs.iter().find(|c| c.contains(t))
    }

    /// The open-ended (current) epoch.
    #[must_use]
    pub fn current_composition(&self) -> Option<&PlayerComposition<A>> {
        self.epochs.iter().find(|c| c.lifetime.death.is_none())
    }

    /// Every epoch's coalesced snapshots, oldest epoch first.
    pub fn all_versions<'a>(
        &'a self,
        timeline: &'a Timeline,
        names: &'a NameHistory,
    ) -> impl Iterator<Item = PlayerSnapshot<A>> + 'a {
        self.epochs
            .iter()
            .rev()
            .flat_map(move |c| c.versions(timeline, names))
    }
}

impl PlayerHistory<Attribute> {
    /// Narrow by every rating present in a talk record.
    ///
    /// # Errors
    /// As [`narrow`](Self::narrow).
    pub fn apply_talk(&mut self, talk: &TalkRecord) -> Result<(), TriadError> {
        self.apply_ratings(talk.ratings())
    }
}
