//! Per-player driver: fetches evidence and replays it newest to oldest.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use triad_core::connector::{ChronConnector, FeedProvider, PlayerProvider, TalkProvider, require};
use triad_core::{
    Attribute, EntityKind, EpochPrior, FeedEntry, FeedEvent, NameHistory, PlayerFailure,
    PlayerHistory, PlayerId, PlayerSnapshot, Timeline, TriadError,
};

use crate::Triangulator;
use crate::core::tag_err;

/// Outcome of triangulating one player.
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// Finished replay; empty when the player had no identity or no talk.
    pub history: PlayerHistory,
    /// Display names over time.
    pub names: NameHistory,
}

impl Triangulation {
    fn empty(player_id: PlayerId, name: String) -> Self {
        Self {
            history: PlayerHistory::empty(player_id, name),
            names: NameHistory::default(),
        }
    }

    /// True when there was no evidence to replay.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.compositions().is_empty()
    }

    /// Every coalesced snapshot, chronological.
    pub fn snapshots<'a>(
        &'a self,
        timeline: &'a Timeline,
    ) -> impl Iterator<Item = PlayerSnapshot> + 'a {
        self.history.all_versions(timeline, &self.names)
    }
}

/// Calendar thresholds resolved to instants once per run. A day missing from
/// the calendar disables the feature it gates.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Thresholds {
    recheck_after: Option<DateTime<Utc>>,
    prior: Option<EpochPrior>,
    roster_day: Option<DateTime<Utc>>,
}

/// Everything one run shares across players.
pub(crate) struct Session<'a> {
    triangulator: &'a Triangulator,
    connector: Arc<dyn ChronConnector>,
    thresholds: Thresholds,
}

impl<'a> Session<'a> {
    pub(crate) fn new(triangulator: &'a Triangulator, connector: Arc<dyn ChronConnector>) -> Self {
        Self {
            triangulator,
            connector,
            thresholds: Thresholds::default(),
        }
    }

    /// Resolve the configured calendar days against `timeline`.
    pub(crate) fn resolve(&mut self, timeline: &Timeline) {
        let cfg = &self.triangulator.cfg;
        self.thresholds = Thresholds {
            recheck_after: timeline.resolve(cfg.talk_recheck_after),
            prior: timeline.resolve(cfg.birth_prior.from_day).map(|from| EpochPrior {
                from,
                upper: cfg.birth_prior.upper,
            }),
            roster_day: timeline.resolve(cfg.backfill.roster_day),
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(thresholds = ?self.thresholds, "resolved calendar thresholds");
    }

    pub(crate) fn connector(&self) -> &dyn ChronConnector {
        self.connector.as_ref()
    }

    pub(crate) async fn call<T, Fut>(&self, capability: &'static str, fut: Fut) -> Result<T, TriadError>
    where
        Fut: core::future::Future<Output = Result<T, TriadError>>,
    {
        let name = self.connector.name();
        Triangulator::provider_call_with_timeout(
            name,
            capability,
            self.triangulator.cfg.fetch_timeout,
            fut,
        )
        .await
        .map_err(|e| tag_err(name, e))
    }

    /// Triangulate one player; the failure carries the best known name.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "triad::triangulate::player",
            skip(self, id),
            fields(player_id = %id),
        )
    )]
    pub(crate) async fn triangulate(&self, id: &PlayerId) -> Result<Triangulation, PlayerFailure> {
        let mut known_name = None;
        self.replay(id, &mut known_name)
            .await
            .map_err(|e| PlayerFailure::new(id.clone(), known_name, e))
    }

    async fn replay(
        &self,
        id: &PlayerId,
        known_name: &mut Option<String>,
    ) -> Result<Triangulation, TriadError> {
        let c = self.connector();
        let players = require(c.as_player_provider(), EntityKind::PlayerLite)?;
        let feeds = require(c.as_feed_provider(), EntityKind::PlayerFeed)?;
        let talks = require(c.as_talk_provider(), EntityKind::Talk)?;

        let Some(latest) = self.call("player", players.player(id, None)).await? else {
            #[cfg(feature = "tracing")]
            tracing::debug!(player_id = %id, "no identity; skipping");
            return Ok(Triangulation::empty(id.clone(), String::new()));
        };
        let name = latest.full_name();
        *known_name = Some(name.clone());

        let versions = self
            .call("player-versions", players.player_versions(id))
            .await?;
        let names = NameHistory::from_records(&versions);
        let feed = self
            .call("player-feed", feeds.player_feed(id))
            .await?
            .unwrap_or_default();
        let Some(latest_talk) = self.call("talk", talks.talk(id, None)).await? else {
            #[cfg(feature = "tracing")]
            tracing::debug!(player_id = %id, "no talk; skipping");
            return Ok(Triangulation::empty(id.clone(), name));
        };

        let mut history: PlayerHistory = PlayerHistory::new(id.clone(), name);
        history.apply_talk(&latest_talk)?;
        self.replay_feed(&mut history, &feed, latest_talk.valid_from, talks)
            .await?;

        let backfill = &self.triangulator.cfg.backfill;
        if latest.birth_season <= backfill.max_birth_season {
            self.backfill(&mut history, players, feeds).await?;
        }

        let birth = self
            .call("earliest-player", players.earliest_player(id))
            .await?
            .map_or(latest.valid_from, |r| r.valid_from);
        history.finish(birth, self.thresholds.prior)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            player_id = %id,
            epochs = history.compositions().len(),
            "replay finished"
        );
        Ok(Triangulation { history, names })
    }

    async fn replay_feed(
        &self,
        history: &mut PlayerHistory,
        feed: &[FeedEntry],
        talk_from: DateTime<Utc>,
        talks: &dyn TalkProvider,
    ) -> Result<(), TriadError> {
        let id = history.player_id().clone();
        let cfg = &self.triangulator.cfg;
        let prior = self.thresholds.prior;

        // Ordinals index the feed oldest first.
        for (ordinal, entry) in feed.iter().enumerate().rev() {
            if entry.ts > talk_from {
                continue;
            }
            let (subject, gain) = match self.triangulator.classifier.classify::<Attribute>(&entry.text) {
                FeedEvent::Rename { old, new } => {
                    history.finalize(entry.ts, &new, prior)?;
                    history.set_working_name(old);
                    continue;
                }
                FeedEvent::Gain {
                    subject,
                    attribute,
                    amount,
                } => (subject, Some((attribute, amount))),
                FeedEvent::UnknownGain { subject } => (subject, None),
                FeedEvent::Unrecognized => continue,
            };
            if subject != history.working_name() {
                if cfg.exceptions.is_exempt(&id, ordinal) {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(player_id = %id, ordinal, %subject, "excused name mismatch");
                } else {
                    let current = history.working_name().to_string();
                    history.finalize(entry.ts, &current, prior)?;
                    history.set_working_name(subject);
                }
            }
            match gain {
                Some((attribute, amount)) => {
                    history.add_bonus(entry.ts, attribute, f64::from(amount))?;
                }
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(player_id = %id, ordinal, text = %entry.text, "gain with unknown attribute");
                }
            }
            if self.thresholds.recheck_after.is_some_and(|r| entry.ts > r)
                && let Some(talk) = self.call("talk", talks.talk(&id, Some(entry.ts))).await?
            {
                history.apply_talk(&talk)?;
            }
        }
        Ok(())
    }

    /// Early augments only written to the team feed, matched by name.
    async fn backfill(
        &self,
        history: &mut PlayerHistory,
        players: &dyn PlayerProvider,
        feeds: &dyn FeedProvider,
    ) -> Result<(), TriadError> {
        let Some(day) = self.thresholds.roster_day else {
            return Ok(());
        };
        let id = history.player_id().clone();
        let Some(then) = self.call("player", players.player(&id, Some(day))).await? else {
            return Ok(());
        };
        let Some(team) = then.team_id.as_ref() else {
            return Ok(());
        };
        let entries = self
            .call("team-feed", feeds.team_feed(team))
            .await?
            .unwrap_or_default();
        // Gains are written under the name the player had at the roster day.
        let pattern = self
            .triangulator
            .classifier
            .team_pattern(&then.full_name())?;
        let ignored = self.triangulator.cfg.backfill.ignored_amount;

        for entry in entries.iter().rev() {
            if entry.kind != "augment" || entry.links_to(id.as_str()) {
                continue;
            }
            let Some((attribute, amount)) = pattern.matches::<Attribute>(&entry.text) else {
                continue;
            };
            if amount == ignored {
                #[cfg(feature = "tracing")]
                tracing::debug!(player_id = %id, %team, %attribute, amount, "skipping known artifact gain");
                continue;
            }
            history.add_bonus(entry.ts, attribute, f64::from(amount))?;
        }
        Ok(())
    }
}

impl Triangulator {
    /// Fetch the season calendar.
    ///
    /// # Errors
    /// Returns `Unsupported` when the connector has no calendar, or the
    /// connector's error.
    pub async fn timeline(&self) -> Result<Timeline, TriadError> {
        load_timeline(&Session::new(self, Arc::clone(&self.connector))).await
    }

    /// Triangulate a single player against `timeline`, without a cache.
    ///
    /// # Errors
    /// Returns the [`PlayerFailure`] that aborted the player.
    pub async fn triangulate(
        &self,
        id: &PlayerId,
        timeline: &Timeline,
    ) -> Result<Triangulation, PlayerFailure> {
        let mut session = Session::new(self, Arc::clone(&self.connector));
        session.resolve(timeline);
        session.triangulate(id).await
    }

    /// Fetch the calendar, triangulate one player and materialize its snapshots.
    ///
    /// # Errors
    /// Returns the calendar error or the player's failure.
    pub async fn snapshots(&self, id: &PlayerId) -> Result<Vec<PlayerSnapshot>, TriadError> {
        let timeline = self.timeline().await?;
        let t = self.triangulate(id, &timeline).await.map_err(|f| f.error)?;
        Ok(t.snapshots(&timeline).collect())
    }
}

pub(crate) async fn load_timeline(session: &Session<'_>) -> Result<Timeline, TriadError> {
    let calendar = require(session.connector().as_calendar_provider(), EntityKind::Calendar)?;
    let days = session.call("calendar", calendar.season_days()).await?;
    Ok(Timeline::new(days))
}
