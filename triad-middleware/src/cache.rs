use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use triad_core::connector::{
    CalendarProvider, ChronConnector, FeedProvider, PlayerProvider, RosterProvider, TalkProvider,
    require,
};
use triad_types::{
    CacheConfig, EntityKind, FeedEntry, PlayerId, PlayerRecord, SeasonDay, TalkRecord, TeamId,
    TriadError,
};

type AtKey = (PlayerId, Option<DateTime<Utc>>);

#[async_trait]
trait CacheStore<K, V>: Send + Sync {
    async fn get(&self, key: &K) -> Option<V>;
    async fn put(&self, key: K, value: V);
}

struct MokaStore<K, V> {
    inner: Cache<K, V>,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    kind: EntityKind,
}

impl<K, V> MokaStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn new(cfg: &CacheConfig, kind: EntityKind) -> Self {
        let mut builder = Cache::builder()
            .max_capacity(cfg.max_entries)
            .name(kind.as_str());
        if let Some(ttl) = cfg.ttl_for(kind) {
            builder = builder.time_to_live(ttl);
        }
        Self {
            inner: builder.build(),
            kind,
        }
    }
}

#[async_trait]
impl<K, V> CacheStore<K, V> for MokaStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Option<V> {
        let hit = self.inner.get(key).await;
        #[cfg(feature = "tracing")]
        tracing::trace!(kind = %self.kind, hit = hit.is_some(), "cache lookup");
        hit
    }

    async fn put(&self, key: K, value: V) {
        self.inner.insert(key, value).await;
    }
}

/// Declarative wrapper that applies caching when building a connector stack.
pub struct CacheMiddleware {
    cfg: CacheConfig,
}

impl CacheMiddleware {
    /// Cache layer with the given settings.
    #[must_use]
    pub fn new(cfg: CacheConfig) -> Self {
        Self { cfg }
    }
}

impl triad_core::Middleware for CacheMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn ChronConnector>) -> Arc<dyn ChronConnector> {
        let Self { cfg } = *self;
        Arc::new(CachingConnector::new(inner, &cfg))
    }

    fn name(&self) -> &'static str {
        "CachingMiddleware"
    }
}

// Per-kind typed stores; `None` means disabled for that kind.
struct Stores {
    player: Option<Arc<dyn CacheStore<AtKey, Arc<Option<PlayerRecord>>>>>,
    earliest_player: Option<Arc<dyn CacheStore<PlayerId, Arc<Option<PlayerRecord>>>>>,
    player_versions: Option<Arc<dyn CacheStore<PlayerId, Arc<Vec<PlayerRecord>>>>>,
    talk: Option<Arc<dyn CacheStore<AtKey, Arc<Option<TalkRecord>>>>>,
    player_feed: Option<Arc<dyn CacheStore<PlayerId, Arc<Option<Vec<FeedEntry>>>>>>,
    team_feed: Option<Arc<dyn CacheStore<TeamId, Arc<Option<Vec<FeedEntry>>>>>>,
    roster: Option<Arc<dyn CacheStore<(), Arc<Vec<PlayerId>>>>>,
    calendar: Option<Arc<dyn CacheStore<(), Arc<Vec<(SeasonDay, DateTime<Utc>)>>>>>,
}

/// Read-through cache around an inner connector.
///
/// Successful results (including "no such entity") are memoized per entity
/// kind; errors are never cached. Concurrent misses may both reach the inner
/// connector; the last write wins.
pub struct CachingConnector {
    inner: Arc<dyn ChronConnector>,
    stores: Stores,
}

impl CachingConnector {
    fn maybe_store<K, V>(cfg: &CacheConfig, kind: EntityKind) -> Option<Arc<dyn CacheStore<K, V>>>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        if !cfg.enabled_for(kind) {
            return None;
        }
        Some(Arc::new(MokaStore::<K, V>::new(cfg, kind)))
    }

    /// Wrap `inner` with stores sized and timed by `cfg`.
    #[must_use]
    pub fn new(inner: Arc<dyn ChronConnector>, cfg: &CacheConfig) -> Self {
        let stores = Stores {
            player: Self::maybe_store(cfg, EntityKind::PlayerLite),
            earliest_player: Self::maybe_store(cfg, EntityKind::PlayerLite),
            player_versions: Self::maybe_store(cfg, EntityKind::PlayerLite),
            talk: Self::maybe_store(cfg, EntityKind::Talk),
            player_feed: Self::maybe_store(cfg, EntityKind::PlayerFeed),
            team_feed: Self::maybe_store(cfg, EntityKind::TeamFeed),
            roster: Self::maybe_store(cfg, EntityKind::Roster),
            calendar: Self::maybe_store(cfg, EntityKind::Calendar),
        };
        Self { inner, stores }
    }

    fn players(&self) -> Result<&dyn PlayerProvider, TriadError> {
        require(self.inner.as_player_provider(), EntityKind::PlayerLite)
    }

    fn feeds(&self) -> Result<&dyn FeedProvider, TriadError> {
        require(self.inner.as_feed_provider(), EntityKind::PlayerFeed)
    }
}

async fn read_through<K, V, F>(
    store: Option<&Arc<dyn CacheStore<K, Arc<V>>>>,
    key: K,
    fetch: F,
) -> Result<V, TriadError>
where
    V: Clone + Send + Sync,
    F: core::future::Future<Output = Result<V, TriadError>> + Send,
{
    let Some(store) = store else {
        return fetch.await;
    };
    if let Some(v) = store.get(&key).await {
        return Ok((*v).clone());
    }
    let value = fetch.await?;
    store.put(key, Arc::new(value.clone())).await;
    Ok(value)
}

#[async_trait]
impl ChronConnector for CachingConnector {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    triad_core::chron_connector_accessors!(inner);
}

#[async_trait]
impl PlayerProvider for CachingConnector {
    async fn player(
        &self,
        id: &PlayerId,
        at: Option<DateTime<Utc>>,
    ) -> Result<Option<PlayerRecord>, TriadError> {
        let inner = self.players()?;
        read_through(
            self.stores.player.as_ref(),
            (id.clone(), at),
            inner.player(id, at),
        )
        .await
    }

    async fn earliest_player(&self, id: &PlayerId) -> Result<Option<PlayerRecord>, TriadError> {
        let inner = self.players()?;
        read_through(
            self.stores.earliest_player.as_ref(),
            id.clone(),
            inner.earliest_player(id),
        )
        .await
    }

    async fn player_versions(&self, id: &PlayerId) -> Result<Vec<PlayerRecord>, TriadError> {
        let inner = self.players()?;
        read_through(
            self.stores.player_versions.as_ref(),
            id.clone(),
            inner.player_versions(id),
        )
        .await
    }
}

#[async_trait]
impl TalkProvider for CachingConnector {
    async fn talk(
        &self,
        id: &PlayerId,
        at: Option<DateTime<Utc>>,
    ) -> Result<Option<TalkRecord>, TriadError> {
        let inner = require(self.inner.as_talk_provider(), EntityKind::Talk)?;
        read_through(self.stores.talk.as_ref(), (id.clone(), at), inner.talk(id, at)).await
    }
}

#[async_trait]
impl FeedProvider for CachingConnector {
    async fn player_feed(&self, id: &PlayerId) -> Result<Option<Vec<FeedEntry>>, TriadError> {
        let inner = self.feeds()?;
        read_through(
            self.stores.player_feed.as_ref(),
            id.clone(),
            inner.player_feed(id),
        )
        .await
    }

    async fn team_feed(&self, team: &TeamId) -> Result<Option<Vec<FeedEntry>>, TriadError> {
        let inner = self.feeds()?;
        read_through(
            self.stores.team_feed.as_ref(),
            team.clone(),
            inner.team_feed(team),
        )
        .await
    }
}

#[async_trait]
impl RosterProvider for CachingConnector {
    async fn players_with_appearances(&self) -> Result<Vec<PlayerId>, TriadError> {
        let inner = require(self.inner.as_roster_provider(), EntityKind::Roster)?;
        read_through(
            self.stores.roster.as_ref(),
            (),
            inner.players_with_appearances(),
        )
        .await
    }
}

#[async_trait]
impl CalendarProvider for CachingConnector {
    async fn season_days(&self) -> Result<Vec<(SeasonDay, DateTime<Utc>)>, TriadError> {
        let inner = require(self.inner.as_calendar_provider(), EntityKind::Calendar)?;
        read_through(self.stores.calendar.as_ref(), (), inner.season_days()).await
    }
}
