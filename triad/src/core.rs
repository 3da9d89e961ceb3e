use std::sync::Arc;
use std::time::Duration;

use triad_core::connector::ChronConnector;
use triad_core::{
    Backfill, BirthPrior, CacheConfig, ExceptionTable, FeedClassifier, SeasonDay, TriadConfig,
    TriadError,
};
use triad_middleware::ConnectorBuilder;

/// Orchestrator that triangulates players served by a chron connector.
pub struct Triangulator {
    pub(crate) connector: Arc<dyn ChronConnector>,
    pub(crate) cfg: TriadConfig,
    pub(crate) classifier: FeedClassifier,
}

/// Builder for a [`Triangulator`].
pub struct TriangulatorBuilder {
    connector: Option<Arc<dyn ChronConnector>>,
    cfg: TriadConfig,
    classifier: FeedClassifier,
}

impl Default for TriangulatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TriangulatorBuilder {
    /// Builder with default configuration and no connector.
    ///
    /// Defaults: 8 players in flight, 30s per connector call, talk re-checks after
    /// season 4 day 120, the curated exception table, and a batch-scoped cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            cfg: TriadConfig::default(),
            classifier: FeedClassifier::new(),
        }
    }

    /// Set the data source. A later call replaces an earlier one.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn ChronConnector>) -> Self {
        self.connector = Some(c);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: TriadConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Players processed concurrently by [`Triangulator::run_batch`].
    #[must_use]
    pub const fn concurrency(mut self, n: usize) -> Self {
        self.cfg.concurrency = n;
        self
    }

    /// Timeout applied to every connector call.
    #[must_use]
    pub const fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.fetch_timeout = timeout;
        self
    }

    /// Gains after this day trigger a talk re-check at the gain's timestamp.
    #[must_use]
    pub const fn talk_recheck_after(mut self, day: SeasonDay) -> Self {
        self.cfg.talk_recheck_after = day;
        self
    }

    /// Birth-era prior applied to modern epochs.
    #[must_use]
    pub const fn birth_prior(mut self, prior: BirthPrior) -> Self {
        self.cfg.birth_prior = prior;
        self
    }

    /// Team-feed backfill settings.
    #[must_use]
    pub const fn backfill(mut self, backfill: Backfill) -> Self {
        self.cfg.backfill = backfill;
        self
    }

    /// Feed ordinals whose subject mismatch must not split an epoch.
    #[must_use]
    pub fn exceptions(mut self, table: ExceptionTable) -> Self {
        self.cfg.exceptions = table;
        self
    }

    /// Cache settings for each batch run.
    #[must_use]
    pub fn cache(mut self, cfg: CacheConfig) -> Self {
        self.cfg.cache = Some(cfg);
        self
    }

    /// Run batches directly against the connector.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.cfg.cache = None;
        self
    }

    /// Replace the feed classifier, e.g. one built with custom patterns.
    #[must_use]
    pub fn classifier(mut self, classifier: FeedClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Build the orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` when no connector was set or the configuration is
    /// out of range.
    pub fn build(self) -> Result<Triangulator, TriadError> {
        let Some(connector) = self.connector else {
            return Err(TriadError::InvalidArg(
                "no connector set; add one via with_connector(...)".to_string(),
            ));
        };
        self.cfg.validate()?;
        Ok(Triangulator {
            connector,
            cfg: self.cfg,
            classifier: self.classifier,
        })
    }
}

/// Attribute an error to `connector` unless it already names its source.
pub(crate) fn tag_err(connector: &str, e: TriadError) -> TriadError {
    match e {
        e @ (TriadError::ProviderTimeout { .. }
        | TriadError::Connector { .. }
        | TriadError::Unsupported { .. }) => e,
        other => TriadError::Connector {
            connector: connector.to_string(),
            msg: other.to_string(),
        },
    }
}

impl Triangulator {
    /// Start building a `Triangulator`.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use triad::Triangulator;
    /// use triad_mock::MockConnector;
    ///
    /// let t = Triangulator::builder()
    ///     .with_connector(Arc::new(MockConnector::new()))
    ///     .concurrency(4)
    ///     .build()?;
    /// let report = t.run_batch().await?;
    /// ```
    #[must_use]
    pub fn builder() -> TriangulatorBuilder {
        TriangulatorBuilder::new()
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &TriadConfig {
        &self.cfg
    }

    /// Connector for one run: the raw connector wrapped in a fresh cache when
    /// caching is configured. Dropping it drops the cache.
    pub(crate) fn run_connector(&self) -> Arc<dyn ChronConnector> {
        let builder = ConnectorBuilder::new(Arc::clone(&self.connector));
        match &self.cfg.cache {
            Some(cache) => builder.with_cache(cache).build(),
            None => builder.build(),
        }
    }

    /// Wrap a connector future with the configured timeout.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "triad::core::provider_call_with_timeout",
            level = "trace",
            skip(fut),
            fields(
                connector = connector_name,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, TriadError>
    where
        Fut: core::future::Future<Output = Result<T, TriadError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(TriadError::provider_timeout(connector_name, capability)))
    }
}
