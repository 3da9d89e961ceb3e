//! Configuration types shared by the replay driver, the batch driver and the cache.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::error::TriadError;
use crate::exceptions::ExceptionTable;
use crate::season::SeasonDay;

/// Upper-bound prior applied to epochs born in the modern era.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirthPrior {
    /// Epochs born at or after this day receive the prior.
    pub from_day: SeasonDay,
    /// Exclusive upper bound intersected into every attribute.
    pub upper: f64,
}

impl Default for BirthPrior {
    fn default() -> Self {
        Self {
            from_day: SeasonDay::new(1, 1),
            upper: 106.5,
        }
    }
}

/// Early-history backfill from the team feed.
///
/// Players born in the first seasons received augments that were only ever
/// written to their team's feed; these are recovered by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backfill {
    /// Players with `birth_season` at or below this value are backfilled.
    pub max_birth_season: u32,
    /// Day at which the player's team is looked up.
    pub roster_day: SeasonDay,
    /// Gain magnitude that is a known data artifact and never applied.
    pub ignored_amount: u32,
}

impl Default for Backfill {
    fn default() -> Self {
        Self {
            max_birth_season: 1,
            roster_day: SeasonDay::new(2, 1),
            ignored_amount: 50,
        }
    }
}

/// Read-through cache settings for a single batch run.
///
/// `max_entries == 0` disables caching entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum entries held per entity kind.
    pub max_entries: u64,
    /// Time-to-live applied to every kind without an override. `None` keeps
    /// entries for the whole run.
    pub ttl: Option<Duration>,
    /// Per-kind TTL overrides. A zero TTL disables caching for that kind.
    pub per_kind_ttl: BTreeMap<EntityKind, Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: None,
            per_kind_ttl: BTreeMap::new(),
        }
    }
}

impl CacheConfig {
    /// Effective TTL for `kind`.
    #[must_use]
    pub fn ttl_for(&self, kind: EntityKind) -> Option<Duration> {
        self.per_kind_ttl.get(&kind).copied().or(self.ttl)
    }

    /// Whether entries of `kind` are cached at all.
    #[must_use]
    pub fn enabled_for(&self, kind: EntityKind) -> bool {
        self.max_entries > 0 && self.ttl_for(kind).is_none_or(|ttl| !ttl.is_zero())
    }
}

/// Global configuration for the `Triangulator` orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriadConfig {
    /// Players processed concurrently by the batch driver.
    pub concurrency: usize,
    /// Timeout for individual connector calls.
    pub fetch_timeout: Duration,
    /// Gains after this day are followed by a re-fetch of the talk valid at the
    /// gain's timestamp. Earlier talk was not recorded often enough to help.
    pub talk_recheck_after: SeasonDay,
    /// Birth-era prior.
    pub birth_prior: BirthPrior,
    /// Team-feed backfill for early players.
    pub backfill: Backfill,
    /// Feed ordinals whose subject mismatch must not split an epoch.
    pub exceptions: ExceptionTable,
    /// Cache wrapped around the connector for each batch run; `None` disables it.
    pub cache: Option<CacheConfig>,
}

impl Default for TriadConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            fetch_timeout: Duration::from_secs(30),
            talk_recheck_after: SeasonDay::new(4, 120),
            birth_prior: BirthPrior::default(),
            backfill: Backfill::default(),
            exceptions: ExceptionTable::curated(),
            cache: Some(CacheConfig::default()),
        }
    }
}

impl TriadConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `TriadError::Data` on malformed JSON and `TriadError::InvalidArg`
    /// when `concurrency` is zero.
    pub fn from_json(s: &str) -> Result<Self, TriadError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check invariants serde cannot express.
    ///
    /// # Errors
    /// Returns `TriadError::InvalidArg` when a field is out of range.
    pub fn validate(&self) -> Result<(), TriadError> {
        if self.concurrency == 0 {
            return Err(TriadError::InvalidArg("concurrency must be at least 1".into()));
        }
        if self.birth_prior.upper.is_nan() || self.birth_prior.upper <= 0.0 {
            return Err(TriadError::InvalidArg(format!(
                "birth prior upper bound must be positive, got {}",
                self.birth_prior.upper
            )));
        }
        Ok(())
    }
}
