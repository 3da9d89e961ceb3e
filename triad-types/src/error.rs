use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::records::PlayerId;

/// Unified error type for the triad workspace.
///
/// This wraps evidence contradictions found during replay, capability mismatches,
/// connector-tagged failures, timeouts and configuration problems.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TriadError {
    /// Two narrowings of the same attribute have an empty intersection.
    #[error("impossible interval for {attribute} ({player_name}, {player_id}): {detail}")]
    ImpossibleInterval {
        /// Player whose evidence contradicts itself.
        player_id: PlayerId,
        /// Display name of the epoch being replayed when the contradiction surfaced.
        player_name: String,
        /// Attribute label the contradiction was found on.
        attribute: String,
        /// Human-readable description of the two disjoint bounds.
        detail: String,
    },

    /// A median was requested for a half-infinite interval.
    #[error("no median exists for interval {interval}")]
    NoMedian {
        /// Rendered interval, e.g. `[0, inf)`.
        interval: String,
    },

    /// An epoch was queried at an instant outside its lifetime.
    #[error("player {player_id} did not exist as this composition at {at}")]
    NotAlive {
        /// Player that was queried.
        player_id: PlayerId,
        /// Rendered instant of the query.
        at: String,
    },

    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "talk").
        capability: String,
    },

    /// Issues with the returned or expected data (missing fields, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument or misuse of an API in the wrong state.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// An individual connector returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// An individual connector call exceeded the configured timeout.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Capability label (e.g. "player", "talk", "feed").
        capability: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl TriadError {
    /// Helper: build an `ImpossibleInterval` error.
    pub fn impossible_interval(
        player_id: PlayerId,
        player_name: impl Into<String>,
        attribute: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::ImpossibleInterval {
            player_id,
            player_name: player_name.into(),
            attribute: attribute.into(),
            detail: detail.into(),
        }
    }

    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// Returns true when the error is a contradiction in the evidence itself rather
    /// than a plumbing failure (connector, timeout, configuration).
    #[must_use]
    pub const fn is_contradiction(&self) -> bool {
        matches!(self, Self::ImpossibleInterval { .. })
    }
}

impl From<serde_json::Error> for TriadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Data(e.to_string())
    }
}
