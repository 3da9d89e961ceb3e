//! Classification of narrative feed text into replay events.

use regex::Regex;
use triad_types::{Attribute, AttributeTag, TriadError};

/// Default pattern for identity-change entries: `A was Recomposed into B.`
pub const RENAME_PATTERN: &str = r"^(.+?) was Recomposed (?:into|using) (.+?)\.";

/// Default pattern for attribute gains, optionally prefixed by an exclamation
/// sentence: `[... ! ]Name gained +N Attribute.`
pub const GAIN_PATTERN: &str = r"^(?:.*?! )?(.+) gained \+(\d+?) (\w+?)[ .]";

/// A feed entry reduced to what the replay engine acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent<A = Attribute> {
    /// The player was recomposed; `old` is the identity before, `new` after.
    Rename {
        /// Name before the recomposition.
        old: String,
        /// Name after the recomposition.
        new: String,
    },
    /// `subject` gained `amount` points of `attribute`.
    Gain {
        /// Name written in the entry.
        subject: String,
        /// Attribute that increased.
        attribute: A,
        /// Points gained.
        amount: u32,
    },
    /// Gain-shaped entry whose amount or attribute does not parse. No bonus is
    /// applied, but `subject` still marks the identity the feed belongs to.
    UnknownGain {
        /// Name written in the entry.
        subject: String,
    },
    /// Anything else; skipped by the replay.
    Unrecognized,
}

/// Compiled feed patterns.
#[derive(Debug, Clone)]
pub struct FeedClassifier {
    rename: Regex,
    gain: Regex,
}

impl Default for FeedClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedClassifier {
    /// Classifier using the built-in patterns.
    #[must_use]
    pub fn new() -> Self {
        Self::with_patterns(RENAME_PATTERN, GAIN_PATTERN)
            .unwrap_or_else(|e| unreachable!("built-in feed patterns must compile: {e}"))
    }

    /// Classifier with caller-provided patterns.
    ///
    /// `rename` must capture (old, new); `gain` must capture (subject, amount, attribute).
    ///
    /// # Errors
    /// Returns `TriadError::InvalidArg` when a pattern does not compile or has the
    /// wrong number of capture groups.
    pub fn with_patterns(rename: &str, gain: &str) -> Result<Self, TriadError> {
        let rename = compile(rename, 2)?;
        let gain = compile(gain, 3)?;
        Ok(Self { rename, gain })
    }

    /// Classify one entry's text. Renames win when both patterns match.
    #[must_use]
    pub fn classify<A: AttributeTag>(&self, text: &str) -> FeedEvent<A> {
        if let Some(c) = self.rename.captures(text) {
            return FeedEvent::Rename {
                old: c[1].to_string(),
                new: c[2].to_string(),
            };
        }
        let Some(c) = self.gain.captures(text) else {
            return FeedEvent::Unrecognized;
        };
        match (c[2].parse::<u32>(), c[3].parse::<A>()) {
            (Ok(amount), Ok(attribute)) => FeedEvent::Gain {
                subject: c[1].to_string(),
                attribute,
                amount,
            },
            _ => FeedEvent::UnknownGain {
                subject: c[1].to_string(),
            },
        }
    }

    /// Matcher for team-feed gains naming exactly `name`.
    ///
    /// # Errors
    /// Never fails for well-formed names; the name is escaped before compiling.
    pub fn team_pattern(&self, name: &str) -> Result<TeamGainPattern, TriadError> {
        let pattern = format!(r"^{} gained \+(\d+?) (\w+?)\.", regex::escape(name));
        Ok(TeamGainPattern {
            re: compile(&pattern, 2)?,
        })
    }

    /// One-shot form of [`team_pattern`](Self::team_pattern).
    #[must_use]
    pub fn team_gain<A: AttributeTag>(&self, text: &str, name: &str) -> Option<(A, u32)> {
        self.team_pattern(name).ok()?.matches(text)
    }
}

/// Compiled team-feed gain pattern for a single name.
#[derive(Debug, Clone)]
pub struct TeamGainPattern {
    re: Regex,
}

impl TeamGainPattern {
    /// The `(attribute, amount)` of a matching entry.
    #[must_use]
    pub fn matches<A: AttributeTag>(&self, text: &str) -> Option<(A, u32)> {
        let c = self.re.captures(text)?;
        let amount = c[1].parse().ok()?;
        let attribute = c[2].parse().ok()?;
        Some((attribute, amount))
    }
}

fn compile(pattern: &str, groups: usize) -> Result<Regex, TriadError> {
    let re = Regex::new(pattern)
        .map_err(|e| TriadError::InvalidArg(format!("invalid feed pattern {pattern:?}: {e}")))?;
    // captures_len counts the implicit whole-match group.
    if re.captures_len() != groups + 1 {
        return Err(TriadError::InvalidArg(format!(
            "feed pattern {pattern:?} must have {groups} capture groups"
        )));
    }
    Ok(re)
}
