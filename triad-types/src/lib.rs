//! Shared triad data transfer objects: attribute tags, chron records, season
//! days, configuration primitives and the workspace error type.
#![warn(missing_docs)]

mod attribute;
mod config;
mod entity;
mod error;
mod exceptions;
mod records;
mod reports;
mod season;

pub use attribute::{Attribute, AttributeTag, Category, stars_to_rating};
pub use config::{Backfill, BirthPrior, CacheConfig, TriadConfig};
pub use entity::EntityKind;
pub use error::TriadError;
pub use exceptions::ExceptionTable;
pub use records::{
    CategoryTalk, FeedEntry, FeedLink, PlayerId, PlayerRecord, TalkRecord, TeamId,
};
pub use reports::{BatchStats, PlayerFailure};
pub use season::{Day, SeasonDay, SpecialDay};
