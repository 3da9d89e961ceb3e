//! Backward event replay and the immutable epochs it produces.
//!
//! A replay starts from the newest talk snapshot and walks evidence back in
//! time. Ratings narrow the working bounds; each gain is subtracted so the
//! bounds describe the value before it; identity boundaries close the epoch
//! replayed so far. Forward materialization then re-adds the logged gains.

mod composition;
mod history;

pub use composition::{Lifetime, PlayerComposition, Versions};
pub use history::{EpochPrior, PlayerHistory, ReplayState};
