//! Attribute tags and their categories.

use core::fmt;
use core::hash::Hash;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TriadError;

/// An enumerable tag naming one hidden attribute.
///
/// The replay engine and the snapshot materializer are generic over this trait;
/// [`Attribute`] is the production tag set.
pub trait AttributeTag:
    Copy
    + Ord
    + Hash
    + fmt::Debug
    + fmt::Display
    + FromStr<Err = TriadError>
    + Send
    + Sync
    + 'static
{
    /// Every tag in canonical output order.
    fn all() -> &'static [Self];
}

/// Disjoint groups the attributes are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Plate appearance attributes.
    Batting,
    /// Mound attributes.
    Pitching,
    /// Attributes used on the bases.
    Baserunning,
    /// Fielding attributes.
    Defense,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Self; 4] = [
        Self::Batting,
        Self::Pitching,
        Self::Baserunning,
        Self::Defense,
    ];

    /// The attributes belonging to this category, in canonical order.
    #[must_use]
    pub fn attributes(self) -> &'static [Attribute] {
        let (start, end) = match self {
            Self::Batting => (0, 12),
            Self::Pitching => (12, 22),
            Self::Baserunning => (22, 26),
            Self::Defense => (26, 35),
        };
        &Attribute::ALL[start..end]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

macro_rules! attributes {
    ($($category:ident => [$($name:ident),+ $(,)?]),+ $(,)?) => {
        /// A hidden player attribute.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum Attribute {
            $($(
                #[allow(missing_docs)]
                $name,
            )+)+
        }

        impl Attribute {
            /// Every attribute in canonical column order.
            pub const ALL: [Self; 35] = [$($(Self::$name,)+)+];

            /// The category this attribute is reported under.
            #[must_use]
            pub const fn category(self) -> Category {
                match self {
                    $($(Self::$name)|+ => Category::$category,)+
                }
            }

            /// The exact name used in feed text and talk payloads.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($(Self::$name => stringify!($name),)+)+
                }
            }
        }

        impl FromStr for Attribute {
            type Err = TriadError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($(stringify!($name) => Ok(Self::$name),)+)+
                    other => Err(TriadError::InvalidArg(format!("unknown attribute: {other}"))),
                }
            }
        }
    };
}

attributes! {
    Batting => [
        Aiming, Contact, Cunning, Discipline, Insight, Intimidation,
        Lift, Vision, Determination, Wisdom, Muscle, Selflessness,
    ],
    Pitching => [
        Accuracy, Rotation, Presence, Persuasion, Velocity,
        Control, Stuff, Defiance, Guts, Stamina,
    ],
    Baserunning => [Greed, Performance, Speed, Stealth],
    Defense => [
        Acrobatics, Agility, Arm, Awareness, Composure,
        Dexterity, Patience, Reaction, Luck,
    ],
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AttributeTag for Attribute {
    fn all() -> &'static [Self] {
        &Self::ALL
    }
}

/// Convert a star string ("★★★") into its rating by counting symbols.
#[must_use]
pub fn stars_to_rating(stars: &str) -> u32 {
    u32::try_from(stars.chars().count()).unwrap_or(u32::MAX)
}
