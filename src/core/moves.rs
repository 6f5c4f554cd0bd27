//! Move representation.
//!
//! A move is a report of what the player does, not a state diff: the
//! successor state travels next to it. `Display` renders the text the UI
//! shows for a recommendation.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ids::CountryId;

/// Troops placed on one country.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Allocation {
    /// Target country.
    pub country: CountryId,
    /// Number of troops placed.
    pub troops: u32,
}

impl Allocation {
    /// Create an allocation.
    #[must_use]
    pub fn new(country: impl Into<CountryId>, troops: u32) -> Self {
        Self {
            country: country.into(),
            troops,
        }
    }
}

/// Allocation list. Most strategies touch a handful of countries.
pub type Allocations = SmallVec<[Allocation; 4]>;

/// A candidate move.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Move {
    /// Place the whole reserve. `Σ troops` equals the reserve before the move.
    #[serde(alias = "fortify")]
    Reinforce {
        /// Ordered allocations.
        allocations: Allocations,
    },
    /// Attack `to` from `from`.
    Attack {
        /// Attacking country.
        from: CountryId,
        /// Defending country.
        to: CountryId,
    },
}

impl Move {
    /// Build a reinforcement move.
    #[must_use]
    pub fn reinforce(allocations: impl IntoIterator<Item = Allocation>) -> Self {
        Move::Reinforce {
            allocations: allocations.into_iter().collect(),
        }
    }

    /// Build an attack move.
    #[must_use]
    pub fn attack(from: impl Into<CountryId>, to: impl Into<CountryId>) -> Self {
        Move::Attack {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Total troops placed by a reinforcement (0 for attacks).
    #[must_use]
    pub fn troops_placed(&self) -> u64 {
        match self {
            Move::Reinforce { allocations } => {
                allocations.iter().map(|a| u64::from(a.troops)).sum()
            }
            Move::Attack { .. } => 0,
        }
    }

    /// Check if this is a reinforcement.
    #[must_use]
    pub fn is_reinforce(&self) -> bool {
        matches!(self, Move::Reinforce { .. })
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Reinforce { allocations } => {
                write!(f, "Allocate: ")?;
                let mut first = true;
                for alloc in allocations.iter().filter(|a| a.troops > 0) {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} troop(s) to {}", alloc.troops, alloc.country)?;
                    first = false;
                }
                Ok(())
            }
            Move::Attack { from, to } => write!(f, "Attack from {} to {}", from, to),
        }
    }
}
