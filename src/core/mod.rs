//! Core types: identifiers, state snapshot, moves, RNG.
//!
//! Everything here is plain data. Rules live in `rules`, search in `mcts`.

pub mod ids;
pub mod moves;
pub mod rng;
pub mod state;

pub use ids::{CountryId, PlayerId};
pub use moves::{Allocation, Allocations, Move};
pub use rng::GameRng;
pub use state::{Continent, Country, GameState, Phase, Player};
