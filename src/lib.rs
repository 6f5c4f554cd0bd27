//! # territory-mcts
//!
//! Move recommendations for a turn-based territory-conquest game.
//!
//! A player's turn has two interactive phases: Reinforcement ("Fortify"),
//! where the reserve is spread over owned countries, and Battle, where one
//! owned country attacks a neighbour with dice. Given a snapshot, the crate
//! runs Monte Carlo Tree Search over candidate moves and returns the best
//! ones ranked by simulated outcome.
//!
//! ## Design Principles
//!
//! 1. **Immutable Snapshots**: Every candidate move produces a new
//!    `GameState`; nothing the caller passes in is modified.
//!
//! 2. **Deterministic**: Ordered persistent maps and a seeded `GameRng`
//!    make the same seed produce the same recommendations.
//!
//! 3. **Fail Soft**: Inconsistent or partial snapshots shrink the move list
//!    instead of raising. Only file I/O returns errors.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im` for tree nodes.
//!
//! - **Arena Tree**: Nodes live in a `Vec` and refer to each other by index.
//!
//! ## Modules
//!
//! - `core`: IDs, state model, moves, RNG
//! - `rules`: Combat, allocation strategies, move generation, scoring
//! - `mcts`: Search tree, policies, search loop, recommendations
//! - `maps`: Builder and sample maps for tests and demos
//! - `io`: Snapshot and config files
//! - `error`: Error types

pub mod core;
pub mod error;
pub mod io;
pub mod maps;
pub mod mcts;
pub mod rules;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    Allocation, Allocations, Continent, Country, CountryId, GameRng, GameState, Move, Phase,
    Player, PlayerId,
};

pub use crate::error::{LoadError, StageError};

pub use crate::rules::{
    AllocationPolicy, AllocationStrategy, BorderPenalty, MoveGenerator, Scorer, ScoringWeights,
};

pub use crate::mcts::{
    search, MCTSConfig, MCTSNode, MCTSSearch, MCTSTree, NodeId, RandomPlayout, Recommendation,
    Recommendations, ScoringMode, SearchStats, SelectionPolicy, SimulationPolicy, Stage,
    TreeStats, Uct,
};
