//! Game rules the search needs: move generation, combat, scoring.
//!
//! Only what is required to generate and evaluate candidate moves lives
//! here. Every function takes the state it works on as an argument and
//! returns new states rather than editing shared ones.

pub mod allocation;
pub mod combat;
pub mod movegen;
pub mod scoring;
pub mod turn;

pub use allocation::{
    AllocationPolicy, AllocationStrategy, Exposure, ProportionalVariation, TopKCombinatorial,
};
pub use combat::{resolve_attack, roll_battle, CombatOutcome};
pub use movegen::{attack_pairs, is_game_over, is_terminal, MoveGenerator};
pub use scoring::{BorderPenalty, Scorer, ScoringWeights};
pub use turn::{advance_phase, income};
