//! Turn progression used by playouts.
//!
//! The engine itself never advances turns on a live game; this only moves a
//! simulated state forward so that playouts can look past the end of the
//! current phase.

use crate::core::{GameState, Phase, PlayerId};

/// Troops a player receives at the start of its turn.
///
/// `max(min_income, areas / 3)` plus the bonus of every continent the
/// player controls. 0 for an unknown player.
#[must_use]
pub fn income(state: &GameState, player: &PlayerId, min_income: u32) -> u32 {
    let Some(player) = state.player(player) else {
        return 0;
    };
    let base = (player.areas.len() / 3) as u32;
    let bonus = state
        .continents
        .iter()
        .filter(|c| state.controls(player, c))
        .map(|c| c.bonus)
        .fold(0u32, u32::saturating_add);
    base.max(min_income).saturating_add(bonus)
}

/// Move a simulated state to the next phase.
///
/// Reinforcement → Battle for the same player; Battle → the next surviving
/// player's Reinforcement with its income as reserve. Returns false when no
/// next player exists (nothing changes).
pub fn advance_phase(state: &mut GameState, min_income: u32) -> bool {
    match state.phase {
        Phase::Reinforcement => {
            state.phase = Phase::Battle;
            true
        }
        Phase::Battle => {
            let Some(next) = state.next_player() else {
                return false;
            };
            let reserve = income(state, &next, min_income);
            if let Some(player) = state.player_mut(&next) {
                player.reserve = reserve;
            }
            state.current_player = next;
            state.phase = Phase::Reinforcement;
            true
        }
    }
}
