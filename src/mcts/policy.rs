//! MCTS policies for selection and simulation.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: How to choose which child to explore (UCT)
//! - `SimulationPolicy`: How to run playouts (random)
//!
//! Both report payoffs from the searching player's point of view, which is
//! the current player of the root state.

use crate::core::{GameRng, GameState, Phase, PlayerId};
use crate::rules::{
    advance_phase, attack_pairs, is_game_over, is_terminal, resolve_attack, MoveGenerator,
    Scorer,
};

use super::config::{MCTSConfig, ScoringMode};
use super::node::NodeId;
use super::tree::MCTSTree;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which child node to explore.
pub trait SelectionPolicy: Send + Sync {
    /// Pick a child of `node`. None when the node has no children.
    fn select(&self, tree: &MCTSTree, node: NodeId, config: &MCTSConfig) -> Option<NodeId>;
}

/// UCT selection policy.
///
/// Balances exploitation (mean payoff) with exploration (low visits).
/// Formula: mean(a) + c * sqrt(ln(N) / n(a)), with unvisited children
/// scoring `+inf`. Ties go to the earliest child.
#[derive(Clone, Debug, Default)]
pub struct Uct;

impl Uct {
    /// UCT value of a child given its parent's visit count.
    #[must_use]
    pub fn value(mean: f64, visits: u32, parent_visits: u32, c: f64) -> f64 {
        if visits == 0 {
            return f64::INFINITY;
        }
        let ln_parent = f64::from(parent_visits.max(1)).ln();
        mean + c * (ln_parent / f64::from(visits)).sqrt()
    }
}

impl SelectionPolicy for Uct {
    fn select(&self, tree: &MCTSTree, node: NodeId, config: &MCTSConfig) -> Option<NodeId> {
        let parent = tree.get(node);
        let mut best: Option<(NodeId, f64)> = None;

        for &child_id in &parent.children {
            let child = tree.get(child_id);
            let value = Uct::value(
                child.mean_score(),
                child.visits,
                parent.visits,
                config.exploration_constant,
            );
            // NaN never wins; equal values keep the earlier child.
            match best {
                Some((_, best_value)) if !(value > best_value) => {}
                _ if value.is_nan() => {}
                _ => best = Some((child_id, value)),
            }
        }

        best.map(|(id, _)| id)
            .or_else(|| parent.children.first().copied())
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Policy for running a playout from a state.
pub trait SimulationPolicy: Send + Sync {
    /// Play out from `state` and return the payoff for `searcher`.
    ///
    /// `state` is left untouched; the playout works on its own copy.
    fn simulate(&self, state: &GameState, searcher: &PlayerId, rng: &mut GameRng) -> f64;
}

/// Uniformly random playout.
///
/// Applies random generated moves until the game ends, the state becomes
/// terminal (without turn cycling) or the ply cap is hit.
pub struct RandomPlayout {
    generator: MoveGenerator,
    scorer: Scorer,
    mode: ScoringMode,
    max_depth: u32,
    turn_cycle: bool,
    min_income: u32,
}

impl RandomPlayout {
    /// Build a playout policy from a search configuration.
    #[must_use]
    pub fn from_config(config: &MCTSConfig) -> Self {
        Self {
            generator: MoveGenerator::new(&config.playout_allocation()),
            scorer: Scorer::new(config.weights.clone()),
            mode: config.scoring_mode,
            max_depth: config.max_playout_depth,
            turn_cycle: config.turn_cycle,
            min_income: config.min_income,
        }
    }

    /// Play one random move in place. False if none exists.
    fn step(&self, state: &mut GameState, rng: &mut GameRng) -> bool {
        match state.phase {
            Phase::Reinforcement => {
                let mut moves = self.generator.reinforcement_moves(state, rng);
                let Some(idx) = rng.choose_index(moves.len()) else {
                    return false;
                };
                *state = moves.swap_remove(idx).1;
                true
            }
            Phase::Battle => {
                // Resolving every pair just to keep one is wasted dice.
                let pairs = attack_pairs(state);
                let Some(idx) = rng.choose_index(pairs.len()) else {
                    return false;
                };
                let (from, to) = &pairs[idx];
                match resolve_attack(state, from, to, rng) {
                    Some((_, next)) => {
                        *state = next;
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// True once nothing can change the winner.
    fn game_decided(state: &GameState) -> bool {
        is_game_over(state) || state.current().map_or(true, |p| p.reached_target())
    }
}

impl SimulationPolicy for RandomPlayout {
    fn simulate(&self, state: &GameState, searcher: &PlayerId, rng: &mut GameRng) -> f64 {
        let mut state = state.clone();
        let mut depth = 0;

        while depth < self.max_depth {
            if Self::game_decided(&state) {
                break;
            }
            if is_terminal(&state) {
                if !self.turn_cycle || !advance_phase(&mut state, self.min_income) {
                    break;
                }
            } else if !self.step(&mut state, rng) {
                break;
            }
            depth += 1;
        }

        reward(&self.scorer, self.mode, &state, searcher)
    }
}

// =============================================================================
// Rewards
// =============================================================================

/// Payoff of a final playout state for `searcher` under `mode`.
#[must_use]
pub fn reward(scorer: &Scorer, mode: ScoringMode, state: &GameState, searcher: &PlayerId) -> f64 {
    match mode {
        ScoringMode::MeanScore => scorer.score_for(state, searcher),
        ScoringMode::WinRate => win_reward(scorer, state, searcher),
    }
}

/// 1 for a sole leader or last survivor, 0.5 for a shared lead, 0 otherwise.
#[must_use]
pub fn win_reward(scorer: &Scorer, state: &GameState, searcher: &PlayerId) -> f64 {
    match state.player(searcher) {
        Some(player) if player.is_alive() => {}
        _ => return 0.0,
    }

    let mine = scorer.score_for(state, searcher);
    let mut tied = false;
    for other in state.players.iter().filter(|p| p.is_alive() && &p.id != searcher) {
        let theirs = scorer.score_for(state, &other.id);
        if theirs > mine {
            return 0.0;
        }
        if theirs == mine {
            tied = true;
        }
    }

    if tied {
        0.5
    } else {
        1.0
    }
}
