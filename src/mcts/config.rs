//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

use crate::rules::{AllocationPolicy, ScoringWeights};

/// What a playout reports and what selection exploits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Heuristic score of the final playout state; rank by mean score.
    #[default]
    MeanScore,
    /// 1 / 0.5 / 0 for leading / tied / trailing; rank by win rate.
    WinRate,
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MCTSConfig {
    /// UCT exploration constant (default: sqrt(2)).
    pub exploration_constant: f64,

    /// Payoff and ranking metric.
    pub scoring_mode: ScoringMode,

    /// How reinforcement candidates are generated during expansion.
    pub allocation_policy: AllocationPolicy,

    /// Variation count for proportional allocation inside playouts.
    pub playout_variations: usize,

    /// Maximum plies per playout.
    pub max_playout_depth: u32,

    /// Iterations per search. A hard, non-adaptive budget.
    pub iterations: u32,

    /// Number of moves returned by a recommendation.
    pub top_n: usize,

    /// Random seed. Same seed, same search.
    pub seed: u64,

    /// Let playouts run past the end of the current phase into later turns.
    pub turn_cycle: bool,

    /// Minimum reinforcement income when a playout starts a new turn.
    pub min_income: u32,

    /// Optional wall-clock budget, checked between iterations.
    pub time_limit_ms: Option<u64>,

    /// Heuristic weights.
    pub weights: ScoringWeights,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            scoring_mode: ScoringMode::MeanScore,
            allocation_policy: AllocationPolicy::default(),
            playout_variations: 16,
            max_playout_depth: 10,
            iterations: 1000,
            top_n: 5,
            seed: 42,
            turn_cycle: true,
            min_income: 3,
            time_limit_ms: None,
            weights: ScoringWeights::default(),
        }
    }
}

impl MCTSConfig {
    /// Create a new config with custom exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with a custom iteration budget.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Create a new config with a custom scoring mode.
    pub fn with_scoring_mode(mut self, mode: ScoringMode) -> Self {
        self.scoring_mode = mode;
        self
    }

    /// Create a new config with a custom allocation policy.
    pub fn with_allocation(mut self, policy: AllocationPolicy) -> Self {
        self.allocation_policy = policy;
        self
    }

    /// Create a new config with a custom playout depth cap.
    pub fn with_max_playout_depth(mut self, depth: u32) -> Self {
        self.max_playout_depth = depth;
        self
    }

    /// Create a new config returning the top `n` moves.
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Enable or disable turn cycling in playouts.
    pub fn with_turn_cycle(mut self, enabled: bool) -> Self {
        self.turn_cycle = enabled;
        self
    }

    /// Create a new config with a wall-clock budget.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Create a new config with custom scoring weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Allocation policy used inside playouts.
    #[must_use]
    pub fn playout_allocation(&self) -> AllocationPolicy {
        self.allocation_policy.with_variations(self.playout_variations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MCTSConfig::default();
        assert!((config.exploration_constant - std::f64::consts::SQRT_2).abs() < 0.001);
        assert_eq!(config.max_playout_depth, 10);
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.scoring_mode, ScoringMode::MeanScore);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MCTSConfig::default()
            .with_exploration(2.0)
            .with_seed(123)
            .with_iterations(50)
            .with_scoring_mode(ScoringMode::WinRate)
            .with_allocation(AllocationPolicy::top_k(3));

        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.seed, 123);
        assert_eq!(config.iterations, 50);
        assert_eq!(config.scoring_mode, ScoringMode::WinRate);
        assert_eq!(config.playout_allocation(), AllocationPolicy::top_k(3));
    }

    #[test]
    fn test_playout_allocation_uses_playout_variations() {
        let config = MCTSConfig::default();
        assert_eq!(
            config.playout_allocation(),
            AllocationPolicy::ProportionalVariation { variations: 16 }
        );
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: MCTSConfig =
            serde_json::from_str(r#"{"iterations": 250, "scoring_mode": "win_rate"}"#).unwrap();
        assert_eq!(config.iterations, 250);
        assert_eq!(config.scoring_mode, ScoringMode::WinRate);
        assert_eq!(config.seed, 42);
    }
}
