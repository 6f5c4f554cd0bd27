//! MCTS search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during MCTS search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Total iterations performed.
    pub iterations: u32,

    /// Expansions run (leaves turned into interior nodes).
    pub nodes_expanded: u32,

    /// Nodes in the tree(s) at the end of the search.
    pub tree_nodes: usize,

    /// Playouts performed.
    pub simulations: u32,

    /// Maximum tree depth reached during selection.
    pub max_depth: u16,

    /// Independent trees merged into this result.
    pub roots: u32,

    /// Set when the wall-clock budget ended the search early.
    pub timed_out: bool,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fold another tree's statistics into these.
    ///
    /// Counters add up; depth is the maximum. Time is left to the caller,
    /// since merged trees may have run concurrently.
    pub fn absorb(&mut self, other: &SearchStats) {
        self.iterations += other.iterations;
        self.nodes_expanded += other.nodes_expanded;
        self.tree_nodes += other.tree_nodes;
        self.simulations += other.simulations;
        self.max_depth = self.max_depth.max(other.max_depth);
        self.roots += other.roots;
        self.timed_out |= other.timed_out;
    }

    /// Calculate iterations per second.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Calculate simulations per second.
    #[must_use]
    pub fn simulations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.simulations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = SearchStats::new();
        assert_eq!(stats.iterations, 0);
        assert_eq!(stats.simulations, 0);
        assert!(!stats.timed_out);
    }

    #[test]
    fn test_stats_iterations_per_second() {
        let mut stats = SearchStats::new();
        stats.iterations = 1000;
        stats.time_us = 1_000_000; // 1 second

        assert_eq!(stats.iterations_per_second(), 1000.0);
    }

    #[test]
    fn test_stats_simulations_per_second() {
        let mut stats = SearchStats::new();
        assert_eq!(stats.simulations_per_second(), 0.0);

        stats.simulations = 300;
        stats.time_us = 500_000;
        assert_eq!(stats.simulations_per_second(), 600.0);
    }

    #[test]
    fn test_stats_reset() {
        let mut stats = SearchStats::new();
        stats.iterations = 100;
        stats.simulations = 50;

        stats.reset();

        assert_eq!(stats.iterations, 0);
        assert_eq!(stats.simulations, 0);
    }

    #[test]
    fn test_stats_absorb() {
        let mut total = SearchStats::new();
        let tree = SearchStats {
            iterations: 10,
            simulations: 10,
            max_depth: 3,
            roots: 1,
            ..SearchStats::default()
        };

        total.absorb(&tree);
        total.absorb(&SearchStats { max_depth: 1, roots: 1, ..tree.clone() });

        assert_eq!(total.iterations, 20);
        assert_eq!(total.max_depth, 3);
        assert_eq!(total.roots, 2);
    }

    #[test]
    fn test_stats_serialization() {
        let mut stats = SearchStats::new();
        stats.iterations = 42;

        let json = serde_json::to_string(&stats).unwrap();
        let deserialized: SearchStats = serde_json::from_str(&json).unwrap();

        assert_eq!(stats, deserialized);
    }
}
