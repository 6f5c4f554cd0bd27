//! Core MCTS search algorithm.
//!
//! Every iteration runs the four classic steps on an arena tree:
//! selection down to a leaf, expansion of that leaf if it is neither
//! terminal nor already expanded, a playout from one random new child (or
//! the leaf itself) and backpropagation of the payoff up to the root.

use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::core::{GameRng, GameState, Phase, PlayerId};
use crate::rules::{is_terminal, MoveGenerator};

use super::config::MCTSConfig;
use super::node::NodeId;
use super::policy::{RandomPlayout, SelectionPolicy, SimulationPolicy, Uct};
use super::recommend::{merge_candidates, root_candidates, Recommendation, Recommendations};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Main MCTS search context.
///
/// Owns the configuration, the policies and the tree of the last search.
/// The input state is only ever read.
pub struct MCTSSearch {
    /// Search configuration.
    config: MCTSConfig,

    /// Candidate generator used for expansion.
    generator: MoveGenerator,

    /// RNG for expansion and child choice; playouts get forks.
    rng: GameRng,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy>,

    /// Simulation policy.
    simulation: Box<dyn SimulationPolicy>,

    /// Tree of the last search.
    tree: Option<MCTSTree>,

    /// Search statistics.
    stats: SearchStats,
}

impl MCTSSearch {
    /// Create a new MCTS search context.
    pub fn new(config: MCTSConfig) -> Self {
        Self {
            generator: MoveGenerator::new(&config.allocation_policy),
            rng: GameRng::new(config.seed),
            selection: Box::new(Uct),
            simulation: Box::new(RandomPlayout::from_config(&config)),
            tree: None,
            stats: SearchStats::default(),
            config,
        }
    }

    /// Set a custom selection policy.
    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom simulation policy.
    pub fn with_simulation<S: SimulationPolicy + 'static>(mut self, simulation: S) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// Search for the configured number of iterations and rank the root moves.
    pub fn recommend(&mut self, root: &GameState, phase: Phase) -> Recommendations {
        self.search(root, phase, self.config.iterations)
    }

    /// Search for `iterations` iterations and rank the root moves.
    pub fn search(&mut self, root: &GameState, phase: Phase, iterations: u32) -> Recommendations {
        let candidates = root_candidates(self.run(root, phase, iterations));
        Recommendations::rank(candidates, self.config.top_n, self.stats.clone())
    }

    /// Build a search tree for `root` in `phase`.
    ///
    /// The RNG is reseeded from the config, so repeated calls with the same
    /// arguments build the same tree.
    pub fn run(&mut self, root: &GameState, phase: Phase, iterations: u32) -> &MCTSTree {
        let start = Instant::now();
        let deadline = self
            .config
            .time_limit_ms
            .map(|ms| start + Duration::from_millis(ms));
        self.stats.reset();
        self.stats.roots = 1;
        self.rng = GameRng::new(self.config.seed);

        let root_state = root.with_phase(phase);
        let searcher = root_state.current_player.clone();
        let mut tree = MCTSTree::new(root_state);

        for i in 0..iterations {
            if i > 0 && deadline.is_some_and(|d| Instant::now() >= d) {
                self.stats.timed_out = true;
                break;
            }
            self.iteration(&mut tree, &searcher);
            self.stats.iterations += 1;
        }

        self.stats.tree_nodes = tree.len();
        self.stats.time_us = start.elapsed().as_micros() as u64;
        debug!(
            player = %searcher,
            %phase,
            iterations = self.stats.iterations,
            nodes = tree.len(),
            root_children = tree.root_node().children.len(),
            timed_out = self.stats.timed_out,
            time_us = self.stats.time_us,
            "search finished"
        );

        self.tree.insert(tree)
    }

    /// Run `roots` independent trees and merge their root statistics.
    ///
    /// Each tree uses the default policies and a seed forked from the
    /// config seed; the first tree uses the config seed itself. With the
    /// `parallel` feature the trees run on the rayon pool; the result is the
    /// same either way.
    pub fn recommend_roots(&self, root: &GameState, phase: Phase, roots: usize) -> Recommendations {
        let start = Instant::now();
        let seeds = root_seeds(self.config.seed, roots.max(1));
        let config = &self.config;

        #[cfg(feature = "parallel")]
        let per_root: Vec<(Vec<Recommendation>, SearchStats)> = seeds
            .par_iter()
            .map(|&seed| search_one_root(config, root, phase, seed))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let per_root: Vec<(Vec<Recommendation>, SearchStats)> = seeds
            .iter()
            .map(|&seed| search_one_root(config, root, phase, seed))
            .collect();

        let mut stats = SearchStats::default();
        let mut candidates = Vec::with_capacity(per_root.len());
        for (recs, root_stats) in per_root {
            stats.absorb(&root_stats);
            candidates.push(recs);
        }
        stats.time_us = start.elapsed().as_micros() as u64;
        debug!(roots = stats.roots, iterations = stats.iterations, "merged root searches");

        Recommendations::rank(merge_candidates(candidates), self.config.top_n, stats)
    }

    /// Single MCTS iteration: select, expand, simulate, backpropagate.
    fn iteration(&mut self, tree: &mut MCTSTree, searcher: &PlayerId) {
        // === SELECTION ===
        let leaf = self.select_leaf(tree);
        self.stats.max_depth = self.stats.max_depth.max(tree.get(leaf).depth);

        // === EXPANSION ===
        let mut explore = leaf;
        let node = tree.get(leaf);
        if !node.expanded && !is_terminal(&node.state) {
            let successors = self.generator.generate(&node.state, &mut self.rng);
            trace!(node = %leaf, children = successors.len(), "expanded leaf");
            tree.expand(leaf, successors);
            self.stats.nodes_expanded += 1;

            if let Some(&child) = self.rng.choose(&tree.get(leaf).children) {
                explore = child;
            }
        }

        // === SIMULATION ===
        let mut playout_rng = self.rng.fork();
        let payoff = self
            .simulation
            .simulate(&tree.get(explore).state, searcher, &mut playout_rng);
        self.stats.simulations += 1;

        // === BACKPROPAGATION ===
        tree.backpropagate(explore, payoff);
    }

    /// Follow the selection policy from the root until a node has no children.
    fn select_leaf(&self, tree: &MCTSTree) -> NodeId {
        let mut current = tree.root();
        while let Some(child) = self.selection.select(tree, current, &self.config) {
            current = child;
        }
        current
    }

    /// Get search statistics.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the tree of the last search.
    #[must_use]
    pub fn tree(&self) -> Option<&MCTSTree> {
        self.tree.as_ref()
    }
}

/// Seeds for root-parallel trees: the base seed, then forks of it.
fn root_seeds(base: u64, roots: usize) -> Vec<u64> {
    let mut seeder = GameRng::new(base);
    std::iter::once(base)
        .chain(std::iter::repeat_with(move || seeder.fork().seed()))
        .take(roots)
        .collect()
}

fn search_one_root(
    config: &MCTSConfig,
    root: &GameState,
    phase: Phase,
    seed: u64,
) -> (Vec<Recommendation>, SearchStats) {
    let mut search = MCTSSearch::new(config.clone().with_seed(seed));
    let candidates = root_candidates(search.run(root, phase, config.iterations));
    (candidates, search.stats.clone())
}
