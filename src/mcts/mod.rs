//! Monte Carlo Tree Search over territory moves.
//!
//! ## Overview
//!
//! The search builds a tree whose root is the state the player is looking
//! at and whose edges are candidate moves for the current phase. Key
//! features:
//!
//! - **Arena tree**: Nodes in a flat `Vec`, parents referenced by index
//! - **UCT selection**: Unvisited children are always tried first
//! - **Random playouts**: Optionally cycling through later turns
//! - **Two payoffs**: Heuristic mean score or win rate
//! - **Root parallelization**: Independent trees merged by move
//!
//! ## Usage
//!
//! ```rust
//! use territory_mcts::core::Phase;
//! use territory_mcts::maps::two_continents;
//! use territory_mcts::mcts::{MCTSConfig, MCTSSearch};
//!
//! let state = two_continents(Phase::Battle);
//! let mut search = MCTSSearch::new(MCTSConfig::default().with_iterations(200));
//!
//! let recs = search.recommend(&state, Phase::Battle);
//! for line in recs.render() {
//!     println!("{line}");
//! }
//! ```
//!
//! ## Custom Policies
//!
//! ```rust,ignore
//! use territory_mcts::mcts::{MCTSSearch, MCTSConfig};
//!
//! let search = MCTSSearch::new(config)
//!     .with_selection(MySelection)
//!     .with_simulation(MyPlayout);
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod recommend;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::{MCTSConfig, ScoringMode};
pub use node::{MCTSNode, NodeId};
pub use policy::{reward, win_reward, RandomPlayout, SelectionPolicy, SimulationPolicy, Uct};
pub use recommend::{search, Recommendation, Recommendations, Stage};
pub use search::MCTSSearch;
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
