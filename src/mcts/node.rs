//! MCTS node structure.
//!
//! Nodes live in an arena (`MCTSTree`) and refer to each other by `NodeId`.
//! The parent link is a plain index used for backpropagation only; children
//! are owned by the arena and listed by index.

use smallvec::SmallVec;

use crate::core::{GameState, Move};
use crate::rules::scoring::finite_or_zero;

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A node in the MCTS tree.
#[derive(Clone, Debug)]
pub struct MCTSNode {
    /// Snapshot reached by `incoming`.
    pub state: GameState,

    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Move that produced this node from its parent (None for root).
    pub incoming: Option<Move>,

    /// Child nodes, in generation order.
    pub children: SmallVec<[NodeId; 8]>,

    /// Set once expansion has run; never reset.
    pub expanded: bool,

    /// Times this node was on a backpropagation path.
    pub visits: u32,

    /// Sum of playout payoffs.
    pub total_score: f64,

    /// Depth in tree (root = 0).
    pub depth: u16,
}

impl MCTSNode {
    /// Create a new node.
    pub fn new(state: GameState, parent: NodeId, incoming: Option<Move>, depth: u16) -> Self {
        Self {
            state,
            parent,
            incoming,
            children: SmallVec::new(),
            expanded: false,
            visits: 0,
            total_score: 0.0,
            depth,
        }
    }

    /// Create a root node.
    pub fn root(state: GameState) -> Self {
        Self::new(state, NodeId::NONE, None, 0)
    }

    /// Mean payoff per visit, 0 when unvisited.
    #[must_use]
    pub fn mean_score(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            finite_or_zero(self.total_score / f64::from(self.visits))
        }
    }

    /// Check if this node has no children.
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Record one playout result.
    pub fn record(&mut self, score: f64) {
        self.visits += 1;
        self.total_score += finite_or_zero(score);
    }
}
