//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MCTSNode>` with index-based references. Nodes are only
//! ever appended; the whole arena is dropped when the search finishes.

use crate::core::{GameState, Move};

use super::node::{MCTSNode, NodeId};

/// Arena-based MCTS tree.
#[derive(Clone, Debug)]
pub struct MCTSTree {
    /// All nodes in the tree.
    nodes: Vec<MCTSNode>,

    /// The root node ID (always 0).
    root: NodeId,
}

impl MCTSTree {
    /// Create a new tree with a root node.
    pub fn new(root_state: GameState) -> Self {
        Self::with_capacity(root_state, 1024)
    }

    /// Create a tree with custom initial capacity.
    pub fn with_capacity(root_state: GameState, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(MCTSNode::root(root_state));
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Append a child under `parent`, returning its ID.
    pub fn add_child(&mut self, parent: NodeId, mv: Move, state: GameState) -> NodeId {
        let depth = self.get(parent).depth.saturating_add(1);
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(MCTSNode::new(state, parent, Some(mv), depth));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Attach one child per `(move, state)` and mark `parent` expanded.
    pub fn expand(&mut self, parent: NodeId, successors: Vec<(Move, GameState)>) {
        for (mv, state) in successors {
            self.add_child(parent, mv, state);
        }
        self.get_mut(parent).expanded = true;
    }

    /// Record `score` on `leaf` and every ancestor up to the root.
    pub fn backpropagate(&mut self, leaf: NodeId, score: f64) {
        let mut current = leaf;
        while !current.is_none() {
            let node = self.get_mut(current);
            node.record(score);
            current = node.parent;
        }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &MCTSNode {
        self.get(self.root)
    }

    /// Iterate over the root's children.
    pub fn root_children(&self) -> impl Iterator<Item = &MCTSNode> {
        self.root_node().children.iter().map(|&id| self.get(id))
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let expanded_count = self.nodes.iter().filter(|n| n.expanded).count();
        let total_children: usize = self.nodes.iter().map(|n| n.children.len()).sum();

        TreeStats {
            node_count: self.nodes.len(),
            max_depth,
            expanded_count,
            total_children,
        }
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Maximum depth reached.
    pub max_depth: u16,

    /// Nodes whose expansion has run.
    pub expanded_count: usize,

    /// Sum of child counts over all nodes.
    pub total_children: usize,
}

impl TreeStats {
    /// Average children per expanded node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.expanded_count == 0 {
            0.0
        } else {
            self.total_children as f64 / self.expanded_count as f64
        }
    }
}
