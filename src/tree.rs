//! Search tree with arena allocation.
//!
//! Nodes live in a contiguous `Vec` owned by one worker and refer to each
//! other by [`NodeId`]. A node stores the indices of its children and an
//! optional parent index, so walking down (selection) and up
//! (backpropagation) are both O(1) per step without shared ownership.
//!
//! The tree is grown during a search and torn down in one sweep when the
//! worker is done. Teardown uses an explicit stack so very deep trees cannot
//! exhaust the thread's stack.

use crate::constants::{POOL_BRANCHING_ESTIMATE, POOL_MAX_RESERVE};
use crate::position::Position;

/// Index of a node inside its tree's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The root is always the first node allocated.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a tree obtains memory for new nodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Allocation {
    /// Reserve the arena up front from the expected node count. No
    /// reallocation happens while the search runs.
    #[default]
    Pooled,
    /// Start empty and grow as nodes are created.
    OnDemand,
}

impl Allocation {
    /// Number of node slots to reserve for a worker running `iterations`.
    pub fn reserve_for(self, iterations: usize) -> usize {
        match self {
            Allocation::Pooled => iterations
                .saturating_mul(POOL_BRANCHING_ESTIMATE)
                .saturating_add(1)
                .min(POOL_MAX_RESERVE),
            Allocation::OnDemand => 0,
        }
    }
}

/// A node in the search tree.
///
/// `wins` counts results that favoured the side to move at this node.
pub struct Node<P: Position> {
    /// The position reached at this node
    pub pos: P,
    /// Move that led here from the parent (`None` at the root)
    pub mv: Option<P::Move>,
    /// Rank of `mv` in the parent's ordered move list
    pub rank: usize,
    /// Number of visits
    pub visits: u32,
    /// Number of wins (win score = wins / visits)
    pub wins: u32,
    /// Children in rank order
    pub children: Vec<NodeId>,
    /// Parent node (`None` at the root)
    pub parent: Option<NodeId>,
}

impl<P: Position> Node<P> {
    fn new(pos: P, mv: Option<P::Move>, rank: usize, parent: Option<NodeId>) -> Self {
        Self {
            pos,
            mv,
            rank,
            visits: 0,
            wins: 0,
            children: Vec::new(),
            parent,
        }
    }

    /// Fraction of visits that were wins, 0 for an unvisited node.
    #[inline]
    pub fn win_score(&self) -> f64 {
        if self.visits == 0 {
            return 0.0;
        }
        self.wins as f64 / self.visits as f64
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A worker-private search tree.
pub struct Tree<P: Position> {
    nodes: Vec<Node<P>>,
}

impl<P: Position> Tree<P> {
    /// Create a tree whose root holds a copy of `pos`.
    pub fn new(pos: &P, allocation: Allocation, iterations: usize) -> Self {
        let mut nodes = Vec::with_capacity(allocation.reserve_for(iterations).max(1));
        nodes.push(Node::new(pos.clone(), None, 0, None));
        Self { nodes }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<P> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<P> {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes allocated so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true for a live tree; the root exists from construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Reserved node slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Allocate a child of `parent` holding `pos`, reached by `mv` with the
    /// given rank. The child is appended to the parent's children.
    pub fn add_child(&mut self, parent: NodeId, pos: P, mv: P::Move, rank: usize) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(pos, Some(mv), rank, Some(parent)));
        self.get_mut(parent).children.push(id);
        id
    }

    /// All nodes in allocation order. A node's position in this order never
    /// changes while the tree is alive.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<P>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Number of edges from the root to `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.get(parent).parent;
        }
        depth
    }

    /// Release every node reachable from the root and free the arena.
    ///
    /// Returns the number of nodes released. Each node is popped from the
    /// stack exactly once because its children are moved out as it is visited.
    pub fn teardown(mut self) -> usize {
        let mut released = 0;
        let mut stack = vec![self.root()];

        while let Some(id) = stack.pop() {
            let node = self.get_mut(id);
            stack.extend(std::mem::take(&mut node.children));
            node.parent = None;
            released += 1;
        }

        self.nodes.clear();
        released
    }
}
