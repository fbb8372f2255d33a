//! Monte Carlo Tree Search steps operating on a worker's tree.
//!
//! This module implements:
//! - UCT-tuned selection (mean + exploration + variance, plus an optional
//!   bias toward moves the orderer ranked higher)
//! - Full expansion of a leaf from the ranked move list
//! - Backpropagation that alternates the winning side at every ply
//!
//! Simulation lives in [`crate::playout`]. The per-thread loop that ties the
//! steps together lives in [`crate::worker`].

use crate::position::{MoveOrderer, Position};
use crate::tree::{NodeId, Tree};

/// Coefficients of the selection score.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UctParams {
    /// Exploration coefficient `C`
    pub exploration: f64,
    /// Rank bias coefficient `B` (0 disables the bias)
    pub rank_bias: f64,
}

impl UctParams {
    pub fn new(exploration: f64, rank_bias: f64) -> Self {
        Self {
            exploration,
            rank_bias,
        }
    }

    /// Pure exploitation with no bias.
    pub fn greedy() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// UCT-tuned score of a non-root node.
///
/// Unvisited nodes score `+inf` so every child is tried once before the
/// statistics start to matter.
pub fn uct_value_tuned<P: Position>(tree: &Tree<P>, id: NodeId, params: UctParams) -> f64 {
    let node = tree.get(id);
    if node.visits == 0 {
        return f64::INFINITY;
    }

    let parent_visits = node
        .parent
        .map(|p| tree.get(p).visits)
        .unwrap_or(node.visits);
    let siblings = node
        .parent
        .map(|p| tree.get(p).children.len())
        .unwrap_or(1);

    let visits = node.visits as f64;
    let mean = node.win_score();
    let exploration = params.exploration * (2.0 * (parent_visits as f64).ln() / visits).sqrt();
    let variance = (mean * (1.0 - mean) / visits).sqrt();
    let bias = if params.rank_bias != 0.0 {
        let max_rank = siblings.saturating_sub(1);
        params.rank_bias * max_rank.saturating_sub(node.rank) as f64
    } else {
        0.0
    };

    mean + exploration + variance + bias
}

/// Child of `id` with the highest score. The first child wins ties.
///
/// Returns `None` for a childless node.
pub fn best_uct_child_tuned<P: Position>(
    tree: &Tree<P>,
    id: NodeId,
    params: UctParams,
) -> Option<NodeId> {
    let mut best: Option<(NodeId, f64)> = None;

    for &child in &tree.get(id).children {
        let value = uct_value_tuned(tree, child, params);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((child, value)),
        }
    }

    best.map(|(child, _)| child)
}

/// Descend from the root to a leaf, always taking the best-scoring child.
pub fn select<P: Position>(tree: &Tree<P>, params: UctParams) -> NodeId {
    let mut node = tree.root();
    while let Some(child) = best_uct_child_tuned(tree, node, params) {
        node = child;
    }
    node
}

/// Create one child per ranked move of a leaf.
///
/// Returns the first child, or `id` itself when the position has no legal
/// moves. Expanding a node that already has children only returns its first
/// child.
pub fn expand<P, O>(tree: &mut Tree<P>, id: NodeId, orderer: &O) -> NodeId
where
    P: Position,
    O: MoveOrderer<P> + ?Sized,
{
    if let Some(&first) = tree.get(id).children.first() {
        return first;
    }

    let moves = orderer.ranked_moves(&tree.get(id).pos);
    for (rank, mv) in moves.into_iter().enumerate() {
        let mut child_pos = tree.get(id).pos.clone();
        child_pos.apply(mv);
        tree.add_child(id, child_pos, mv, rank);
    }

    tree.get(id).children.first().copied().unwrap_or(id)
}

/// Update counters from `id` up to the root.
///
/// A result that favours the side to move at one ply is a loss for the side
/// to move at the ply above, so the verdict flips at every step.
pub fn backpropagate<P: Position>(tree: &mut Tree<P>, id: NodeId, mut win: bool) {
    let mut current = Some(id);
    while let Some(node_id) = current {
        let node = tree.get_mut(node_id);
        node.visits += 1;
        if win {
            node.wins += 1;
        }
        win = !win;
        current = node.parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Color;
    use crate::tree::Allocation;

    /// A heap of `n` tokens; a move takes 1 or 2.
    #[derive(Clone, Debug)]
    struct Heap(u32);

    impl Position for Heap {
        type Move = u32;

        fn apply(&mut self, mv: u32) {
            self.0 -= mv;
        }

        fn side_to_move(&self) -> Color {
            Color::Black
        }

        fn is_board_empty(&self) -> bool {
            false
        }
    }

    fn heap_moves(pos: &Heap) -> Vec<u32> {
        (1..=pos.0.min(2)).collect()
    }

    fn tree_with_children(n: usize) -> Tree<Heap> {
        let mut tree = Tree::new(&Heap(10), Allocation::OnDemand, 0);
        let root = tree.root();
        for rank in 0..n {
            tree.add_child(root, Heap(9), 1, rank);
        }
        tree
    }

    #[test]
    fn test_unvisited_scores_infinite() {
        let tree = tree_with_children(1);
        let child = tree.get(tree.root()).children[0];
        assert_eq!(uct_value_tuned(&tree, child, UctParams::new(1.0, 0.0)), f64::INFINITY);
    }

    #[test]
    fn test_score_terms() {
        let mut tree = tree_with_children(1);
        let root = tree.root();
        let child = tree.get(root).children[0];
        tree.get_mut(root).visits = 10;
        tree.get_mut(child).visits = 4;
        tree.get_mut(child).wins = 2;

        let mean = 0.5;
        let expected = mean + (2.0 * 10f64.ln() / 4.0).sqrt() + (0.25f64 / 4.0).sqrt();
        let value = uct_value_tuned(&tree, child, UctParams::new(1.0, 0.0));
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rank_bias_favours_low_rank() {
        let mut tree = tree_with_children(3);
        let root = tree.root();
        let children = tree.get(root).children.clone();
        tree.get_mut(root).visits = 3;
        for &c in &children {
            tree.get_mut(c).visits = 1;
        }

        let params = UctParams::new(0.0, 0.1);
        let scores: Vec<f64> = children
            .iter()
            .map(|&c| uct_value_tuned(&tree, c, params))
            .collect();
        assert!(scores[0] > scores[1]);
        assert!(scores[1] > scores[2]);
        assert!((scores[0] - scores[2] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_ties_keep_first_child() {
        let mut tree = tree_with_children(3);
        let root = tree.root();
        let children = tree.get(root).children.clone();
        tree.get_mut(root).visits = 6;
        for &c in &children {
            tree.get_mut(c).visits = 2;
            tree.get_mut(c).wins = 1;
        }
        assert_eq!(best_uct_child_tuned(&tree, root, UctParams::new(1.0, 0.0)), Some(children[0]));
    }

    #[test]
    fn test_select_descends_to_leaf() {
        let mut tree = Tree::new(&Heap(3), Allocation::OnDemand, 0);
        let root = tree.root();
        let first = expand(&mut tree, root, &heap_moves);
        backpropagate(&mut tree, first, true);
        let leaf = select(&tree, UctParams::new(1.0, 0.0));
        assert!(tree.get(leaf).is_leaf());
        // The unvisited sibling is preferred over the visited first child.
        assert_eq!(tree.get(leaf).rank, 1);
    }

    #[test]
    fn test_expand_terminal_returns_self() {
        let mut tree = Tree::new(&Heap(0), Allocation::OnDemand, 0);
        let root = tree.root();
        assert_eq!(expand(&mut tree, root, &heap_moves), root);
        assert!(tree.get(root).is_leaf());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_expand_twice_does_not_duplicate() {
        let mut tree = Tree::new(&Heap(5), Allocation::OnDemand, 0);
        let root = tree.root();
        let first = expand(&mut tree, root, &heap_moves);
        assert_eq!(expand(&mut tree, root, &heap_moves), first);
        assert_eq!(tree.get(root).children.len(), 2);
    }

    #[test]
    fn test_backpropagate_alternates() {
        let mut tree = Tree::new(&Heap(5), Allocation::OnDemand, 0);
        let root = tree.root();
        let child = expand(&mut tree, root, &heap_moves);
        let grandchild = expand(&mut tree, child, &heap_moves);

        backpropagate(&mut tree, grandchild, true);

        assert_eq!((tree.get(grandchild).visits, tree.get(grandchild).wins), (1, 1));
        assert_eq!((tree.get(child).visits, tree.get(child).wins), (1, 0));
        assert_eq!((tree.get(root).visits, tree.get(root).wins), (1, 1));
    }
}
