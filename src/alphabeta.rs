//! Bounded negamax search with alpha-beta pruning.
//!
//! Used as the leaf evaluator of the tree search. Values are from the point
//! of view of the side to move:
//! - a finished game is scored as a loss for the side to move (the previous
//!   move completed a line), adjusted by distance so faster wins score higher
//! - a full board is a draw
//! - at depth 0 a static count of open lines is returned
//!
//! Move order comes from [`HeuristicOrderer`]. When shuffling is on, the
//! root moves are shuffled with the caller's random source so that equal
//! moves are not always explored in the same order.

use crate::board::{Board, Square, LINES};
use crate::constants::{Value, VALUE_DRAW, VALUE_INFINITE, VALUE_MATE};
use crate::movegen::HeuristicOrderer;
use crate::position::{Color, LeafEvaluator, MoveOrderer, Position};

/// Alpha-beta evaluator for [`Board`].
#[derive(Copy, Clone, Debug)]
pub struct AlphaBeta {
    pub orderer: HeuristicOrderer,
    /// Shuffle the root move list before searching
    pub shuffle_root: bool,
}

impl Default for AlphaBeta {
    fn default() -> Self {
        Self {
            orderer: HeuristicOrderer,
            shuffle_root: true,
        }
    }
}

/// Static evaluation: pieces on lines the opponent has not blocked.
pub fn evaluate_static(board: &Board) -> Value {
    let us = board.side_to_move();
    let mut score = 0;
    for line in &LINES {
        let count = |color: Color| {
            line.iter()
                .filter(|&&i| board.cell(i) == Some(color))
                .count() as Value
        };
        let (ours, theirs) = (count(us), count(us.opponent()));
        if theirs == 0 {
            score += ours;
        }
        if ours == 0 {
            score -= theirs;
        }
    }
    score
}

impl AlphaBeta {
    fn negamax(
        &self,
        board: &Board,
        depth: u8,
        mut alpha: Value,
        beta: Value,
        ply: Value,
        rng: Option<&mut fastrand::Rng>,
    ) -> (Value, Option<Square>) {
        if board.winner().is_some() {
            return (-(VALUE_MATE - ply), None);
        }
        let mut moves = self.orderer.ranked_moves(board);
        if moves.is_empty() {
            return (VALUE_DRAW, None);
        }
        if depth == 0 {
            return (evaluate_static(board), None);
        }
        if let Some(rng) = rng {
            rng.shuffle(&mut moves);
        }

        let mut best = -VALUE_INFINITE;
        let mut best_move = None;
        for mv in moves {
            let mut child = board.clone();
            child.apply(mv);
            let (value, _) = self.negamax(&child, depth - 1, -beta, -alpha, ply + 1, None);
            let value = -value;

            if value > best {
                best = value;
                best_move = Some(mv);
                if value > alpha {
                    alpha = value;
                    if alpha >= beta {
                        break;
                    }
                }
            }
        }

        (best, best_move)
    }
}

impl LeafEvaluator<Board> for AlphaBeta {
    fn evaluate(
        &self,
        pos: &Board,
        depth: u8,
        alpha: Value,
        beta: Value,
        rng: &mut fastrand::Rng,
    ) -> (Value, Option<Square>) {
        let rng = self.shuffle_root.then_some(rng);
        self.negamax(pos, depth, alpha, beta, 0, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(board: &str, depth: u8) -> (Value, Option<Square>) {
        let board: Board = board.parse().unwrap();
        let mut rng = fastrand::Rng::with_seed(7);
        AlphaBeta::default().evaluate(&board, depth, -VALUE_INFINITE, VALUE_INFINITE, &mut rng)
    }

    #[test]
    fn test_finds_immediate_win() {
        let (value, mv) = eval("XX./OO./...", 1);
        assert_eq!(value, VALUE_MATE - 1);
        assert_eq!(mv.map(|m| m.to_string()), Some("c1".to_string()));
    }

    #[test]
    fn test_lost_position_is_negative() {
        // O to move, X already has three in a row.
        let (value, mv) = eval("XXX/OO./...", 3);
        assert_eq!(value, -VALUE_MATE);
        assert!(mv.is_none());
    }

    #[test]
    fn test_forced_loss_seen_at_depth() {
        // O to move; X has a double threat (c1 and a2) that O cannot stop.
        let (value, _) = eval("XX./.O./X.O", 3);
        assert!(value < 0);
    }

    #[test]
    fn test_full_board_is_draw() {
        assert_eq!(eval("XOX/XOO/OXX", 3), (VALUE_DRAW, None));
    }

    #[test]
    fn test_static_eval_empty_is_zero() {
        assert_eq!(evaluate_static(&Board::new()), 0);
    }

    #[test]
    fn test_static_eval_centre_favours_owner() {
        // White to move after X took the centre: four lines belong to X.
        let board: Board = ".../.X./...".parse().unwrap();
        assert_eq!(evaluate_static(&board), -4);
    }
}
