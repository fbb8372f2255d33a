//! Ranked move generation for noughts and crosses.
//!
//! Moves are ordered by a simple priority: complete our own line, block the
//! opponent's line, then centre, corners and edges. The sort is stable, so
//! squares with equal priority keep their board order and the ranking is
//! identical every time the same board is given.

use std::cmp::Reverse;

use crate::board::{Board, Square};
use crate::position::{MoveOrderer, Position};

const PRIORITY_WIN: u32 = 1000;
const PRIORITY_BLOCK: u32 = 500;
const PRIORITY_CENTER: u32 = 30;
const PRIORITY_CORNER: u32 = 20;
const PRIORITY_EDGE: u32 = 10;

/// Heuristic orderer for [`Board`].
#[derive(Copy, Clone, Debug, Default)]
pub struct HeuristicOrderer;

impl HeuristicOrderer {
    /// Priority of playing `sq` on `board`. Higher comes first.
    pub fn priority(board: &Board, sq: Square) -> u32 {
        let us = board.side_to_move();
        let mut score = if sq.is_center() {
            PRIORITY_CENTER
        } else if sq.is_corner() {
            PRIORITY_CORNER
        } else {
            PRIORITY_EDGE
        };
        if board.completes_line(sq, us) {
            score += PRIORITY_WIN;
        }
        if board.completes_line(sq, us.opponent()) {
            score += PRIORITY_BLOCK;
        }
        score
    }
}

impl MoveOrderer<Board> for HeuristicOrderer {
    fn ranked_moves(&self, pos: &Board) -> Vec<Square> {
        let mut moves = pos.legal_moves();
        moves.sort_by_key(|&sq| Reverse(Self::priority(pos, sq)));
        moves
    }
}
