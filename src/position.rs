//! Collaborator contracts consumed by the search.
//!
//! The search never looks inside a position. It only needs to:
//! - copy a position and apply a move to the copy ([`Position`])
//! - ask for the legal moves in a stable, ranked order ([`MoveOrderer`])
//! - ask a bounded adversarial search for a verdict ([`LeafEvaluator`])
//!
//! Orderers and evaluators are shared by every worker thread, so they must be
//! `Sync`. Positions are copied into each worker's private tree, so they must
//! be `Send`.
//!
//! Plain closures implement [`MoveOrderer`] and [`LeafEvaluator`], which keeps
//! test doubles short.

use std::fmt;

use crate::constants::Value;

/// Side to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// A board state the search can copy and advance.
pub trait Position: Clone + Send {
    /// A move in this game. Moves are small values copied freely between nodes.
    type Move: Copy + PartialEq + Send + fmt::Debug + fmt::Display;

    /// Play `mv` on this position. The move is assumed legal.
    fn apply(&mut self, mv: Self::Move);

    /// The side whose turn it is.
    fn side_to_move(&self) -> Color;

    /// True for the initial position, before any piece is placed.
    fn is_board_empty(&self) -> bool;
}

/// Produces the legal moves of a position, best guess first.
///
/// The order must be stable for identical input: the rank of a move is used
/// as the index into the shared statistics table, and the orchestrator
/// re-derives the list after the workers finish.
pub trait MoveOrderer<P: Position>: Sync {
    fn ranked_moves(&self, pos: &P) -> Vec<P::Move>;
}

impl<P, F> MoveOrderer<P> for F
where
    P: Position,
    F: Fn(&P) -> Vec<P::Move> + Sync,
{
    fn ranked_moves(&self, pos: &P) -> Vec<P::Move> {
        self(pos)
    }
}

/// Bounded-depth adversarial search used to judge a leaf.
///
/// Returns a value from the perspective of the side to move in `pos`, plus the
/// principal move if one exists. The random source belongs to the calling
/// worker; evaluators may use it to break ties between equal moves.
pub trait LeafEvaluator<P: Position>: Sync {
    fn evaluate(
        &self,
        pos: &P,
        depth: u8,
        alpha: Value,
        beta: Value,
        rng: &mut fastrand::Rng,
    ) -> (Value, Option<P::Move>);
}

impl<P, F> LeafEvaluator<P> for F
where
    P: Position,
    F: Fn(&P, u8, Value, Value, &mut fastrand::Rng) -> (Value, Option<P::Move>) + Sync,
{
    fn evaluate(
        &self,
        pos: &P,
        depth: u8,
        alpha: Value,
        beta: Value,
        rng: &mut fastrand::Rng,
    ) -> (Value, Option<P::Move>) {
        self(pos, depth, alpha, beta, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_flips() {
        assert_eq!(Color::Black.opponent(), Color::White);
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::Black.opponent().opponent(), Color::Black);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::Black.to_string(), "black");
        assert_eq!(Color::White.to_string(), "white");
    }
}
