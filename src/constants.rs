//! Constants for evaluation scale and search parameters.
//!
//! Values are expressed in the engine's native integer evaluation range.
//! The search itself is generic over the game, so nothing here depends on
//! a particular board geometry.

// =============================================================================
// Evaluation Range
// =============================================================================

/// Native evaluation type. Positive favours the side to move.
pub type Value = i32;

/// Draw score.
pub const VALUE_DRAW: Value = 0;

/// Score of a won game, before distance adjustment.
pub const VALUE_MATE: Value = 80;

/// Bound of the full alpha-beta window. Strictly outside every reachable score.
pub const VALUE_INFINITE: Value = 125;

/// Scale applied when converting a `[-1, +1]` search estimate to a [`Value`].
pub const VALUE_SCALE: f64 = VALUE_MATE as f64;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default UCT exploration coefficient `C`.
pub const EXPLORATION_PARAMETER: f64 = 1.0;

/// Default move-rank bias coefficient `B` (0 disables the bias term).
pub const RANK_BIAS: f64 = 0.0;

/// Depth handed to the leaf evaluator on every simulation.
pub const ALPHA_BETA_DEPTH: u8 = 3;

/// Iterations granted per skill level.
pub const ITERATIONS_PER_LEVEL: usize = 1000;

/// Iteration budget when the board is empty (the opening move is not worth searching).
pub const OPENING_ITERATIONS: usize = 1;

/// Default skill level.
pub const DEFAULT_SKILL_LEVEL: u32 = 10;

/// Highest accepted skill level.
pub const MAX_SKILL_LEVEL: u32 = 30;

/// The deadline is checked when `iteration & TIME_CHECK_MASK == 0`.
pub const TIME_CHECK_MASK: usize = 0x3F;

/// Seed used before every simulation when shuffling is disabled.
pub const DETERMINISTIC_SEED: u64 = 42;

// =============================================================================
// Shared Statistics
// =============================================================================

/// Capacity of the rank-indexed statistics table. Larger than the legal move
/// count of any supported game.
pub const MAX_MOVES: usize = 128;

/// Average branching factor assumed when reserving a pooled arena.
pub const POOL_BRANCHING_ESTIMATE: usize = 8;

/// Upper bound on nodes reserved up front by a pooled arena.
pub const POOL_MAX_RESERVE: usize = 1 << 20;
