//! Search configuration.
//!
//! Mirrors the engine options the search reads: skill level, move time and
//! the shuffling toggle, plus the tuning knobs of the tree policy.

use std::num::NonZeroUsize;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{
    ALPHA_BETA_DEPTH, DEFAULT_SKILL_LEVEL, EXPLORATION_PARAMETER, ITERATIONS_PER_LEVEL,
    MAX_SKILL_LEVEL, OPENING_ITERATIONS, RANK_BIAS,
};
use crate::mcts::UctParams;
use crate::position::Position;
use crate::tree::Allocation;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("skill level {0} out of range 1..={max}", max = MAX_SKILL_LEVEL)]
    SkillLevel(u32),
    #[error("thread count must be at least 1")]
    Threads,
    #[error("invalid move time {0}s")]
    MoveTime(f64),
    #[error("{name} must be finite and non-negative (got {value})")]
    Coefficient { name: &'static str, value: f64 },
}

/// Options for one search call.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Scales the total iteration budget
    pub skill_level: u32,
    /// Wall-clock budget per move; zero means unlimited
    pub move_time: Duration,
    /// When false, every simulation starts from the same random seed
    pub shuffling_enabled: bool,
    /// Worker count override; `None` uses the available parallelism
    pub threads: Option<usize>,
    /// UCT exploration coefficient
    pub exploration: f64,
    /// Bias toward higher-ranked moves
    pub rank_bias: f64,
    /// Depth of the leaf evaluator
    pub alpha_beta_depth: u8,
    /// Node allocation strategy of each worker's tree
    pub allocation: Allocation,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            skill_level: DEFAULT_SKILL_LEVEL,
            move_time: Duration::ZERO,
            shuffling_enabled: true,
            threads: None,
            exploration: EXPLORATION_PARAMETER,
            rank_bias: RANK_BIAS,
            alpha_beta_depth: ALPHA_BETA_DEPTH,
            allocation: Allocation::default(),
        }
    }
}

impl SearchConfig {
    /// Set the move time from seconds. `0` means unlimited.
    pub fn with_move_time_secs(mut self, secs: f64) -> Result<Self, ConfigError> {
        self.move_time = Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::MoveTime(secs))?;
        Ok(self)
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_SKILL_LEVEL).contains(&self.skill_level) {
            return Err(ConfigError::SkillLevel(self.skill_level));
        }
        if self.threads == Some(0) {
            return Err(ConfigError::Threads);
        }
        for (name, value) in [("exploration", self.exploration), ("rank bias", self.rank_bias)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Coefficient { name, value });
            }
        }
        Ok(())
    }

    /// Deadline for the workers, if any.
    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        (!self.move_time.is_zero()).then_some(self.move_time)
    }

    #[inline]
    pub fn uct_params(&self) -> UctParams {
        UctParams::new(self.exploration, self.rank_bias)
    }

    /// Total iterations for a search of `pos`.
    ///
    /// The empty board gets a minimal budget: there is nothing to read yet.
    pub fn iteration_budget<P: Position>(&self, pos: &P) -> usize {
        if pos.is_board_empty() {
            return OPENING_ITERATIONS;
        }
        (self.skill_level as usize)
            .saturating_mul(ITERATIONS_PER_LEVEL)
            .max(1)
    }

    /// Number of workers for `budget` iterations.
    ///
    /// Never more workers than iterations, so every worker gets a non-zero
    /// share.
    pub fn worker_count(&self, budget: usize) -> usize {
        let parallelism = self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        });
        parallelism.clamp(1, budget.max(1))
    }
}

/// Split `budget` iterations over `workers` as evenly as possible.
pub fn iteration_shares(budget: usize, workers: usize) -> Vec<usize> {
    let workers = workers.max(1);
    let base = budget / workers;
    let extra = budget % workers;
    (0..workers)
        .map(|i| base + usize::from(i < extra))
        .collect()
}
