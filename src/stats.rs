//! Shared statistics table.
//!
//! Workers never share tree nodes. When a worker finishes, it adds the visit
//! and win counts of each of its root's children into this table, addressed
//! by the move's rank. The orchestrator reads the table only after every
//! worker has been joined.

use std::sync::{Mutex, PoisonError};

use crate::constants::MAX_MOVES;

/// Aggregated counters for one move rank.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RankStats {
    pub visits: u64,
    pub wins: u64,
}

impl RankStats {
    /// Fraction of visits that were wins, 0 when unvisited.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            return 0.0;
        }
        self.wins as f64 / self.visits as f64
    }
}

struct Counters {
    visits: [u64; MAX_MOVES],
    wins: [u64; MAX_MOVES],
}

/// Rank-indexed visit/win accumulator guarded by one mutex.
pub struct SharedStats {
    counters: Mutex<Counters>,
}

impl Default for SharedStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedStats {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(Counters {
                visits: [0; MAX_MOVES],
                wins: [0; MAX_MOVES],
            }),
        }
    }

    /// Number of ranks the table can hold.
    pub const fn capacity(&self) -> usize {
        MAX_MOVES
    }

    /// Add one child's counters at `rank`.
    ///
    /// Ranks past the table capacity are dropped with a warning; the move
    /// simply never competes for selection.
    pub fn add(&self, rank: usize, visits: u32, wins: u32) {
        if rank >= MAX_MOVES {
            log::warn!("rank {rank} exceeds statistics capacity {MAX_MOVES}, dropped");
            return;
        }
        // Counters stay consistent even if a holder panicked mid-update.
        let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        counters.visits[rank] += u64::from(visits);
        counters.wins[rank] += u64::from(wins);
    }

    /// Counters at `rank` (zero for ranks past the capacity).
    pub fn get(&self, rank: usize) -> RankStats {
        if rank >= MAX_MOVES {
            return RankStats::default();
        }
        let counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        RankStats {
            visits: counters.visits[rank],
            wins: counters.wins[rank],
        }
    }

    /// Counters for ranks `0..n`, read under a single lock.
    pub fn snapshot(&self, n: usize) -> Vec<RankStats> {
        let counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        (0..n.min(MAX_MOVES))
            .map(|rank| RankStats {
                visits: counters.visits[rank],
                wins: counters.wins[rank],
            })
            .collect()
    }
}
