//! Parallel search orchestration.
//!
//! The iteration budget is split across one worker per available hardware
//! thread. Each worker grows its own tree; the only shared state is the
//! rank-indexed [`SharedStats`] table they fold into when done. After every
//! worker has been joined the most visited rank is chosen and its win rate
//! is converted into an evaluation.
//!
//! ```
//! use tactical_mcts::board::Board;
//! use tactical_mcts::alphabeta::AlphaBeta;
//! use tactical_mcts::movegen::HeuristicOrderer;
//! use tactical_mcts::config::SearchConfig;
//! use tactical_mcts::search::Searcher;
//!
//! let config = SearchConfig { skill_level: 1, ..Default::default() };
//! let searcher = Searcher::new(HeuristicOrderer, AlphaBeta::default(), config);
//! let pos: Board = "X.O.X....".parse().unwrap();
//! let result = searcher.search(&pos);
//! assert!(result.best_move.is_some());
//! ```

use std::time::Instant;

use crate::config::{iteration_shares, SearchConfig};
use crate::constants::{Value, VALUE_DRAW, VALUE_SCALE};
use crate::position::{LeafEvaluator, MoveOrderer, Position};
use crate::stats::{RankStats, SharedStats};
use crate::worker::{StopReason, Worker, WorkerReport};

/// Aggregated statistics for one root move.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoveStats<M> {
    pub rank: usize,
    pub mv: M,
    pub visits: u64,
    pub wins: u64,
}

impl<M> MoveStats<M> {
    /// Fraction of visits that were wins, 0 when unvisited.
    pub fn win_rate(&self) -> f64 {
        RankStats {
            visits: self.visits,
            wins: self.wins,
        }
        .win_rate()
    }
}

/// Outcome of one search call.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult<M> {
    /// Most visited move, `None` when the position has no moves
    pub best_move: Option<M>,
    /// Win rate of the best move mapped onto the native evaluation range
    pub value: Value,
    /// Win rate of the best move in `[0, 1]`
    pub win_rate: f64,
    /// Per-move statistics in rank order
    pub stats: Vec<MoveStats<M>>,
    /// Workers launched
    pub workers: usize,
    /// Iterations completed across all workers
    pub iterations: usize,
    /// True if any worker stopped on the deadline
    pub timed_out: bool,
}

impl<M> SearchResult<M> {
    fn none(workers: usize, iterations: usize, timed_out: bool) -> Self {
        Self {
            best_move: None,
            value: VALUE_DRAW,
            win_rate: 0.5,
            stats: Vec::new(),
            workers,
            iterations,
            timed_out,
        }
    }
}

/// Map a win rate in `[0, 1]` onto `[-VALUE_SCALE, +VALUE_SCALE]`.
#[inline]
pub fn win_rate_to_value(win_rate: f64) -> Value {
    let centered = (win_rate * 2.0 - 1.0).clamp(-1.0, 1.0);
    (centered * VALUE_SCALE).round() as Value
}

/// Index of the largest visit count. Ties keep the lowest rank; all-zero
/// counts yield `None`.
pub fn most_visited(stats: &[RankStats]) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (rank, s) in stats.iter().enumerate() {
        if s.visits == 0 {
            continue;
        }
        match best {
            Some((_, visits)) if s.visits <= visits => {}
            _ => best = Some((rank, s.visits)),
        }
    }
    best.map(|(rank, _)| rank)
}

/// Search driver bundling the collaborators and the configuration.
pub struct Searcher<O, E> {
    pub orderer: O,
    pub evaluator: E,
    pub config: SearchConfig,
}

impl<O, E> Searcher<O, E> {
    pub fn new(orderer: O, evaluator: E, config: SearchConfig) -> Self {
        Self {
            orderer,
            evaluator,
            config,
        }
    }

    /// Pick a move for `pos`.
    ///
    /// Never fails: a position without moves yields `best_move: None` and a
    /// draw value.
    pub fn search<P>(&self, pos: &P) -> SearchResult<P::Move>
    where
        P: Position,
        O: MoveOrderer<P>,
        E: LeafEvaluator<P>,
    {
        let budget = self.config.iteration_budget(pos);
        let workers = self.config.worker_count(budget);
        self.search_with(pos, budget, workers)
    }

    /// Pick a move for `pos` with an explicit budget and worker count.
    pub fn search_with<P>(&self, pos: &P, budget: usize, workers: usize) -> SearchResult<P::Move>
    where
        P: Position,
        O: MoveOrderer<P>,
        E: LeafEvaluator<P>,
    {
        let started = Instant::now();
        let table = SharedStats::new();
        let shares = iteration_shares(budget, workers);

        log::debug!(
            "searching {} to move: {} iterations over {} workers",
            pos.side_to_move(),
            budget,
            shares.len()
        );

        let reports = std::thread::scope(|s| {
            let handles: Vec<_> = shares
                .iter()
                .enumerate()
                .map(|(id, &iterations)| {
                    let worker = Worker {
                        id,
                        pos: pos.clone(),
                        orderer: &self.orderer,
                        evaluator: &self.evaluator,
                        iterations,
                        params: self.config.uct_params(),
                        depth: self.config.alpha_beta_depth,
                        shuffling_enabled: self.config.shuffling_enabled,
                        allocation: self.config.allocation,
                        started,
                        time_limit: self.config.time_limit(),
                    };
                    let table = &table;
                    s.spawn(move || worker.run(table))
                })
                .collect();

            handles
                .into_iter()
                .filter_map(|h| match h.join() {
                    Ok(report) => Some(report),
                    Err(_) => {
                        log::error!("search worker panicked; its statistics are lost");
                        None
                    }
                })
                .collect::<Vec<WorkerReport>>()
        });

        let result = collect(pos, &self.orderer, &table, &reports);
        log::info!(
            "best move {:?} value {} win rate {:.3} ({} iterations, {:?})",
            result.best_move,
            result.value,
            result.win_rate,
            result.iterations,
            started.elapsed()
        );
        #[cfg(feature = "search-stats")]
        log_statistics(&result);
        result
    }
}

/// Turn the joined table into a result.
///
/// The move list is derived again with the same orderer the workers used, so
/// rank `i` of the table is move `i` of this list.
fn collect<P, O>(
    pos: &P,
    orderer: &O,
    table: &SharedStats,
    reports: &[WorkerReport],
) -> SearchResult<P::Move>
where
    P: Position,
    O: MoveOrderer<P> + ?Sized,
{
    let iterations = reports.iter().map(|r| r.iterations).sum();
    let timed_out = reports.iter().any(|r| r.stop == StopReason::Deadline);

    let moves = orderer.ranked_moves(pos);
    let ranks = table.snapshot(moves.len());

    let Some(best) = most_visited(&ranks) else {
        return SearchResult::none(reports.len(), iterations, timed_out);
    };

    let stats = moves
        .iter()
        .zip(&ranks)
        .enumerate()
        .map(|(rank, (&mv, s))| MoveStats {
            rank,
            mv,
            visits: s.visits,
            wins: s.wins,
        })
        .collect();

    let win_rate = ranks[best].win_rate();
    SearchResult {
        best_move: Some(moves[best]),
        value: win_rate_to_value(win_rate),
        win_rate,
        stats,
        workers: reports.len(),
        iterations,
        timed_out,
    }
}

/// Print the per-move table for a finished search.
pub fn log_statistics<M: std::fmt::Display>(result: &SearchResult<M>) {
    for s in &result.stats {
        log::debug!(
            "move {:>4}: win rate {:.3} wins {:>7} visits {:>7}",
            s.mv,
            s.win_rate(),
            s.wins,
            s.visits
        );
    }
    match &result.best_move {
        Some(mv) => log::debug!(
            "chosen {} win score {:.3} value {}",
            mv,
            result.win_rate,
            result.value
        ),
        None => log::debug!("no move, value {}", result.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_rate_to_value() {
        assert_eq!(win_rate_to_value(0.5), 0);
        assert_eq!(win_rate_to_value(1.0), VALUE_SCALE as Value);
        assert_eq!(win_rate_to_value(0.0), -(VALUE_SCALE as Value));
        assert!(win_rate_to_value(0.75) > 0);
    }

    #[test]
    fn test_most_visited_ties_keep_lowest() {
        let stats = [
            RankStats { visits: 3, wins: 0 },
            RankStats { visits: 7, wins: 1 },
            RankStats { visits: 7, wins: 7 },
        ];
        assert_eq!(most_visited(&stats), Some(1));
    }

    #[test]
    fn test_most_visited_empty() {
        assert_eq!(most_visited(&[]), None);
        assert_eq!(most_visited(&[RankStats::default(); 3]), None);
    }
}
