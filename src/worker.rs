//! Per-thread search loop.
//!
//! A worker owns one tree rooted at a private copy of the position. It runs
//! select, expand, simulate and backpropagate until its share of the
//! iteration budget is used up or the deadline passes, then folds the
//! statistics of its root's children into the shared table and tears the
//! tree down.

use std::time::{Duration, Instant};

use crate::constants::TIME_CHECK_MASK;
use crate::mcts::{backpropagate, expand, select, UctParams};
use crate::playout::{simulate, SimRng};
use crate::position::{LeafEvaluator, MoveOrderer, Position};
use crate::stats::SharedStats;
use crate::tree::{Allocation, Tree};

/// Why a worker left its search loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The iteration share was used up
    Budget,
    /// The move time ran out first
    Deadline,
}

/// Summary of one worker run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    /// Completed iterations
    pub iterations: usize,
    /// Nodes in the tree when the loop ended
    pub nodes: usize,
    /// Nodes released by teardown
    pub released: usize,
    /// Children of the root folded into the shared table
    pub folded: usize,
    pub stop: StopReason,
}

/// One worker: a private position plus the collaborators borrowed from the
/// orchestrator.
pub struct Worker<'a, P, O: ?Sized, E: ?Sized> {
    pub id: usize,
    /// Private copy of the position under analysis
    pub pos: P,
    pub orderer: &'a O,
    pub evaluator: &'a E,
    /// Iterations this worker may run
    pub iterations: usize,
    pub params: UctParams,
    pub depth: u8,
    pub shuffling_enabled: bool,
    pub allocation: Allocation,
    /// When the whole search started
    pub started: Instant,
    /// Wall-clock budget measured from `started`
    pub time_limit: Option<Duration>,
}

impl<P, O, E> Worker<'_, P, O, E>
where
    P: Position,
    O: MoveOrderer<P> + ?Sized,
    E: LeafEvaluator<P> + ?Sized,
{
    /// Run the loop, fold into `table`, and release the tree.
    pub fn run(self, table: &SharedStats) -> WorkerReport {
        let mut tree = Tree::new(&self.pos, self.allocation, self.iterations);
        let (iterations, stop) = self.grow(&mut tree);

        let nodes = tree.len();
        let folded = fold(&tree, table);
        let released = tree.teardown();

        log::debug!(
            "worker {}: {} iterations, {} nodes, {} folded, stop {:?} after {:?}",
            self.id,
            iterations,
            nodes,
            folded,
            stop,
            self.started.elapsed()
        );

        WorkerReport {
            id: self.id,
            iterations,
            nodes,
            released,
            folded,
            stop,
        }
    }

    /// The search loop. Returns completed iterations and why it stopped.
    ///
    /// The first iteration always runs so the root gets expanded.
    pub fn grow(&self, tree: &mut Tree<P>) -> (usize, StopReason) {
        let mut rng = SimRng::new(self.shuffling_enabled);
        let mut completed = 0;

        while completed < self.iterations {
            if completed & TIME_CHECK_MASK == 0 && completed > 0 && self.deadline_reached() {
                log::trace!("worker {} hit the deadline at iteration {}", self.id, completed);
                return (completed, StopReason::Deadline);
            }

            let leaf = select(tree, self.params);
            let node = expand(tree, leaf, self.orderer);
            let win = simulate(&tree.get(node).pos, self.evaluator, self.depth, &mut rng);
            backpropagate(tree, node, win);

            completed += 1;
        }

        (completed, StopReason::Budget)
    }

    #[inline]
    fn deadline_reached(&self) -> bool {
        self.time_limit
            .is_some_and(|limit| self.started.elapsed() >= limit)
    }
}

/// Add the counters of every root child into `table` at the child's rank.
///
/// Returns the number of children folded.
pub fn fold<P: Position>(tree: &Tree<P>, table: &SharedStats) -> usize {
    let root = tree.get(tree.root());
    for &child in &root.children {
        let node = tree.get(child);
        table.add(node.rank, node.visits, node.wins);
    }
    root.children.len()
}
