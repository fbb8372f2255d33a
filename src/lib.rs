//! Tactical MCTS: parallel Monte Carlo Tree Search with alpha-beta leaves.
//!
//! The search grows one UCT tree per hardware thread. Instead of random
//! playouts, every newly expanded node is judged by a shallow alpha-beta
//! search. When the budget runs out, each worker folds the statistics of its
//! root's children into a shared rank-indexed table, and the most visited
//! move is played.
//!
//! The search is generic over the game through three traits in
//! [`position`]. A complete noughts and crosses implementation is included
//! to run it end to end.
//!
//! ## Modules
//!
//! - [`constants`] - Evaluation range and search parameters
//! - [`position`] - Position, move orderer and leaf evaluator contracts
//! - [`config`] - Search configuration and budget derivation
//! - [`tree`] - Arena-allocated search tree
//! - [`mcts`] - Selection, expansion and backpropagation
//! - [`playout`] - Leaf simulation through the alpha-beta evaluator
//! - [`stats`] - Shared statistics table
//! - [`worker`] - Per-thread search loop
//! - [`search`] - Orchestration across workers
//! - [`board`], [`movegen`], [`alphabeta`] - Noughts and crosses
//!
//! ## Example
//!
//! ```
//! use tactical_mcts::alphabeta::AlphaBeta;
//! use tactical_mcts::board::Board;
//! use tactical_mcts::config::SearchConfig;
//! use tactical_mcts::movegen::HeuristicOrderer;
//! use tactical_mcts::search::Searcher;
//!
//! let config = SearchConfig { skill_level: 1, threads: Some(2), ..Default::default() };
//! let searcher = Searcher::new(HeuristicOrderer, AlphaBeta::default(), config);
//!
//! let pos: Board = "XO./.X./...".parse().unwrap();
//! let result = searcher.search(&pos);
//! println!("best move: {:?}, value {}", result.best_move, result.value);
//! ```

pub mod alphabeta;
pub mod board;
pub mod config;
pub mod constants;
pub mod mcts;
pub mod movegen;
pub mod playout;
pub mod position;
pub mod search;
pub mod stats;
pub mod tree;
pub mod worker;
