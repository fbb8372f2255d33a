//! Tactical MCTS command line.
//!
//! ## Usage
//!
//! - `tactical-mcts` - Self-play a game of noughts and crosses
//! - `tactical-mcts play` - Same as above
//! - `tactical-mcts analyze XO./.X./...` - Search one position and print
//!   the per-move statistics

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flexi_logger::{Logger, opt_format};

use tactical_mcts::alphabeta::AlphaBeta;
use tactical_mcts::board::{Board, Square};
use tactical_mcts::config::SearchConfig;
use tactical_mcts::movegen::HeuristicOrderer;
use tactical_mcts::position::Position;
use tactical_mcts::search::{SearchResult, Searcher};

/// Tactical MCTS: parallel UCT search with alpha-beta leaf evaluation
#[derive(Parser)]
#[command(name = "tactical-mcts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Skill level; scales the iteration budget
    #[arg(long, default_value_t = tactical_mcts::constants::DEFAULT_SKILL_LEVEL, global = true)]
    skill: u32,

    /// Seconds per move (0 = unlimited)
    #[arg(long, default_value_t = 0.0, global = true)]
    move_time: f64,

    /// Seed every simulation identically
    #[arg(long, global = true)]
    no_shuffle: bool,

    /// Worker threads (defaults to the available parallelism)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Let the engine play both sides of a game
    Play,
    /// Search one position given as nine cells (X, O or .), '/' optional
    Analyze {
        board: String,
    },
}

impl Cli {
    fn search_config(&self) -> Result<SearchConfig> {
        let config = SearchConfig {
            skill_level: self.skill,
            shuffling_enabled: !self.no_shuffle,
            threads: self.threads,
            ..Default::default()
        }
        .with_move_time_secs(self.move_time)?;
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _logger = Logger::try_with_env_or_str(&cli.log_level)
        .context("invalid log specification")?
        .log_to_stderr()
        .format(opt_format)
        .start()
        .context("failed to start logger")?;

    let config = cli.search_config().context("invalid search options")?;
    let searcher = Searcher::new(HeuristicOrderer, AlphaBeta::default(), config);

    match cli.command {
        Some(Commands::Analyze { board }) => {
            let pos: Board = board
                .parse()
                .with_context(|| format!("cannot parse board '{board}'"))?;
            run_analysis(&searcher, &pos);
        }
        Some(Commands::Play) | None => run_self_play(&searcher),
    }

    Ok(())
}

fn run_self_play(searcher: &Searcher<HeuristicOrderer, AlphaBeta>) {
    let mut board = Board::new();
    println!("{board}\n");

    while !board.is_terminal() {
        let side = board.side_to_move();
        let result = searcher.search(&board);
        let Some(mv) = result.best_move else {
            break;
        };
        board.apply(mv);
        println!(
            "{side} plays {mv} (value {}, win rate {:.1}%, {} iterations)",
            result.value,
            result.win_rate * 100.0,
            result.iterations
        );
        println!("{board}\n");
    }

    match board.winner() {
        Some(color) => println!("{color} wins"),
        None => println!("draw"),
    }
}

fn run_analysis(searcher: &Searcher<HeuristicOrderer, AlphaBeta>, pos: &Board) {
    println!("{pos}\n");
    let result = searcher.search(pos);
    print_statistics(&result);
}

fn print_statistics(result: &SearchResult<Square>) {
    println!("move  win rate     wins   visits");
    for s in &result.stats {
        println!(
            "{:<4}  {:>8.3} {:>8} {:>8}",
            s.mv.to_string(),
            s.win_rate(),
            s.wins,
            s.visits
        );
    }
    match result.best_move {
        Some(mv) => println!(
            "\nbest move {mv}: win score {:.3}, value {} ({} workers, {} iterations{})",
            result.win_rate,
            result.value,
            result.workers,
            result.iterations,
            if result.timed_out { ", stopped on time" } else { "" }
        ),
        None => println!("\nno legal move, value {}", result.value),
    }
}
