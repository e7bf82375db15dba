//! Connect6 self-play driver
//!
//! Two independent engines play one game against each other through
//! `decide_move`, each seeing only the other's moves. The board is printed
//! after every turn.
//!
//! `RUST_LOG=connect6=debug` shows each engine's reasoning.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use connect6::board::Move;
use connect6::rules::{check_winner, find_six_positions};
use connect6::{Engine, EngineConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Connect6 engine self-play", long_about = None)]
struct Args {
    /// Time budget per turn in milliseconds (budgets scale with it)
    #[arg(short, long, default_value_t = 2_000)]
    time_ms: u64,

    /// JSON config file; overrides --time-ms
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many turns
    #[arg(short, long, default_value_t = 100)]
    max_turns: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::with_time_limit(args.time_ms),
    };

    let mut white = Engine::with_config(config.clone())?;
    let mut black = Engine::with_config(config)?;
    println!("{}", white.position().board());

    let mut last: Option<Move> = None;
    for turn in 0..args.max_turns {
        let (name, engine) = if turn % 2 == 0 {
            ("White", &mut white)
        } else {
            ("Black", &mut black)
        };
        let result = engine.decide_move_with_stats(last)?;
        println!(
            "{:>3}. {} {} ({:?}, {} ms)",
            turn + 1,
            name,
            result.best_move,
            result.search_type,
            result.time_ms
        );
        println!("{}", engine.position().board());

        let board = engine.position().board();
        if let Some(winner) = check_winner(board) {
            let line = find_six_positions(board, winner).unwrap_or_default();
            let cells: Vec<String> = line.iter().map(|p| p.to_string()).collect();
            println!("{:?} wins with {}", winner, cells.join(" "));
            return Ok(());
        }
        if engine.position().is_full() {
            println!("Board full: draw");
            return Ok(());
        }
        last = Some(result.best_move);
    }

    println!("Stopped after {} turns", args.max_turns);
    Ok(())
}
