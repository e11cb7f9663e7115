//! Command-line perft runner.
//!
//! Usage:
//! `cargo run --release --bin perft -- --depth 5`
//! `cargo run --release --bin perft -- --depth 3 --divide --fen "<fen>"`
//! `cargo run --release --bin perft -- --depth 4 --detailed`

use std::time::Instant;

use ironfin::context::EngineContext;
use ironfin::errors::ChessError;
use ironfin::game_state::game_state::GameState;
use ironfin::move_generation::move_generator::MoveGenerator;
use ironfin::move_generation::perft::{perft, perft_detailed, perft_divide};

fn parse_arg_u8(args: &[String], flag: &str, default: u8) -> u8 {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            if let Ok(v) = args[i + 1].parse::<u8>() {
                return v;
            }
        }
    }
    default
}

fn parse_arg_str<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn main() -> Result<(), ChessError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let depth = parse_arg_u8(&args, "--depth", 5);
    let divide = args.iter().any(|a| a == "--divide");
    let detailed = args.iter().any(|a| a == "--detailed");

    let mut game = match parse_arg_str(&args, "--fen") {
        Some(fen) => GameState::from_fen(fen)?,
        None => GameState::new_game(),
    };

    let context = EngineContext::new();
    if !game.validate(&context.attacks) {
        return Err(ChessError::InvalidFen(format!(
            "position fails sanity checks: '{}'",
            game.get_fen()
        )));
    }
    let generator = MoveGenerator::new(&context.attacks);
    println!("perft depth={depth} fen={}", game.get_fen());

    let start = Instant::now();
    let nodes = if divide {
        let rows = perft_divide(&generator, &mut game, depth)?;
        for (mv, count) in &rows {
            println!("{mv}: {count}");
        }
        rows.iter().map(|(_, count)| count).sum::<u64>()
    } else if detailed {
        let counts = perft_detailed(&generator, &mut game, depth)?;
        println!(
            "captures={} en_passant={} castles={} promotions={} checks={}",
            counts.captures, counts.en_passant, counts.castles, counts.promotions, counts.checks
        );
        counts.nodes
    } else {
        perft(&generator, &mut game, depth)?
    };

    let elapsed = start.elapsed();
    let nps = (nodes as f64 / elapsed.as_secs_f64().max(1e-9)) as u64;
    println!(
        "nodes={nodes} elapsed_ms={} nps={nps}",
        elapsed.as_millis()
    );
    Ok(())
}
