// Self-play driver: two players place a random cycle against each other, once in each role
//
// Usage:
//   rtree-player [--vertices N] [--width W] [--height H] [--seed S] [--config <path>]

use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::process;
use std::sync::Arc;

use rtree_player::config::Config;
use rtree_player::scheduler::Player;
use rtree_player::self_play::{self, RoundSummary};
use rtree_player::types::Graph;

struct Options {
    vertices: usize,
    width: i32,
    height: i32,
    seed: u64,
    config_path: Option<String>,
}

fn print_usage() {
    eprintln!("USAGE:");
    eprintln!("  rtree-player [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --vertices <N>          Vertices of the random cycle (default: 50)");
    eprintln!("  --width <W>             Canvas width (default: 100)");
    eprintln!("  --height <H>            Canvas height (default: 100)");
    eprintln!("  --seed <S>              Seed for graph and players (default: 42)");
    eprintln!("  --config <path>         Path to Xings.toml (default: Xings.toml)");
    eprintln!("  --help                  Show this help message");
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    let raw = args
        .get(i + 1)
        .ok_or_else(|| format!("{} requires an argument", args[i]))?;
    raw.parse::<T>()
        .map_err(|e| format!("invalid value '{}' for {}: {}", raw, args[i], e))
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        vertices: 50,
        width: 100,
        height: 100,
        seed: 42,
        config_path: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--vertices" => options.vertices = parse_value(args, i)?,
            "--width" => options.width = parse_value(args, i)?,
            "--height" => options.height = parse_value(args, i)?,
            "--seed" => options.seed = parse_value(args, i)?,
            "--config" => options.config_path = Some(parse_value(args, i)?),
            other => return Err(format!("unknown option '{}'", other)),
        }
        i += 2;
    }

    if options.width <= 0 || options.height <= 0 {
        return Err("canvas dimensions must be positive".to_string());
    }
    Ok(options)
}

fn print_summary(summary: &RoundSummary) {
    println!(
        "{} (max) vs {} (min): {} moves, complete: {}, ~{} crossings, thinking {:.2?} / {:.2?}",
        summary.max_player,
        summary.min_player,
        summary.moves.len(),
        summary.completed,
        summary.estimated_crossings,
        summary.max_thinking,
        summary.min_thinking
    );
}

fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(0);
    }
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(1);
        }
    };

    let config = match &options.config_path {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| {
            eprintln!("Warning: Could not load config from '{}': {}", path, e);
            Config::default_hardcoded()
        }),
        None => Config::load_or_default(),
    };

    let mut rng = StdRng::seed_from_u64(options.seed);
    let graph = Arc::new(Graph::random_cycle(options.vertices, &mut rng));
    info!(
        "Self-play on a {}-vertex cycle, {}x{} canvas, seed {}",
        options.vertices, options.width, options.height, options.seed
    );

    let players = Player::new("alice", config.clone(), options.seed)
        .and_then(|a| Player::new("bob", config, options.seed.wrapping_add(1)).map(|b| (a, b)));
    let (mut alice, mut bob) = match players {
        Ok(pair) => pair,
        Err(e) => {
            error!("Failed to create players: {}", e);
            process::exit(1);
        }
    };

    let mut summaries = Vec::with_capacity(2);
    for alice_maximizes in [true, false] {
        let (max_player, min_player) = if alice_maximizes {
            (&mut alice, &mut bob)
        } else {
            (&mut bob, &mut alice)
        };
        match self_play::play_round(
            max_player,
            min_player,
            Arc::clone(&graph),
            options.width,
            options.height,
        ) {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                error!("Round {} aborted: {}", summaries.len(), e);
                process::exit(1);
            }
        }
    }

    println!();
    for summary in &summaries {
        print_summary(summary);
    }
}
