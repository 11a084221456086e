// Standalone replay tool for move journals
//
// Usage:
//   cargo run --bin replay -- <journal_file> [options]
//
// Options:
//   --round <N>            Replay only round N (0-based)
//   --verbose              Log every replayed move
//   --config <path>        Path to Xings.toml (default: Xings.toml)

use std::env;
use std::process;

use rtree_player::config::Config;
use rtree_player::replay::ReplayEngine;

fn print_usage() {
    eprintln!("Crossing Player Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <journal_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --round <N>             Replay only round N (0-based)");
    eprintln!("  --verbose               Log every replayed move");
    eprintln!("  --config <path>         Path to Xings.toml (default: Xings.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay every round of a journal");
    eprintln!("  replay journal/alice-20260101T120000.000.jsonl");
    eprintln!();
    eprintln!("  # Verbose replay of the second round");
    eprintln!("  replay journal/alice-20260101T120000.000.jsonl --round 1 --verbose");
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let journal_file = &args[1];
    let mut config_path = "Xings.toml".to_string();
    let mut verbose = false;
    let mut only_round: Option<usize> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--round" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Error: --round requires an argument");
                    process::exit(1);
                };
                only_round = match value.parse::<usize>() {
                    Ok(n) => Some(n),
                    Err(e) => {
                        eprintln!("Error: invalid round '{}': {}", value, e);
                        process::exit(1);
                    }
                };
                i += 1;
            }
            "--config" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Error: --config requires an argument");
                    process::exit(1);
                };
                config_path = value.clone();
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Replay journal: {}", journal_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_journal(journal_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading journal: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Journal is empty");
        process::exit(1);
    }

    let mut rounds = match engine.group_rounds(&entries) {
        Ok(rounds) => rounds,
        Err(e) => {
            eprintln!("Error reading journal: {}", e);
            process::exit(1);
        }
    };

    if let Some(n) = only_round {
        if n >= rounds.len() {
            eprintln!("Error: journal has only {} round(s)", rounds.len());
            process::exit(1);
        }
        rounds = vec![rounds.swap_remove(n)];
    }

    println!("Replaying {} round(s)...", rounds.len());
    let results = engine.replay_all(&rounds);
    engine.print_report(&results);

    let stats = engine.generate_stats(&results);
    if stats.illegal_moves > 0 {
        eprintln!("✗ {} illegal move(s) found", stats.illegal_moves);
        process::exit(2);
    }
    println!("✓ All moves legal");
}
