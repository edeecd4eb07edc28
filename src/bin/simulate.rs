//! Wave balance simulator CLI.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                        # Default: 500 runs, wave cap 300
//!   cargo run --bin simulate -- -n 100 -w 60        # 100 runs up to wave 60
//!   cargo run --bin simulate -- --seed 42           # Reproducible run
//!   cargo run --bin simulate -- --mod glass_cannon  # With a run modifier

use std::env;
use tracing_subscriber::EnvFilter;
use vibe_arena::config::ArenaConfig;
use vibe_arena::simulator::{run_simulation, SimConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config = parse_args(&args);
    config.arena = ArenaConfig::load();

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              VIBE ARENA BALANCE SIMULATOR                     ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Wave Cap:       {}", config.max_waves);
    println!("  Contact Chance: {:.3}", config.contact_chance);
    println!("  Spawn Base:     {}", config.arena.base_spawn_per_wave);
    println!("  Combo Window:   {}ms", config.arena.combo_decay_ms);
    if config.starting_rebirth > 0 {
        println!("  Starting at:    Rebirth {}", config.starting_rebirth);
    }
    if !config.modifiers.is_empty() {
        println!("  Modifiers:      {}", config.modifiers.join(", "));
    }
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config);
    println!("{}", report.to_text());

    if args.iter().any(|a| a == "--json") {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, report.to_json()) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => {
                eprintln!("Failed to write JSON report: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn parse_args(args: &[String]) -> SimConfig {
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "-w" | "--waves" => {
                if i + 1 < args.len() {
                    config.max_waves = args[i + 1].parse().unwrap_or(300);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-c" | "--contact" => {
                if i + 1 < args.len() {
                    config.contact_chance = args[i + 1].parse().unwrap_or(0.02);
                    i += 1;
                }
            }
            "--rebirth" => {
                if i + 1 < args.len() {
                    if let Ok(level) = args[i + 1].parse::<u32>() {
                        config.starting_rebirth = level.min(5);
                        i += 1;
                    }
                }
            }
            "--mod" => {
                if i + 1 < args.len() {
                    config.modifiers.push(args[i + 1].clone());
                    i += 1;
                }
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--quick" => {
                config = SimConfig::quick();
            }
            "--rebirth-test" => {
                if i + 1 < args.len() {
                    config = SimConfig::rebirth_test(args[i + 1].parse().unwrap_or(1));
                    i += 1;
                }
            }
            "--modifier-test" => {
                if i + 1 < args.len() {
                    let ids: Vec<&str> = args[i + 1].split(',').collect();
                    config = SimConfig::modifier_test(&ids);
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn print_help() {
    println!("Vibe Arena Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>      Number of simulation runs (default: 500)");
    println!("    -w, --waves <W>     Stop a run after clearing wave W (default: 300)");
    println!("    -s, --seed <S>      Random seed for reproducibility");
    println!("    -c, --contact <P>   Per-attack contact chance per enemy (default: 0.02)");
    println!("    --rebirth <R>       Start every run at rebirth level R");
    println!("    --mod <ID>          Activate a run modifier (repeatable)");
    println!("    -v, --verbose       Per-run output");
    println!("    --json              Save JSON report");
    println!("    --quick             Quick check (50 runs up to wave 60)");
    println!("    --rebirth-test <R>  200 runs starting at rebirth level R");
    println!("    --modifier-test <IDS>  200 runs with comma-separated modifiers");
    println!("    -h, --help          Show this help");
}
