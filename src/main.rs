use std::process;

use tracing_subscriber::EnvFilter;
use vibe_arena::meta::HighWaveRecord;
use vibe_arena::modifiers::load_active;
use vibe_arena::rebirth::RebirthLedger;
use vibe_arena::utils::build_info::version_string;
use vibe_arena::utils::persistence::JsonDirStore;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let code = match args.get(1).map(String::as_str) {
        Some("serve") => serve(&args[2..]),
        Some("status") => status(),
        Some("--version") | Some("-v") => {
            println!("{}", version_string());
            0
        }
        Some("--help") | Some("-h") | None => {
            print_help();
            0
        }
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Run 'vibe-arena --help' for usage.");
            1
        }
    };
    process::exit(code);
}

fn print_help() {
    println!("Vibe Arena - XP relay and arena progression\n");
    println!("Usage: vibe-arena [command]\n");
    println!("Commands:");
    println!("  serve [--port=N]  Run the XP relay (default port from config, 3001)");
    println!("  status            Show rebirth rank and records");
    println!("  --version         Show version information");
    println!("  --help            Show this help message");
}

/// Accepts `--port=N` and `--port N`.
fn parse_port(args: &[String]) -> Result<Option<u16>, String> {
    let mut port = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let value = if let Some(v) = arg.strip_prefix("--port=") {
            v
        } else if arg == "--port" {
            iter.next().map(String::as_str).unwrap_or("")
        } else {
            return Err(format!("Unknown option: {}", arg));
        };
        port = Some(
            value
                .parse()
                .map_err(|_| format!("Invalid port: {}", value))?,
        );
    }
    Ok(port)
}

#[cfg(feature = "relay")]
fn serve(args: &[String]) -> i32 {
    use std::sync::Arc;
    use vibe_arena::config::ArenaConfig;
    use vibe_arena::relay::{start_relay_server, RelayServer};

    let mut config = ArenaConfig::load();
    match parse_port(args) {
        Ok(Some(port)) => config.relay.port = port,
        Ok(None) => {}
        Err(msg) => {
            eprintln!("{}", msg);
            return 1;
        }
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return 1;
        }
    };

    println!("XP relay on http://localhost:{}", config.relay.port);
    println!("  POST /event, POST /cli/:source, GET /health");
    println!("  Game clients: ws://localhost:{}", config.relay.port);

    let server = Arc::new(RelayServer::new(config.relay));
    match runtime.block_on(start_relay_server(server)) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Relay stopped: {}", e);
            1
        }
    }
}

#[cfg(not(feature = "relay"))]
fn serve(args: &[String]) -> i32 {
    if let Err(msg) = parse_port(args) {
        eprintln!("{}", msg);
    }
    eprintln!("This build has no relay support (enable the `relay` feature).");
    1
}

fn status() -> i32 {
    let store = match JsonDirStore::open_default() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Could not open save directory: {}", e);
            return 1;
        }
    };

    let high_wave = HighWaveRecord::load(&store);
    let modifiers = load_active(&store);
    let ledger = RebirthLedger::open(store);
    let info = ledger.info();

    println!("Rank:           {} (rebirth {})", info.name, info.level);
    println!("Stat bonus:     +{}%", info.all_stats_bonus);
    println!("XP bonus:       +{}%", info.xp_bonus);
    println!("Start weapons:  {}", info.starting_weapons);
    println!("Rebirths:       {}", info.total_rebirths);
    println!("Lifetime kills: {}", info.lifetime_kills);
    println!("Highest wave:   {}", info.highest_wave.max(high_wave.0));
    match info.next_milestone {
        Some(next) => println!("Next rank:      {} at wave {}", next.name, next.wave),
        None => println!("Next rank:      none (max rank)"),
    }
    if !modifiers.is_empty() {
        let names: Vec<&str> = modifiers.iter().map(|m| m.name).collect();
        println!("Run modifiers:  {}", names.join(", "));
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port(&args(&[])), Ok(None));
        assert_eq!(parse_port(&args(&["--port=4000"])), Ok(Some(4000)));
        assert_eq!(parse_port(&args(&["--port", "4001"])), Ok(Some(4001)));
        assert!(parse_port(&args(&["--port=abc"])).is_err());
        assert!(parse_port(&args(&["--port"])).is_err());
        assert!(parse_port(&args(&["--verbose"])).is_err());
    }
}
