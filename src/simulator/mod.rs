//! Headless Monte Carlo runs for wave balance.
//!
//! Each run drives a real [`WaveController`](crate::waves::WaveController)
//! with a seeded RNG; the player is reduced to "shoot a random enemy every
//! attack interval, get touched now and then".

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::SimReport;
pub use runner::{run_simulation, simulate_single_run, RunStats};
