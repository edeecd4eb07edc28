//! Simulation configuration.

use crate::config::ArenaConfig;

/// Configuration for a batch of simulated runs.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// A run stops after clearing this wave
    pub max_waves: u32,

    /// Rebirth level the simulated player starts at
    pub starting_rebirth: u32,

    /// Run modifier ids active for every run
    pub modifiers: Vec<String>,

    /// Chance per attack that each chasing enemy reaches the player
    pub contact_chance: f64,

    /// Attacks allowed per wave before the run counts as stalled
    pub max_attacks_per_wave: u32,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,

    /// Arena tuning (spawn base, combo window) every run uses
    pub arena: ArenaConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 500,
            seed: None,
            max_waves: 300,
            starting_rebirth: 0,
            modifiers: Vec::new(),
            contact_chance: 0.02,
            max_attacks_per_wave: 20_000,
            verbosity: 1,
            arena: ArenaConfig::default(),
        }
    }
}

impl SimConfig {
    /// Short batch for a quick balance check.
    pub fn quick() -> Self {
        Self {
            num_runs: 50,
            max_waves: 60,
            ..Default::default()
        }
    }

    /// Starts every run at `rebirth` to compare prestige tiers.
    pub fn rebirth_test(rebirth: u32) -> Self {
        Self {
            num_runs: 200,
            starting_rebirth: rebirth.min(5),
            ..Default::default()
        }
    }

    /// Runs with the given modifiers active.
    pub fn modifier_test(ids: &[&str]) -> Self {
        Self {
            num_runs: 200,
            modifiers: ids.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }
}
