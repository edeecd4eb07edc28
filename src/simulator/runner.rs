//! Simulation runner over the real wave controller.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::warn;

use super::config::SimConfig;
use super::report::SimReport;
use crate::combat::Projectile;
use crate::core::events::NullSink;
use crate::modifiers::{by_id, combined_effects};
use crate::rebirth::{can_rebirth, RebirthState};
use crate::waves::{RunContext, WaveController, WavePhase};

/// Outcome of one simulated run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStats {
    pub final_wave: u32,
    pub waves_cleared: u32,
    pub final_level: u32,
    pub total_kills: u64,
    pub total_xp: u64,
    pub best_streak: u32,
    pub died: bool,
    pub stalled: bool,
    /// Rebirth level the final wave would unlock, if higher than the start.
    pub rebirth_unlocked: Option<u32>,
}

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        let stats = simulate_single_run(config, &mut rng);
        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Wave {}, Level {}, Kills {}, Best Streak {}{}",
                run_idx + 1,
                config.num_runs,
                stats.final_wave,
                stats.final_level,
                stats.total_kills,
                stats.best_streak,
                if stats.died { ", died" } else { "" }
            );
        }
        all_runs.push(stats);
    }

    SimReport::from_runs(all_runs, config.max_waves)
}

/// Plays one run until the player dies, stalls or clears `max_waves`.
pub fn simulate_single_run(config: &SimConfig, rng: &mut impl Rng) -> RunStats {
    let modifiers: Vec<_> = config
        .modifiers
        .iter()
        .filter_map(|id| {
            let found = by_id(id);
            if found.is_none() {
                warn!(modifier = %id, "unknown modifier ignored");
            }
            found
        })
        .collect();
    let rebirth = RebirthState {
        rebirth_level: config.starting_rebirth,
        ..RebirthState::default()
    };
    let ctx = RunContext::new(combined_effects(modifiers.iter().copied()), &rebirth)
        .with_config(&config.arena);

    let mut ctrl = WaveController::new(ctx);
    let mut sink = NullSink;
    let mut now_ms: u64 = 0;
    let mut waves_cleared = 0;
    let mut stalled = false;

    'run: while waves_cleared < config.max_waves {
        if ctrl.start_wave(now_ms, rng, &mut sink).is_none() {
            break;
        }
        ctrl.spawn_all(rng);

        let mut attacks = 0;
        while ctrl.phase() != WavePhase::Complete {
            if ctrl.tick(now_ms, &mut sink).is_some() {
                waves_cleared += 1;
                break;
            }
            if attacks >= config.max_attacks_per_wave {
                stalled = true;
                break 'run;
            }
            attacks += 1;

            let stats = ctrl.stats();
            now_ms += stats.attack_rate_ms as u64;

            let targets = ctrl.active_enemy_ids();
            if let Some(&target) = targets.choose(rng) {
                let projectile = Projectile::new(stats.attack_damage as i64, false);
                ctrl.hit(target, &projectile, now_ms, rng, &mut sink);
            }

            for id in ctrl.active_enemy_ids() {
                let chases = ctrl
                    .enemy(id)
                    .map(|e| !e.behavior.is_stationary())
                    .unwrap_or(false);
                if chases && rng.gen_bool(config.contact_chance.clamp(0.0, 1.0)) {
                    ctrl.contact(id, false, &mut sink);
                }
            }
            if !ctrl.player().is_alive() {
                break 'run;
            }
        }
    }

    let final_wave = ctrl.wave();
    RunStats {
        final_wave,
        waves_cleared,
        final_level: ctrl.progress().level,
        total_kills: ctrl.progress().kills,
        total_xp: ctrl.progress().total_xp,
        best_streak: ctrl.combo().best_streak(),
        died: !ctrl.player().is_alive(),
        stalled,
        rebirth_unlocked: can_rebirth(final_wave, &rebirth).map(|m| m.rebirth),
    }
}
