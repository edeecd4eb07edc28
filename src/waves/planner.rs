//! Spawn pool construction, boss selection and health scaling.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{get_enemy, BossSpec, EnemyBehavior, BOSS_TYPES, ENEMY_TYPES};
use crate::combat::EnemyInstance;
use crate::core::constants::*;

/// Every type unlocked by `wave`, repeated by spawn weight, in catalog order.
///
/// Negative waves unlock nothing.
pub fn build_spawn_pool(wave: i64) -> Vec<&'static str> {
    let mut pool = Vec::new();
    for spec in ENEMY_TYPES {
        if (spec.wave_min as i64) <= wave {
            for _ in 0..spec.spawn_weight.max(1) {
                pool.push(spec.type_id);
            }
        }
    }
    pool
}

/// Highest boss tier whose threshold is at most `wave`; the first tier below that.
pub fn select_boss(wave: u32) -> &'static BossSpec {
    BOSS_TYPES
        .iter()
        .rev()
        .find(|b| b.wave_threshold <= wave)
        .unwrap_or(&BOSS_TYPES[0])
}

pub fn boss_health_scale(wave: u32) -> f64 {
    1.0 + (wave / BOSS_WAVE_INTERVAL as u32) as f64 * BOSS_HEALTH_SCALE_STEP
}

pub fn mini_boss_health_scale(wave: u32) -> f64 {
    1.0 + (wave / BOSS_WAVE_INTERVAL as u32) as f64 * MINI_BOSS_HEALTH_SCALE_STEP
}

/// `1 + min(level * 0.05, 2)`, so at most 3x.
pub fn enemy_health_scale(player_level: u32) -> f64 {
    1.0 + (player_level as f64 * ENEMY_HEALTH_SCALE_PER_LEVEL).min(ENEMY_HEALTH_SCALE_CAP)
}

pub fn spawn_count(base_per_wave: u32, wave: u32) -> u32 {
    base_per_wave
        .saturating_add(wave.saturating_mul(SPAWN_PER_WAVE_STEP))
        .min(MAX_SPAWN_PER_WAVE)
}

/// Draws enemies for a wave; caches the pool of the last wave asked for.
#[derive(Debug, Clone, Default)]
pub struct SpawnPlanner {
    cached_wave: Option<i64>,
    pool: Vec<&'static str>,
}

impl SpawnPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(&mut self, wave: i64) -> &[&'static str] {
        if self.cached_wave != Some(wave) {
            self.pool = build_spawn_pool(wave);
            self.cached_wave = Some(wave);
        }
        &self.pool
    }

    /// Uniform draw from the weighted pool. `None` when nothing is unlocked.
    pub fn pick_enemy(&mut self, wave: i64, rng: &mut impl Rng) -> Option<&'static str> {
        self.pool(wave).choose(rng).copied()
    }

    /// Builds a regular enemy scaled by player level and any extra multiplier.
    pub fn spawn_enemy(
        &self,
        type_id: &str,
        player_level: u32,
        health_mult: f64,
    ) -> Option<EnemyInstance> {
        let spec = get_enemy(type_id)?;
        Some(EnemyInstance::from_spec(
            spec,
            enemy_health_scale(player_level) * health_mult,
        ))
    }

    pub fn spawn_boss(&self, wave: u32) -> EnemyInstance {
        EnemyInstance::from_boss(select_boss(wave), boss_health_scale(wave))
    }

    /// An elite copy of a random non-decoy type from the wave's pool.
    pub fn spawn_mini_boss(&mut self, wave: u32, rng: &mut impl Rng) -> Option<EnemyInstance> {
        let candidates: Vec<&'static str> = self
            .pool(wave as i64)
            .iter()
            .copied()
            .filter(|id| get_enemy(id).is_some_and(|e| e.behavior != EnemyBehavior::Fake))
            .collect();
        let type_id = candidates.choose(rng)?;
        let spec = get_enemy(type_id)?;
        let mut enemy = EnemyInstance::from_spec(
            spec,
            mini_boss_health_scale(wave) * MINI_BOSS_HEALTH_MULT,
        );
        enemy.can_split = false;
        Some(enemy)
    }
}
