//! Per-wave state machine and the enemy arena it owns.
//!
//! A wave moves `Spawning -> Active -> Clearing -> Complete`. The controller
//! owns every live `EnemyInstance`, so hits on one enemy are applied one at a
//! time and a death is processed exactly once.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::planner::{spawn_count, SpawnPlanner};
use crate::combat::{
    resolve_hit, resolve_player_contact, ContactOutcome, EnemyInstance, HitOutcome, PlayerVitals,
    Projectile, XpMultipliers,
};
use crate::combo::ComboTracker;
use crate::config::ArenaConfig;
use crate::core::constants::*;
use crate::core::events::{EventSink, GameEvent, XpGrant};
use crate::core::progression::{crit_chance, player_stats, PlayerProgress, PlayerStats, StatBonuses};
use crate::core::spatial::SpatialIndex;
use crate::modifiers::CombinedEffects;
use crate::rebirth::RebirthState;
use crate::world_events::WorldEventManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WavePhase {
    Spawning,
    Active,
    Clearing,
    Complete,
}

/// Waves 21, 41, 61, ... pay boss-wave completion XP. Wave 1 does not.
pub fn is_boss_wave(wave: u32) -> bool {
    wave > 1 && (wave - 1) % BOSS_WAVE_INTERVAL as u32 == 0
}

/// Bosses enter on waves 20, 40, 60, ...
pub fn spawns_boss(wave: u32) -> bool {
    wave > 0 && wave % BOSS_WAVE_INTERVAL as u32 == 0
}

/// Mini-bosses enter on multiples of ten that are not boss entries.
pub fn spawns_mini_boss(wave: u32) -> bool {
    wave > 0 && wave % 10 == 0 && !spawns_boss(wave)
}

/// `floor(wave * (boss ? 100 : 25) * event * modifier)`.
pub fn wave_complete_xp(wave: u32, event_mult: f64, mod_mult: f64) -> u64 {
    let per_wave = if is_boss_wave(wave) {
        BOSS_WAVE_XP_PER_WAVE
    } else {
        NORMAL_WAVE_XP_PER_WAVE
    };
    (wave as f64 * per_wave * event_mult * mod_mult).floor().max(0.0) as u64
}

/// Inputs fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunContext {
    pub effects: CombinedEffects,
    pub rebirth_xp_multiplier: f64,
    pub rebirth_all_stats_multiplier: f64,
    /// Crit upgrade bonus (1.0 = none).
    pub crit_bonus: f64,
    pub base_spawn_per_wave: u32,
    pub combo_decay_ms: u64,
    pub spatial_cell_size: f64,
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            effects: CombinedEffects::default(),
            rebirth_xp_multiplier: 1.0,
            rebirth_all_stats_multiplier: 1.0,
            crit_bonus: 1.0,
            base_spawn_per_wave: DEFAULT_BASE_SPAWN_PER_WAVE,
            combo_decay_ms: COMBO_DECAY_MS,
            spatial_cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl RunContext {
    pub fn new(effects: CombinedEffects, rebirth: &RebirthState) -> Self {
        Self {
            effects,
            rebirth_xp_multiplier: rebirth.xp_multiplier(),
            rebirth_all_stats_multiplier: rebirth.all_stats_multiplier(),
            ..Self::default()
        }
    }

    /// Takes the arena tuning (spawn base, combo window, grid cell) from
    /// `config`.
    pub fn with_config(self, config: &ArenaConfig) -> Self {
        Self {
            base_spawn_per_wave: config.base_spawn_per_wave,
            combo_decay_ms: config.combo_decay_ms,
            spatial_cell_size: config.spatial_cell_size,
            ..self
        }
    }

    pub fn stat_bonuses(&self) -> StatBonuses {
        StatBonuses {
            rebirth: self.rebirth_all_stats_multiplier,
            mod_damage: self.effects.damage_multiplier,
            mod_health: self.effects.health_multiplier,
            ..StatBonuses::default()
        }
    }
}

/// What a finished wave paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaveSummary {
    pub wave: u32,
    pub xp_awarded: u64,
    pub was_boss_wave: bool,
    pub kills: u32,
}

#[derive(Debug, Clone)]
pub struct WaveController {
    ctx: RunContext,
    wave: u32,
    phase: WavePhase,
    planner: SpawnPlanner,
    arena: Vec<EnemyInstance>,
    next_id: u64,
    spawn_target: u32,
    issued: u32,
    wave_kills: u32,
    combo: ComboTracker,
    world: WorldEventManager,
    progress: PlayerProgress,
    player: PlayerVitals,
}

impl WaveController {
    pub fn new(ctx: RunContext) -> Self {
        let progress = PlayerProgress::new();
        let stats = player_stats(progress.level, &ctx.stat_bonuses());
        Self {
            ctx,
            wave: 0,
            phase: WavePhase::Complete,
            planner: SpawnPlanner::new(),
            arena: Vec::new(),
            next_id: 1,
            spawn_target: 0,
            issued: 0,
            wave_kills: 0,
            combo: ComboTracker::new(ctx.combo_decay_ms),
            world: WorldEventManager::new(),
            progress,
            player: PlayerVitals::new(stats.max_health as i64),
        }
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    pub fn enemies(&self) -> &[EnemyInstance] {
        &self.arena
    }

    pub fn enemy(&self, id: u64) -> Option<&EnemyInstance> {
        self.arena.iter().find(|e| e.id == id)
    }

    pub fn active_enemy_ids(&self) -> Vec<u64> {
        self.arena.iter().filter(|e| e.active).map(|e| e.id).collect()
    }

    pub fn active_count(&self) -> usize {
        self.arena.iter().filter(|e| e.active).count()
    }

    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    pub fn player(&self) -> &PlayerVitals {
        &self.player
    }

    pub fn combo(&self) -> &ComboTracker {
        &self.combo
    }

    pub fn world_events(&self) -> &WorldEventManager {
        &self.world
    }

    pub fn world_events_mut(&mut self) -> &mut WorldEventManager {
        &mut self.world
    }

    /// Empty proximity grid sized for this run. The presentation layer
    /// fills it with enemy snapshots each tick.
    pub fn spatial_index(&self) -> SpatialIndex {
        SpatialIndex::new(self.ctx.spatial_cell_size)
    }

    pub fn stats(&self) -> PlayerStats {
        player_stats(self.progress.level, &self.ctx.stat_bonuses())
    }

    pub fn crit_chance(&self) -> f64 {
        crit_chance(self.ctx.crit_bonus)
    }

    /// Enemy speed with the running world event applied.
    pub fn enemy_speed(&self, id: u64) -> Option<f64> {
        let mod_speed = self.world.active_effects().enemy_speed_mod;
        self.enemy(id).map(|e| e.speed * mod_speed)
    }

    pub fn xp_multipliers(&self) -> XpMultipliers {
        XpMultipliers::new(
            self.world.active_effects().xp_multiplier,
            self.ctx.effects.xp_mult,
        )
    }

    /// Number of regular enemies the current wave issues.
    pub fn spawn_target(&self) -> u32 {
        self.spawn_target
    }

    /// Places an enemy in the arena and returns its id.
    pub fn add_enemy(&mut self, mut enemy: EnemyInstance) -> u64 {
        enemy.id = self.next_id;
        self.next_id += 1;
        let id = enemy.id;
        self.arena.push(enemy);
        id
    }

    /// Begins the next wave. Only valid once the previous wave is complete.
    pub fn start_wave(
        &mut self,
        now_ms: u64,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Option<u32> {
        if self.phase != WavePhase::Complete {
            return None;
        }

        self.arena.retain(|e| e.active);
        self.wave += 1;
        self.phase = WavePhase::Spawning;
        self.issued = 0;
        self.wave_kills = 0;
        self.spawn_target = (spawn_count(self.ctx.base_spawn_per_wave, self.wave) as f64
            * self.ctx.effects.enemy_count_mult)
            .floor() as u32;

        if let Some(event) = self.world.try_trigger(self.wave, now_ms, rng) {
            sink.emit(GameEvent::WorldEventStarted { id: event.id });
        }

        if spawns_boss(self.wave) {
            let boss = self.planner.spawn_boss(self.wave);
            let (type_id, health) = (boss.type_id, boss.health);
            self.add_enemy(boss);
            sink.emit(GameEvent::BossSpawned { type_id, health });
            info!(wave = self.wave, boss = type_id, health, "boss spawned");
        } else if spawns_mini_boss(self.wave) {
            if let Some(mini) = self.planner.spawn_mini_boss(self.wave, rng) {
                debug!(wave = self.wave, kind = mini.type_id, "mini-boss spawned");
                self.add_enemy(mini);
            }
        }

        debug!(wave = self.wave, target = self.spawn_target, "wave started");
        Some(self.wave)
    }

    /// Issues one regular enemy. Moves to `Active` when the target is met or
    /// the pool is empty.
    pub fn spawn_next(&mut self, rng: &mut impl Rng) -> Option<u64> {
        if self.phase != WavePhase::Spawning {
            return None;
        }
        if self.issued >= self.spawn_target {
            self.phase = WavePhase::Active;
            return None;
        }

        let enemy = self
            .planner
            .pick_enemy(self.wave as i64, rng)
            .and_then(|type_id| self.planner.spawn_enemy(type_id, self.progress.level, 1.0));
        let Some(enemy) = enemy else {
            self.phase = WavePhase::Active;
            return None;
        };

        let id = self.add_enemy(enemy);
        self.issued += 1;
        if self.issued >= self.spawn_target {
            self.phase = WavePhase::Active;
        }
        Some(id)
    }

    /// Issues every remaining enemy for the wave.
    pub fn spawn_all(&mut self, rng: &mut impl Rng) -> usize {
        let mut spawned = 0;
        while self.phase == WavePhase::Spawning {
            if self.spawn_next(rng).is_some() {
                spawned += 1;
            }
        }
        spawned
    }

    /// Applies a projectile hit to enemy `id` and processes the kill, if any.
    ///
    /// Split children are placed in the arena; the returned outcome carries
    /// them with their assigned ids.
    pub fn hit(
        &mut self,
        id: u64,
        projectile: &Projectile,
        now_ms: u64,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Option<HitOutcome> {
        let crit = self.crit_chance();
        let xp = self.xp_multipliers();
        let enemy = self.arena.iter_mut().find(|e| e.id == id)?;
        let type_id = enemy.type_id;

        let mut outcome = resolve_hit(projectile, enemy, crit, xp, rng);
        if outcome.damage_dealt > 0 {
            sink.emit(GameEvent::Damage {
                enemy_id: id,
                amount: outcome.damage_dealt,
                is_crit: outcome.is_crit,
            });
        }
        if !outcome.killed {
            return Some(outcome);
        }

        sink.emit(GameEvent::Kill {
            enemy_id: id,
            type_id,
            xp_awarded: outcome.xp_awarded,
        });
        self.wave_kills += 1;
        self.progress.kills += 1;
        self.combo.register_kill_with(now_ms, sink);
        self.credit_xp(outcome.xp_awarded as f64, sink);

        if !outcome.split_children.is_empty() {
            for child in outcome.split_children.iter_mut() {
                child.id = self.add_enemy(child.clone());
            }
            sink.emit(GameEvent::EnemySplit {
                parent_id: id,
                children: outcome.split_children.len(),
            });
        }

        Some(outcome)
    }

    /// Applies enemy `id` touching the player.
    pub fn contact(
        &mut self,
        id: u64,
        invincible: bool,
        sink: &mut dyn EventSink,
    ) -> Option<ContactOutcome> {
        let vampiric = self.ctx.effects.vampiric_enemies;
        let enemy = self.arena.iter_mut().find(|e| e.id == id && e.active)?;
        let was_alive = self.player.is_alive();

        let outcome = resolve_player_contact(&mut self.player, enemy, invincible, vampiric);
        if outcome.damage_taken > 0 {
            sink.emit(GameEvent::PlayerHit {
                damage: outcome.damage_taken,
                enemy_healed: outcome.enemy_healed,
            });
        }
        if was_alive && outcome.player_died {
            sink.emit(GameEvent::PlayerDied);
            self.combo.reset();
            if let Some(event) = self.world.end() {
                sink.emit(GameEvent::WorldEventEnded { id: event.id });
            }
            info!(wave = self.wave, level = self.progress.level, "player died");
        }
        Some(outcome)
    }

    /// Credits XP from outside the arena.
    pub fn apply_xp_grant(&mut self, grant: &XpGrant, sink: &mut dyn EventSink) -> u64 {
        debug!(source = %grant.source_label, amount = grant.xp_amount, "external xp");
        self.credit_xp(grant.xp_amount as f64, sink)
    }

    /// Advances time-based state and wave phases.
    ///
    /// Returns the summary when this tick completed the wave.
    pub fn tick(&mut self, now_ms: u64, sink: &mut dyn EventSink) -> Option<WaveSummary> {
        if let Some(streak) = self.combo.check_decay(now_ms) {
            sink.emit(GameEvent::ComboLost { streak });
        }
        if let Some(event) = self.world.update(now_ms) {
            sink.emit(GameEvent::WorldEventEnded { id: event.id });
        }

        if self.phase == WavePhase::Active && self.arena.iter().all(|e| !e.active) {
            self.phase = WavePhase::Clearing;
        }
        if self.phase != WavePhase::Clearing {
            return None;
        }

        let was_boss_wave = is_boss_wave(self.wave);
        let xp_awarded = wave_complete_xp(
            self.wave,
            self.world.active_effects().xp_multiplier,
            self.ctx.effects.xp_mult,
        );
        self.credit_xp(xp_awarded as f64, sink);
        sink.emit(GameEvent::WaveComplete {
            wave: self.wave,
            xp_awarded,
            was_boss_wave,
        });
        self.phase = WavePhase::Complete;
        info!(wave = self.wave, xp = xp_awarded, kills = self.wave_kills, "wave complete");

        Some(WaveSummary {
            wave: self.wave,
            xp_awarded,
            was_boss_wave,
            kills: self.wave_kills,
        })
    }

    fn credit_xp(&mut self, amount: f64, sink: &mut dyn EventSink) -> u64 {
        let before = self.progress.level;
        let credited = self
            .progress
            .add_xp(amount * self.ctx.rebirth_xp_multiplier, sink);
        if self.progress.level > before {
            let stats = self.stats();
            let gained = stats.max_health as i64 - self.player.max_health;
            self.player.max_health = stats.max_health as i64;
            if self.player.is_alive() {
                self.player.health += gained.max(0);
            }
        }
        credited
    }
}
