use serde::Serialize;

use crate::catalog::{BossSpec, EnemyBehavior, EnemySpec, WeaponSpec};

/// A live enemy in the arena.
///
/// Health is signed so overkill stays visible to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyInstance {
    /// Assigned by the wave controller when the enemy enters the arena.
    pub id: u64,
    pub type_id: &'static str,
    pub health: i64,
    pub max_health: i64,
    pub speed: f64,
    pub contact_damage: i64,
    pub xp_value: u64,
    pub behavior: EnemyBehavior,
    pub can_split: bool,
    pub active: bool,
    pub is_boss: bool,
}

impl EnemyInstance {
    /// Spawns an enemy with `floor(base_health * health_scale)` health.
    pub fn from_spec(spec: &EnemySpec, health_scale: f64) -> Self {
        let health = ((spec.base_health as f64 * health_scale).floor() as i64).max(1);
        Self {
            id: 0,
            type_id: spec.type_id,
            health,
            max_health: health,
            speed: spec.speed,
            contact_damage: spec.contact_damage as i64,
            xp_value: spec.xp_value as u64,
            behavior: spec.behavior,
            can_split: spec.behavior == EnemyBehavior::Split,
            active: true,
            is_boss: false,
        }
    }

    pub fn from_boss(spec: &BossSpec, health_scale: f64) -> Self {
        let health = ((spec.base_health as f64 * health_scale).floor() as i64).max(1);
        Self {
            id: 0,
            type_id: spec.type_id,
            health,
            max_health: health,
            speed: spec.speed,
            contact_damage: spec.contact_damage as i64,
            xp_value: spec.xp_value as u64,
            behavior: EnemyBehavior::Chase,
            can_split: false,
            active: true,
            is_boss: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.active && self.health > 0
    }
}

/// A projectile in flight, owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Projectile {
    pub damage: i64,
    pub pierce: bool,
    pub is_fork_bomb: bool,
    pub is_child: bool,
    pub fork_depth: u32,
}

impl Projectile {
    pub fn new(damage: i64, pierce: bool) -> Self {
        Self {
            damage,
            pierce,
            is_fork_bomb: false,
            is_child: false,
            fork_depth: 0,
        }
    }

    pub fn fork_bomb(damage: i64) -> Self {
        Self {
            is_fork_bomb: true,
            ..Self::new(damage, false)
        }
    }

    /// Fires one projectile of `weapon` for a player dealing `base_damage`.
    pub fn from_weapon(weapon: &WeaponSpec, base_damage: u32) -> Self {
        Self {
            damage: (base_damage as f64 * weapon.damage_mult).floor() as i64,
            pierce: weapon.pierce,
            is_fork_bomb: weapon.is_fork_bomb(),
            is_child: false,
            fork_depth: 0,
        }
    }
}

/// Everything a single hit produced.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HitOutcome {
    pub damage_dealt: i64,
    pub is_crit: bool,
    pub killed: bool,
    pub xp_awarded: u64,
    pub projectile_consumed: bool,
    /// Zero or two children of a split enemy.
    pub split_children: Vec<EnemyInstance>,
    /// Zero or two fork-bomb children.
    pub fork_children: Vec<Projectile>,
}

/// XP multipliers applied at the moment an award is made.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XpMultipliers {
    /// World event multiplier (double XP and friends).
    pub event: f64,
    /// Run modifier multiplier.
    pub modifier: f64,
}

impl Default for XpMultipliers {
    fn default() -> Self {
        Self {
            event: 1.0,
            modifier: 1.0,
        }
    }
}

impl XpMultipliers {
    pub fn new(event: f64, modifier: f64) -> Self {
        Self { event, modifier }
    }

    /// `floor(base * event * modifier)`.
    pub fn apply(&self, base: f64) -> u64 {
        (base * self.event * self.modifier).floor().max(0.0) as u64
    }
}

/// The player's mutable health record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerVitals {
    pub health: i64,
    pub max_health: i64,
}

impl PlayerVitals {
    pub fn new(max_health: i64) -> Self {
        Self {
            health: max_health,
            max_health,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Result of an enemy touching the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContactOutcome {
    pub damage_taken: i64,
    pub player_died: bool,
    pub enemy_healed: i64,
}
