//! Enemy type table.

use serde::Serialize;

/// How an enemy moves and what happens when it dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyBehavior {
    Chase,
    Stationary,
    /// Releases two weaker, non-splitting children on death.
    Split,
    /// Harmless decoy.
    Fake,
    /// Stationary one-shot hazard.
    DeathZone,
}

impl EnemyBehavior {
    pub fn is_stationary(self) -> bool {
        matches!(self, EnemyBehavior::Stationary | EnemyBehavior::DeathZone)
    }
}

/// Static stats for an enemy type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnemySpec {
    pub type_id: &'static str,
    pub base_health: u32,
    pub speed: f64,
    pub contact_damage: u32,
    pub xp_value: u32,
    /// First wave this type may appear in.
    pub wave_min: u32,
    /// Copies of this type placed in the spawn pool (at least 1).
    pub spawn_weight: u32,
    pub behavior: EnemyBehavior,
}

const fn enemy(
    type_id: &'static str,
    base_health: u32,
    speed: f64,
    contact_damage: u32,
    xp_value: u32,
    wave_min: u32,
    spawn_weight: u32,
    behavior: EnemyBehavior,
) -> EnemySpec {
    EnemySpec {
        type_id,
        base_health,
        speed,
        contact_damage,
        xp_value,
        wave_min,
        spawn_weight,
        behavior,
    }
}

use EnemyBehavior::*;

/// Every enemy type, in spawn-pool order.
pub static ENEMY_TYPES: &[EnemySpec] = &[
    enemy("bug", 15, 40.0, 3, 5, 0, 3, Chase),
    enemy("glitch", 30, 70.0, 5, 15, 3, 2, Chase),
    enemy("memory-leak", 60, 25.0, 10, 30, 5, 1, Chase),
    enemy("syntax-error", 12, 100.0, 2, 10, 8, 2, Chase),
    enemy("infinite-loop", 40, 50.0, 4, 20, 12, 1, Chase),
    enemy("race-condition", 25, 60.0, 6, 25, 15, 1, Chase),
    enemy("segfault", 10, 0.0, 999, 50, 30, 1, DeathZone),
    enemy("dependency-hell", 80, 30.0, 6, 80, 35, 1, Chase),
    enemy("stack-overflow", 100, 35.0, 8, 100, 25, 1, Chase),
    enemy("hallucination", 1, 50.0, 0, 1, 20, 2, Fake),
    enemy("token-overflow", 40, 45.0, 5, 40, 25, 1, Chase),
    enemy("context-loss", 50, 60.0, 7, 60, 30, 1, Chase),
    enemy("prompt-injection", 60, 40.0, 5, 100, 40, 1, Chase),
    enemy("404-not-found", 25, 55.0, 4, 20, 18, 1, Chase),
    enemy("cors-error", 35, 0.0, 8, 30, 22, 1, Stationary),
    enemy("type-error", 30, 50.0, 5, 25, 28, 1, Chase),
    enemy("git-conflict", 45, 40.0, 4, 35, 32, 1, Split),
    enemy("overfitting", 50, 65.0, 6, 45, 38, 1, Chase),
    enemy("mode-collapse", 70, 35.0, 7, 60, 45, 1, Chase),
];

pub fn get_enemy(type_id: &str) -> Option<&'static EnemySpec> {
    ENEMY_TYPES.iter().find(|e| e.type_id == type_id)
}
