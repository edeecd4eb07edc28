//! XP curve, level-ups and player stat scaling.
//!
//! `PlayerProgress` is the per-session player record the presentation layer
//! reads from; it replaces the ambient global the browser build kept on
//! `window`.

use super::constants::*;
use super::events::{EventSink, GameEvent};
use serde::{Deserialize, Serialize};

/// XP required to advance from `level` to `level + 1`.
pub fn xp_required_for_level(level: u32) -> u64 {
    (XP_CURVE_BASE * f64::powf(level as f64, XP_CURVE_EXPONENT)) as u64
}

/// Result of feeding XP into the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub new_xp: u64,
    pub new_level: u32,
    pub levels_gained: u32,
}

/// Adds `gained` (floored) to `current_xp` and processes any level-ups.
///
/// Supports multi-level jumps in one call. Negative or NaN gains add nothing.
pub fn apply_xp(current_xp: u64, current_level: u32, gained: f64) -> LevelProgress {
    let gained = if gained.is_finite() && gained > 0.0 {
        gained.floor() as u64
    } else {
        0
    };

    let mut xp = current_xp.saturating_add(gained);
    let mut level = current_level.max(1);
    let mut levels_gained = 0;

    loop {
        let needed = xp_required_for_level(level);
        if xp >= needed {
            xp -= needed;
            level += 1;
            levels_gained += 1;
        } else {
            break;
        }
    }

    LevelProgress {
        new_xp: xp,
        new_level: level,
        levels_gained,
    }
}

/// The player's run-scoped XP and level record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerProgress {
    pub xp: u64,
    pub level: u32,
    pub total_xp: u64,
    pub kills: u64,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            total_xp: 0,
            kills: 0,
        }
    }
}

impl PlayerProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `floor(amount)` XP, emitting a `LevelUp` per level gained and a
    /// final `XpGained`. Returns the XP actually credited.
    pub fn add_xp(&mut self, amount: f64, sink: &mut dyn EventSink) -> u64 {
        let credited = amount.floor().max(0.0) as u64;
        let before = self.level;
        let progress = apply_xp(self.xp, self.level, credited as f64);

        self.xp = progress.new_xp;
        self.level = progress.new_level;
        self.total_xp = self.total_xp.saturating_add(credited);

        for level in (before + 1)..=progress.new_level {
            sink.emit(GameEvent::LevelUp { level });
        }
        sink.emit(GameEvent::XpGained {
            amount: credited,
            total: self.xp,
        });

        credited
    }

    /// XP still needed for the next level.
    pub fn xp_to_next_level(&self) -> u64 {
        xp_required_for_level(self.level).saturating_sub(self.xp)
    }
}

/// Multipliers layered onto the base player stats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatBonuses {
    pub damage: f64,
    pub health: f64,
    pub speed: f64,
    pub attack_rate: f64,
    /// Rebirth all-stats multiplier; applies to every stat.
    pub rebirth: f64,
    pub mod_damage: f64,
    pub mod_health: f64,
    pub shrine_damage: f64,
}

impl Default for StatBonuses {
    fn default() -> Self {
        Self {
            damage: 1.0,
            health: 1.0,
            speed: 1.0,
            attack_rate: 1.0,
            rebirth: 1.0,
            mod_damage: 1.0,
            mod_health: 1.0,
            shrine_damage: 1.0,
        }
    }
}

/// Effective player stats at a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStats {
    pub speed: u32,
    /// Milliseconds between attacks (lower is faster).
    pub attack_rate_ms: u32,
    pub attack_damage: u32,
    pub max_health: u32,
}

pub fn player_stats(level: u32, bonuses: &StatBonuses) -> PlayerStats {
    let base_speed = (BASE_PLAYER_SPEED + level * SPEED_PER_LEVEL) as f64;
    let base_rate = BASE_ATTACK_RATE_MS
        .saturating_sub(level * ATTACK_RATE_STEP_MS)
        .max(MIN_BASE_ATTACK_RATE_MS) as f64;
    let base_damage = (BASE_ATTACK_DAMAGE + level * DAMAGE_PER_LEVEL) as f64;
    let base_health = (BASE_MAX_HEALTH + level * HEALTH_PER_LEVEL) as f64;

    let rate = (base_rate / (bonuses.attack_rate * bonuses.rebirth)).floor() as u32;

    PlayerStats {
        speed: (base_speed * bonuses.speed * bonuses.rebirth).floor() as u32,
        attack_rate_ms: rate.max(MIN_ATTACK_RATE_MS),
        attack_damage: (base_damage
            * bonuses.damage
            * bonuses.rebirth
            * bonuses.mod_damage
            * bonuses.shrine_damage)
            .floor() as u32,
        max_health: (base_health * bonuses.health * bonuses.rebirth * bonuses.mod_health).floor()
            as u32,
    }
}

/// Crit chance from the crit upgrade bonus (1.0 = no upgrade).
pub fn crit_chance(crit_upgrade_bonus: f64) -> f64 {
    (BASE_CRIT_CHANCE + (crit_upgrade_bonus - 1.0)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::EventLog;

    #[test]
    fn test_xp_required_for_level() {
        assert_eq!(xp_required_for_level(1), 100);
        assert_eq!(xp_required_for_level(4), 800);
        assert_eq!(xp_required_for_level(10), 3162);
        assert_eq!(xp_required_for_level(25), 12500);
    }

    #[test]
    fn test_xp_curve_strictly_increasing() {
        for level in 1..200 {
            let here = xp_required_for_level(level);
            assert!(here > 0);
            assert!(xp_required_for_level(level + 1) > here);
        }
    }

    #[test]
    fn test_xp_curve_super_linear() {
        assert!(xp_required_for_level(10) > xp_required_for_level(5) * 2);
    }

    #[test]
    fn test_apply_xp_no_levelup() {
        let p = apply_xp(0, 1, 50.0);
        assert_eq!(p, LevelProgress { new_xp: 50, new_level: 1, levels_gained: 0 });
    }

    #[test]
    fn test_apply_xp_exact_threshold() {
        let p = apply_xp(0, 1, 100.0);
        assert_eq!(p.new_level, 2);
        assert_eq!(p.new_xp, 0);
        assert_eq!(p.levels_gained, 1);
    }

    #[test]
    fn test_apply_xp_multiple_levelups() {
        // 100 (L1) + 282 (L2) + 519 (L3) = 901
        let p = apply_xp(0, 1, 950.0);
        assert_eq!(p.new_level, 4);
        assert_eq!(p.levels_gained, 3);
        assert_eq!(p.new_xp, 49);
    }

    #[test]
    fn test_apply_xp_floors_fractional_gain() {
        let p = apply_xp(10, 1, 9.99);
        assert_eq!(p.new_xp, 19);
    }

    #[test]
    fn test_apply_xp_ignores_negative_gain() {
        let p = apply_xp(10, 3, -40.0);
        assert_eq!(p.new_xp, 10);
        assert_eq!(p.new_level, 3);
    }

    #[test]
    fn test_add_xp_emits_level_events() {
        let mut progress = PlayerProgress::new();
        let mut log = EventLog::default();

        let credited = progress.add_xp(400.0, &mut log);

        assert_eq!(credited, 400);
        assert_eq!(progress.level, 3);
        assert_eq!(progress.xp, 18);
        assert_eq!(progress.total_xp, 400);
        let level_ups: Vec<u32> = log
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::LevelUp { level } => Some(*level),
                _ => None,
            })
            .collect();
        assert_eq!(level_ups, vec![2, 3]);
        assert!(matches!(
            log.events.last(),
            Some(GameEvent::XpGained { amount: 400, total: 18 })
        ));
    }

    #[test]
    fn test_add_xp_floors_fractions() {
        let mut progress = PlayerProgress::default();
        let mut log = EventLog::default();
        assert_eq!(progress.add_xp(22.9, &mut log), 22);
        assert_eq!(progress.add_xp(-5.0, &mut log), 0);
        assert_eq!(progress.total_xp, 22);
    }

    #[test]
    fn test_player_stats_level_one() {
        let stats = player_stats(1, &StatBonuses::default());
        assert_eq!(stats.speed, 208);
        assert_eq!(stats.attack_rate_ms, 285);
        assert_eq!(stats.attack_damage, 30);
        assert_eq!(stats.max_health, 220);
    }

    #[test]
    fn test_attack_rate_floors() {
        assert_eq!(player_stats(14, &StatBonuses::default()).attack_rate_ms, 100);

        let extreme = StatBonuses {
            attack_rate: 10.0,
            rebirth: 2.0,
            ..StatBonuses::default()
        };
        assert_eq!(player_stats(50, &extreme).attack_rate_ms, 50);
    }

    #[test]
    fn test_damage_modifiers_stack() {
        let base = player_stats(10, &StatBonuses::default());
        let buffed = player_stats(
            10,
            &StatBonuses {
                mod_damage: 2.0,
                shrine_damage: 1.5,
                ..StatBonuses::default()
            },
        );
        assert_eq!(buffed.attack_damage, base.attack_damage * 3);
    }

    #[test]
    fn test_glass_cannon_health() {
        let base = player_stats(10, &StatBonuses::default());
        let glass = player_stats(
            10,
            &StatBonuses {
                mod_health: 0.5,
                ..StatBonuses::default()
            },
        );
        assert_eq!(glass.max_health, base.max_health / 2);
    }

    #[test]
    fn test_crit_chance() {
        assert!((crit_chance(1.0) - 0.1).abs() < 1e-9);
        assert!((crit_chance(1.15) - 0.25).abs() < 1e-9);
        assert!(crit_chance(0.5) >= 0.0);
    }
}
