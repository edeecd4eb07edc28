//! Run modifier catalog.

use serde::Serialize;

/// A key in a modifier's effect map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectKey {
    DamageMultiplier,
    HealthMultiplier,
    WeaponDurationMult,
    WeaponDropRate,
    ProjectileCount,
    EnemyCountMult,
    WaveLengthMult,
    XpMult,
    VampiricEnemies,
}

/// Numeric effects multiply, flags OR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EffectValue {
    Mult(f64),
    Flag(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunModifier {
    /// Stable id used for persistence.
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: u32,
    pub effects: Option<&'static [(EffectKey, EffectValue)]>,
}

use EffectKey::*;
use EffectValue::*;

/// Catalog order; persisted ids are resolved in this order.
pub static RUN_MODIFIERS: &[RunModifier] = &[
    RunModifier {
        id: "vampiric",
        name: "VAMPIRIC ENEMIES",
        description: "Enemies heal 10% of damage dealt",
        icon: "🧛",
        color: 0xff0044,
        effects: Some(&[(VampiricEnemies, Flag(true))]),
    },
    RunModifier {
        id: "glass_cannon",
        name: "GLASS CANNON",
        description: "2x damage, 50% max health",
        icon: "💀",
        color: 0xff6600,
        effects: Some(&[(DamageMultiplier, Mult(2.0)), (HealthMultiplier, Mult(0.5))]),
    },
    RunModifier {
        id: "weapon_frenzy",
        name: "WEAPON FRENZY",
        description: "Weapons 50% shorter, +50% drop rate",
        icon: "⚔️",
        color: 0xffaa00,
        effects: Some(&[(WeaponDurationMult, Mult(0.5)), (WeaponDropRate, Mult(1.5))]),
    },
    RunModifier {
        id: "bullet_hell",
        name: "BULLET HELL",
        description: "+100% projectiles, +50% enemies",
        icon: "🔥",
        color: 0xff00ff,
        effects: Some(&[(ProjectileCount, Mult(2.0)), (EnemyCountMult, Mult(1.5))]),
    },
    RunModifier {
        id: "marathon",
        name: "MARATHON",
        description: "Waves 50% longer, +25% XP",
        icon: "🏃",
        color: 0x00ffaa,
        effects: Some(&[(WaveLengthMult, Mult(1.5)), (XpMult, Mult(1.25))]),
    },
];
