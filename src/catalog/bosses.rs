//! Boss tiers, keyed by the wave they unlock at.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BossSpec {
    pub type_id: &'static str,
    pub name: &'static str,
    pub base_health: u32,
    pub speed: f64,
    pub contact_damage: u32,
    pub xp_value: u32,
    /// Wave from which this boss replaces the previous tier.
    pub wave_threshold: u32,
}

/// Ascending by `wave_threshold`.
pub static BOSS_TYPES: &[BossSpec] = &[
    BossSpec {
        type_id: "boss-stackoverflow",
        name: "STACK OVERFLOW",
        base_health: 2000,
        speed: 30.0,
        contact_damage: 15,
        xp_value: 500,
        wave_threshold: 20,
    },
    BossSpec {
        type_id: "boss-nullpointer",
        name: "NULL POINTER",
        base_health: 3500,
        speed: 60.0,
        contact_damage: 20,
        xp_value: 1000,
        wave_threshold: 40,
    },
    BossSpec {
        type_id: "boss-memoryleakprime",
        name: "MEMORY LEAK PRIME",
        base_health: 5000,
        speed: 20.0,
        contact_damage: 25,
        xp_value: 1500,
        wave_threshold: 60,
    },
    BossSpec {
        type_id: "boss-kernelpanic",
        name: "KERNEL PANIC",
        base_health: 8000,
        speed: 40.0,
        contact_damage: 35,
        xp_value: 3000,
        wave_threshold: 80,
    },
];

pub fn get_boss(type_id: &str) -> Option<&'static BossSpec> {
    BOSS_TYPES.iter().find(|b| b.type_id == type_id)
}
