// XP and leveling
pub const XP_CURVE_BASE: f64 = 100.0;
pub const XP_CURVE_EXPONENT: f64 = 1.5;

// Player base stats and per-level growth
pub const BASE_PLAYER_SPEED: u32 = 200;
pub const BASE_ATTACK_RATE_MS: u32 = 300;
pub const BASE_ATTACK_DAMAGE: u32 = 25;
pub const BASE_MAX_HEALTH: u32 = 200;
pub const SPEED_PER_LEVEL: u32 = 8;
pub const ATTACK_RATE_STEP_MS: u32 = 15;
pub const DAMAGE_PER_LEVEL: u32 = 5;
pub const HEALTH_PER_LEVEL: u32 = 20;
pub const MIN_BASE_ATTACK_RATE_MS: u32 = 100;
pub const MIN_ATTACK_RATE_MS: u32 = 50;
pub const BASE_CRIT_CHANCE: f64 = 0.1;

// Combat
pub const CRIT_MULTIPLIER: i64 = 2;
pub const FORK_DAMAGE_DECAY: f64 = 0.7;
pub const FORK_MAX_DEPTH: u32 = 2;
pub const FORK_CHILD_COUNT: usize = 2;
pub const SPLIT_CHILD_COUNT: usize = 2;
pub const SPLIT_HEALTH_FACTOR: f64 = 0.4;
pub const SPLIT_HEALTH_FLOOR: i64 = 10;
pub const SPLIT_SPEED_FACTOR: f64 = 1.2;
pub const SPLIT_DAMAGE_FACTOR: f64 = 0.7;
pub const SPLIT_XP_FACTOR: f64 = 0.3;
pub const VAMPIRIC_HEAL_FACTOR: f64 = 0.1;

// Enemy and boss scaling
pub const ENEMY_HEALTH_SCALE_PER_LEVEL: f64 = 0.05;
pub const ENEMY_HEALTH_SCALE_CAP: f64 = 2.0;
pub const BOSS_WAVE_INTERVAL: i64 = 20;
pub const BOSS_HEALTH_SCALE_STEP: f64 = 0.5;
pub const MINI_BOSS_HEALTH_SCALE_STEP: f64 = 0.3;
pub const MINI_BOSS_HEALTH_MULT: f64 = 5.0;

// Waves
pub const SPAWN_PER_WAVE_STEP: u32 = 2;
pub const MAX_SPAWN_PER_WAVE: u32 = 25;
pub const DEFAULT_BASE_SPAWN_PER_WAVE: u32 = 5;
pub const BOSS_WAVE_XP_PER_WAVE: f64 = 100.0;
pub const NORMAL_WAVE_XP_PER_WAVE: f64 = 25.0;

// Combo
pub const COMBO_DECAY_MS: u64 = 3000;
pub const COMBO_DISPLAY_THRESHOLD: u32 = 3;

// Rebirth bonuses per level
pub const REBIRTH_ALL_STATS_BONUS: f64 = 0.05;
pub const REBIRTH_XP_BONUS: f64 = 0.10;
pub const REBIRTH_STARTING_WEAPONS_PER_LEVEL: u32 = 1;
pub const MAX_STARTING_WEAPONS: u32 = 3;
pub const MAX_REBIRTH_LEVEL: u32 = 5;

// Run modifiers
pub const EXTRA_MODIFIER_WAVE: u32 = 25;

// World events
pub const WORLD_EVENT_TRIGGER_CHANCE: f64 = 0.15;
pub const WORLD_EVENT_MIN_WAVE: u32 = 5;

// Spatial index
pub const DEFAULT_CELL_SIZE: f64 = 100.0;

// Storage keys (one JSON document per key)
pub const REBIRTH_STORAGE_KEY: &str = "vibeCoderRebirth";
pub const MODIFIERS_STORAGE_KEY: &str = "vibeCoderModifiers";
pub const HIGH_WAVE_STORAGE_KEY: &str = "vibeCoderHighWave";
pub const UPGRADES_STORAGE_KEY: &str = "vibeCoderUpgrades";
pub const LEGENDARIES_STORAGE_KEY: &str = "vibeCoderLegendaries";
