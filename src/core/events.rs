//! Events emitted by the simulation for the presentation layer.
//!
//! The core never reaches into a global bus; callers hand an [`EventSink`]
//! to the operations that produce events and render whatever arrives.

use serde::Serialize;

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Combat ──────────────────────────────────────────────────
    /// A projectile hit an enemy.
    Damage {
        enemy_id: u64,
        amount: i64,
        is_crit: bool,
    },

    /// An enemy died and its XP was awarded.
    Kill {
        enemy_id: u64,
        type_id: &'static str,
        xp_awarded: u64,
    },

    /// A split enemy died and released children.
    EnemySplit { parent_id: u64, children: usize },

    /// An enemy touched the player.
    PlayerHit { damage: i64, enemy_healed: i64 },

    /// Player health reached zero.
    PlayerDied,

    // ── Progression ─────────────────────────────────────────────
    /// XP was credited to the player.
    XpGained { amount: u64, total: u64 },

    /// The player reached a new level.
    LevelUp { level: u32 },

    // ── Waves ───────────────────────────────────────────────────
    /// A boss entered the arena.
    BossSpawned { type_id: &'static str, health: i64 },

    /// A wave finished and its completion XP was awarded.
    WaveComplete {
        wave: u32,
        xp_awarded: u64,
        was_boss_wave: bool,
    },

    // ── Combo ───────────────────────────────────────────────────
    /// The kill streak crossed a milestone for the first time this streak.
    ComboMilestone { threshold: u32, label: &'static str },

    /// The kill streak decayed to zero.
    ComboLost { streak: u32 },

    // ── World events ────────────────────────────────────────────
    WorldEventStarted { id: &'static str },
    WorldEventEnded { id: &'static str },
}

/// XP delivered from outside the arena (the activity relay).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct XpGrant {
    pub xp_amount: u64,
    pub source_label: String,
}

/// Receives events produced by the core.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Collects events in order; used by tests and the simulator.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl EventLog {
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn count_kills(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::Kill { .. }))
            .count()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}
