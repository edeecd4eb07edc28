//! Timed in-run world events (double XP, curses, loot jackpots).
//!
//! At most one event runs at a time. Each wave start past the minimum wave
//! rolls once to begin a new one; the event expires after its duration.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::core::constants::{WORLD_EVENT_MIN_WAVE, WORLD_EVENT_TRIGGER_CHANCE};

/// The multipliers and flags a running event imposes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldEventEffects {
    pub xp_multiplier: f64,
    pub enemy_speed_mod: f64,
    pub force_rare_drops: bool,
}

impl Default for WorldEventEffects {
    fn default() -> Self {
        Self {
            xp_multiplier: 1.0,
            enemy_speed_mod: 1.0,
            force_rare_drops: false,
        }
    }
}

/// An event's effect map; absent keys keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEffectOverrides {
    pub xp_multiplier: Option<f64>,
    pub enemy_speed_mod: Option<f64>,
    pub force_rare_drops: Option<bool>,
}

impl EventEffectOverrides {
    const NONE: Self = Self {
        xp_multiplier: None,
        enemy_speed_mod: None,
        force_rare_drops: None,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldEvent {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: u32,
    pub duration_ms: u64,
    pub effects: Option<EventEffectOverrides>,
}

pub static WORLD_EVENTS: [WorldEvent; 5] = [
    WorldEvent {
        id: "double_xp",
        name: "DOUBLE XP",
        description: "All XP doubled",
        icon: "✨",
        color: 0x00ff88,
        duration_ms: 20_000,
        effects: Some(EventEffectOverrides {
            xp_multiplier: Some(2.0),
            ..EventEffectOverrides::NONE
        }),
    },
    WorldEvent {
        id: "curse",
        name: "CURSE",
        description: "Enemies move 50% faster",
        icon: "👹",
        color: 0xff0044,
        duration_ms: 15_000,
        effects: Some(EventEffectOverrides {
            enemy_speed_mod: Some(1.5),
            ..EventEffectOverrides::NONE
        }),
    },
    WorldEvent {
        id: "jackpot",
        name: "JACKPOT",
        description: "Every drop is rare",
        icon: "💰",
        color: 0xffd700,
        duration_ms: 10_000,
        effects: Some(EventEffectOverrides {
            force_rare_drops: Some(true),
            ..EventEffectOverrides::NONE
        }),
    },
    WorldEvent {
        id: "bug_surge",
        name: "BUG SURGE",
        description: "Faster enemies, +50% XP",
        icon: "🐛",
        color: 0xffaa00,
        duration_ms: 15_000,
        effects: Some(EventEffectOverrides {
            xp_multiplier: Some(1.5),
            enemy_speed_mod: Some(1.25),
            force_rare_drops: None,
        }),
    },
    WorldEvent {
        id: "code_freeze",
        name: "CODE FREEZE",
        description: "Enemies slowed by half",
        icon: "❄️",
        color: 0x88ccff,
        duration_ms: 12_000,
        effects: Some(EventEffectOverrides {
            enemy_speed_mod: Some(0.5),
            ..EventEffectOverrides::NONE
        }),
    },
];

pub fn get_world_event(id: &str) -> Option<&'static WorldEvent> {
    WORLD_EVENTS.iter().find(|e| e.id == id)
}

#[derive(Debug, Clone)]
pub struct WorldEventManager {
    active: Option<WorldEvent>,
    started_ms: u64,
    applied: WorldEventEffects,
    pub trigger_chance: f64,
    pub min_wave: u32,
}

impl Default for WorldEventManager {
    fn default() -> Self {
        Self {
            active: None,
            started_ms: 0,
            applied: WorldEventEffects::default(),
            trigger_chance: WORLD_EVENT_TRIGGER_CHANCE,
            min_wave: WORLD_EVENT_MIN_WAVE,
        }
    }
}

impl WorldEventManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&WorldEvent> {
        self.active.as_ref()
    }

    /// Rolls for a new event at the start of `wave`.
    ///
    /// Never triggers while another event runs or below the minimum wave.
    pub fn try_trigger(
        &mut self,
        wave: u32,
        now_ms: u64,
        rng: &mut impl Rng,
    ) -> Option<WorldEvent> {
        if self.is_active() || wave < self.min_wave {
            return None;
        }
        if rng.gen::<f64>() >= self.trigger_chance {
            return None;
        }
        let event = *WORLD_EVENTS.choose(rng)?;
        self.start(event, now_ms);
        Some(event)
    }

    /// Begins `event` immediately, replacing whatever was running.
    pub fn start(&mut self, event: WorldEvent, now_ms: u64) {
        debug!(event = event.id, now_ms, "world event started");
        self.active = Some(event);
        self.started_ms = now_ms;
        self.apply(&event);
    }

    /// Applies an event's overrides on top of the defaults; an event without
    /// an effect map leaves the defaults in place.
    pub fn apply(&mut self, event: &WorldEvent) {
        let mut effects = WorldEventEffects::default();
        if let Some(overrides) = event.effects {
            if let Some(xp) = overrides.xp_multiplier {
                effects.xp_multiplier = xp;
            }
            if let Some(speed) = overrides.enemy_speed_mod {
                effects.enemy_speed_mod = speed;
            }
            if let Some(rare) = overrides.force_rare_drops {
                effects.force_rare_drops = rare;
            }
        }
        self.applied = effects;
    }

    /// Restores every effect to its default.
    pub fn clear(&mut self) {
        self.applied = WorldEventEffects::default();
    }

    pub fn active_effects(&self) -> WorldEventEffects {
        self.applied
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.active
            .map(|e| (self.started_ms + e.duration_ms).saturating_sub(now_ms))
            .unwrap_or(0)
    }

    /// Ends the running event once its duration has elapsed. Returns the
    /// event that ended.
    pub fn update(&mut self, now_ms: u64) -> Option<WorldEvent> {
        let event = self.active?;
        if now_ms.saturating_sub(self.started_ms) < event.duration_ms {
            return None;
        }
        self.end()
    }

    /// Stops the running event early (player death, run end).
    pub fn end(&mut self) -> Option<WorldEvent> {
        let event = self.active.take()?;
        self.clear();
        debug!(event = event.id, "world event ended");
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn event(id: &str) -> WorldEvent {
        *get_world_event(id).unwrap()
    }

    #[test]
    fn test_catalog_shape() {
        let ids: HashSet<_> = WORLD_EVENTS.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 5);
        assert!(WORLD_EVENTS.iter().all(|e| e.duration_ms > 0));
        assert_eq!(event("double_xp").effects.unwrap().xp_multiplier, Some(2.0));
        assert_eq!(event("curse").effects.unwrap().enemy_speed_mod, Some(1.5));
    }

    #[test]
    fn test_defaults_when_idle() {
        let mgr = WorldEventManager::new();
        assert!(!mgr.is_active());
        assert_eq!(mgr.active_effects(), WorldEventEffects::default());
        assert_eq!(mgr.trigger_chance, 0.15);
        assert_eq!(mgr.min_wave, 5);
    }

    #[test]
    fn test_active_event_effects_with_defaults() {
        let mut mgr = WorldEventManager::new();
        mgr.start(event("double_xp"), 0);
        let effects = mgr.active_effects();
        assert_eq!(effects.xp_multiplier, 2.0);
        assert_eq!(effects.enemy_speed_mod, 1.0);
        assert!(!effects.force_rare_drops);

        mgr.apply(&event("jackpot"));
        assert!(mgr.active_effects().force_rare_drops);
    }

    #[test]
    fn test_trigger_refused() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut mgr = WorldEventManager::new();
        mgr.trigger_chance = 1.0;
        assert!(mgr.try_trigger(3, 0, &mut rng).is_none());

        mgr.start(event("curse"), 0);
        assert!(mgr.try_trigger(10, 0, &mut rng).is_none());
        assert_eq!(mgr.active().unwrap().id, "curse");
    }

    #[test]
    fn test_trigger_certain_and_never() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut never = WorldEventManager::new();
        never.trigger_chance = 0.0;
        for wave in 5..50 {
            assert!(never.try_trigger(wave, 0, &mut rng).is_none());
        }

        let mut always = WorldEventManager::new();
        always.trigger_chance = 1.0;
        assert!(always.try_trigger(5, 0, &mut rng).is_some());
        assert!(always.is_active());
    }

    #[test]
    fn test_update_expires() {
        let mut mgr = WorldEventManager::new();
        mgr.start(event("jackpot"), 1_000);
        assert_eq!(mgr.remaining_ms(5_000), 6_000);
        assert!(mgr.update(10_999).is_none());
        assert_eq!(mgr.update(11_000).unwrap().id, "jackpot");
        assert!(!mgr.is_active());
        assert_eq!(mgr.active_effects(), WorldEventEffects::default());
    }

    #[test]
    fn test_clear_resets_effects() {
        let mut mgr = WorldEventManager::new();
        mgr.start(event("bug_surge"), 0);
        mgr.clear();
        assert_eq!(mgr.active_effects(), WorldEventEffects::default());
    }

    #[test]
    fn test_event_without_effects_tolerated() {
        let mut mgr = WorldEventManager::new();
        let blank = WorldEvent {
            effects: None,
            ..event("curse")
        };
        mgr.apply(&blank);
        assert_eq!(mgr.active_effects(), WorldEventEffects::default());
    }
}
