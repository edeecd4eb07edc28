//! Selecting, combining and persisting run modifiers.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::data::*;
use crate::core::constants::{EXTRA_MODIFIER_WAVE, MODIFIERS_STORAGE_KEY};
use crate::utils::persistence::{load_or_default, store_value, KeyValueStore, StorageError};

/// The merged effect record every system reads at run time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedEffects {
    pub damage_multiplier: f64,
    pub health_multiplier: f64,
    pub weapon_duration_mult: f64,
    pub weapon_drop_rate: f64,
    pub projectile_count: f64,
    pub enemy_count_mult: f64,
    pub wave_length_mult: f64,
    pub xp_mult: f64,
    pub vampiric_enemies: bool,
}

impl Default for CombinedEffects {
    fn default() -> Self {
        Self {
            damage_multiplier: 1.0,
            health_multiplier: 1.0,
            weapon_duration_mult: 1.0,
            weapon_drop_rate: 1.0,
            projectile_count: 1.0,
            enemy_count_mult: 1.0,
            wave_length_mult: 1.0,
            xp_mult: 1.0,
            vampiric_enemies: false,
        }
    }
}

impl CombinedEffects {
    fn mult_slot(&mut self, key: EffectKey) -> Option<&mut f64> {
        match key {
            EffectKey::DamageMultiplier => Some(&mut self.damage_multiplier),
            EffectKey::HealthMultiplier => Some(&mut self.health_multiplier),
            EffectKey::WeaponDurationMult => Some(&mut self.weapon_duration_mult),
            EffectKey::WeaponDropRate => Some(&mut self.weapon_drop_rate),
            EffectKey::ProjectileCount => Some(&mut self.projectile_count),
            EffectKey::EnemyCountMult => Some(&mut self.enemy_count_mult),
            EffectKey::WaveLengthMult => Some(&mut self.wave_length_mult),
            EffectKey::XpMult => Some(&mut self.xp_mult),
            EffectKey::VampiricEnemies => None,
        }
    }

    fn apply(&mut self, key: EffectKey, value: EffectValue) {
        match value {
            EffectValue::Flag(flag) => {
                if key == EffectKey::VampiricEnemies {
                    self.vampiric_enemies |= flag;
                }
            }
            EffectValue::Mult(mult) => {
                if let Some(slot) = self.mult_slot(key) {
                    *slot *= mult;
                }
            }
        }
    }
}

pub fn all_modifiers() -> &'static [RunModifier] {
    RUN_MODIFIERS
}

pub fn by_id(id: &str) -> Option<&'static RunModifier> {
    RUN_MODIFIERS.iter().find(|m| m.id == id)
}

/// How many modifiers a run started at `wave` rolls.
pub fn modifier_count_for_wave(wave: u32) -> usize {
    if wave > EXTRA_MODIFIER_WAVE {
        2
    } else {
        1
    }
}

/// Draws `count` distinct modifiers, never more than the catalog holds.
pub fn select_modifiers(count: usize, rng: &mut impl Rng) -> Vec<&'static RunModifier> {
    RUN_MODIFIERS
        .choose_multiple(rng, count.min(RUN_MODIFIERS.len()))
        .collect()
}

/// Multiplies numeric effects and ORs flags, starting from identity.
/// Modifiers without an effect map are skipped.
pub fn combined_effects<'a, I>(modifiers: I) -> CombinedEffects
where
    I: IntoIterator<Item = &'a RunModifier>,
{
    let mut combined = CombinedEffects::default();
    for modifier in modifiers {
        let Some(effects) = modifier.effects else {
            continue;
        };
        for &(key, value) in effects {
            combined.apply(key, value);
        }
    }
    combined
}

pub fn save_active(
    store: &mut dyn KeyValueStore,
    modifiers: &[&RunModifier],
) -> Result<(), StorageError> {
    let ids: Vec<&str> = modifiers.iter().map(|m| m.id).collect();
    store_value(store, MODIFIERS_STORAGE_KEY, &ids)
}

/// Resolves the saved id list in catalog order; unknown ids are dropped and
/// corrupted storage yields no modifiers.
pub fn load_active(store: &dyn KeyValueStore) -> Vec<&'static RunModifier> {
    let ids: Vec<String> = load_or_default(store, MODIFIERS_STORAGE_KEY);
    RUN_MODIFIERS
        .iter()
        .filter(|m| ids.iter().any(|id| id == m.id))
        .collect()
}

pub fn clear_active(store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
    store.remove(MODIFIERS_STORAGE_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::persistence::MemoryStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn test_empty_is_identity() {
        let none: [&RunModifier; 0] = [];
        assert_eq!(combined_effects(none), CombinedEffects::default());
    }

    #[test]
    fn test_numerics_multiply_and_flags_or() {
        let mods = [
            by_id("glass_cannon").unwrap(),
            by_id("marathon").unwrap(),
            by_id("vampiric").unwrap(),
        ];
        let combined = combined_effects(mods);
        assert_eq!(combined.damage_multiplier, 2.0);
        assert_eq!(combined.health_multiplier, 0.5);
        assert_eq!(combined.xp_mult, 1.25);
        assert_eq!(combined.wave_length_mult, 1.5);
        assert!(combined.vampiric_enemies);
        assert_eq!(combined.projectile_count, 1.0);
    }

    #[test]
    fn test_same_modifier_twice_compounds() {
        let cannon = by_id("glass_cannon").unwrap();
        let combined = combined_effects([cannon, cannon]);
        assert_eq!(combined.damage_multiplier, 4.0);
        assert_eq!(combined.health_multiplier, 0.25);
    }

    #[test]
    fn test_modifier_without_effects_skipped() {
        let inert = RunModifier {
            id: "inert",
            name: "INERT",
            description: "",
            icon: "",
            color: 0,
            effects: None,
        };
        let bullet = by_id("bullet_hell").unwrap();
        let combined = combined_effects([&inert, bullet]);
        assert_eq!(combined.projectile_count, 2.0);
        assert_eq!(combined.enemy_count_mult, 1.5);
    }

    #[test]
    fn test_select_distinct_and_capped() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for count in 0..10 {
            let picked = select_modifiers(count, &mut rng);
            assert_eq!(picked.len(), count.min(RUN_MODIFIERS.len()));
            let ids: HashSet<_> = picked.iter().map(|m| m.id).collect();
            assert_eq!(ids.len(), picked.len());
        }
    }

    #[test]
    fn test_modifier_count_for_wave() {
        assert_eq!(modifier_count_for_wave(1), 1);
        assert_eq!(modifier_count_for_wave(25), 1);
        assert_eq!(modifier_count_for_wave(26), 2);
    }

    #[test]
    fn test_save_load_in_catalog_order() {
        let mut store = MemoryStore::new();
        let mods = [by_id("marathon").unwrap(), by_id("vampiric").unwrap()];
        save_active(&mut store, &mods).unwrap();

        let loaded: Vec<&str> = load_active(&store).iter().map(|m| m.id).collect();
        assert_eq!(loaded, vec!["vampiric", "marathon"]);

        clear_active(&mut store).unwrap();
        assert!(load_active(&store).is_empty());
    }

    #[test]
    fn test_load_corrupted_is_empty() {
        let mut store = MemoryStore::new();
        store.set(MODIFIERS_STORAGE_KEY, "[\"vampiric\"").unwrap();
        assert!(load_active(&store).is_empty());

        store.set(MODIFIERS_STORAGE_KEY, "[\"gone\", \"marathon\"]").unwrap();
        let loaded: Vec<&str> = load_active(&store).iter().map(|m| m.id).collect();
        assert_eq!(loaded, vec!["marathon"]);
    }
}
