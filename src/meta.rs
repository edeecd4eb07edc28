//! Cross-run records besides rebirth: best wave, shop upgrades, legendary
//! weapons.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::constants::{
    HIGH_WAVE_STORAGE_KEY, LEGENDARIES_STORAGE_KEY, UPGRADES_STORAGE_KEY,
};
use crate::utils::persistence::{load_or_default, store_value, KeyValueStore, StorageError};

/// Best wave ever reached; never lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighWaveRecord(pub u32);

impl HighWaveRecord {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        load_or_default(store, HIGH_WAVE_STORAGE_KEY)
    }

    /// Raises the record to `wave` if higher. Returns whether it changed.
    pub fn submit(&mut self, wave: u32) -> bool {
        if wave > self.0 {
            self.0 = wave;
            true
        } else {
            false
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store_value(store, HIGH_WAVE_STORAGE_KEY, self)
    }
}

/// Permanent shop upgrades bought with run currency.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaUpgrades {
    pub currency: u64,
    pub levels: BTreeMap<String, u32>,
}

impl MetaUpgrades {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        load_or_default(store, UPGRADES_STORAGE_KEY)
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store_value(store, UPGRADES_STORAGE_KEY, self)
    }

    pub fn level(&self, upgrade: &str) -> u32 {
        self.levels.get(upgrade).copied().unwrap_or(0)
    }

    pub fn earn(&mut self, amount: u64) {
        self.currency = self.currency.saturating_add(amount);
    }

    /// Spends `cost` to raise `upgrade` one level, up to `max_level`.
    pub fn purchase(&mut self, upgrade: &str, cost: u64, max_level: u32) -> bool {
        let current = self.level(upgrade);
        if current >= max_level || self.currency < cost {
            return false;
        }
        self.currency -= cost;
        self.levels.insert(upgrade.to_string(), current + 1);
        true
    }

    /// `1 + level * per_level`, the multiplier a stat upgrade grants.
    pub fn bonus(&self, upgrade: &str, per_level: f64) -> f64 {
        1.0 + self.level(upgrade) as f64 * per_level
    }
}

/// Legendary weapons unlocked across runs and the one taken into the next run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendaryLoadout {
    pub unlocked: BTreeSet<String>,
    pub equipped: Option<String>,
}

impl LegendaryLoadout {
    /// Loads the loadout, dropping an equipped weapon that is not unlocked.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut loadout: Self = load_or_default(store, LEGENDARIES_STORAGE_KEY);
        if let Some(id) = &loadout.equipped {
            if !loadout.unlocked.contains(id) {
                loadout.equipped = None;
            }
        }
        loadout
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store_value(store, LEGENDARIES_STORAGE_KEY, self)
    }

    /// Returns whether this is a new unlock.
    pub fn unlock(&mut self, id: &str) -> bool {
        self.unlocked.insert(id.to_string())
    }

    pub fn equip(&mut self, id: &str) -> bool {
        if self.unlocked.contains(id) {
            self.equipped = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn unequip(&mut self) {
        self.equipped = None;
    }
}
