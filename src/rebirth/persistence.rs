//! Loading and saving the rebirth record.

use tracing::info;

use super::ledger::*;
use crate::core::constants::{MAX_REBIRTH_LEVEL, REBIRTH_STORAGE_KEY};
use crate::utils::persistence::{load_or_default, store_value, KeyValueStore, StorageError};

/// Reads the rebirth record. Missing or corrupted data yields the zero state.
pub fn load_state(store: &dyn KeyValueStore) -> RebirthState {
    let mut state: RebirthState = load_or_default(store, REBIRTH_STORAGE_KEY);
    state.rebirth_level = state.rebirth_level.min(MAX_REBIRTH_LEVEL);
    state
}

pub fn save_state(store: &mut dyn KeyValueStore, state: &RebirthState) -> Result<(), StorageError> {
    store_value(store, REBIRTH_STORAGE_KEY, state)
}

/// A rebirth record bound to its backing store.
///
/// State is read once on open; every mutation writes through.
pub struct RebirthLedger<S: KeyValueStore> {
    store: S,
    state: RebirthState,
}

impl<S: KeyValueStore> RebirthLedger<S> {
    pub fn open(store: S) -> Self {
        let state = load_state(&store);
        Self { store, state }
    }

    pub fn state(&self) -> &RebirthState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Re-reads the record from storage.
    pub fn reload(&mut self) -> &RebirthState {
        self.state = load_state(&self.store);
        &self.state
    }

    pub fn save(&mut self) -> Result<(), StorageError> {
        save_state(&mut self.store, &self.state)
    }

    pub fn can_rebirth(&self, current_wave: u32) -> Option<&'static RebirthMilestone> {
        can_rebirth(current_wave, &self.state)
    }

    /// Performs and persists a rebirth. Returns the milestone reached, or
    /// `None` (and leaves storage untouched) when not eligible.
    pub fn rebirth(
        &mut self,
        current_wave: u32,
        kills_this_run: u64,
    ) -> Result<Option<&'static RebirthMilestone>, StorageError> {
        let Some(milestone) = can_rebirth(current_wave, &self.state) else {
            return Ok(None);
        };
        self.state = perform_rebirth(current_wave, kills_this_run, &self.state);
        self.save()?;
        info!(
            level = milestone.rebirth,
            name = milestone.name,
            wave = current_wave,
            "rebirth performed"
        );
        Ok(Some(milestone))
    }

    pub fn info(&self) -> RebirthInfo {
        rebirth_info(&self.state)
    }
}
