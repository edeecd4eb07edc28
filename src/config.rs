//! Runtime configuration loaded from ~/.vibe-arena/config.json.
//!
//! Every field has a default, so a missing or partial file is fine.

use serde::{Deserialize, Serialize};

use crate::core::constants::{COMBO_DECAY_MS, DEFAULT_BASE_SPAWN_PER_WAVE, DEFAULT_CELL_SIZE};
use crate::utils::persistence::load_json_or_default;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub port: u16,
    /// Request bodies above this many bytes are rejected with 413.
    pub max_body_bytes: usize,
    pub allowed_origin: String,
    /// Where the in-game client connects.
    pub server_url: String,
    pub reconnect_delay_ms: u64,
    /// Connections that send no complete request within this window are
    /// dropped.
    pub request_timeout_ms: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            max_body_bytes: 1024,
            allowed_origin: "http://localhost:5173".to_string(),
            server_url: "ws://localhost:3001".to_string(),
            reconnect_delay_ms: 3000,
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub relay: RelayConfig,
    /// Kill streak resets after this long without a kill.
    pub combo_decay_ms: u64,
    /// `spawn_count` base before the per-wave growth.
    pub base_spawn_per_wave: u32,
    /// Cell size of the grid handed out by `WaveController::spatial_index`.
    pub spatial_cell_size: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            relay: RelayConfig::default(),
            combo_decay_ms: COMBO_DECAY_MS,
            base_spawn_per_wave: DEFAULT_BASE_SPAWN_PER_WAVE,
            spatial_cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl ArenaConfig {
    pub fn load() -> Self {
        load_json_or_default(CONFIG_FILE)
    }
}
