//! Vibe Arena - wave survival core and XP relay.
//!
//! The arena core is pure and single-threaded: waves, combat, combo,
//! modifiers and rebirth progression. The relay turns coding-tool activity
//! into XP grants for running games.

pub mod catalog;
pub mod combat;
pub mod combo;
pub mod config;
pub mod core;
pub mod meta;
pub mod modifiers;
pub mod rebirth;
pub mod relay;
pub mod simulator;
pub mod utils;
pub mod waves;
pub mod world_events;
