//! Core simulation primitives: constants, progression, events, spatial index.

#![allow(unused_imports)]

pub mod constants;
pub mod events;
pub mod progression;
pub mod spatial;

pub use constants::*;
pub use events::*;
pub use progression::*;
pub use spatial::*;
