//! Combat resolution: projectile hits, enemy deaths, contact damage.

#![allow(unused_imports)]

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
