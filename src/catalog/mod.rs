//! Static data tables: enemies, weapons, evolutions, bosses.

#![allow(unused_imports)]

pub mod bosses;
pub mod enemies;
pub mod weapons;

pub use bosses::*;
pub use enemies::*;
pub use weapons::*;
