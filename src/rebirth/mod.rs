//! Permanent prestige progression across runs.

#![allow(unused_imports)]

pub mod ledger;
pub mod persistence;

pub use ledger::*;
pub use persistence::*;
