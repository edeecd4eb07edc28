//! Wave planning and the per-wave state machine.

#![allow(unused_imports)]

pub mod controller;
pub mod planner;

pub use controller::*;
pub use planner::*;
