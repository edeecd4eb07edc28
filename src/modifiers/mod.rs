//! Run-start mutators and their combined effects.

#![allow(unused_imports)]

pub mod data;
pub mod logic;

pub use data::*;
pub use logic::*;
