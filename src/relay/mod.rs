//! XP relay: turns coding-tool activity into XP for running games.
//!
//! Validation and the wire format are always available; the tokio server and
//! client need the `relay` feature.

#![allow(unused_imports)]

pub mod validation;

#[cfg(feature = "relay")]
pub mod client;
#[cfg(feature = "relay")]
pub mod error;
#[cfg(feature = "relay")]
pub mod server;

#[cfg(feature = "relay")]
pub use client::*;
#[cfg(feature = "relay")]
pub use error::*;
#[cfg(feature = "relay")]
pub use server::*;
pub use validation::*;
