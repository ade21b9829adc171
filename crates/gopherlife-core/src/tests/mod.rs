//! Scenario and determinism tests for the world scheduler.
//!
//! - `scenarios.rs`: small hand-built worlds with known outcomes
//! - `determinism.rs`: replay and thread-count independence
//! - `helpers.rs`: world setup and consistency checks

mod helpers;
mod scenarios;

pub use helpers::*;
