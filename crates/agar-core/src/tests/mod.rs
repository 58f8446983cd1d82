//! Scenario tests for the arena and session.
//!
//! Unit tests live next to the code they cover; these exercise whole ticks:
//! - `integration.rs`: scripted set-ups ending in wins, losses, recentering
//!   and bounces
//! - `determinism.rs`: same seed and inputs, same game
//! - `properties.rs`: `proptest` checks of the entity laws
//! - `helpers.rs`: set-up utilities shared by the above

mod helpers;
mod integration;
