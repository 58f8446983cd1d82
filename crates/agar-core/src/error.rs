//! Fatal errors raised by the arena.
//!
//! Growth and death are ordinary game events and travel as
//! [`LevelSignal`](crate::entity::LevelSignal) values. The variants here are
//! reserved for the bounded retry loops giving up, which means the arena is
//! misconfigured (too crowded) or hit a physics edge case it cannot resolve.

use thiserror::Error;

use crate::entity::EntityKind;

/// Errors that abort the current tick (or arena construction).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArenaError {
    /// A configuration value cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// Spawning could not find a free spot within the retry bound.
    #[error("could not place {kind} entity without overlap after {tries} tries")]
    PlacementFailure {
        /// Kind of entity being spawned.
        kind: EntityKind,
        /// Number of candidate positions tried.
        tries: usize,
    },

    /// An eaten player could not be moved back to a free spot near the center.
    #[error("could not recenter player {label:?} after {tries} tries")]
    RecenterFailure {
        /// Label of the player being recentered.
        label: String,
        /// Number of candidate positions tried.
        tries: usize,
    },

    /// Two equal-level entities were still overlapping after the bounce bound.
    #[error("could not separate equal-level entities after {tries} steps")]
    SeparationFailure {
        /// Number of bounce steps taken.
        tries: usize,
    },
}

/// Convenience alias for arena results.
pub type Result<T> = std::result::Result<T, ArenaError>;
