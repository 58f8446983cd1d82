//! # Agar Core
//!
//! Simulation core for a cell-growth arena game.
//!
//! Circular entities move around the unit square. When two touch, the one
//! with the higher visible level eats the other; equal levels bounce apart.
//! Players steer with held direction keys, autonomous entities wander on a
//! random walk. The game is won by outgrowing the field and lost when the
//! last player is eaten at its last level.
//!
//! ## Architecture
//!
//! - **Entities** ([`entity`]): shared level/position state plus
//!   kind-specific components for players and autonomous entities
//! - **Arena** ([`arena`]): owns the entities, spawns them and resolves
//!   collisions to a fixpoint every tick
//! - **Session** ([`session`]): game lifecycle, input routing and toasts
//! - **Viewport** ([`viewport`]): pixel-space snapshots for front ends
//!
//! Everything is single-threaded and driven by the caller: one
//! [`Session::frame`] (or [`Arena::update`]) call runs one tick. All
//! randomness comes from a seeded `ChaCha8Rng`, so a seed and an input
//! sequence replay a game exactly.
//!
//! ## Usage
//!
//! ```
//! use agar_core::{Key, Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::default(), 42)?;
//! session.key_down(Key::Space)?;
//! session.key_down(Key::Right)?;
//!
//! for frame in 0..60 {
//!     if let Some(report) = session.frame(frame * 16)? {
//!         for message in report.messages() {
//!             println!("{message}");
//!         }
//!     }
//! }
//! # Ok::<(), agar_core::ArenaError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod config;
pub mod entity;
pub mod error;
pub mod input;
pub mod outcome;
pub mod session;
pub mod viewport;

pub use arena::{Arena, Slot};
pub use config::{ArenaConfig, SessionConfig};
pub use entity::{Entity, EntityId, EntityKind, LevelSignal};
pub use error::{ArenaError, Result};
pub use input::Key;
pub use outcome::{Notification, Outcome, TickReport};
pub use session::{Session, SessionState};
pub use viewport::{EntityView, Viewport};

#[cfg(test)]
mod tests;
