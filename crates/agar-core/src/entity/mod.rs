//! Entity module: the circular actors living in the arena.
//!
//! This module provides:
//! - [`EntityId`]: Identifier of an entity within its kind's collection
//! - [`EntityKind`]: Player-controlled or autonomous
//! - [`EntityInner`]: Type-safe storage for kind-specific components
//! - [`Entity`]: Common level/position state plus the inner components
//! - [`LevelSignal`]: Outcome of a level mutation (steady, died, maxed out)
//!
//! # Levels
//!
//! Levels are continuous. The integer part ([`Entity::visible_level`]) drives
//! size, speed, colour, level comparisons and thresholds; the fractional part
//! is progress towards the next level.
//!
//! # Example
//!
//! ```
//! use agar_core::entity::{Entity, EntityId, LevelSignal};
//! use glam::DVec2;
//!
//! let mut eater = Entity::autonomous(EntityId::new(0), 3.0, DVec2::new(0.5, 0.5), 0.0, 600.0);
//! let food = Entity::autonomous(EntityId::new(1), 1.0, DVec2::new(0.5, 0.5), 0.0, 600.0);
//!
//! assert!(eater.collides(&food));
//! assert_eq!(eater.grow(food.visible_level(), 40), LevelSignal::Steady);
//! assert!(eater.level() > 3.0);
//! ```

pub mod components;
mod direction;

use std::f64::consts::PI;
use std::fmt;

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::input::Key;

pub use components::{AutonomousComponents, PlayerComponents, TemporaryLabel};
pub use direction::{Direction, HeldDirections, MAX_HELD};

/// Base of the logarithm in the speed law.
const VELOCITY_LOG_BASE: f64 = 20.0;

/// Distance covered per tick by a level-1 entity.
const BASE_STEP: f64 = 1.0 / 200.0;

/// Identifier of an entity within its kind's collection.
///
/// Ids are the collection length at the time the entity was appended. They
/// are never renumbered, so after removals they may have gaps (and an
/// autonomous respawn may reuse a live id). Use them for labels and display,
/// not as stable handles.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Entity kind tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Steered by a player's held direction keys.
    Player,
    /// Wanders on a random walk.
    Autonomous,
}

impl EntityKind {
    /// Visible level at or below which an entity of this kind is dead.
    #[must_use]
    pub const fn death_level(self) -> u32 {
        match self {
            Self::Player => 1,
            Self::Autonomous => 0,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Autonomous => write!(f, "Autonomous"),
        }
    }
}

/// Type-safe storage for kind-specific components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Player components (label, held keys, level history)
    Player(PlayerComponents),
    /// Autonomous components (random-walk heading)
    Autonomous(AutonomousComponents),
}

impl EntityInner {
    /// Returns the kind matching this variant.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Player(_) => EntityKind::Player,
            Self::Autonomous(_) => EntityKind::Autonomous,
        }
    }

    /// Returns the player components, if this is a player.
    #[must_use]
    pub const fn as_player(&self) -> Option<&PlayerComponents> {
        match self {
            Self::Player(components) => Some(components),
            Self::Autonomous(_) => None,
        }
    }

    /// Returns the player components mutably, if this is a player.
    #[must_use]
    pub fn as_player_mut(&mut self) -> Option<&mut PlayerComponents> {
        match self {
            Self::Player(components) => Some(components),
            Self::Autonomous(_) => None,
        }
    }

    /// Returns the autonomous components, if this is an autonomous entity.
    #[must_use]
    pub const fn as_autonomous(&self) -> Option<&AutonomousComponents> {
        match self {
            Self::Autonomous(components) => Some(components),
            Self::Player(_) => None,
        }
    }
}

/// Result of changing an entity's level.
///
/// The arena must act on `Died` (remove the entity) and `MaxedOut` (end the
/// game); neither is ever swallowed by the entity itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub enum LevelSignal {
    /// The entity is alive and below the ceiling.
    Steady,
    /// The visible level reached the kind's death floor.
    Died,
    /// The visible level went past the ceiling.
    MaxedOut,
}

/// Hue in `[0, 0.8)` for a level.
#[must_use]
pub fn shade(level: f64) -> f64 {
    ((level + 1.0) / 20.0).rem_euclid(0.8)
}

/// A circular actor in the arena.
///
/// # Invariants
///
/// - `level > 0` while the entity is owned by an arena; a [`LevelSignal::Died`]
///   obliges the owner to remove it.
/// - `position` stays inside the unit square after every [`Entity::update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    level: f64,
    position: DVec2,
    radius_constant: f64,
    inner: EntityInner,
}

impl Entity {
    /// Creates an entity from its parts.
    ///
    /// `radius_constant` is the configured divisor turning levels into radii.
    #[must_use]
    pub const fn new(
        id: EntityId,
        level: f64,
        position: DVec2,
        radius_constant: f64,
        inner: EntityInner,
    ) -> Self {
        Self {
            id,
            level,
            position,
            radius_constant,
            inner,
        }
    }

    /// Creates a player entity with no keys held.
    #[must_use]
    pub fn player(
        id: EntityId,
        level: f64,
        position: DVec2,
        label: impl Into<String>,
        radius_constant: f64,
    ) -> Self {
        let binding = usize::try_from(id.as_u64()).unwrap_or(usize::MAX);
        Self::new(
            id,
            level,
            position,
            radius_constant,
            EntityInner::Player(PlayerComponents::new(label, binding, level)),
        )
    }

    /// Creates an autonomous entity facing `heading`.
    #[must_use]
    pub const fn autonomous(
        id: EntityId,
        level: f64,
        position: DVec2,
        heading: f64,
        radius_constant: f64,
    ) -> Self {
        Self::new(
            id,
            level,
            position,
            radius_constant,
            EntityInner::Autonomous(AutonomousComponents::new(heading)),
        )
    }

    /// Returns the entity's id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's kind.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.inner.kind()
    }

    /// Returns the kind-specific components.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Returns the player components, if this is a player.
    #[must_use]
    pub const fn as_player(&self) -> Option<&PlayerComponents> {
        self.inner.as_player()
    }

    /// Returns the player components mutably, if this is a player.
    #[must_use]
    pub fn as_player_mut(&mut self) -> Option<&mut PlayerComponents> {
        self.inner.as_player_mut()
    }

    /// Returns the autonomous components, if this is an autonomous entity.
    #[must_use]
    pub const fn as_autonomous(&self) -> Option<&AutonomousComponents> {
        self.inner.as_autonomous()
    }

    /// Continuous level.
    #[must_use]
    pub const fn level(&self) -> f64 {
        self.level
    }

    /// Integer part of the level.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn visible_level(&self) -> u32 {
        self.level.max(0.0).floor() as u32
    }

    /// Percent of the way to the next level, `0..100`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn level_progress(&self) -> u8 {
        (self.level.fract() * 100.0).floor().clamp(0.0, 99.0) as u8
    }

    /// Centre in unit-square coordinates.
    #[must_use]
    pub const fn position(&self) -> DVec2 {
        self.position
    }

    /// Moves the centre, clamped to the unit square.
    pub fn set_position(&mut self, position: DVec2) {
        self.position = position.clamp(DVec2::ZERO, DVec2::ONE);
    }

    /// Radius in unit-square coordinates.
    #[must_use]
    pub fn radius(&self) -> f64 {
        f64::from(self.visible_level()) / self.radius_constant
    }

    /// Distance per tick given by the speed law alone, ignoring whether the
    /// entity currently wants to move.
    #[must_use]
    pub fn base_velocity(&self) -> f64 {
        let level = f64::from(self.visible_level());
        1.0 / (level.log(VELOCITY_LOG_BASE) + 1.0) * BASE_STEP
    }

    /// Distance the entity moves on its own each tick.
    ///
    /// Players stand still with no keys held; autonomous entities stand still
    /// at level 1.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        match &self.inner {
            EntityInner::Player(p) if p.held.is_empty() => 0.0,
            EntityInner::Autonomous(_) if self.visible_level() <= 1 => 0.0,
            _ => self.base_velocity(),
        }
    }

    /// Current heading in radians.
    ///
    /// For players this is derived from the held keys each call (0 when none
    /// are held); for autonomous entities it is the stored heading.
    #[must_use]
    pub fn direction(&self) -> f64 {
        match &self.inner {
            EntityInner::Player(p) => p.held.angle().unwrap_or(0.0),
            EntityInner::Autonomous(a) => a.heading,
        }
    }

    /// Stores a heading. Players derive theirs from keys, so this is a no-op
    /// for them.
    fn set_direction(&mut self, heading: f64) {
        if let EntityInner::Autonomous(a) = &mut self.inner {
            a.heading = heading;
        }
    }

    /// Advances one tick.
    ///
    /// `direction` and `velocity` default to the entity's own. Autonomous
    /// entities perturb their heading first, even when overridden. Leaving
    /// the unit square reflects the stored heading about the crossed axis and
    /// clamps the position to the edge.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        direction: Option<f64>,
        velocity: Option<f64>,
        rng: &mut R,
    ) {
        if let EntityInner::Autonomous(a) = &mut self.inner {
            a.perturb(rng);
        }

        let direction = direction.unwrap_or_else(|| self.direction());
        let velocity = velocity.unwrap_or_else(|| self.velocity());
        self.position += velocity * DVec2::new((-direction).cos(), (-direction).sin());

        if !(0.0..=1.0).contains(&self.position.x) {
            self.set_direction(PI - self.direction());
            self.position.x = self.position.x.clamp(0.0, 1.0);
        }
        if !(0.0..=1.0).contains(&self.position.y) {
            self.set_direction(-self.direction());
            self.position.y = self.position.y.clamp(0.0, 1.0);
        }
    }

    /// True if the two circles touch or overlap.
    #[must_use]
    pub fn collides(&self, other: &Self) -> bool {
        self.position.distance(other.position) <= self.radius() + other.radius()
    }

    /// Absorbs an entity of visible level `eaten_level`.
    ///
    /// The gain is `eaten_level / visible_level`, so large entities gain
    /// little from small food. Returns [`LevelSignal::MaxedOut`] once the
    /// visible level passes `max_level`.
    pub fn grow(&mut self, eaten_level: u32, max_level: u32) -> LevelSignal {
        let gain = f64::from(eaten_level) / f64::from(self.visible_level().max(1));
        let signal = self.set_level(self.level + gain);
        if signal == LevelSignal::Steady && self.visible_level() > max_level {
            return LevelSignal::MaxedOut;
        }
        signal
    }

    /// Loses exactly one level after being eaten.
    pub fn shrink(&mut self) -> LevelSignal {
        self.set_level(self.level - 1.0)
    }

    /// Sets the level, tracking the player high-water mark and reporting death.
    pub fn set_level(&mut self, level: f64) -> LevelSignal {
        self.level = level;
        if let EntityInner::Player(p) = &mut self.inner {
            p.max_level_reached = p.max_level_reached.max(level);
        }
        if self.level <= 0.0 || self.visible_level() <= self.kind().death_level() {
            LevelSignal::Died
        } else {
            LevelSignal::Steady
        }
    }

    /// Fill hue.
    #[must_use]
    pub fn hue(&self) -> f64 {
        shade(f64::from(self.visible_level()))
    }

    /// Outline hue; players are drawn with the previous level's hue.
    #[must_use]
    pub fn stroke_hue(&self) -> f64 {
        let level = f64::from(self.visible_level());
        match self.kind() {
            EntityKind::Player => shade(level - 1.0),
            EntityKind::Autonomous => shade(level),
        }
    }

    /// Forwards a key press to a player. Returns true if its keys changed.
    pub fn key_down(&mut self, key: Key) -> bool {
        self.as_player_mut().is_some_and(|p| p.key_down(key))
    }

    /// Forwards a key release to a player. Returns true if its keys changed.
    pub fn key_up(&mut self, key: Key) -> bool {
        self.as_player_mut().is_some_and(|p| p.key_up(key))
    }

    /// Player label, or `npc <id>` for autonomous entities.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.inner {
            EntityInner::Player(p) => p.label.clone(),
            EntityInner::Autonomous(_) => format!("npc {}", self.id),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
