//! Arena module: entity ownership, placement and collision resolution.
//!
//! The Arena is the container for every entity in a game. It provides:
//! - Two ordered collections, players first and autonomous entities second
//! - Spawning that retries until a candidate overlaps nothing
//! - The per-tick update: motion, then collision resolution to a fixpoint
//!
//! # Collision resolution
//!
//! After every entity has moved, the arena repeatedly looks for the first
//! colliding pair, scanning players then autonomous entities in id order,
//! and resolves it:
//!
//! - **Different visible levels**: the larger entity eats the smaller. The
//!   game is won as soon as the eater maxes out or a player outgrows every
//!   autonomous entity by more than one level. Eaten autonomous entities are
//!   replaced; eaten players lose a level and are moved back to the center,
//!   or die at their last level.
//! - **Equal visible levels**: both entities are pushed apart along the line
//!   between their centers until they no longer touch.
//!
//! The loop ends when no pair collides or the game has ended. The retry loops
//! (placement, recentering, separation) are bounded and fail with an
//! [`ArenaError`] instead of spinning.
//!
//! # Determinism
//!
//! All randomness is drawn from one `ChaCha8Rng` seeded at construction, so a
//! seed plus a key sequence reproduces a game exactly.
//!
//! # Example
//!
//! ```
//! use agar_core::arena::Arena;
//! use agar_core::config::ArenaConfig;
//!
//! let mut arena = Arena::new(ArenaConfig::default(), 42).unwrap();
//! arena.populate().unwrap();
//! assert_eq!(arena.players().len(), 2);
//! assert_eq!(arena.autonomous().len(), 35);
//!
//! let report = arena.update().unwrap();
//! assert_eq!(report.tick, 1);
//! assert!(arena.colliding_pair().is_none() || report.outcome.is_some());
//! ```

use std::f64::consts::PI;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::ArenaConfig;
use crate::entity::{
    AutonomousComponents, Entity, EntityId, EntityKind, LevelSignal, TemporaryLabel,
};
use crate::error::{ArenaError, Result};
use crate::input::{Key, DEFAULT_LABELS};
use crate::outcome::{EntitySummary, Notification, Outcome, TickReport, CAUTIONS};

/// Where an eaten player is moved back to.
const CENTER: DVec2 = DVec2::new(0.5, 0.5);

/// Position of an entity inside the arena's collections.
///
/// Slots are only valid until the next removal; they are recomputed for every
/// pair the resolver handles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Index into [`Arena::players`].
    Player(usize),
    /// Index into [`Arena::autonomous`].
    Autonomous(usize),
}

/// The game board.
#[derive(Debug, Clone)]
pub struct Arena {
    /// Tuning shared by every operation.
    config: ArenaConfig,
    /// Player entities in id order.
    players: Vec<Entity>,
    /// Autonomous entities in insertion order.
    autonomous: Vec<Entity>,
    /// Ticks run so far.
    tick: u64,
    /// Seed the RNG was created from.
    seed: u64,
    /// Source of all randomness.
    rng: ChaCha8Rng,
}

impl Arena {
    /// Creates an empty arena.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: ArenaConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            players: Vec::new(),
            autonomous: Vec::new(),
            tick: 0,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Spawns the configured autonomous population, then the players.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::PlacementFailure`] if the arena is too crowded.
    pub fn populate(&mut self) -> Result<()> {
        for _ in 0..self.config.autonomous_population {
            self.spawn_autonomous()?;
        }
        for _ in 0..self.config.player_count {
            self.spawn_player(None)?;
        }
        info!(
            seed = self.seed,
            players = self.players.len(),
            autonomous = self.autonomous.len(),
            "Arena populated"
        );
        Ok(())
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Returns the seed the arena's RNG started from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of ticks run so far.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Live players in id order.
    #[must_use]
    pub fn players(&self) -> &[Entity] {
        &self.players
    }

    /// Live autonomous entities in insertion order.
    #[must_use]
    pub fn autonomous(&self) -> &[Entity] {
        &self.autonomous
    }

    /// All live entities in resolution order: players, then autonomous.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.players.iter().chain(self.autonomous.iter())
    }

    /// All slots in resolution order.
    fn slots(&self) -> impl Iterator<Item = Slot> {
        (0..self.players.len())
            .map(Slot::Player)
            .chain((0..self.autonomous.len()).map(Slot::Autonomous))
    }

    /// Returns the entity in a slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot is out of range.
    #[must_use]
    pub fn get(&self, slot: Slot) -> &Entity {
        match slot {
            Slot::Player(i) => &self.players[i],
            Slot::Autonomous(i) => &self.autonomous[i],
        }
    }

    /// Borrows an entity and the RNG at the same time.
    fn split_mut(&mut self, slot: Slot) -> (&mut Entity, &mut ChaCha8Rng) {
        let entity = match slot {
            Slot::Player(i) => &mut self.players[i],
            Slot::Autonomous(i) => &mut self.autonomous[i],
        };
        (entity, &mut self.rng)
    }

    // -------------------------------------------------------------------------
    // Spawning
    // -------------------------------------------------------------------------

    /// Spawns an autonomous entity somewhere free.
    ///
    /// New entities are level 1 until enough level-1 entities exist, after
    /// which the level is drawn from `1..max_autonomous_initial_level`.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::PlacementFailure`] if no free spot was found.
    pub fn spawn_autonomous(&mut self) -> Result<EntityId> {
        let id = EntityId::new(self.autonomous.len() as u64);
        let small = self
            .autonomous
            .iter()
            .filter(|e| e.visible_level() == 1)
            .count();
        let allow_large = small >= self.config.min_small_autonomous;
        let level_bound = self.config.max_autonomous_initial_level;
        let radius_constant = self.config.radius_constant;

        let entity = self.place(EntityKind::Autonomous, |rng| {
            let level = if allow_large {
                rng.gen_range(1..level_bound)
            } else {
                1
            };
            let position = DVec2::new(rng.gen(), rng.gen());
            let heading = AutonomousComponents::random(rng).heading;
            Entity::autonomous(id, f64::from(level), position, heading, radius_constant)
        })?;

        debug!(id = %id, level = entity.level(), "Spawned autonomous entity");
        self.autonomous.push(entity);
        Ok(id)
    }

    /// Spawns a player on the horizontal midline, away from the edges.
    ///
    /// Without a label the player takes the default label of its binding.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::PlacementFailure`] if no free spot was found.
    pub fn spawn_player(&mut self, label: Option<String>) -> Result<EntityId> {
        let index = self.players.len();
        let id = EntityId::new(index as u64);
        let label = label.unwrap_or_else(|| default_label(index));
        let level = f64::from(self.config.player_initial_level);
        let radius_constant = self.config.radius_constant;

        let entity = self.place(EntityKind::Player, |rng| {
            let position = DVec2::new(0.25 + rng.gen::<f64>() / 2.0, 0.5);
            Entity::player(id, level, position, label.clone(), radius_constant)
        })?;

        debug!(id = %id, label = %label, "Spawned player");
        self.players.push(entity);
        Ok(id)
    }

    /// Draws candidates until one overlaps nothing.
    fn place(
        &mut self,
        kind: EntityKind,
        mut make: impl FnMut(&mut ChaCha8Rng) -> Entity,
    ) -> Result<Entity> {
        let tries = self.config.max_placement_tries;
        for _ in 0..tries {
            let candidate = make(&mut self.rng);
            if !self.overlaps_any(&candidate) {
                return Ok(candidate);
            }
        }
        warn!(%kind, tries, "Could not place entity");
        Err(ArenaError::PlacementFailure { kind, tries })
    }

    /// Appends a player at an exact spot, without checking for overlap.
    ///
    /// Meant for scripted set-ups; spawning goes through
    /// [`Arena::spawn_player`].
    pub fn insert_player(&mut self, level: f64, position: DVec2, label: Option<&str>) -> EntityId {
        let index = self.players.len();
        let id = EntityId::new(index as u64);
        let label = label.map_or_else(|| default_label(index), str::to_owned);
        self.players.push(Entity::player(
            id,
            level,
            position,
            label,
            self.config.radius_constant,
        ));
        id
    }

    /// Appends an autonomous entity at an exact spot, without checking for overlap.
    pub fn insert_autonomous(&mut self, level: f64, position: DVec2, heading: f64) -> EntityId {
        let id = EntityId::new(self.autonomous.len() as u64);
        self.autonomous.push(Entity::autonomous(
            id,
            level,
            position,
            heading,
            self.config.radius_constant,
        ));
        id
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Routes a key press to every player. Returns true if any player reacted.
    pub fn key_down(&mut self, key: Key) -> bool {
        self.players
            .iter_mut()
            .fold(false, |changed, p| p.key_down(key) | changed)
    }

    /// Routes a key release to every player. Returns true if any player reacted.
    pub fn key_up(&mut self, key: Key) -> bool {
        self.players
            .iter_mut()
            .fold(false, |changed, p| p.key_up(key) | changed)
    }

    // -------------------------------------------------------------------------
    // Collision queries
    // -------------------------------------------------------------------------

    /// True if `candidate` touches any live entity.
    #[must_use]
    pub fn overlaps_any(&self, candidate: &Entity) -> bool {
        self.entities().any(|e| candidate.collides(e))
    }

    /// First entity, in resolution order, colliding with the one in `slot`.
    #[must_use]
    pub fn collision_with(&self, slot: Slot) -> Option<Slot> {
        let entity = self.get(slot);
        self.slots()
            .filter(|other| *other != slot)
            .find(|other| entity.collides(self.get(*other)))
    }

    /// First colliding pair in resolution order, if any.
    #[must_use]
    pub fn colliding_pair(&self) -> Option<(Slot, Slot)> {
        self.slots()
            .find_map(|slot| self.collision_with(slot).map(|other| (slot, other)))
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Runs one tick: moves every entity, then resolves collisions until none
    /// remain or the game ends.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`ArenaError`] if a bounded retry loop gave up; the
    /// tick is abandoned at that point.
    pub fn update(&mut self) -> Result<TickReport> {
        self.tick += 1;
        let tick = self.tick;
        let mut report = TickReport::new(tick);

        for entity in self.players.iter_mut().chain(self.autonomous.iter_mut()) {
            entity.update(None, None, &mut self.rng);
        }
        for player in &mut self.players {
            if let Some(p) = player.as_player_mut() {
                p.expire_label(tick);
            }
        }

        self.resolve_collisions(&mut report)?;
        Ok(report)
    }

    /// Resolves colliding pairs until none remain or the game ends.
    fn resolve_collisions(&mut self, report: &mut TickReport) -> Result<()> {
        while let Some((first, second)) = self.colliding_pair() {
            let first_level = self.get(first).visible_level();
            let second_level = self.get(second).visible_level();

            if first_level == second_level {
                self.separate(first, second)?;
                continue;
            }

            let (eater, eaten) = if first_level > second_level {
                (first, second)
            } else {
                (second, first)
            };
            self.eat(eater, eaten, report)?;
            if report.outcome.is_some() {
                break;
            }
        }
        Ok(())
    }

    /// Lets `eater` absorb `eaten` and applies the consequences.
    fn eat(&mut self, eater: Slot, eaten: Slot, report: &mut TickReport) -> Result<()> {
        let food = self.get(eaten).visible_level();
        let max_level = self.config.max_level;
        let signal = self.split_mut(eater).0.grow(food, max_level);
        debug!(
            eater = %self.get(eater).label(),
            eaten = %self.get(eaten).label(),
            level = self.get(eater).level(),
            "Entity eaten"
        );

        if signal == LevelSignal::MaxedOut || self.players_outgrew_field() {
            let winner = EntitySummary::of(self.get(eater));
            info!(winner = %winner.label, level = winner.level, "Game won");
            report.outcome = Some(Outcome::Won { winner });
            return Ok(());
        }

        match eaten {
            Slot::Autonomous(index) => {
                self.autonomous.remove(index);
                self.spawn_autonomous()?;
            }
            Slot::Player(index) => self.player_eaten(index, report)?,
        }
        Ok(())
    }

    /// A player lost a level: it dies at its last level, otherwise it is
    /// moved back to the center with a warning.
    fn player_eaten(&mut self, index: usize, report: &mut TickReport) -> Result<()> {
        match self.players[index].shrink() {
            LevelSignal::Died => {
                let dead = self.players.remove(index);
                let label = dead.label();
                info!(label = %label, remaining = self.players.len(), "Player died");
                report.notifications.push(Notification::PlayerDied { label });
                if self.players.is_empty() {
                    let loser = EntitySummary::of(&dead);
                    info!(loser = %loser.label, max_level = loser.max_level, "Game lost");
                    report.outcome = Some(Outcome::Lost { loser });
                }
            }
            LevelSignal::Steady | LevelSignal::MaxedOut => {
                self.recenter(index)?;
                let message = CAUTIONS[self.rng.gen_range(0..CAUTIONS.len())].to_owned();
                let expires_at = self.tick + self.config.temporary_label_ticks;
                let player = &mut self.players[index];
                let label = player.label();
                if let Some(p) = player.as_player_mut() {
                    p.temporary_label = Some(TemporaryLabel {
                        text: message.clone(),
                        expires_at,
                    });
                }
                report
                    .notifications
                    .push(Notification::PlayerEaten { label, message });
            }
        }
        Ok(())
    }

    /// Moves a player to the center, stepping right (and wrapping) while the
    /// spot is taken.
    fn recenter(&mut self, index: usize) -> Result<()> {
        let slot = Slot::Player(index);
        let tries = self.config.max_recenter_tries;
        let mut position = CENTER;
        for _ in 0..tries {
            self.players[index].set_position(position);
            if self.collision_with(slot).is_none() {
                return Ok(());
            }
            position.x = (position.x + self.config.recenter_step) % 1.0;
        }
        let label = self.players[index].label();
        warn!(label = %label, tries, "Could not recenter player");
        Err(ArenaError::RecenterFailure { label, tries })
    }

    /// Pushes two equal-level entities apart along the line between them.
    fn separate(&mut self, first: Slot, second: Slot) -> Result<()> {
        let offset = self.get(first).position() - self.get(second).position();
        let direction = -offset.y.atan2(offset.x);
        let tries = self.config.max_placement_tries;

        for step in 1..=tries {
            let (entity, rng) = self.split_mut(first);
            let velocity = entity.base_velocity();
            entity.update(Some(direction), Some(velocity), rng);

            let (entity, rng) = self.split_mut(second);
            let velocity = entity.base_velocity();
            entity.update(Some(direction + PI), Some(velocity), rng);

            if !self.get(first).collides(self.get(second)) {
                debug!(?first, ?second, steps = step, "Separated equal-level entities");
                return Ok(());
            }
        }
        warn!(?first, ?second, tries, "Could not separate equal-level entities");
        Err(ArenaError::SeparationFailure { tries })
    }

    /// True if some player is more than one level above every autonomous entity.
    fn players_outgrew_field(&self) -> bool {
        let Some(top_player) = self.players.iter().map(Entity::visible_level).max() else {
            return false;
        };
        let top_autonomous = self
            .autonomous
            .iter()
            .map(Entity::visible_level)
            .max()
            .unwrap_or(0);
        top_player > top_autonomous + 1
    }
}

/// Label for the player at `index` when none was given.
fn default_label(index: usize) -> String {
    DEFAULT_LABELS
        .get(index)
        .map_or_else(|| format!("player {index}"), |label| (*label).to_owned())
}

// =============================================================================
// Tests
// =============================================================================
