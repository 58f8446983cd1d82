//! Game configuration constants.
//!
//! Defaults reproduce the classic tuning of the game. Every field has a
//! serde default so partial JSON documents only need to name overrides.

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};
use crate::input::BINDINGS;

/// Configuration for an [`Arena`](crate::arena::Arena).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Size of the square viewport in pixels.
    pub size: f64,
    /// Divisor turning a level into a radius in unit-square coordinates.
    /// Increase to make the arena seem larger.
    pub radius_constant: f64,
    /// How much of the arena stays visible around the players (fraction of the arena).
    pub view_side_padding: f64,
    /// Pixels per grid line; `size / gridline_divisor` lines are drawn.
    pub gridline_divisor: u32,
    /// Autonomous entities alive at any time.
    pub autonomous_population: usize,
    /// Players spawned when a session starts (at most one per key binding).
    pub player_count: usize,
    /// Level-1 autonomous entities that must exist before larger ones spawn.
    pub min_small_autonomous: usize,
    /// Exclusive upper bound on the level of a freshly spawned autonomous entity.
    pub max_autonomous_initial_level: u32,
    /// Level players start at.
    pub player_initial_level: u32,
    /// Candidate positions tried when spawning without overlap.
    pub max_placement_tries: usize,
    /// Step along x when looking for a free spot to recenter an eaten player.
    pub recenter_step: f64,
    /// Candidate positions tried when recentering an eaten player.
    pub max_recenter_tries: usize,
    /// Level above which an entity has maxed out.
    pub max_level: u32,
    /// Ticks a player's temporary label stays visible.
    pub temporary_label_ticks: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            size: 500.0,
            radius_constant: 600.0,
            view_side_padding: 0.2,
            gridline_divisor: 20,
            autonomous_population: 35,
            player_count: 2,
            min_small_autonomous: 20,
            max_autonomous_initial_level: 5,
            player_initial_level: 2,
            max_placement_tries: 1000,
            recenter_step: 0.1,
            max_recenter_tries: 10,
            max_level: 40,
            temporary_label_ticks: 90,
        }
    }
}

impl ArenaConfig {
    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidConfig`] naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        if self.size.is_nan() || self.size <= 0.0 {
            return Err(ArenaError::InvalidConfig("size must be positive"));
        }
        if self.radius_constant.is_nan() || self.radius_constant <= 0.0 {
            return Err(ArenaError::InvalidConfig("radius_constant must be positive"));
        }
        if !(self.view_side_padding > 0.0 && self.view_side_padding < 0.5) {
            return Err(ArenaError::InvalidConfig(
                "view_side_padding must be in (0, 0.5)",
            ));
        }
        if self.gridline_divisor == 0 {
            return Err(ArenaError::InvalidConfig("gridline_divisor must be positive"));
        }
        if self.autonomous_population == 0 {
            return Err(ArenaError::InvalidConfig(
                "autonomous_population must be positive",
            ));
        }
        if self.player_count == 0 || self.player_count > BINDINGS.len() {
            return Err(ArenaError::InvalidConfig(
                "player_count must be between 1 and the number of key bindings",
            ));
        }
        if self.max_autonomous_initial_level < 2 {
            return Err(ArenaError::InvalidConfig(
                "max_autonomous_initial_level must be at least 2",
            ));
        }
        if self.player_initial_level < 2 || self.player_initial_level > self.max_level {
            return Err(ArenaError::InvalidConfig(
                "player_initial_level must be in 2..=max_level",
            ));
        }
        if self.max_placement_tries == 0 || self.max_recenter_tries == 0 {
            return Err(ArenaError::InvalidConfig("retry bounds must be positive"));
        }
        if !(0.0..1.0).contains(&self.recenter_step) || self.recenter_step <= 0.0 {
            return Err(ArenaError::InvalidConfig("recenter_step must be in (0, 1)"));
        }
        Ok(())
    }

    /// Number of grid lines drawn across the arena.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn gridline_count(&self) -> u32 {
        (self.size as u32) / self.gridline_divisor
    }
}

/// Configuration for a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Arena tuning used for every new game.
    pub arena: ArenaConfig,
    /// How long a toast stays up when nothing else is queued (ms).
    pub long_toast_ms: u64,
    /// How long a toast stays up when others are waiting (ms).
    pub short_toast_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            long_toast_ms: 2500,
            short_toast_ms: 500,
        }
    }
}

impl SessionConfig {
    /// Checks the arena tuning and toast timings.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidConfig`] naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        self.arena.validate()?;
        if self.short_toast_ms > self.long_toast_ms {
            return Err(ArenaError::InvalidConfig(
                "short_toast_ms must not exceed long_toast_ms",
            ));
        }
        Ok(())
    }
}
