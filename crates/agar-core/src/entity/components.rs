//! Variant-specific state for the two entity kinds.

use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::direction::HeldDirections;
use crate::input::{binding_direction, Key};

/// Divisor of a full turn bounding one random-walk step.
const WALK_STEP_DIVISOR: f64 = 35.0;

/// A label shown instead of the player's own until a given tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporaryLabel {
    /// Text to show.
    pub text: String,
    /// First tick at which the override no longer applies.
    pub expires_at: u64,
}

/// Components for player-controlled entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerComponents {
    /// Display label.
    pub label: String,
    /// Row of [`BINDINGS`](crate::input::BINDINGS) this player listens to.
    pub binding: usize,
    /// Direction keys currently held.
    pub held: HeldDirections,
    /// Highest level this player has had.
    pub max_level_reached: f64,
    /// Transient label override.
    pub temporary_label: Option<TemporaryLabel>,
}

impl PlayerComponents {
    /// Creates player state for a freshly spawned player at `level`.
    #[must_use]
    pub fn new(label: impl Into<String>, binding: usize, level: f64) -> Self {
        Self {
            label: label.into(),
            binding,
            held: HeldDirections::empty(),
            max_level_reached: level,
            temporary_label: None,
        }
    }

    /// Handles a key press. Returns true if the held set changed.
    pub fn key_down(&mut self, key: Key) -> bool {
        binding_direction(self.binding, key).is_some_and(|d| self.held.press(d))
    }

    /// Handles a key release. Returns true if the held set changed.
    pub fn key_up(&mut self, key: Key) -> bool {
        binding_direction(self.binding, key).is_some_and(|d| self.held.release(d))
    }

    /// Label to draw at `tick`.
    #[must_use]
    pub fn display_label(&self, tick: u64) -> &str {
        match &self.temporary_label {
            Some(temp) if tick < temp.expires_at => &temp.text,
            _ => &self.label,
        }
    }

    /// Drops the temporary label once it has expired.
    pub fn expire_label(&mut self, tick: u64) {
        if self
            .temporary_label
            .as_ref()
            .is_some_and(|temp| tick >= temp.expires_at)
        {
            self.temporary_label = None;
        }
    }
}

/// Components for autonomous entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutonomousComponents {
    /// Current heading in radians.
    pub heading: f64,
}

impl AutonomousComponents {
    /// Creates autonomous state facing `heading`.
    #[must_use]
    pub const fn new(heading: f64) -> Self {
        Self { heading }
    }

    /// Creates autonomous state with a uniformly random heading.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen::<f64>() * TAU)
    }

    /// Nudges the heading by a small, unbiased random amount.
    pub fn perturb<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let sign: f64 = rng.gen_range(-1.0..1.0);
        let magnitude: f64 = rng.gen();
        self.heading += sign * magnitude * TAU / WALK_STEP_DIVISOR;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn player_ignores_other_bindings() {
        let mut player = PlayerComponents::new("arrows", 0, 2.0);
        assert!(!player.key_down(Key::Char('w')));
        assert!(player.key_down(Key::Up));
        assert!(player.held.contains(HeldDirections::UP));
        assert!(player.key_up(Key::Up));
        assert!(player.held.is_empty());
    }

    #[test]
    fn temporary_label_expires() {
        let mut player = PlayerComponents::new("wasd", 1, 2.0);
        player.temporary_label = Some(TemporaryLabel {
            text: "Be careful!".into(),
            expires_at: 10,
        });
        assert_eq!(player.display_label(9), "Be careful!");
        assert_eq!(player.display_label(10), "wasd");

        player.expire_label(9);
        assert!(player.temporary_label.is_some());
        player.expire_label(10);
        assert!(player.temporary_label.is_none());
    }

    #[test]
    fn perturbation_is_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut walker = AutonomousComponents::new(1.0);
        for _ in 0..1000 {
            let before = walker.heading;
            walker.perturb(&mut rng);
            assert!((walker.heading - before).abs() <= TAU / WALK_STEP_DIVISOR + 1e-12);
        }
    }
}
