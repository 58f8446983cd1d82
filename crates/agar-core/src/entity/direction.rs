//! Held direction keys and the heading they produce.

use std::f64::consts::{FRAC_PI_2, TAU};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// One of the four directions a player can hold.
///
/// Angles are measured counter-clockwise from the positive x axis with y
/// pointing down the screen, so `Up` is a quarter turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Index 0.
    Right,
    /// Index 1.
    Up,
    /// Index 2.
    Left,
    /// Index 3.
    Down,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Self; 4] = [Self::Right, Self::Up, Self::Left, Self::Down];

    /// Returns the direction with the given index, if any.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Right),
            1 => Some(Self::Up),
            2 => Some(Self::Left),
            3 => Some(Self::Down),
            _ => None,
        }
    }

    /// Index in the right, up, left, down order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Right => 0,
            Self::Up => 1,
            Self::Left => 2,
            Self::Down => 3,
        }
    }

    /// Heading in radians when this is the only key held.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn angle(self) -> f64 {
        self.index() as f64 * FRAC_PI_2
    }

    /// The flag for this direction in a [`HeldDirections`] set.
    #[must_use]
    pub const fn flag(self) -> HeldDirections {
        match self {
            Self::Right => HeldDirections::RIGHT,
            Self::Up => HeldDirections::UP,
            Self::Left => HeldDirections::LEFT,
            Self::Down => HeldDirections::DOWN,
        }
    }
}

bitflags! {
    /// Set of direction keys a player is currently holding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct HeldDirections: u8 {
        /// Right key held.
        const RIGHT = 1 << 0;
        /// Up key held.
        const UP = 1 << 1;
        /// Left key held.
        const LEFT = 1 << 2;
        /// Down key held.
        const DOWN = 1 << 3;
    }
}

/// Most keys that can be held at once; further presses are ignored.
pub const MAX_HELD: usize = 2;

/// Fraction of a full turn for two held keys, keyed by the sorted pair.
const fn pair_turn(low: Direction, high: Direction) -> Option<f64> {
    match (low, high) {
        (Direction::Right, Direction::Up) => Some(1.0 / 8.0),
        (Direction::Right, Direction::Left) => Some(1.0 / 4.0),
        (Direction::Right, Direction::Down) => Some(7.0 / 8.0),
        (Direction::Up, Direction::Left) => Some(3.0 / 8.0),
        (Direction::Up, Direction::Down) => Some(1.0 / 2.0),
        (Direction::Left, Direction::Down) => Some(5.0 / 8.0),
        _ => None,
    }
}

impl HeldDirections {
    /// Held directions in index order.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |d| self.contains(d.flag()))
    }

    /// Number of keys held.
    #[must_use]
    pub fn count(self) -> usize {
        self.bits().count_ones() as usize
    }

    /// Heading produced by the held keys, or `None` when the set is empty
    /// (or, which cannot happen through [`HeldDirections::press`], larger
    /// than two).
    ///
    /// ```
    /// use std::f64::consts::FRAC_PI_4;
    /// use agar_core::entity::HeldDirections;
    ///
    /// let held = HeldDirections::RIGHT | HeldDirections::UP;
    /// assert_eq!(held.angle(), Some(FRAC_PI_4));
    /// assert_eq!(HeldDirections::empty().angle(), None);
    /// ```
    #[must_use]
    pub fn angle(self) -> Option<f64> {
        let mut held = self.directions();
        match (held.next(), held.next(), held.next()) {
            (Some(only), None, None) => Some(only.angle()),
            (Some(low), Some(high), None) => pair_turn(low, high).map(|turn| turn * TAU),
            _ => None,
        }
    }

    /// Adds a direction unless [`MAX_HELD`] keys are already held.
    ///
    /// Returns true if the set changed.
    pub fn press(&mut self, direction: Direction) -> bool {
        if self.count() >= MAX_HELD || self.contains(direction.flag()) {
            return false;
        }
        self.insert(direction.flag());
        true
    }

    /// Removes a direction. Returns true if it was held.
    pub fn release(&mut self, direction: Direction) -> bool {
        let held = self.contains(direction.flag());
        self.remove(direction.flag());
        held
    }
}
