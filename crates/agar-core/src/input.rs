//! Logical keys and per-player direction bindings.
//!
//! Platform key codes are decoded by the front end; the core only ever sees
//! [`Key`] values. Each player owns one row of [`BINDINGS`], chosen by its id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::Direction;

/// A decoded key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Left arrow.
    Left,
    /// Down arrow.
    Down,
    /// Space bar (starts a game).
    Space,
    /// Any printable key, as typed.
    Char(char),
}

/// Direction keys per player, ordered right, up, left, down.
pub const BINDINGS: [[Key; 4]; 4] = [
    [Key::Right, Key::Up, Key::Left, Key::Down],
    [Key::Char('d'), Key::Char('w'), Key::Char('a'), Key::Char('s')],
    [Key::Char('/'), Key::Char('l'), Key::Char(','), Key::Char('.')],
    [Key::Char('\\'), Key::Char('='), Key::Char('['), Key::Char(']')],
];

/// Default player labels, one per binding.
pub const DEFAULT_LABELS: [&str; 4] = ["arrows", "wasd", "l,./", "=[]\\"];

/// Maps a key to a direction for the given binding row.
///
/// Returns `None` for keys outside the row and for rows that do not exist.
///
/// ```
/// use agar_core::entity::Direction;
/// use agar_core::input::{binding_direction, Key};
///
/// assert_eq!(binding_direction(1, Key::Char('w')), Some(Direction::Up));
/// assert_eq!(binding_direction(0, Key::Char('w')), None);
/// ```
#[must_use]
pub fn binding_direction(binding: usize, key: Key) -> Option<Direction> {
    let row = BINDINGS.get(binding)?;
    row.iter()
        .position(|bound| *bound == key)
        .and_then(Direction::from_index)
}

/// Error returned when a key name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown key name: {0:?}")]
pub struct ParseKeyError(String);

impl FromStr for Key {
    type Err = ParseKeyError;

    /// Parses key names as front ends report them: `RIGHT`, `UP`,
    /// `LEFT`, `DOWN`, `SPACE` (case-insensitive) or a single character.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RIGHT" => return Ok(Self::Right),
            "UP" => return Ok(Self::Up),
            "LEFT" => return Ok(Self::Left),
            "DOWN" => return Ok(Self::Down),
            "SPACE" | " " => return Ok(Self::Space),
            _ => {}
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self::Char(c)),
            _ => Err(ParseKeyError(s.to_owned())),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Right => write!(f, "RIGHT"),
            Self::Up => write!(f, "UP"),
            Self::Left => write!(f, "LEFT"),
            Self::Down => write!(f, "DOWN"),
            Self::Space => write!(f, "SPACE"),
            Self::Char(c) => write!(f, "{c}"),
        }
    }
}
