//! What a tick produces for the presentation layer.
//!
//! Each [`Arena::update`](crate::arena::Arena::update) returns a
//! [`TickReport`]: the notifications raised while resolving collisions, in
//! order, and at most one terminal [`Outcome`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, EntityKind};

/// Messages shown to a player who was eaten but survived.
pub const CAUTIONS: [&str; 3] = ["You got eaten!", "Be careful!", "Small fish in a big pond..."];

/// Snapshot of the entity an outcome is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    /// Kind of the entity.
    pub kind: EntityKind,
    /// Id at the time of the outcome.
    pub id: EntityId,
    /// Display label.
    pub label: String,
    /// Level at the time of the outcome.
    pub level: f64,
    /// Highest level reached (players), or the current level.
    pub max_level: f64,
}

impl EntitySummary {
    /// Captures an entity.
    #[must_use]
    pub fn of(entity: &Entity) -> Self {
        let max_level = entity
            .as_player()
            .map_or(entity.level(), |p| p.max_level_reached);
        Self {
            kind: entity.kind(),
            id: entity.id(),
            label: entity.label(),
            level: entity.level(),
            max_level,
        }
    }

    /// Integer part of `level`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn visible_level(&self) -> u32 {
        self.level.max(0.0).floor() as u32
    }
}

/// How a game ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// An entity outgrew the field or maxed out.
    Won {
        /// The eater whose growth ended the game.
        winner: EntitySummary,
    },
    /// The last player died.
    Lost {
        /// The player that died last.
        loser: EntitySummary,
    },
}

impl Outcome {
    /// The entity the outcome is about.
    #[must_use]
    pub const fn subject(&self) -> &EntitySummary {
        match self {
            Self::Won { winner } => winner,
            Self::Lost { loser } => loser,
        }
    }

    /// True for [`Outcome::Won`].
    #[must_use]
    pub const fn is_won(&self) -> bool {
        matches!(self, Self::Won { .. })
    }
}

impl fmt::Display for Outcome {
    #[allow(clippy::cast_possible_truncation)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Won { winner } => write!(f, "You win! Level {}.", winner.visible_level()),
            Self::Lost { loser } => {
                write!(f, "You lost! Max level: {}.", loser.max_level.floor() as i64)
            }
        }
    }
}

/// Something worth telling the players about that happened mid-tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// A player was eaten at its last life and removed.
    PlayerDied {
        /// Label of the dead player.
        label: String,
    },
    /// A player was eaten, lost a level and was moved to the center.
    PlayerEaten {
        /// Label of the eaten player.
        label: String,
        /// Cautionary message picked from [`CAUTIONS`].
        message: String,
    },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayerDied { label } => write!(f, "{label} died"),
            Self::PlayerEaten { message, .. } => write!(f, "{message}"),
        }
    }
}

/// Everything one tick produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick number this report belongs to.
    pub tick: u64,
    /// Notifications in the order they happened.
    pub notifications: Vec<Notification>,
    /// Set when the tick ended the game; nothing after it was resolved.
    pub outcome: Option<Outcome>,
}

impl TickReport {
    /// Creates an empty report for `tick`.
    #[must_use]
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }

    /// Notification texts, in order.
    pub fn messages(&self) -> impl Iterator<Item = String> + '_ {
        self.notifications.iter().map(ToString::to_string)
    }
}
