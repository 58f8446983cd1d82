//! Presentation-facing snapshots of the arena.
//!
//! Front ends never read entities directly. Each frame they take:
//! - A [`Viewport`] fitted around the live players
//! - One [`EntityView`] per live entity, already mapped to pixels
//! - Grid line positions from [`Viewport::grid_lines`]
//! - Per-player [`HudLine`]s with progress towards the next level
//!
//! # Example
//!
//! ```
//! use agar_core::arena::Arena;
//! use agar_core::config::ArenaConfig;
//! use agar_core::viewport::{entity_views, Viewport};
//! use glam::DVec2;
//!
//! let mut arena = Arena::new(ArenaConfig::default(), 0).unwrap();
//! arena.insert_player(2.0, DVec2::new(0.5, 0.5), None);
//!
//! let viewport = Viewport::fit(&arena);
//! // One player at the centre: the view spans [0.3, 0.7].
//! assert!((viewport.to_pixels(0.3)).abs() < 1e-9);
//! assert!((viewport.to_pixels(0.7) - 500.0).abs() < 1e-9);
//!
//! let views = entity_views(&arena, &viewport);
//! assert_eq!(views[0].label.as_deref(), Some("arrows"));
//! ```

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::entity::{Entity, EntityId, EntityInner, EntityKind};

/// Gap between a circle's bottom edge and its label, in unit coordinates.
const LABEL_GAP: f64 = 0.015;

// =============================================================================
// Viewport
// =============================================================================

/// Affine map from unit-square coordinates to pixels.
///
/// The same map is applied to both axes, so circles stay round.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Pixels per unit.
    scale: f64,
    /// Unit coordinate mapped to pixel 0.
    origin: f64,
    /// Grid lines across the arena.
    gridlines: u32,
}

impl Viewport {
    /// Maps the whole arena onto `size` pixels.
    #[must_use]
    pub const fn full(size: f64, gridlines: u32) -> Self {
        Self {
            scale: size,
            origin: 0.0,
            gridlines,
        }
    }

    /// Fits the view around the arena's live players.
    ///
    /// Falls back to [`Viewport::full`] once no players are left.
    #[must_use]
    pub fn fit(arena: &Arena) -> Self {
        let config = arena.config();
        Self::around(
            arena.players().iter().map(Entity::position),
            config.size,
            config.view_side_padding,
            config.gridline_count(),
        )
    }

    /// Fits the view around `points`, padded on every side and clipped to the
    /// unit square.
    ///
    /// x and y coordinates are pooled: the view covers the smallest interval
    /// holding all of them, on both axes. An empty interval maps the whole
    /// arena instead.
    #[must_use]
    pub fn around(
        points: impl IntoIterator<Item = DVec2>,
        size: f64,
        padding: f64,
        gridlines: u32,
    ) -> Self {
        let bounds = points.into_iter().fold(None, |acc: Option<(f64, f64)>, p| {
            let (lo, hi) = acc.unwrap_or((f64::INFINITY, f64::NEG_INFINITY));
            Some((lo.min(p.min_element()), hi.max(p.max_element())))
        });
        let Some((lo, hi)) = bounds else {
            return Self::full(size, gridlines);
        };

        let lo = (lo - padding).max(0.0);
        let hi = (hi + padding).min(1.0);
        if hi - lo <= 0.0 || hi.is_nan() || lo.is_nan() {
            return Self::full(size, gridlines);
        }
        Self {
            scale: size / (hi - lo),
            origin: lo,
            gridlines,
        }
    }

    /// Pixels per unit.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Maps one coordinate.
    #[must_use]
    pub fn to_pixels(&self, c: f64) -> f64 {
        self.scale * c - self.scale * self.origin
    }

    /// Maps a point.
    #[must_use]
    pub fn point_to_pixels(&self, p: DVec2) -> DVec2 {
        DVec2::new(self.to_pixels(p.x), self.to_pixels(p.y))
    }

    /// Converts a length (such as a radius) to pixels.
    #[must_use]
    pub fn length_to_pixels(&self, length: f64) -> f64 {
        self.scale * length
    }

    /// Pixel positions of the grid lines, shared by both axes.
    ///
    /// Line `i` sits at unit coordinate `i / gridlines`.
    #[must_use]
    pub fn grid_lines(&self) -> Vec<f64> {
        let count = self.gridlines;
        if count == 0 {
            return Vec::new();
        }
        (0..count)
            .map(|i| self.to_pixels(f64::from(i) / f64::from(count)))
            .collect()
    }
}

// =============================================================================
// Entity views
// =============================================================================

/// What a renderer needs to draw one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    /// Kind of the entity.
    pub kind: EntityKind,
    /// Entity id.
    pub id: EntityId,
    /// Centre x in pixels.
    pub x: f64,
    /// Centre y in pixels.
    pub y: f64,
    /// Radius in pixels.
    pub radius: f64,
    /// Fill hue in `[0, 0.8)`.
    pub hue: f64,
    /// Outline hue in `[0, 0.8)`.
    pub stroke_hue: f64,
    /// Text drawn under players; `None` for autonomous entities.
    pub label: Option<String>,
    /// Baseline y of the label in pixels.
    pub label_y: f64,
}

impl EntityView {
    /// Snapshots `entity` through `viewport` at `tick`.
    #[must_use]
    pub fn of(entity: &Entity, viewport: &Viewport, tick: u64) -> Self {
        let position = entity.position();
        let centre = viewport.point_to_pixels(position);
        let label = match entity.inner() {
            EntityInner::Player(p) => Some(p.display_label(tick).to_owned()),
            EntityInner::Autonomous(_) => None,
        };
        Self {
            kind: entity.kind(),
            id: entity.id(),
            x: centre.x,
            y: centre.y,
            radius: viewport.length_to_pixels(entity.radius()),
            hue: entity.hue(),
            stroke_hue: entity.stroke_hue(),
            label,
            label_y: viewport.to_pixels(position.y + entity.radius() + LABEL_GAP),
        }
    }
}

/// Views of every live entity, players first.
#[must_use]
pub fn entity_views(arena: &Arena, viewport: &Viewport) -> Vec<EntityView> {
    let tick = arena.current_tick();
    arena
        .entities()
        .map(|e| EntityView::of(e, viewport, tick))
        .collect()
}

// =============================================================================
// HUD
// =============================================================================

/// One player's line on the heads-up display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudLine {
    /// Player label (never the temporary override).
    pub label: String,
    /// Visible level.
    pub level: u32,
    /// Percent of the way to the next level.
    pub progress: u8,
}

/// HUD lines for every live player, in id order.
#[must_use]
pub fn hud(arena: &Arena) -> Vec<HudLine> {
    arena
        .players()
        .iter()
        .map(|p| HudLine {
            label: p.label(),
            level: p.visible_level(),
            progress: p.level_progress(),
        })
        .collect()
}
