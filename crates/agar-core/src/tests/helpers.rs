//! Test helper functions for setting up arenas and running ticks.

use glam::DVec2;

use crate::arena::Arena;
use crate::config::ArenaConfig;
use crate::outcome::TickReport;

// =============================================================================
// Arena Setup
// =============================================================================

/// Configuration where every respawned autonomous entity is level 1.
pub fn small_respawn_config() -> ArenaConfig {
    ArenaConfig {
        min_small_autonomous: 100,
        ..ArenaConfig::default()
    }
}

/// Builds an arena from `(level, x, y)` triples without any placement checks.
///
/// Autonomous entities all face heading 0.
pub fn scripted_arena(
    config: ArenaConfig,
    seed: u64,
    players: &[(f64, f64, f64)],
    autonomous: &[(f64, f64, f64)],
) -> Arena {
    let mut arena = Arena::new(config, seed).expect("test config should be valid");
    for &(level, x, y) in players {
        arena.insert_player(level, DVec2::new(x, y), None);
    }
    for &(level, x, y) in autonomous {
        arena.insert_autonomous(level, DVec2::new(x, y), 0.0);
    }
    arena
}

/// A populated default arena.
pub fn populated_arena(seed: u64) -> Arena {
    let mut arena = Arena::new(ArenaConfig::default(), seed).expect("default config is valid");
    arena.populate().expect("default population fits");
    arena
}

// =============================================================================
// Running
// =============================================================================

/// Runs up to `ticks` ticks, stopping after the tick that ends the game.
pub fn run_until_outcome(arena: &mut Arena, ticks: usize) -> Vec<TickReport> {
    let mut reports = Vec::new();
    for _ in 0..ticks {
        let report = arena.update().expect("tick should not fail");
        let done = report.outcome.is_some();
        reports.push(report);
        if done {
            break;
        }
    }
    reports
}

// =============================================================================
// Assertions
// =============================================================================

/// Asserts every entity sits inside the unit square.
pub fn assert_contained(arena: &Arena) {
    for entity in arena.entities() {
        let p = entity.position();
        assert!(
            (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y),
            "{} escaped to {p}",
            entity.label()
        );
    }
}

/// Asserts the arena has no colliding pair left.
pub fn assert_settled(arena: &Arena) {
    assert_eq!(arena.colliding_pair(), None, "tick ended with a collision");
}
