//! End-to-end tick scenarios.
//!
//! Each test scripts a small arena, runs one or more full ticks and checks
//! the resulting entities, notifications and outcome.

use glam::DVec2;

use crate::config::{ArenaConfig, SessionConfig};
use crate::entity::EntityKind;
use crate::input::Key;
use crate::outcome::{Notification, Outcome, CAUTIONS};
use crate::session::{Session, SessionState};
use crate::viewport::{entity_views, hud, Viewport};

use super::helpers::{
    assert_contained, assert_settled, populated_arena, run_until_outcome, scripted_arena,
    small_respawn_config,
};

// =============================================================================
// Terminal Outcomes
// =============================================================================

#[test]
fn last_player_eaten_at_level_two_loses() {
    let mut arena = scripted_arena(
        ArenaConfig::default(),
        1,
        &[(2.0, 0.5, 0.5)],
        &[(3.0, 0.502, 0.5)],
    );

    let report = arena.update().unwrap();

    assert_eq!(
        report.notifications,
        vec![Notification::PlayerDied {
            label: "arrows".into()
        }]
    );
    let Some(Outcome::Lost { loser }) = &report.outcome else {
        panic!("expected a loss, got {:?}", report.outcome);
    };
    assert_eq!(loser.label, "arrows");
    assert!((loser.max_level - 2.0).abs() < 1e-12);
    assert!(arena.players().is_empty());
    assert_eq!(
        report.outcome.as_ref().map(ToString::to_string).as_deref(),
        Some("You lost! Max level: 2.")
    );
}

#[test]
fn surviving_teammate_keeps_the_game_going() {
    let mut arena = scripted_arena(
        ArenaConfig::default(),
        1,
        &[(2.0, 0.5, 0.5), (2.0, 0.9, 0.9)],
        &[(3.0, 0.502, 0.5)],
    );

    let report = arena.update().unwrap();

    assert_eq!(report.messages().collect::<Vec<_>>(), vec!["arrows died"]);
    assert!(report.outcome.is_none());
    assert_eq!(arena.players().len(), 1);
    assert_eq!(arena.players()[0].label(), "wasd");
}

#[test]
fn player_outgrowing_the_field_wins() {
    // A handful of level-1 meals takes the player from 2 to 4, more than one
    // level above the largest autonomous entity (level 2, far away).
    let nearby: Vec<_> = (1..=6)
        .map(|k| (1.0, 0.5 + 0.001 * f64::from(k), 0.5))
        .chain(std::iter::once((2.0, 0.1, 0.1)))
        .collect();
    let mut arena = scripted_arena(small_respawn_config(), 3, &[(2.0, 0.5, 0.5)], &nearby);

    let report = arena.update().unwrap();

    let Some(Outcome::Won { winner }) = &report.outcome else {
        panic!("expected a win, got {:?}", report.outcome);
    };
    assert_eq!(winner.kind, EntityKind::Player);
    assert_eq!(winner.visible_level(), 4);
    assert_eq!(
        report.outcome.as_ref().map(ToString::to_string).as_deref(),
        Some("You win! Level 4.")
    );
    assert!(report.notifications.is_empty());
}

#[test]
fn autonomous_entity_maxing_out_wins_for_itself() {
    let config = ArenaConfig {
        max_level: 3,
        ..ArenaConfig::default()
    };
    let mut arena = scripted_arena(config, 2, &[(2.0, 0.503, 0.5)], &[(3.9, 0.5, 0.5)]);

    let report = arena.update().unwrap();

    let Some(Outcome::Won { winner }) = &report.outcome else {
        panic!("expected a win, got {:?}", report.outcome);
    };
    assert_eq!(winner.kind, EntityKind::Autonomous);
    assert_eq!(winner.visible_level(), 4);
    // The game ended before the eaten player was touched.
    assert_eq!(arena.players()[0].visible_level(), 2);
}

// =============================================================================
// Mid-game Resolution
// =============================================================================

#[test]
fn eaten_autonomous_entity_is_replaced() {
    let mut arena = scripted_arena(
        small_respawn_config(),
        4,
        &[(3.0, 0.5, 0.5)],
        &[(1.0, 0.503, 0.5), (4.0, 0.9, 0.1)],
    );

    let report = arena.update().unwrap();

    assert!(report.outcome.is_none());
    assert_eq!(arena.autonomous().len(), 2);
    assert!((arena.players()[0].level() - (3.0 + 1.0 / 3.0)).abs() < 1e-12);
    assert_settled(&arena);
}

#[test]
fn surviving_player_is_recentered_with_a_warning() {
    let mut arena = scripted_arena(
        ArenaConfig::default(),
        5,
        &[(3.0, 0.2, 0.2)],
        &[(4.0, 0.203, 0.2)],
    );

    let report = arena.update().unwrap();

    assert!(report.outcome.is_none());
    let [Notification::PlayerEaten { label, message }] = report.notifications.as_slice() else {
        panic!("expected one eaten notification, got {:?}", report.notifications);
    };
    assert_eq!(label, "arrows");
    assert!(CAUTIONS.contains(&message.as_str()));

    let player = &arena.players()[0];
    assert_eq!(player.position(), DVec2::new(0.5, 0.5));
    assert_eq!(player.visible_level(), 2);

    let components = player.as_player().unwrap();
    let temporary = components.temporary_label.as_ref().unwrap();
    assert_eq!(temporary.expires_at, 1 + arena.config().temporary_label_ticks);
    assert_eq!(components.display_label(temporary.expires_at - 1), message.as_str());
    assert_eq!(components.display_label(temporary.expires_at), "arrows");

    // The eater grew by 3/4.
    assert!((arena.autonomous()[0].level() - 4.75).abs() < 1e-12);
}

#[test]
fn equal_level_players_bounce_apart() {
    let mut arena = scripted_arena(
        ArenaConfig::default(),
        6,
        &[(3.0, 0.3, 0.3), (3.0, 0.305, 0.3)],
        &[],
    );

    let report = arena.update().unwrap();

    assert!(report.outcome.is_none());
    assert!(report.notifications.is_empty());
    let (a, b) = (&arena.players()[0], &arena.players()[1]);
    assert!(!a.collides(b));
    assert!(a.position().x < 0.3);
    assert!(b.position().x > 0.305);
    assert_eq!(a.visible_level(), 3);
    assert_eq!(b.visible_level(), 3);
}

#[test]
fn steering_moves_a_player() {
    let mut arena = scripted_arena(ArenaConfig::default(), 7, &[(2.0, 0.5, 0.5)], &[]);
    assert!(arena.key_down(Key::Right));
    assert!(arena.key_down(Key::Down));

    arena.update().unwrap();

    let position = arena.players()[0].position();
    let step = arena.players()[0].base_velocity();
    // Right + down is 7/8 of a turn: down-right on screen.
    let expected = DVec2::new(0.5, 0.5) + step * DVec2::new(1.0, 1.0).normalize();
    assert!(position.distance(expected) < 1e-12);
}

// =============================================================================
// Long Runs
// =============================================================================

#[test]
fn populated_arena_keeps_its_invariants() {
    let mut arena = populated_arena(11);
    let population = arena.autonomous().len();
    arena.key_down(Key::Up);
    arena.key_down(Key::Char('a'));

    for _ in 0..300 {
        let report = arena.update().unwrap();
        assert_contained(&arena);
        if report.outcome.is_some() {
            break;
        }
        assert_settled(&arena);
        assert_eq!(arena.autonomous().len(), population);
    }
}

#[test]
fn run_stops_at_the_deciding_tick() {
    let mut arena = scripted_arena(
        ArenaConfig::default(),
        1,
        &[(2.0, 0.5, 0.5)],
        &[(3.0, 0.502, 0.5)],
    );
    let reports = run_until_outcome(&mut arena, 50);
    assert_eq!(reports.len(), 1);
    assert_eq!(arena.current_tick(), 1);
}

#[test]
fn viewport_follows_players_through_a_game() {
    let mut arena = populated_arena(12);
    arena.update().unwrap();

    let viewport = Viewport::fit(&arena);
    let views = entity_views(&arena, &viewport);
    assert_eq!(views.len(), arena.players().len() + arena.autonomous().len());
    for view in views.iter().filter(|v| v.kind == EntityKind::Player) {
        assert!((0.0..=500.0).contains(&view.x));
        assert!((0.0..=500.0).contains(&view.y));
    }
    assert_eq!(hud(&arena).len(), arena.players().len());
}

#[test]
fn session_plays_a_scripted_loss_to_the_end() {
    let mut session = Session::new(SessionConfig::default(), 0).unwrap();
    session.start_with(scripted_arena(
        ArenaConfig::default(),
        1,
        &[(2.0, 0.5, 0.5)],
        &[(3.0, 0.502, 0.5)],
    ));

    let mut now = 0;
    let mut seen = Vec::new();
    while session.state() != &SessionState::Idle {
        if let Some(toast) = session.current_toast() {
            if seen.last().map(String::as_str) != Some(toast) {
                seen.push(toast.to_owned());
            }
        }
        session.frame(now).unwrap();
        now += 16;
        assert!(now < 10_000, "session never returned to idle");
    }

    assert_eq!(seen, vec!["arrows died", "You lost! Max level: 2."]);
}
