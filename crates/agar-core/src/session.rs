//! Session controller: game lifecycle, input routing and toasts.
//!
//! A [`Session`] cycles through [`SessionState`]:
//!
//! ```text
//! Idle --Space--> Playing --outcome--> Ended(outcome) --toasts drained--> Idle
//! ```
//!
//! Every game gets a fresh [`Arena`]. Keys reach the arena only while
//! playing. Notifications and the terminal message are queued as toasts; the
//! caller drives toast timing with its own millisecond clock.
//!
//! # Example
//!
//! ```
//! use agar_core::config::SessionConfig;
//! use agar_core::input::Key;
//! use agar_core::session::{Session, SessionState};
//!
//! let mut session = Session::new(SessionConfig::default(), 9).unwrap();
//! assert_eq!(session.state(), &SessionState::Idle);
//!
//! session.key_down(Key::Space).unwrap();
//! assert_eq!(session.state(), &SessionState::Playing);
//!
//! session.frame(0).unwrap();
//! assert_eq!(session.arena().map(|a| a.current_tick()), Some(1));
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::arena::Arena;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::input::Key;
use crate::outcome::{Outcome, TickReport};

/// Key that starts a game from [`SessionState::Idle`].
pub const START_KEY: Key = Key::Space;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    /// Title screen; waiting for [`START_KEY`].
    Idle,
    /// A game is running.
    Playing,
    /// The game ended; waiting for the toasts to drain.
    Ended(Outcome),
}

// =============================================================================
// Toasts
// =============================================================================

/// FIFO of short messages shown one at a time.
///
/// The front toast stays up for the long duration when it is alone and for
/// the short one while others wait behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastQueue {
    queue: VecDeque<String>,
    /// When the front toast went up.
    started_ms: u64,
    long_ms: u64,
    short_ms: u64,
}

impl ToastQueue {
    /// Creates an empty queue with the given display durations.
    #[must_use]
    pub const fn new(long_ms: u64, short_ms: u64) -> Self {
        Self {
            queue: VecDeque::new(),
            started_ms: 0,
            long_ms,
            short_ms,
        }
    }

    /// Queues a message. A message reaching an empty queue goes up at `now_ms`.
    pub fn push(&mut self, message: impl Into<String>, now_ms: u64) {
        if self.queue.is_empty() {
            self.started_ms = now_ms;
        }
        self.queue.push_back(message.into());
    }

    /// Retires the front toast once its time is up. At most one toast is
    /// retired per call.
    pub fn advance(&mut self, now_ms: u64) {
        let duration = if self.queue.len() == 1 {
            self.long_ms
        } else {
            self.short_ms
        };
        if !self.queue.is_empty() && now_ms >= self.started_ms.saturating_add(duration) {
            self.queue.pop_front();
            self.started_ms = now_ms;
        }
    }

    /// Message currently on screen.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    /// Number of queued messages, including the one on screen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// =============================================================================
// Session
// =============================================================================

/// Owns the current game and everything around it.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    /// Seed of the first game; game `n` uses `seed + n`.
    seed: u64,
    games_started: u64,
    state: SessionState,
    /// The running game, kept after it ends so it can still be drawn.
    arena: Option<Arena>,
    toasts: ToastQueue,
}

impl Session {
    /// Creates an idle session.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidConfig`](crate::error::ArenaError::InvalidConfig)
    /// if `config` does not validate.
    pub fn new(config: SessionConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let toasts = ToastQueue::new(config.long_toast_ms, config.short_toast_ms);
        Ok(Self {
            config,
            seed,
            games_started: 0,
            state: SessionState::Idle,
            arena: None,
            toasts,
        })
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// True while a game is running.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self.state, SessionState::Playing)
    }

    /// The current (or last) game.
    #[must_use]
    pub const fn arena(&self) -> Option<&Arena> {
        self.arena.as_ref()
    }

    /// Configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Toast currently on screen.
    #[must_use]
    pub fn current_toast(&self) -> Option<&str> {
        self.toasts.current()
    }

    /// The toast queue.
    #[must_use]
    pub const fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    /// Starts a game with a freshly populated arena.
    ///
    /// # Errors
    ///
    /// Propagates placement failures from populating the arena.
    pub fn start(&mut self) -> Result<()> {
        let seed = self.seed.wrapping_add(self.games_started);
        let mut arena = Arena::new(self.config.arena.clone(), seed)?;
        arena.populate()?;
        self.start_with(arena);
        Ok(())
    }

    /// Starts a game on a prepared arena.
    pub fn start_with(&mut self, arena: Arena) {
        self.games_started += 1;
        info!(
            game = self.games_started,
            seed = arena.seed(),
            players = arena.players().len(),
            "Game started"
        );
        self.arena = Some(arena);
        self.state = SessionState::Playing;
    }

    /// The arena, if a game is running.
    fn live_arena(&mut self) -> Option<&mut Arena> {
        match self.state {
            SessionState::Playing => self.arena.as_mut(),
            _ => None,
        }
    }

    /// Handles a key press.
    ///
    /// [`START_KEY`] starts a game when idle; the press is then routed to the
    /// new game like any other key.
    ///
    /// # Errors
    ///
    /// Propagates failures from starting a game.
    pub fn key_down(&mut self, key: Key) -> Result<()> {
        if key == START_KEY && self.state == SessionState::Idle {
            self.start()?;
        }
        if let Some(arena) = self.live_arena() {
            arena.key_down(key);
        }
        Ok(())
    }

    /// Handles a key release.
    pub fn key_up(&mut self, key: Key) {
        if let Some(arena) = self.live_arena() {
            arena.key_up(key);
        }
    }

    /// Runs one frame at `now_ms`.
    ///
    /// An ended session returns to idle once its toasts have drained. While
    /// playing, the arena runs one tick; its notifications and any outcome
    /// are queued as toasts. Returns the tick's report, if a tick ran.
    ///
    /// # Errors
    ///
    /// Propagates a fatal [`ArenaError`](crate::error::ArenaError) from the
    /// tick. The session stays in [`SessionState::Playing`].
    pub fn frame(&mut self, now_ms: u64) -> Result<Option<TickReport>> {
        if matches!(self.state, SessionState::Ended(_)) && self.toasts.is_empty() {
            info!("Back to title");
            self.state = SessionState::Idle;
        }

        let mut report = None;
        let live = match self.state {
            SessionState::Playing => self.arena.as_mut(),
            _ => None,
        };
        if let Some(arena) = live {
            let tick = arena.update()?;
            for message in tick.messages() {
                self.toasts.push(message, now_ms);
            }
            if let Some(outcome) = &tick.outcome {
                self.toasts.push(outcome.to_string(), now_ms);
                self.state = SessionState::Ended(outcome.clone());
            }
            report = Some(tick);
        }

        self.toasts.advance(now_ms);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;
    use glam::DVec2;

    mod toast_tests {
        use super::*;

        #[test]
        fn lone_toast_stays_long() {
            let mut toasts = ToastQueue::new(2500, 500);
            toasts.push("hello", 100);
            toasts.advance(2599);
            assert_eq!(toasts.current(), Some("hello"));
            toasts.advance(2600);
            assert!(toasts.is_empty());
        }

        #[test]
        fn waiting_toasts_shorten_the_front() {
            let mut toasts = ToastQueue::new(2500, 500);
            toasts.push("a", 0);
            toasts.push("b", 10);
            toasts.advance(499);
            assert_eq!(toasts.current(), Some("a"));
            toasts.advance(500);
            assert_eq!(toasts.current(), Some("b"));
            // "b" is alone now and went up at 500.
            toasts.advance(2999);
            assert_eq!(toasts.len(), 1);
            toasts.advance(3000);
            assert!(toasts.is_empty());
        }
    }

    mod lifecycle_tests {
        use super::*;

        fn losing_arena() -> Arena {
            let mut arena = Arena::new(ArenaConfig::default(), 5).unwrap();
            arena.insert_player(2.0, DVec2::new(0.5, 0.5), None);
            arena.insert_autonomous(3.0, DVec2::new(0.502, 0.5), 0.0);
            arena
        }

        #[test]
        fn space_starts_only_from_idle() {
            let mut session = Session::new(SessionConfig::default(), 1).unwrap();
            session.key_down(Key::Up).unwrap();
            assert_eq!(session.state(), &SessionState::Idle);
            assert!(session.arena().is_none());

            session.key_down(Key::Space).unwrap();
            assert!(session.is_playing());
            assert_eq!(session.arena().map(|a| a.players().len()), Some(2));
        }

        #[test]
        fn keys_reach_players_while_playing() {
            let mut session = Session::new(SessionConfig::default(), 1).unwrap();
            session.key_down(Key::Space).unwrap();
            session.key_down(Key::Char('d')).unwrap();
            let held = |s: &Session| s.arena().unwrap().players()[1].as_player().unwrap().held;
            assert!(!held(&session).is_empty());
            session.key_up(Key::Char('d'));
            assert!(held(&session).is_empty());
        }

        #[test]
        fn loss_ends_then_returns_to_idle() {
            let mut session = Session::new(SessionConfig::default(), 1).unwrap();
            session.start_with(losing_arena());

            let report = session.frame(0).unwrap().unwrap();
            assert!(report.outcome.is_some());
            assert!(matches!(
                session.state(),
                SessionState::Ended(Outcome::Lost { .. })
            ));
            assert_eq!(session.current_toast(), Some("arrows died"));

            // Ended: no more ticks, keys ignored.
            assert!(session.frame(100).unwrap().is_none());
            session.key_down(Key::Space).unwrap();
            assert!(matches!(session.state(), SessionState::Ended(_)));

            session.frame(500).unwrap();
            assert_eq!(session.current_toast(), Some("You lost! Max level: 2."));
            session.frame(3000).unwrap();
            assert!(session.current_toast().is_none());
            assert!(matches!(session.state(), SessionState::Ended(_)));

            session.frame(3016).unwrap();
            assert_eq!(session.state(), &SessionState::Idle);
        }

        #[test]
        fn games_get_distinct_seeds() {
            let mut session = Session::new(SessionConfig::default(), 40).unwrap();
            session.start().unwrap();
            assert_eq!(session.arena().map(Arena::seed), Some(40));
            session.start().unwrap();
            assert_eq!(session.arena().map(Arena::seed), Some(41));
        }
    }
}
