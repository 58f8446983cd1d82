//! # Agar Headless
//!
//! Plays one session without a window. Every player binding gets random
//! direction keys, re-rolled every `--key-hold` ticks, and frames run on a
//! simulated 16 ms clock. Notifications are logged as they happen and the
//! outcome is printed at the end.

use std::fs;
use std::path::{Path, PathBuf};

use agar_core::input::BINDINGS;
use agar_core::viewport::hud;
use agar_core::{Key, Outcome, Session, SessionConfig};
use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Simulated time between frames.
const FRAME_MS: u64 = 16;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the arena and the scripted input
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Maximum number of ticks to run
    #[arg(short, long, default_value_t = 3600)]
    ticks: u64,

    /// JSON session config; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Ticks between changes of the held keys
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    key_hold: u64,
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// Stand-in for the keyboard: holds random direction keys per binding.
struct ScriptedInput {
    rng: ChaCha8Rng,
    held: Vec<Vec<Key>>,
}

impl ScriptedInput {
    fn new(seed: u64, players: usize) -> Self {
        Self {
            // Offset so the input stream differs from the arena's own.
            rng: ChaCha8Rng::seed_from_u64(seed ^ 0x5eed),
            held: vec![Vec::new(); players.min(BINDINGS.len())],
        }
    }

    /// Releases every held key, then presses up to two new ones per binding.
    fn reroll(&mut self, session: &mut Session) -> Result<()> {
        for (row, held) in BINDINGS.iter().zip(self.held.iter_mut()) {
            for key in held.drain(..) {
                session.key_up(key);
            }
            let presses = self.rng.gen_range(0..=2);
            for _ in 0..presses {
                let key = row[self.rng.gen_range(0..row.len())];
                if !held.contains(&key) {
                    session.key_down(key)?;
                    held.push(key);
                }
            }
            debug!(keys = ?held, "Holding keys");
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = load_config(args.config.as_deref())?;
    let players = config.arena.player_count;
    let mut session = Session::new(config, args.seed).context("invalid session config")?;
    let mut input = ScriptedInput::new(args.seed, players);

    session
        .key_down(Key::Space)
        .context("could not start a game")?;
    info!(seed = args.seed, ticks = args.ticks, "Headless run started");

    let mut outcome: Option<Outcome> = None;
    let mut ticks_run = 0;
    for tick in 0..args.ticks {
        if tick % args.key_hold == 0 {
            input.reroll(&mut session)?;
        }
        let report = session
            .frame(tick * FRAME_MS)
            .with_context(|| format!("tick {} failed", tick + 1))?;
        let Some(report) = report else {
            break;
        };
        ticks_run = report.tick;
        for message in report.messages() {
            info!(tick = report.tick, "{message}");
        }
        if report.outcome.is_some() {
            outcome = report.outcome;
            break;
        }
    }

    match &outcome {
        Some(outcome) => println!(
            "{outcome} ({} after {ticks_run} ticks)",
            outcome.subject().label
        ),
        None => println!("No result after {ticks_run} ticks."),
    }
    if let Some(arena) = session.arena() {
        for line in hud(arena) {
            println!(
                "{}: level {} ({}% to next)",
                line.label, line.level, line.progress
            );
        }
    }
    Ok(())
}
