//! Headless driver for the `stomp` simulation.
//!
//! Runs a session for a fixed number of frames with scripted input and logs
//! what happens.
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::Vec2;
use log::{debug, info};
use stomp::{
    init_logging, AudioSink, EntityId, EntityView, FrameInput, FrameObserver, InputSource,
    MusicCommand, Outcome, Session, SessionConfig,
};

/// Horizontal direction held by the scripted player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Walk {
    Left,
    Right,
    #[value(name = "none")]
    Stand,
}

impl Walk {
    const fn intent(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
            Self::Stand => 0.0,
        }
    }
}

/// A fixed-timestep platformer simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON level file; the built-in level is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Real time covered by each frame, in milliseconds
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,
    /// Direction the player walks
    #[arg(long, value_enum, default_value_t = Walk::Stand)]
    walk: Walk,
    /// Press jump every N frames
    #[arg(long)]
    jump_every: Option<u32>,
    /// Log the level as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

struct ScriptedInput {
    walk: Walk,
    jump_every: Option<u32>,
    frame: u32,
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> FrameInput {
        self.frame = self.frame.saturating_add(1);
        let jump = self
            .jump_every
            .is_some_and(|n| n > 0 && self.frame % n == 0);
        FrameInput {
            movement: Vec2::new(self.walk.intent(), 0.0),
            jump,
            music: None,
        }
    }
}

struct LogAudio;

impl AudioSink for LogAudio {
    fn jump_initiated(&mut self, entity: EntityId) {
        debug!("sfx: jump ({entity})");
    }

    fn music(&mut self, command: MusicCommand) {
        info!("music: {command:?}");
    }
}

#[derive(Default)]
struct LogObserver {
    last: Outcome,
    frames: u64,
}

impl FrameObserver for LogObserver {
    fn observe(&mut self, views: &[EntityView], outcome: &Outcome) {
        self.frames = self.frames.saturating_add(1);
        if *outcome != self.last {
            info!(
                "frame {}: kills {}/{}, win {}, lose {}",
                self.frames, outcome.kills, outcome.total_enemies, outcome.win, outcome.lose
            );
            self.last = *outcome;
        }
        if let Some(player) = views.first() {
            log::trace!("frame {}: player at {:?}", self.frames, player.position);
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("loading level from {}", path.display()))?,
        None => SessionConfig::default(),
    };

    if args.dump_config {
        info!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let elapsed = Duration::try_from_secs_f64(args.frame_ms / 1000.0)
        .with_context(|| format!("invalid frame duration {}ms", args.frame_ms))?;
    let mut session = Session::new(config).context("building session")?;
    let mut input = ScriptedInput {
        walk: args.walk,
        jump_every: args.jump_every,
        frame: 0,
    };
    let mut audio = LogAudio;
    let mut observer = LogObserver::default();

    for _ in 0..args.frames {
        let report = session.run_frame(elapsed, &mut input, &mut audio, &mut observer);
        if report.outcome.is_over() {
            break;
        }
    }

    let outcome = session.outcome();
    info!(
        "finished after {} ticks: kills {}/{}, {}",
        session.tick_count(),
        outcome.kills,
        outcome.total_enemies,
        if outcome.win {
            "won"
        } else if outcome.lose {
            "lost"
        } else {
            "undecided"
        }
    );
    Ok(())
}
