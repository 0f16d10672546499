//! Crowd Runner headless entry point
//!
//! Runs sessions without a renderer and prints each result as JSON. Steering
//! comes from the autopilot unless `--manual` is given.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::Parser;

use crowd_runner::Tuning;
use crowd_runner::sim::{GameState, Level, SessionPhase, SessionResult, TickInput, tick};

#[derive(Parser, Debug)]
#[command(name = "crowd-runner")]
#[command(about = "Headless Crowd Runner sessions (autopilot by default)")]
struct Cli {
    /// Level to start on (1-3)
    #[arg(long, default_value_t = 1)]
    level: u8,

    /// RNG seed; defaults to the current time
    #[arg(long)]
    seed: Option<u64>,

    /// Give up on a session after this many frames
    #[arg(long, default_value_t = 20_000)]
    frames: u64,

    /// JSON tuning table
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Keep going: next level on a win, back to level 1 on a loss
    #[arg(long)]
    campaign: bool,

    /// Session limit in campaign mode
    #[arg(long, default_value_t = 10)]
    sessions: u32,

    /// Never steer (the crowd stays in the middle lane)
    #[arg(long)]
    manual: bool,
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading tuning file {}", path.display()))?;
    Tuning::from_json(&json).with_context(|| format!("loading tuning file {}", path.display()))
}

/// Play one level to a terminal state or the frame cap
fn run_session(
    level: Level,
    seed: u64,
    tuning: &Tuning,
    max_frames: u64,
    manual: bool,
) -> Result<SessionResult> {
    let mut state = GameState::with_tuning(level, seed, tuning.clone())?;
    let input = if manual {
        TickInput::default()
    } else {
        TickInput::autopilot()
    };

    while !state.phase.is_terminal() && state.frame < max_frames {
        tick(&mut state, &input);
    }
    if !state.phase.is_terminal() {
        log::warn!("Frame cap {} reached on level {}", max_frames, level.number());
    }
    Ok(state.result())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut level = Level::try_from(cli.level)?;
    if cli.frames == 0 {
        bail!("--frames must be at least 1");
    }
    if cli.campaign && cli.sessions == 0 {
        bail!("--sessions must be at least 1");
    }
    let tuning = load_tuning(cli.tuning.as_ref())?;
    let mut seed = cli.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    });

    log::info!("Crowd Runner (headless) starting...");
    let pool: Vec<String> = level.operation_pool().iter().map(|op| op.symbol()).collect();
    log::info!("Level {} operations: {}", level.number(), pool.join(" "));

    for _ in 0..cli.sessions.max(1) {
        let result = run_session(level, seed, &tuning, cli.frames, cli.manual)?;
        println!("{}", serde_json::to_string_pretty(&result)?);

        if !cli.campaign {
            break;
        }
        level = match result.outcome {
            SessionPhase::Won => match level.next() {
                Some(next) => next,
                None => {
                    log::info!("All levels cleared with {} survivors", result.population);
                    break;
                }
            },
            SessionPhase::Lost => {
                log::info!("Restarting campaign from level 1");
                Level::One
            }
            SessionPhase::Active => break,
        };
        seed = seed.wrapping_add(1);
    }

    Ok(())
}
