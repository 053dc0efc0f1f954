//! Headless runner
//!
//! Plays the simulation with a simple autopilot and reports how the run went.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;
use serde::Serialize;

use invaders_sim::audio::{AudioManager, LogSink, NullSink};
use invaders_sim::difficulty::{DifficultySettings, RuleBasedAdvisor};
use invaders_sim::sim::{GameEvent, GameState};
use invaders_sim::{FrameInput, Session, Settings};

/// Headless arcade-shooter runner
#[derive(Parser, Debug)]
#[command(name = "invaders-sim")]
#[command(about = "Run the simulation with an autopilot and print a summary")]
struct Args {
    /// Random seed for deterministic runs (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Frames to simulate (overrides the settings file)
    #[arg(long)]
    frames: Option<u64>,

    /// Settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    frames: u64,
    score: u64,
    level: u32,
    lives: u32,
    game_over: bool,
    shots_attempted: u32,
    shots_hit: u32,
    accuracy_percent: f32,
    enemies_killed_total: u32,
    bonus_kills: u32,
    difficulty: DifficultySettings,
}

/// Track the lowest living enemy's column and fire whenever lined up
fn autopilot(state: &GameState, frame: u64) -> FrameInput {
    let target = state
        .alive_enemies()
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|e| e.pos.x);
    let Some(target_x) = target else {
        return FrameInput::default();
    };
    let dx = target_x - state.player_x;
    FrameInput {
        move_left: dx < -4.0,
        move_right: dx > 4.0,
        fire: dx.abs() < 20.0 && frame % 8 == 0,
        pause: false,
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let settings = args
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    let seed = args.seed.or(settings.seed).unwrap_or_else(clock_seed);
    let mut session = Session::new(seed, settings, Arc::new(RuleBasedAdvisor));

    // Sanitized copy owned by the session
    let settings = session.settings().clone();
    let max_frames = args.frames.unwrap_or(settings.max_frames);
    let frame_ms = settings.frame_ms;

    log::info!("Invaders sim starting (seed {}, {} frames)", seed, max_frames);

    let mut audio = if settings.audio_enabled {
        AudioManager::new(Box::new(LogSink))
    } else {
        AudioManager::new(Box::new(NullSink))
    };
    audio.set_master_volume(settings.master_volume);
    audio.dispatch(&session.start(0));

    let mut kills = 0u32;
    let mut bonus_kills = 0u32;
    let mut frames = 0u64;
    for frame in 1..=max_frames {
        frames = frame;
        let input = autopilot(session.state(), frame);
        let events = session.frame(&input, frame * frame_ms);
        for event in &events {
            match event {
                GameEvent::EnemyKilled { .. } => kills += 1,
                GameEvent::BonusTargetKilled { points } => {
                    bonus_kills += 1;
                    log::info!("Bonus target down for {} points", points);
                }
                _ => {}
            }
        }
        audio.dispatch(&events);
        if session.state().is_game_over {
            break;
        }
        // Keep the simulated clock and the advisor worker in step
        if frame % 60 == 0 {
            session.settle_advisory(Duration::from_millis(50));
        }
    }

    let state = session.state();
    let metrics = session.metrics();
    let summary = RunSummary {
        seed,
        frames,
        score: state.score,
        level: state.level,
        lives: state.lives,
        game_over: state.is_game_over,
        shots_attempted: metrics.shots_attempted,
        shots_hit: metrics.shots_hit,
        accuracy_percent: metrics.accuracy_percent(),
        enemies_killed_total: kills,
        bonus_kills,
        difficulty: *session.difficulty(),
    };

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                log::error!("Failed to encode summary: {}", err);
                std::process::exit(1);
            }
        }
    } else {
        println!("Seed:      {}", summary.seed);
        println!("Frames:    {}", summary.frames);
        println!("Score:     {}", summary.score);
        println!("Level:     {}", summary.level);
        println!("Lives:     {}", summary.lives);
        println!("Game over: {}", summary.game_over);
        println!(
            "Accuracy:  {:.1}% ({}/{})",
            summary.accuracy_percent, summary.shots_hit, summary.shots_attempted
        );
        println!("Kills:     {} (+{} bonus)", summary.enemies_killed_total, summary.bonus_kills);
        println!("Difficulty: {}", summary.difficulty.tier().message());
    }
}
