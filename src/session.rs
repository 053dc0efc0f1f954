//! Game session driver
//!
//! Owns the state pair across frames and runs the per-frame pipeline:
//! step, enemy fire, player intents, bonus spawning, march beat and the
//! periodic difficulty advisory. Rendering and audio consume the results.

use std::sync::Arc;

use crate::advisory::AdvisoryPoller;
use crate::difficulty::{DifficultyAdvisor, DifficultySettings};
use crate::settings::Settings;
use crate::sim::{
    GameEvent, GameMetrics, GameState, MoveDirection, SimContext, TickInput, enemy_shoot,
    move_player, shoot_bullet, should_spawn_bonus, spawn_bonus, update,
};

/// Longest frame the step will simulate (s); longer gaps are clamped
pub const MAX_FRAME_SECS: f32 = 0.1;

/// Input intents for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Fire pressed this frame
    pub fire: bool,
    /// Pause toggle pressed this frame
    pub pause: bool,
}

pub struct Session {
    ctx: SimContext,
    state: GameState,
    metrics: GameMetrics,
    difficulty: DifficultySettings,
    advisory: AdvisoryPoller,
    settings: Settings,
    last_frame_ms: Option<u64>,
    last_advisory_ms: u64,
    stop_sent: bool,
}

impl Session {
    pub fn new(seed: u64, mut settings: Settings, advisor: Arc<dyn DifficultyAdvisor>) -> Self {
        settings.sanitize();
        let mut ctx = SimContext::new(seed);
        let state = GameState::new(&mut ctx.rng);
        Self {
            ctx,
            state,
            metrics: GameMetrics::new(0),
            difficulty: DifficultySettings::default(),
            advisory: AdvisoryPoller::new(advisor, settings.warmup_secs),
            settings,
            last_frame_ms: None,
            last_advisory_ms: 0,
            stop_sent: false,
        }
    }

    /// Begin a fresh run (also used for restart)
    pub fn start(&mut self, now_ms: u64) -> Vec<GameEvent> {
        self.ctx.reset(now_ms);
        let mut state = GameState::new(&mut self.ctx.rng);
        state.is_playing = true;
        state.lives = self.settings.starting_lives;
        self.state = state;
        self.metrics = GameMetrics::new(now_ms);
        self.difficulty = DifficultySettings::default();
        self.advisory.cancel();
        self.last_frame_ms = Some(now_ms);
        self.last_advisory_ms = now_ms;
        self.stop_sent = false;
        log::info!("Game started (seed {})", self.ctx.seed);
        vec![GameEvent::FormationStart]
    }

    pub fn toggle_pause(&mut self) {
        if self.state.is_playing && !self.state.is_game_over {
            self.state.is_paused = !self.state.is_paused;
            log::debug!("Paused: {}", self.state.is_paused);
        }
    }

    /// Run one frame at `now_ms`, returning the events it produced
    pub fn frame(&mut self, input: &FrameInput, now_ms: u64) -> Vec<GameEvent> {
        if input.pause {
            self.toggle_pause();
        }
        let prev_ms = self.last_frame_ms.replace(now_ms).unwrap_or(now_ms);
        if !self.state.is_running() {
            return Vec::new();
        }

        let delta_time =
            (now_ms.saturating_sub(prev_ms) as f32 / 1000.0).min(MAX_FRAME_SECS);
        let tick = TickInput {
            delta_time,
            now_ms,
            enemy_speed: self.difficulty.enemy_speed,
        };

        let step = update(
            &mut self.ctx,
            std::mem::take(&mut self.state),
            std::mem::take(&mut self.metrics),
            &tick,
        );
        let mut events = step.events;
        let mut state = enemy_shoot(step.state, self.difficulty.enemy_fire_rate, &mut self.ctx.rng);
        let mut metrics = step.metrics;

        if input.move_left {
            state = move_player(state, MoveDirection::Left);
        }
        if input.move_right {
            state = move_player(state, MoveDirection::Right);
        }
        if input.fire && state.is_running() {
            let shot = shoot_bullet(state, metrics);
            state = shot.state;
            metrics = shot.metrics;
            events.extend(shot.events);
        }

        if should_spawn_bonus(&mut self.ctx, &state, now_ms) {
            events.push(spawn_bonus(&mut state, &mut self.ctx.rng));
        }

        let beat = self.settings.march_interval_ms;
        if now_ms / beat != prev_ms / beat {
            events.push(GameEvent::FormationStep);
        }

        self.poll_difficulty(&metrics, now_ms);

        if state.is_game_over && !self.stop_sent {
            self.stop_sent = true;
            events.push(GameEvent::FormationStop);
        }

        self.state = state;
        self.metrics = metrics;
        events
    }

    /// Apply a finished advisory answer and start a new request on cadence
    fn poll_difficulty(&mut self, metrics: &GameMetrics, now_ms: u64) {
        if let Some(settings) = self.advisory.poll() {
            if settings.tier() != self.difficulty.tier() {
                log::info!("Difficulty: {}", settings.tier().message());
            }
            self.difficulty = settings;
        }
        if now_ms.saturating_sub(self.last_advisory_ms) > self.settings.advisory_interval_ms {
            self.last_advisory_ms = now_ms;
            self.advisory.request(metrics);
        }
    }

    /// Read-only snapshot for rendering
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn difficulty(&self) -> &DifficultySettings {
        &self.difficulty
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Block briefly for an in-flight advisory answer (headless runs)
    pub fn settle_advisory(&mut self, timeout: std::time::Duration) {
        if let Some(settings) = self.advisory.wait(timeout) {
            self.difficulty = settings;
        }
    }
}
