//! Simulation step
//!
//! Advances the world by one frame: movement, collisions, cleanup,
//! level progression and metrics, in that order.

use super::collision::{
    formation_touches_barrier, resolve_barrier_hits, resolve_player_bullets, resolve_player_hits,
};
use super::context::SimContext;
use super::events::GameEvent;
use super::metrics::GameMetrics;
use super::movement::{
    advance_bonus, advance_bullets, advance_particles, descend_formation, march_formation,
};
use super::spawn::{create_barriers, create_enemies};
use super::state::GameState;
use crate::frames_for;

/// Per-frame timing and difficulty inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Seconds since the previous frame
    pub delta_time: f32,
    /// Caller's clock (ms)
    pub now_ms: u64,
    /// Formation speed scalar from the current difficulty
    pub enemy_speed: f32,
}

/// Result of a transition: the next state pair plus the events it produced
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: GameState,
    pub metrics: GameMetrics,
    pub events: Vec<GameEvent>,
}

impl Transition {
    /// Pass the pair through untouched
    pub fn unchanged(state: GameState, metrics: GameMetrics) -> Self {
        Self {
            state,
            metrics,
            events: Vec::new(),
        }
    }
}

/// The formation reached the player or a barrier: the run is over
fn invade(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.is_game_over {
        return;
    }
    state.end_run();
    events.push(GameEvent::Invasion);
    events.push(GameEvent::PlayerHit);
}

/// Advance the game by one frame.
///
/// Identity unless the game is playing, unpaused and not over.
pub fn update(
    ctx: &mut SimContext,
    mut state: GameState,
    mut metrics: GameMetrics,
    input: &TickInput,
) -> Transition {
    if !state.is_running() {
        return Transition::unchanged(state, metrics);
    }

    let frames = frames_for(input.delta_time);
    let now_ms = input.now_ms;
    let mut events = Vec::new();

    // Formation march, descent on direction change
    if march_formation(&mut state, ctx, frames, input.enemy_speed, now_ms)
        && descend_formation(&mut state, input.enemy_speed)
    {
        invade(&mut state, &mut events);
    }
    if formation_touches_barrier(&state) {
        invade(&mut state, &mut events);
    }

    advance_bullets(&mut state, frames);
    resolve_barrier_hits(&mut state, &mut events);
    advance_bonus(&mut state, frames);
    advance_particles(&mut state, frames);

    resolve_player_bullets(&mut state, &mut metrics, &mut ctx.rng, &mut events);
    resolve_player_hits(&mut state, now_ms, &mut ctx.rng, &mut events);

    state.bullets.retain(|b| b.active);
    state.enemy_bullets.retain(|b| b.active);

    metrics.refresh_survival(now_ms);

    if state.formation_cleared() {
        state.level += 1;
        state.enemies = create_enemies(state.level, &mut ctx.rng);
        state.barriers = create_barriers();
        metrics.start_level(now_ms);
        log::info!(
            "Level {} reached: {} enemies, score {}",
            state.level,
            state.enemies.len(),
            state.score
        );
        events.push(GameEvent::LevelComplete { level: state.level });
    }

    if state.is_game_over {
        log::info!(
            "Game over at level {} with score {}",
            state.level,
            state.score
        );
        events.push(GameEvent::GameOver { score: state.score });
    }

    Transition {
        state,
        metrics,
        events,
    }
}
