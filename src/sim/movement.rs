//! Movement and spawning policy
//!
//! Advances enemies, bullets, the bonus target and particles, and decides
//! when the bonus target appears. All motion is scaled by `frames`, the
//! number of 60 Hz reference frames covered by the step.

use glam::Vec2;
use rand::Rng;

use super::context::SimContext;
use super::events::GameEvent;
use super::state::{BonusSlot, BonusTarget, GameState};
use crate::consts::*;

/// Horizontal oscillation factor for an enemy at time `now_ms`
#[inline]
fn wave_factor(now_ms: u64, phase: f32) -> f32 {
    let wave = ((now_ms as f64 / 300.0) + phase as f64).sin() as f32;
    0.7 + 0.9 * wave
}

/// Drop applied to the formation on each direction change
pub fn descent_for(enemy_speed: f32) -> f32 {
    (20.0 + enemy_speed * 30.0).min(MAX_DESCENT)
}

/// March living enemies sideways. Flips the shared direction and returns
/// true when any enemy crossed an edge margin.
pub fn march_formation(
    state: &mut GameState,
    ctx: &mut SimContext,
    frames: f32,
    enemy_speed: f32,
    now_ms: u64,
) -> bool {
    let step = enemy_speed * frames * ctx.direction;
    let margin = ENEMY_SIZE / 2.0;
    let mut edge_reached = false;

    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        enemy.pos.x += step * wave_factor(now_ms, enemy.phase);
        if enemy.pos.x < margin || enemy.pos.x > PLAYFIELD_WIDTH - margin {
            edge_reached = true;
        }
    }

    if edge_reached {
        ctx.flip_direction();
    }
    edge_reached
}

/// Drop living enemies one row. Returns true if any reached the invasion line.
pub fn descend_formation(state: &mut GameState, enemy_speed: f32) -> bool {
    let drop = descent_for(enemy_speed);
    let mut invaded = false;
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        enemy.pos.y += drop;
        if enemy.pos.y >= INVASION_LINE_Y {
            invaded = true;
        }
    }
    invaded
}

/// Move bullets along their travel direction and deactivate the ones that
/// left the playfield.
pub fn advance_bullets(state: &mut GameState, frames: f32) {
    for bullet in state.bullets.iter_mut().filter(|b| b.active) {
        bullet.pos.y += bullet.speed * frames;
        if bullet.pos.y <= 0.0 {
            bullet.active = false;
        }
    }
    for bullet in state.enemy_bullets.iter_mut().filter(|b| b.active) {
        bullet.pos.y += bullet.speed * frames;
        if bullet.pos.y >= PLAYFIELD_HEIGHT {
            bullet.active = false;
        }
    }
}

/// Slide the bonus target across; it escapes past the far edge unrewarded.
pub fn advance_bonus(state: &mut GameState, frames: f32) {
    let escaped = match &mut state.bonus {
        BonusSlot::Present(target) => {
            target.pos.x += target.speed * frames;
            target.pos.x > BONUS_EXIT_X
        }
        BonusSlot::Absent => false,
    };
    if escaped {
        log::debug!("Bonus target escaped");
        state.bonus = BonusSlot::Absent;
    }
}

/// Integrate particles with gravity and linear life decay
pub fn advance_particles(state: &mut GameState, frames: f32) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * frames;
        particle.vel.y += PARTICLE_GRAVITY * frames;
        particle.life -= frames / REFERENCE_FPS;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Whether a bonus target should appear now. On `true` the schedule is
/// reset and a new delay is drawn.
pub fn should_spawn_bonus(ctx: &mut SimContext, state: &GameState, now_ms: u64) -> bool {
    if state.bonus.is_present() || !state.is_running() {
        return false;
    }
    if ctx.bonus.is_due(now_ms) {
        ctx.bonus.reschedule(now_ms, &mut ctx.rng);
        return true;
    }
    false
}

/// Place a bonus target at the left edge with a random reward
pub fn spawn_bonus<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> GameEvent {
    let points = BONUS_REWARDS[rng.random_range(0..BONUS_REWARDS.len())];
    state.bonus = BonusSlot::Present(BonusTarget {
        pos: Vec2::new(BONUS_START_X, BONUS_Y),
        speed: BONUS_SPEED,
        points,
    });
    log::debug!("Bonus target spawned worth {}", points);
    GameEvent::BonusTargetSpawned { points }
}
