//! Entity factories: formations, barrier rows, explosion bursts

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{Barrier, Enemy, EnemyKind, Particle, ParticleColor};
use crate::consts::*;

/// Number of formation rows for a level
pub fn formation_rows(level: u32) -> usize {
    (3 + (level / 2) as usize).min(FORMATION_MAX_ROWS)
}

/// Per-enemy speed scalar for a level
pub fn enemy_speed_for_level(level: u32) -> f32 {
    0.5 + level as f32 * 0.1
}

/// Build the enemy formation for a level (row-major order)
pub fn create_enemies<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Vec<Enemy> {
    let rows = formation_rows(level);
    let start_x = (PLAYFIELD_WIDTH - FORMATION_COLS as f32 * FORMATION_SPACING_X) / 2.0;
    let speed = enemy_speed_for_level(level);

    let mut enemies = Vec::with_capacity(rows * FORMATION_COLS);
    for row in 0..rows {
        for col in 0..FORMATION_COLS {
            enemies.push(Enemy {
                pos: Vec2::new(
                    start_x + col as f32 * FORMATION_SPACING_X,
                    FORMATION_START_Y + row as f32 * FORMATION_SPACING_Y,
                ),
                kind: EnemyKind::for_row(row),
                alive: true,
                speed,
                phase: rng.random_range(0.0..TAU),
            });
        }
    }
    enemies
}

/// Four intact barriers evenly spaced across the playfield
pub fn create_barriers() -> Vec<Barrier> {
    let spacing = PLAYFIELD_WIDTH / (BARRIER_COUNT + 1) as f32;
    (0..BARRIER_COUNT)
        .map(|i| {
            let x = spacing * (i + 1) as f32 - BARRIER_WIDTH / 2.0;
            Barrier::new(Vec2::new(x, BARRIER_Y))
        })
        .collect()
}

/// Radial burst of particles at `pos`
pub fn create_explosion<R: Rng + ?Sized>(
    pos: Vec2,
    color: ParticleColor,
    rng: &mut R,
) -> Vec<Particle> {
    (0..EXPLOSION_PARTICLES)
        .map(|i| {
            let angle = TAU * i as f32 / EXPLOSION_PARTICLES as f32;
            let speed = rng.random_range(PARTICLE_MIN_SPEED..PARTICLE_MAX_SPEED);
            Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                max_life: 1.0,
                color,
            }
        })
        .collect()
}
