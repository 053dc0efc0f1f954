//! Invaders Sim - a deterministic arcade-shooter engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, scoring, levels)
//! - `difficulty`: Skill estimation and the difficulty advisory seam
//! - `advisory`: Non-blocking advisor polling
//! - `audio`: Sound cues derived from simulation events
//! - `session`: Frame driver tying the pieces together
//! - `settings`: Serde-backed engine settings

pub mod advisory;
pub mod audio;
pub mod difficulty;
pub mod session;
pub mod settings;
pub mod sim;

pub use difficulty::{DifficultySettings, EnemyBehavior, SpawnPattern};
pub use session::{FrameInput, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Reference frame rate; motion constants are expressed per 60 Hz frame
    pub const REFERENCE_FPS: f32 = 60.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_Y: f32 = PLAYFIELD_HEIGHT - 60.0;
    pub const PLAYER_STEP: f32 = 8.0;
    pub const STARTING_LIVES: i32 = 3;
    /// Minimum gap between two registered player hits (ms)
    pub const HIT_COOLDOWN_MS: u64 = 1000;

    /// Bullets
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const PLAYER_BULLET_SPEED: f32 = 8.0;
    pub const PLAYER_BULLET_SPAWN_Y: f32 = PLAYFIELD_HEIGHT - 80.0;
    pub const MAX_PLAYER_BULLETS: usize = 3;
    pub const ENEMY_BULLET_SPEED: f32 = 4.0;

    /// Enemy formation
    pub const ENEMY_SIZE: f32 = 30.0;
    pub const FORMATION_COLS: usize = 10;
    pub const FORMATION_MAX_ROWS: usize = 6;
    pub const FORMATION_SPACING_X: f32 = 60.0;
    pub const FORMATION_SPACING_Y: f32 = 50.0;
    pub const FORMATION_START_Y: f32 = 50.0;
    /// Enemies reaching this y have invaded the player's row
    pub const INVASION_LINE_Y: f32 = PLAYFIELD_HEIGHT - 180.0;
    pub const MAX_DESCENT: f32 = 50.0;
    pub const MAX_ENEMY_FIRE_CHANCE: f32 = 0.5;

    /// Barriers
    pub const BARRIER_COUNT: usize = 4;
    pub const BARRIER_WIDTH: f32 = 80.0;
    pub const BARRIER_HEIGHT: f32 = 40.0;
    pub const BARRIER_COLS: usize = 8;
    pub const BARRIER_ROWS: usize = 5;
    pub const BARRIER_CELL_SIZE: f32 = 7.0;
    pub const BARRIER_Y: f32 = PLAYFIELD_HEIGHT - 150.0;

    /// Bonus target (mothership)
    pub const BONUS_START_X: f32 = -50.0;
    pub const BONUS_Y: f32 = 30.0;
    pub const BONUS_SPEED: f32 = 2.0;
    pub const BONUS_EXIT_X: f32 = PLAYFIELD_WIDTH + 50.0;
    pub const BONUS_HIT_RADIUS: f32 = 40.0;
    pub const BONUS_REWARDS: [u32; 5] = [50, 100, 150, 200, 300];
    pub const BONUS_FIRST_DELAY_MS: u64 = 15_000;
    pub const BONUS_MIN_DELAY_MS: u64 = 10_000;
    pub const BONUS_MAX_DELAY_MS: u64 = 30_000;

    /// Particles
    pub const EXPLOSION_PARTICLES: usize = 15;
    pub const PARTICLE_MIN_SPEED: f32 = 2.0;
    pub const PARTICLE_MAX_SPEED: f32 = 5.0;
    pub const PARTICLE_GRAVITY: f32 = 0.2;
}

/// Frame multiplier relative to the 60 Hz reference frame
#[inline]
pub fn frames_for(delta_time: f32) -> f32 {
    delta_time * consts::REFERENCE_FPS
}
