//! Game state and core simulation types
//!
//! Everything the renderer needs to draw a frame lives in `GameState`.
//! Per-session bookkeeping that is not part of the snapshot (direction flag,
//! bonus timers, RNG) lives in `SimContext`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::spawn::{create_barriers, create_enemies};
use crate::consts::*;

/// Enemy tier, selected by formation row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Row 0, 3, ... - 10 points
    Squid,
    /// Row 1, 4, ... - 20 points
    Crab,
    /// Row 2, 5, ... - 30 points
    Octopus,
}

impl EnemyKind {
    /// Tier for a formation row (cycles through the three kinds)
    pub fn for_row(row: usize) -> Self {
        match row % 3 {
            0 => EnemyKind::Squid,
            1 => EnemyKind::Crab,
            _ => EnemyKind::Octopus,
        }
    }

    /// Zero-based tier index
    pub fn tier(&self) -> u32 {
        match self {
            EnemyKind::Squid => 0,
            EnemyKind::Crab => 1,
            EnemyKind::Octopus => 2,
        }
    }

    /// Score awarded for a kill
    pub fn points(&self) -> u32 {
        10 * (self.tier() + 1)
    }
}

/// A formation member. Dead enemies stay in the formation as tombstones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub alive: bool,
    /// Per-level speed scalar
    pub speed: f32,
    /// Oscillation phase, fixed at spawn
    pub phase: f32,
}

impl Enemy {
    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let half = Vec2::splat(ENEMY_SIZE / 2.0);
        (self.pos - half, self.pos + half)
    }
}

/// A projectile. `speed` is signed: negative travels up, positive travels down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub speed: f32,
    pub active: bool,
}

impl Bullet {
    /// Player bullet fired from the given x
    pub fn player(x: f32) -> Self {
        Self {
            pos: Vec2::new(x, PLAYER_BULLET_SPAWN_Y),
            speed: -PLAYER_BULLET_SPEED,
            active: true,
        }
    }

    /// Enemy bullet dropped from an enemy's underside
    pub fn enemy(from: Vec2) -> Self {
        Self {
            pos: Vec2::new(from.x, from.y + ENEMY_SIZE / 2.0),
            speed: ENEMY_BULLET_SPEED,
            active: true,
        }
    }

    /// True when travelling upward
    pub fn is_rising(&self) -> bool {
        self.speed < 0.0
    }
}

/// Which side a projectile strikes a barrier from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeFrom {
    /// Player bullet travelling up: erodes the bottom-most intact cell first
    Below,
    /// Enemy bullet travelling down: erodes the top-most intact cell first
    Above,
}

/// Destructible cover made of a grid of cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    /// Top-left corner
    pub origin: Vec2,
    /// Row-major cell grid, `true` = intact
    pub cells: Vec<Vec<bool>>,
    pub cell_size: f32,
}

impl Barrier {
    /// Fully intact barrier at the given top-left corner
    pub fn new(origin: Vec2) -> Self {
        Self {
            origin,
            cells: vec![vec![true; BARRIER_COLS]; BARRIER_ROWS],
            cell_size: BARRIER_CELL_SIZE,
        }
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        (
            self.origin,
            self.origin + Vec2::new(BARRIER_WIDTH, BARRIER_HEIGHT),
        )
    }

    /// Whether a point lies inside the barrier's bounding box (edges inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = self.bounds();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Cell column under an x coordinate, if it maps onto the grid
    pub fn column_at(&self, x: f32) -> Option<usize> {
        let col = ((x - self.origin.x) / self.cell_size).floor();
        if col < 0.0 {
            return None;
        }
        let col = col as usize;
        let width = self.cells.first().map_or(0, Vec::len);
        (col < width).then_some(col)
    }

    /// Destroy the first intact cell in `col`, scanning from the struck side.
    /// Returns false when the column is already empty.
    pub fn erode(&mut self, col: usize, from: StrikeFrom) -> bool {
        let rows = self.cells.len();
        let hit_row = match from {
            StrikeFrom::Above => (0..rows).find(|&r| self.cells[r].get(col) == Some(&true)),
            StrikeFrom::Below => (0..rows).rev().find(|&r| self.cells[r].get(col) == Some(&true)),
        };
        match hit_row {
            Some(row) => {
                self.cells[row][col] = false;
                true
            }
            None => false,
        }
    }

    /// Number of cells still standing
    pub fn intact_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|&&c| c).count()
    }

    /// True if no cell has been destroyed
    pub fn is_pristine(&self) -> bool {
        self.cells.iter().flatten().all(|&c| c)
    }
}

/// The periodically spawning high-value target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusTarget {
    pub pos: Vec2,
    pub speed: f32,
    pub points: u32,
}

/// Slot holding at most one bonus target
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum BonusSlot {
    #[default]
    Absent,
    Present(BonusTarget),
}

impl BonusSlot {
    pub fn is_present(&self) -> bool {
        matches!(self, BonusSlot::Present(_))
    }

    pub fn target(&self) -> Option<&BonusTarget> {
        match self {
            BonusSlot::Present(target) => Some(target),
            BonusSlot::Absent => None,
        }
    }

    /// Empty the slot, returning what was in it
    pub fn take(&mut self) -> Option<BonusTarget> {
        match std::mem::take(self) {
            BonusSlot::Present(target) => Some(target),
            BonusSlot::Absent => None,
        }
    }
}

/// Explosion color tag (renderer maps to actual colors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    /// Enemy kill
    Magenta,
    /// Bonus target kill
    Yellow,
    /// Player hit
    Cyan,
}

impl ParticleColor {
    /// CSS color the render sink paints this particle with
    pub fn hex(&self) -> &'static str {
        match self {
            ParticleColor::Magenta => "#ff00ff",
            ParticleColor::Yellow => "#ffff00",
            ParticleColor::Cyan => "#00ffff",
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life, decreases toward 0
    pub life: f32,
    pub max_life: f32,
    pub color: ParticleColor,
}

/// Complete world snapshot handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub is_playing: bool,
    pub is_paused: bool,
    pub is_game_over: bool,
    pub score: u64,
    pub lives: u32,
    /// 1-based, never decreases
    pub level: u32,
    /// Player center x
    pub player_x: f32,
    /// Formation in row-major order (tombstones included)
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub barriers: Vec<Barrier>,
    pub bonus: BonusSlot,
    pub particles: Vec<Particle>,
    /// Time of the last registered player hit (ms), if any
    pub last_hit_ms: Option<u64>,
}

impl Default for GameState {
    /// Empty, idle field with no formation or barriers
    fn default() -> Self {
        Self {
            is_playing: false,
            is_paused: false,
            is_game_over: false,
            score: 0,
            lives: STARTING_LIVES as u32,
            level: 1,
            player_x: PLAYFIELD_WIDTH / 2.0,
            enemies: Vec::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            barriers: Vec::new(),
            bonus: BonusSlot::Absent,
            particles: Vec::new(),
            last_hit_ms: None,
        }
    }
}

impl GameState {
    /// Fresh level-1 state, not yet playing
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            enemies: create_enemies(1, rng),
            barriers: create_barriers(),
            ..Self::default()
        }
    }

    /// True when the step function should advance the world
    pub fn is_running(&self) -> bool {
        self.is_playing && !self.is_paused && !self.is_game_over
    }

    /// Player center
    pub fn player_pos(&self) -> Vec2 {
        Vec2::new(self.player_x, PLAYER_Y)
    }

    /// Living formation members
    pub fn alive_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }

    /// True once every formation member is dead
    pub fn formation_cleared(&self) -> bool {
        self.enemies.iter().all(|e| !e.alive)
    }

    /// Player bullets still in flight
    pub fn active_player_bullets(&self) -> usize {
        self.bullets.iter().filter(|b| b.active).count()
    }

    /// Whether the player is inside the post-hit invincibility window.
    /// Renderers use it to blink the player sprite.
    pub fn is_invincible(&self, now_ms: u64) -> bool {
        !self.can_take_hit(now_ms)
    }

    /// Whether a new hit may register (strictly past the cooldown)
    pub fn can_take_hit(&self, now_ms: u64) -> bool {
        self.last_hit_ms
            .is_none_or(|hit| now_ms.saturating_sub(hit) > HIT_COOLDOWN_MS)
    }

    /// End the run: no lives left
    pub fn end_run(&mut self) {
        self.lives = 0;
        self.is_game_over = true;
    }
}
