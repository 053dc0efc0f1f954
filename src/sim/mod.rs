//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time is injected by the caller (`now_ms`), never read from a clock
//! - Seeded RNG only, owned by `SimContext`
//! - Stable iteration order (formation order, spawn order)
//! - No rendering, audio or platform dependencies

pub mod actions;
pub mod collision;
pub mod context;
pub mod events;
pub mod metrics;
pub mod movement;
pub mod spawn;
pub mod state;
pub mod tick;

pub use actions::{MoveDirection, enemy_shoot, move_player, shoot_bullet};
pub use context::{BonusSchedule, SimContext};
pub use events::GameEvent;
pub use metrics::GameMetrics;
pub use movement::{should_spawn_bonus, spawn_bonus};
pub use spawn::{create_barriers, create_enemies, create_explosion};
pub use state::{
    Barrier, BonusSlot, BonusTarget, Bullet, Enemy, EnemyKind, GameState, Particle,
    ParticleColor,
};
pub use tick::{TickInput, Transition, update};
