//! Domain events emitted by simulation transitions
//!
//! The simulation never talks to audio or UI directly; each transition
//! returns the events it produced and the caller dispatches them.

use serde::{Deserialize, Serialize};

use super::state::EnemyKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Formation march beat
    FormationStep,
    /// Player fired a bullet
    PlayerShot,
    /// A barrier cell was destroyed
    BarrierHit,
    /// Player lost a life (or the formation invaded)
    PlayerHit,
    EnemyKilled { kind: EnemyKind, points: u32 },
    BonusTargetKilled { points: u32 },
    BonusTargetSpawned { points: u32 },
    /// Formation march begins (new game)
    FormationStart,
    /// Formation march ends (game over)
    FormationStop,
    /// Formation cleared; `level` is the level just entered
    LevelComplete { level: u32 },
    /// Formation reached the player's row or touched a barrier
    Invasion,
    GameOver { score: u64 },
}
