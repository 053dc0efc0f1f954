//! Adaptive difficulty
//!
//! The engine consumes a `DifficultySettings` tuple each frame. Where it comes
//! from is pluggable (`DifficultyAdvisor`); the rule-based advisor here is the
//! synchronous fallback that always succeeds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::GameMetrics;

/// Rule-based floor and ceiling constants
pub const BASE_ENEMY_SPEED: f32 = 0.3;
pub const MAX_ENEMY_SPEED: f32 = 1.2;
pub const BASE_FIRE_RATE: f32 = 0.1;
pub const MAX_FIRE_RATE: f32 = 0.015;
/// Fire rate used before the advisor has enough data
pub const WARMUP_FIRE_RATE: f32 = 0.003;
/// Survival seconds before difficulty starts adapting
pub const WARMUP_SECS: u64 = 30;

/// Formation arrangement hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpawnPattern {
    #[default]
    Normal,
    Wave,
    Random,
    Strategic,
}

/// Enemy temperament hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyBehavior {
    #[default]
    Static,
    Aggressive,
    Evasive,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// Formation speed scalar
    pub enemy_speed: f32,
    /// Base per-frame enemy fire probability
    pub enemy_fire_rate: f32,
    pub spawn_pattern: SpawnPattern,
    pub behavior: EnemyBehavior,
}

impl Default for DifficultySettings {
    /// Warm-up settings for a brand-new run
    fn default() -> Self {
        Self {
            enemy_speed: BASE_ENEMY_SPEED,
            enemy_fire_rate: WARMUP_FIRE_RATE,
            spawn_pattern: SpawnPattern::Normal,
            behavior: EnemyBehavior::Static,
        }
    }
}

impl DifficultySettings {
    /// Clamp externally supplied values into a range the engine can run with
    pub fn clamped(self) -> Self {
        let warmup = Self::default();
        let enemy_speed = if self.enemy_speed.is_finite() {
            self.enemy_speed.clamp(0.0, 5.0)
        } else {
            warmup.enemy_speed
        };
        let enemy_fire_rate = if self.enemy_fire_rate.is_finite() {
            self.enemy_fire_rate.clamp(0.0, 1.0)
        } else {
            warmup.enemy_fire_rate
        };
        Self {
            enemy_speed,
            enemy_fire_rate,
            ..self
        }
    }

    /// Reject answers the engine cannot interpret
    pub fn validated(self) -> Result<Self, AdvisoryError> {
        if self.enemy_speed.is_finite() && self.enemy_fire_rate.is_finite() {
            Ok(self)
        } else {
            Err(AdvisoryError::BadResponse(format!(
                "speed {} fire rate {}",
                self.enemy_speed, self.enemy_fire_rate
            )))
        }
    }

    pub fn tier(&self) -> DifficultyTier {
        DifficultyTier::for_speed(self.enemy_speed)
    }
}

/// Coarse difficulty band shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DifficultyTier {
    Beginner,
    Warming,
    Skilled,
    Expert,
    Master,
}

impl DifficultyTier {
    pub fn for_speed(speed: f32) -> Self {
        if speed < 0.5 {
            DifficultyTier::Beginner
        } else if speed < 0.7 {
            DifficultyTier::Warming
        } else if speed < 0.9 {
            DifficultyTier::Skilled
        } else if speed < 1.1 {
            DifficultyTier::Expert
        } else {
            DifficultyTier::Master
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DifficultyTier::Beginner => "Beginner Mode - Getting warmed up!",
            DifficultyTier::Warming => "Getting the hang of it!",
            DifficultyTier::Skilled => "You're getting good!",
            DifficultyTier::Expert => "Expert level unlocked!",
            DifficultyTier::Master => "Master Level - Show them who's boss!",
        }
    }
}

/// Normalized [0, 1] player skill estimate
pub fn skill_level(metrics: &GameMetrics) -> f32 {
    let hit_score = metrics.hit_ratio();
    let reaction_score = (1.0 - metrics.average_reaction_ms() / 3000.0).max(0.0);
    let kill_score = (metrics.kill_rate() / 1.5).min(1.0);
    hit_score * 0.5 + reaction_score * 0.2 + kill_score * 0.3
}

/// Map skill to difficulty with fixed floor/ceiling and thresholds
pub fn rule_based(metrics: &GameMetrics) -> DifficultySettings {
    let skill = skill_level(metrics);

    let speed = BASE_ENEMY_SPEED + skill * (MAX_ENEMY_SPEED - BASE_ENEMY_SPEED);
    let fire_rate = BASE_FIRE_RATE + skill * (MAX_FIRE_RATE - BASE_FIRE_RATE);

    let mut spawn_pattern = SpawnPattern::Normal;
    let mut behavior = EnemyBehavior::Static;
    if skill > 0.4 {
        spawn_pattern = SpawnPattern::Wave;
    }
    if skill > 0.6 {
        behavior = EnemyBehavior::Aggressive;
    }
    if skill > 0.8 {
        spawn_pattern = SpawnPattern::Random;
    }
    if skill > 0.9 {
        behavior = EnemyBehavior::Evasive;
        spawn_pattern = SpawnPattern::Strategic;
    }

    DifficultySettings {
        enemy_speed: speed.min(MAX_ENEMY_SPEED),
        enemy_fire_rate: fire_rate.min(MAX_FIRE_RATE),
        spawn_pattern,
        behavior,
    }
}

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("advisor unavailable: {0}")]
    Unavailable(String),
    #[error("advisor returned an unusable response: {0}")]
    BadResponse(String),
    #[error("advisor worker stopped before answering")]
    WorkerLost,
}

/// Source of difficulty parameters
pub trait DifficultyAdvisor: Send + Sync {
    fn advise(&self, metrics: &GameMetrics) -> Result<DifficultySettings, AdvisoryError>;
}

/// Always-available advisor backed by `rule_based`
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedAdvisor;

impl DifficultyAdvisor for RuleBasedAdvisor {
    fn advise(&self, metrics: &GameMetrics) -> Result<DifficultySettings, AdvisoryError> {
        Ok(rule_based(metrics))
    }
}

/// Ask the advisor for settings, falling back to the rules on any failure.
/// Early in a level the warm-up settings are returned without consulting it.
pub fn adaptive_difficulty(
    advisor: &dyn DifficultyAdvisor,
    metrics: &GameMetrics,
    warmup_secs: u64,
) -> DifficultySettings {
    if metrics.survival_secs < warmup_secs {
        return DifficultySettings::default();
    }
    let settings = match advisor.advise(metrics).and_then(DifficultySettings::validated) {
        Ok(settings) => settings,
        Err(err) => {
            log::warn!("Difficulty advisor failed, using rule-based: {}", err);
            rule_based(metrics)
        }
    };
    settings.clamped()
}
