//! Player performance metrics
//!
//! Aggregated by the simulation, consumed by the difficulty advisor and the HUD.

use serde::{Deserialize, Serialize};

/// Reaction time assumed when no samples have been recorded (ms)
pub const DEFAULT_REACTION_MS: f32 = 1000.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameMetrics {
    pub shots_attempted: u32,
    pub shots_hit: u32,
    /// Reaction samples in ms, appended by external instrumentation
    pub reaction_times: Vec<f32>,
    /// Whole seconds since the current level started
    pub survival_secs: u64,
    pub enemies_killed: u32,
    pub level_start_ms: u64,
}

impl GameMetrics {
    pub fn new(now_ms: u64) -> Self {
        Self {
            shots_attempted: 0,
            shots_hit: 0,
            reaction_times: Vec::new(),
            survival_secs: 0,
            enemies_killed: 0,
            level_start_ms: now_ms,
        }
    }

    /// Fraction of shots that connected (0 when nothing was fired)
    pub fn hit_ratio(&self) -> f32 {
        if self.shots_attempted == 0 {
            0.0
        } else {
            self.shots_hit as f32 / self.shots_attempted as f32
        }
    }

    /// Accuracy for display, in percent
    pub fn accuracy_percent(&self) -> f32 {
        self.hit_ratio() * 100.0
    }

    pub fn average_reaction_ms(&self) -> f32 {
        if self.reaction_times.is_empty() {
            DEFAULT_REACTION_MS
        } else {
            self.reaction_times.iter().sum::<f32>() / self.reaction_times.len() as f32
        }
    }

    /// Kills per second of survival (0 before the first full second)
    pub fn kill_rate(&self) -> f32 {
        if self.survival_secs == 0 {
            0.0
        } else {
            self.enemies_killed as f32 / self.survival_secs as f32
        }
    }

    pub fn record_reaction(&mut self, ms: f32) {
        self.reaction_times.push(ms);
    }

    /// Recompute survival time from the level start
    pub fn refresh_survival(&mut self, now_ms: u64) {
        self.survival_secs = now_ms.saturating_sub(self.level_start_ms) / 1000;
    }

    /// Restart the level clock
    pub fn start_level(&mut self, now_ms: u64) {
        self.level_start_ms = now_ms;
        self.survival_secs = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_metrics_defaults() {
        let metrics = GameMetrics::new(0);
        assert_eq!(metrics.hit_ratio(), 0.0);
        assert_eq!(metrics.kill_rate(), 0.0);
        assert_eq!(metrics.average_reaction_ms(), DEFAULT_REACTION_MS);
    }

    #[test]
    fn test_derived_rates() {
        let mut metrics = GameMetrics::new(1_000);
        metrics.shots_attempted = 8;
        metrics.shots_hit = 6;
        metrics.enemies_killed = 6;
        metrics.refresh_survival(4_999);
        assert_eq!(metrics.survival_secs, 3);
        assert!((metrics.hit_ratio() - 0.75).abs() < 1e-6);
        assert!((metrics.kill_rate() - 2.0).abs() < 1e-6);

        metrics.record_reaction(200.0);
        metrics.record_reaction(400.0);
        assert!((metrics.average_reaction_ms() - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_clock_before_level_start_saturates() {
        let mut metrics = GameMetrics::new(5_000);
        metrics.refresh_survival(1_000);
        assert_eq!(metrics.survival_secs, 0);
    }
}
