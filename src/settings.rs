//! Engine settings
//!
//! Loaded from an optional JSON file; missing fields take their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::STARTING_LIVES;
use crate::difficulty::WARMUP_SECS;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Engine settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; `None` picks one from the clock
    pub seed: Option<u64>,
    /// Lives at the start of a run
    pub starting_lives: u32,

    // === Difficulty ===
    /// Wall-clock gap between advisory requests (ms)
    pub advisory_interval_ms: u64,
    /// Survival seconds before the advisor is consulted
    pub warmup_secs: u64,

    // === Audio ===
    /// Formation march beat interval (ms)
    pub march_interval_ms: u64,
    pub audio_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Demo runner ===
    /// Frames simulated by the headless runner
    pub max_frames: u64,
    /// Simulated frame length (ms)
    pub frame_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            starting_lives: STARTING_LIVES as u32,

            advisory_interval_ms: 8_000,
            warmup_secs: WARMUP_SECS,

            march_interval_ms: 500,
            audio_enabled: true,
            master_volume: 0.3,

            max_frames: 60 * 120,
            frame_ms: 16,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from disk, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Using default settings: {}", err);
                Self::default()
            }
        }
    }

    /// Pull values back into usable ranges
    pub(crate) fn sanitize(&mut self) {
        self.starting_lives = self.starting_lives.max(1);
        self.march_interval_ms = self.march_interval_ms.max(1);
        self.frame_ms = self.frame_ms.max(1);
        self.master_volume = if self.master_volume.is_finite() {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "advisory_interval_ms": 4000 }"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.advisory_interval_ms, 4000);
        assert_eq!(settings.warmup_secs, WARMUP_SECS);
        assert_eq!(settings.march_interval_ms, 500);
    }

    #[test]
    fn test_out_of_range_values_are_sanitized() {
        let settings =
            Settings::from_json(r#"{ "starting_lives": 0, "master_volume": 3.5, "frame_ms": 0 }"#)
                .unwrap();
        assert_eq!(settings.starting_lives, 1);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.frame_ms, 1);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ nope"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load(Path::new("/definitely/not/here.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            seed: Some(3),
            ..Settings::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
