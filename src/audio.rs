//! Sound cues for simulation events
//!
//! Retro beep patterns, described as data and handed to a pluggable sink.
//! Playback is fire-and-forget: a failing sink never affects the game.

use thiserror::Error;

use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Sawtooth,
    Sine,
}

/// A single tone in a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beep {
    pub frequency: f32,
    /// Seconds
    pub duration: f32,
    /// Start offset from the cue trigger (ms)
    pub delay_ms: u32,
    pub waveform: Waveform,
}

impl Beep {
    const fn new(frequency: f32, duration: f32, delay_ms: u32, waveform: Waveform) -> Self {
        Self {
            frequency,
            duration,
            delay_ms,
            waveform,
        }
    }
}

/// Descending march tones, one per formation step
pub const MARCH_FREQUENCIES: [f32; 4] = [220.0, 196.0, 175.0, 165.0];

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundCue {
    /// Formation march beat at the given pitch
    March { frequency: f32 },
    /// Quick ascending chirp
    PlayerShoot,
    /// Low thud
    BarrierHit,
    /// Descending explosion
    PlayerHit,
    /// Warbling descent
    BonusKilled,
    /// Quick pop
    EnemyKilled,
}

impl SoundCue {
    /// Tones making up this cue
    pub fn beeps(&self) -> Vec<Beep> {
        match *self {
            SoundCue::March { frequency } => vec![Beep::new(frequency, 0.08, 0, Waveform::Square)],
            SoundCue::PlayerShoot => vec![
                Beep::new(200.0, 0.1, 0, Waveform::Square),
                Beep::new(400.0, 0.05, 50, Waveform::Square),
            ],
            SoundCue::BarrierHit => vec![Beep::new(80.0, 0.1, 0, Waveform::Sawtooth)],
            SoundCue::PlayerHit => (0..5)
                .map(|i| Beep::new(300.0 - i as f32 * 50.0, 0.15, i * 40, Waveform::Sawtooth))
                .collect(),
            SoundCue::BonusKilled => (0..8)
                .map(|i| Beep::new(800.0 - i as f32 * 80.0, 0.08, i * 30, Waveform::Sine))
                .collect(),
            SoundCue::EnemyKilled => vec![Beep::new(150.0, 0.08, 0, Waveform::Square)],
        }
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio device unavailable")]
    DeviceUnavailable,
}

/// Audio backend
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue, beeps: &[Beep], volume: f32) -> Result<(), AudioError>;
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl SoundSink for NullSink {
    fn play(&mut self, _: SoundCue, _: &[Beep], _: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Writes cues to the log (headless runs)
#[derive(Debug, Default)]
pub struct LogSink;

impl SoundSink for LogSink {
    fn play(&mut self, cue: SoundCue, beeps: &[Beep], volume: f32) -> Result<(), AudioError> {
        log::trace!("sound {:?}: {} beeps at volume {:.2}", cue, beeps.len(), volume);
        Ok(())
    }
}

/// Maps simulation events to cues and forwards them to a sink
pub struct AudioManager {
    sink: Box<dyn SoundSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    march_index: usize,
}

impl AudioManager {
    pub fn new(sink: Box<dyn SoundSink>) -> Self {
        Self {
            sink,
            master_volume: 0.3,
            sfx_volume: 1.0,
            muted: false,
            march_index: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Cue for an event, advancing the march pitch where relevant
    pub fn cue_for(&mut self, event: &GameEvent) -> Option<SoundCue> {
        match event {
            GameEvent::FormationStart | GameEvent::FormationStop => {
                self.march_index = 0;
                None
            }
            GameEvent::FormationStep => {
                self.march_index = (self.march_index + 1) % MARCH_FREQUENCIES.len();
                Some(SoundCue::March {
                    frequency: MARCH_FREQUENCIES[self.march_index],
                })
            }
            GameEvent::PlayerShot => Some(SoundCue::PlayerShoot),
            GameEvent::BarrierHit => Some(SoundCue::BarrierHit),
            GameEvent::PlayerHit => Some(SoundCue::PlayerHit),
            GameEvent::EnemyKilled { .. } => Some(SoundCue::EnemyKilled),
            GameEvent::BonusTargetKilled { .. } => Some(SoundCue::BonusKilled),
            GameEvent::BonusTargetSpawned { .. }
            | GameEvent::LevelComplete { .. }
            | GameEvent::Invasion
            | GameEvent::GameOver { .. } => None,
        }
    }

    /// Play the cues for a batch of events. Sink errors are logged and dropped.
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        let vol = self.effective_volume();
        for event in events {
            let Some(cue) = self.cue_for(event) else {
                continue;
            };
            if vol <= 0.0 {
                continue;
            }
            if let Err(err) = self.sink.play(cue, &cue.beeps(), vol) {
                log::warn!("Dropped sound {:?}: {}", cue, err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<SoundCue>>>);

    impl SoundSink for Recorder {
        fn play(&mut self, cue: SoundCue, _: &[Beep], _: f32) -> Result<(), AudioError> {
            self.0.borrow_mut().push(cue);
            Ok(())
        }
    }

    struct Broken;

    impl SoundSink for Broken {
        fn play(&mut self, _: SoundCue, _: &[Beep], _: f32) -> Result<(), AudioError> {
            Err(AudioError::DeviceUnavailable)
        }
    }

    #[test]
    fn test_events_map_to_cues() {
        let played = Rc::new(RefCell::new(Vec::new()));
        let mut audio = AudioManager::new(Box::new(Recorder(Rc::clone(&played))));
        audio.dispatch(&[
            GameEvent::FormationStart,
            GameEvent::PlayerShot,
            GameEvent::LevelComplete { level: 2 },
            GameEvent::FormationStep,
            GameEvent::FormationStep,
            GameEvent::BonusTargetKilled { points: 300 },
        ]);
        assert_eq!(
            *played.borrow(),
            vec![
                SoundCue::PlayerShoot,
                SoundCue::March { frequency: 196.0 },
                SoundCue::March { frequency: 175.0 },
                SoundCue::BonusKilled,
            ]
        );
    }

    #[test]
    fn test_muted_plays_nothing_but_tracks_march() {
        let played = Rc::new(RefCell::new(Vec::new()));
        let mut audio = AudioManager::new(Box::new(Recorder(Rc::clone(&played))));
        audio.set_muted(true);
        audio.dispatch(&[GameEvent::FormationStep, GameEvent::PlayerHit]);
        assert!(played.borrow().is_empty());
        assert_eq!(audio.march_index, 1);
    }

    #[test]
    fn test_broken_sink_is_swallowed() {
        let mut audio = AudioManager::new(Box::new(Broken));
        audio.dispatch(&[GameEvent::PlayerHit, GameEvent::EnemyKilled {
            kind: crate::sim::EnemyKind::Crab,
            points: 20,
        }]);
    }

    #[test]
    fn test_cue_patterns() {
        let hit = SoundCue::PlayerHit.beeps();
        assert_eq!(hit.len(), 5);
        assert_eq!(hit[4].frequency, 100.0);
        assert_eq!(hit[4].delay_ms, 160);
        assert_eq!(SoundCue::BonusKilled.beeps().len(), 8);
    }
}
