//! Non-blocking difficulty advisory
//!
//! The advisor may be slow (a remote model, for instance), so it runs on a
//! worker thread. The frame loop polls for the answer and keeps the previous
//! settings until one arrives. A worker that dies, or is still silent when
//! the next request is made, resolves to the rule-based answer computed when
//! its request was made.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::difficulty::{
    AdvisoryError, DifficultyAdvisor, DifficultySettings, RuleBasedAdvisor, adaptive_difficulty,
};
use crate::sim::GameMetrics;

struct Pending {
    rx: Receiver<DifficultySettings>,
    fallback: DifficultySettings,
}

pub struct AdvisoryPoller {
    advisor: Arc<dyn DifficultyAdvisor>,
    warmup_secs: u64,
    pending: Option<Pending>,
    /// Answer waiting for the next `poll`
    ready: Option<DifficultySettings>,
}

impl AdvisoryPoller {
    pub fn new(advisor: Arc<dyn DifficultyAdvisor>, warmup_secs: u64) -> Self {
        Self {
            advisor,
            warmup_secs,
            pending: None,
            ready: None,
        }
    }

    /// Poller backed by the rule-based advisor
    pub fn rule_based(warmup_secs: u64) -> Self {
        Self::new(Arc::new(RuleBasedAdvisor), warmup_secs)
    }

    /// True while a request is in flight or an answer is waiting
    pub fn is_pending(&self) -> bool {
        self.pending.is_some() || self.ready.is_some()
    }

    /// Start a request. A previous worker that has still not answered is
    /// abandoned and its rule-based fallback is queued for the next `poll`.
    pub fn request(&mut self, metrics: &GameMetrics) {
        if let Some(stale) = self.pending.take() {
            let settings = match stale.rx.try_recv() {
                Ok(settings) => settings,
                Err(_) => {
                    log::warn!("Difficulty advisor too slow, using rule-based");
                    stale.fallback
                }
            };
            self.ready = Some(settings);
        }
        let fallback = adaptive_difficulty(&RuleBasedAdvisor, metrics, self.warmup_secs);

        let (tx, rx) = mpsc::channel();
        let advisor = Arc::clone(&self.advisor);
        let metrics = metrics.clone();
        let warmup_secs = self.warmup_secs;
        let spawned = thread::Builder::new()
            .name("difficulty-advisor".into())
            .spawn(move || {
                let settings = adaptive_difficulty(advisor.as_ref(), &metrics, warmup_secs);
                // Receiver may be gone if the request was superseded
                let _ = tx.send(settings);
            });

        match spawned {
            Ok(_) => self.pending = Some(Pending { rx, fallback }),
            Err(err) => {
                log::warn!("Could not start advisor worker ({}), using rule-based", err);
                self.ready = Some(fallback);
            }
        }
    }

    /// Take a finished answer without blocking
    pub fn poll(&mut self) -> Option<DifficultySettings> {
        if let Some(settings) = self.ready.take() {
            return Some(settings);
        }
        let pending = self.pending.as_ref()?;
        match pending.rx.try_recv() {
            Ok(settings) => {
                self.pending = None;
                Some(settings)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                let fallback = pending.fallback;
                log::warn!("{}, using rule-based", AdvisoryError::WorkerLost);
                self.pending = None;
                Some(fallback)
            }
        }
    }

    /// Block up to `timeout` for the in-flight answer
    pub fn wait(&mut self, timeout: Duration) -> Option<DifficultySettings> {
        if let Some(settings) = self.ready.take() {
            return Some(settings);
        }
        let pending = self.pending.as_ref()?;
        match pending.rx.recv_timeout(timeout) {
            Ok(settings) => {
                self.pending = None;
                Some(settings)
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                let fallback = pending.fallback;
                log::warn!("{}, using rule-based", AdvisoryError::WorkerLost);
                self.pending = None;
                Some(fallback)
            }
        }
    }

    /// Drop any in-flight request (new session)
    pub fn cancel(&mut self) {
        self.pending = None;
        self.ready = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::{EnemyBehavior, SpawnPattern, rule_based};

    const WAIT: Duration = Duration::from_secs(5);

    struct FixedAdvisor(DifficultySettings);

    impl DifficultyAdvisor for FixedAdvisor {
        fn advise(&self, _: &GameMetrics) -> Result<DifficultySettings, AdvisoryError> {
            Ok(self.0)
        }
    }

    struct HangingAdvisor;

    impl DifficultyAdvisor for HangingAdvisor {
        fn advise(&self, _: &GameMetrics) -> Result<DifficultySettings, AdvisoryError> {
            thread::sleep(Duration::from_secs(3600));
            Err(AdvisoryError::Unavailable("timed out".into()))
        }
    }

    struct PanickingAdvisor;

    impl DifficultyAdvisor for PanickingAdvisor {
        fn advise(&self, _: &GameMetrics) -> Result<DifficultySettings, AdvisoryError> {
            panic!("advisor crashed");
        }
    }

    fn seasoned() -> GameMetrics {
        let mut metrics = GameMetrics::new(0);
        metrics.survival_secs = 45;
        metrics.shots_attempted = 20;
        metrics.shots_hit = 12;
        metrics.enemies_killed = 12;
        metrics
    }

    #[test]
    fn test_answer_arrives_from_worker() {
        let fixed = DifficultySettings {
            enemy_speed: 0.9,
            enemy_fire_rate: 0.01,
            spawn_pattern: SpawnPattern::Wave,
            behavior: EnemyBehavior::Aggressive,
        };
        let mut poller = AdvisoryPoller::new(Arc::new(FixedAdvisor(fixed)), 30);
        assert!(poller.poll().is_none());
        poller.request(&seasoned());
        assert!(poller.is_pending());
        assert_eq!(poller.wait(WAIT), Some(fixed));
        assert!(!poller.is_pending());
        assert!(poller.poll().is_none());
    }

    #[test]
    fn test_crashed_worker_resolves_to_rules() {
        let metrics = seasoned();
        let mut poller = AdvisoryPoller::new(Arc::new(PanickingAdvisor), 30);
        poller.request(&metrics);
        assert_eq!(poller.wait(WAIT), Some(rule_based(&metrics).clamped()));
        assert!(!poller.is_pending());
    }

    #[test]
    fn test_cancel_discards_request() {
        let mut poller = AdvisoryPoller::rule_based(30);
        poller.request(&seasoned());
        poller.cancel();
        assert!(!poller.is_pending());
        assert!(poller.poll().is_none());
    }

    #[test]
    fn test_stalled_worker_is_replaced_by_rules() {
        let metrics = seasoned();
        let mut poller = AdvisoryPoller::new(Arc::new(HangingAdvisor), 30);
        poller.request(&metrics);
        assert!(poller.poll().is_none());

        // Next cadence request gives up on the stalled worker
        poller.request(&metrics);
        let expected = rule_based(&metrics).clamped();
        assert_eq!(poller.poll(), Some(expected));
        assert_ne!(expected, DifficultySettings::default());

        // And keeps doing so for every stall after it
        poller.request(&metrics);
        assert_eq!(poller.poll(), Some(expected));
        assert!(poller.is_pending());
    }
}
