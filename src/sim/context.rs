//! Per-session simulation context
//!
//! Holds the state that must survive between frames but is not part of the
//! rendered snapshot: the shared formation direction, the bonus-target
//! schedule and the seeded RNG. One context per game session.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

/// Formation direction: +1 marches right, -1 marches left
pub const DIRECTION_RIGHT: f32 = 1.0;

/// Bonus-target spawn timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusSchedule {
    pub last_spawn_ms: u64,
    pub next_delay_ms: u64,
}

impl Default for BonusSchedule {
    fn default() -> Self {
        Self {
            last_spawn_ms: 0,
            next_delay_ms: BONUS_FIRST_DELAY_MS,
        }
    }
}

impl BonusSchedule {
    /// Schedule anchored at `now_ms` with the initial delay
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            last_spawn_ms: now_ms,
            ..Self::default()
        }
    }

    /// True once strictly more than the current delay has elapsed
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_spawn_ms) > self.next_delay_ms
    }

    /// Mark a spawn at `now_ms` and draw the next delay
    pub fn reschedule<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) {
        self.last_spawn_ms = now_ms;
        self.next_delay_ms = rng.random_range(BONUS_MIN_DELAY_MS..BONUS_MAX_DELAY_MS);
    }
}

#[derive(Debug, Clone)]
pub struct SimContext {
    /// Seed the RNG was built from
    pub seed: u64,
    /// Shared formation direction
    pub direction: f32,
    pub bonus: BonusSchedule,
    pub rng: Pcg32,
}

impl SimContext {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            direction: DIRECTION_RIGHT,
            bonus: BonusSchedule::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Reset per-game state for a new run; the RNG stream continues
    pub fn reset(&mut self, now_ms: u64) {
        self.direction = DIRECTION_RIGHT;
        self.bonus = BonusSchedule::starting_at(now_ms);
    }

    /// Reverse the formation's march direction
    pub fn flip_direction(&mut self) {
        self.direction = -self.direction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_due_strictly_after_delay() {
        let schedule = BonusSchedule::default();
        assert!(!schedule.is_due(BONUS_FIRST_DELAY_MS));
        assert!(schedule.is_due(BONUS_FIRST_DELAY_MS + 1));
    }

    #[test]
    fn test_reschedule_draws_delay_in_range() {
        let mut ctx = SimContext::new(11);
        for i in 0..100 {
            let mut schedule = ctx.bonus;
            schedule.reschedule(i * 1000, &mut ctx.rng);
            assert_eq!(schedule.last_spawn_ms, i * 1000);
            assert!((BONUS_MIN_DELAY_MS..BONUS_MAX_DELAY_MS).contains(&schedule.next_delay_ms));
        }
    }

    #[test]
    fn test_reset_restores_direction_and_schedule() {
        let mut ctx = SimContext::new(5);
        ctx.flip_direction();
        ctx.bonus.next_delay_ms = 12_345;
        ctx.reset(2_000);
        assert_eq!(ctx.direction, DIRECTION_RIGHT);
        assert_eq!(ctx.bonus, BonusSchedule::starting_at(2_000));
    }
}
