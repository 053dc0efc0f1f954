//! Player and enemy actions applied between simulation steps

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::metrics::GameMetrics;
use super::state::{Bullet, GameState};
use super::tick::Transition;
use crate::consts::*;

/// Horizontal move intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    Left,
    Right,
}

/// Fire a player bullet unless the on-screen limit is reached.
/// State and metrics change together or not at all.
pub fn shoot_bullet(mut state: GameState, mut metrics: GameMetrics) -> Transition {
    if state.active_player_bullets() >= MAX_PLAYER_BULLETS {
        return Transition::unchanged(state, metrics);
    }
    state.bullets.push(Bullet::player(state.player_x));
    metrics.shots_attempted += 1;
    Transition {
        state,
        metrics,
        events: vec![GameEvent::PlayerShot],
    }
}

/// Shift the player one step, clamped to the playfield
pub fn move_player(mut state: GameState, direction: MoveDirection) -> GameState {
    let half = PLAYER_SIZE / 2.0;
    let x = match direction {
        MoveDirection::Left => state.player_x - PLAYER_STEP,
        MoveDirection::Right => state.player_x + PLAYER_STEP,
    };
    state.player_x = x.clamp(half, PLAYFIELD_WIDTH - half);
    state
}

/// Per-call chance that the formation fires
pub fn enemy_fire_chance(base_fire_rate: f32, level: u32) -> f32 {
    (base_fire_rate + level as f32 * 0.01).min(MAX_ENEMY_FIRE_CHANCE)
}

/// Roll for enemy fire; on success a random living enemy drops a bullet
pub fn enemy_shoot<R: Rng + ?Sized>(
    mut state: GameState,
    base_fire_rate: f32,
    rng: &mut R,
) -> GameState {
    let alive = state.alive_enemies().count();
    if alive == 0 {
        return state;
    }
    if rng.random::<f32>() >= enemy_fire_chance(base_fire_rate, state.level) {
        return state;
    }
    let pick = rng.random_range(0..alive);
    let shooter = state.alive_enemies().nth(pick).map(|e| e.pos);
    if let Some(pos) = shooter {
        state.enemy_bullets.push(Bullet::enemy(pos));
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fresh() -> (GameState, GameMetrics, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(21);
        let mut state = GameState::new(&mut rng);
        state.is_playing = true;
        (state, GameMetrics::new(0), rng)
    }

    #[test]
    fn test_shoot_spawns_from_player() {
        let (mut state, metrics, _) = fresh();
        state.player_x = 250.0;
        let out = shoot_bullet(state, metrics);
        assert_eq!(out.state.bullets.len(), 1);
        assert_eq!(out.state.bullets[0].pos.x, 250.0);
        assert_eq!(out.state.bullets[0].pos.y, PLAYER_BULLET_SPAWN_Y);
        assert!(out.state.bullets[0].is_rising());
        assert_eq!(out.metrics.shots_attempted, 1);
        assert_eq!(out.events, vec![GameEvent::PlayerShot]);
    }

    #[test]
    fn test_fourth_shot_is_rejected() {
        let (mut state, mut metrics, _) = fresh();
        for _ in 0..3 {
            let out = shoot_bullet(state, metrics);
            (state, metrics) = (out.state, out.metrics);
        }
        let out = shoot_bullet(state.clone(), metrics.clone());
        assert_eq!(out.state, state);
        assert_eq!(out.metrics.shots_attempted, 3);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_move_clamps_to_playfield() {
        let (mut state, _, _) = fresh();
        state.player_x = 22.0;
        state = move_player(state, MoveDirection::Left);
        assert_eq!(state.player_x, PLAYER_SIZE / 2.0);
        state.player_x = PLAYFIELD_WIDTH - 21.0;
        state = move_player(state, MoveDirection::Right);
        assert_eq!(state.player_x, PLAYFIELD_WIDTH - PLAYER_SIZE / 2.0);
        state = move_player(state, MoveDirection::Left);
        assert_eq!(state.player_x, PLAYFIELD_WIDTH - PLAYER_SIZE / 2.0 - PLAYER_STEP);
    }

    #[test]
    fn test_fire_chance_is_capped() {
        assert!((enemy_fire_chance(0.1, 1) - 0.11).abs() < 1e-6);
        assert_eq!(enemy_fire_chance(0.45, 10), MAX_ENEMY_FIRE_CHANCE);
    }

    #[test]
    fn test_enemy_shoot_needs_living_enemy() {
        let (mut state, _, mut rng) = fresh();
        for enemy in state.enemies.iter_mut() {
            enemy.alive = false;
        }
        let out = enemy_shoot(state.clone(), 1.0, &mut rng);
        assert_eq!(out, state);
    }

    #[test]
    fn test_enemy_shoot_fires_from_living_enemy() {
        let (mut state, _, mut rng) = fresh();
        for enemy in state.enemies.iter_mut().skip(1) {
            enemy.alive = false;
        }
        let shooter = state.enemies[0].pos;
        for _ in 0..200 {
            state = enemy_shoot(state, 0.3, &mut rng);
        }
        let fired = state.enemy_bullets.len();
        // 0.31 per call over 200 calls
        assert!(fired > 20 && fired < 120);
        for bullet in &state.enemy_bullets {
            assert_eq!(bullet.pos.x, shooter.x);
            assert_eq!(bullet.pos.y, shooter.y + ENEMY_SIZE / 2.0);
            assert!(!bullet.is_rising());
        }
    }

    #[test]
    fn test_zero_fire_rate_still_scales_with_level() {
        let (mut state, _, mut rng) = fresh();
        state.level = 50;
        let mut fired = 0;
        for _ in 0..100 {
            let out = enemy_shoot(state.clone(), 0.0, &mut rng);
            fired += out.enemy_bullets.len();
        }
        assert!(fired > 20);
    }
}
