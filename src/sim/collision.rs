//! Collision detection and resolution
//!
//! Every pass resolves each contact exactly once: a bullet that hits
//! something is deactivated immediately and takes no part in later checks.

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use super::metrics::GameMetrics;
use super::spawn::create_explosion;
use super::state::{GameState, ParticleColor, StrikeFrom};
use crate::consts::*;

/// Bullet-vs-enemy contact distance
pub const ENEMY_HIT_RADIUS: f32 = ENEMY_SIZE / 2.0 + BULLET_RADIUS;
/// Bullet-vs-player contact distance
pub const PLAYER_HIT_RADIUS: f32 = PLAYER_SIZE / 2.0 + BULLET_RADIUS;

/// Circular contact test (strictly closer than `radius`)
#[inline]
pub fn circle_hit(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance(b) < radius
}

/// Inclusive overlap test for two (min, max) boxes
#[inline]
pub fn boxes_overlap(a: (Vec2, Vec2), b: (Vec2, Vec2)) -> bool {
    a.1.x >= b.0.x && a.0.x <= b.1.x && a.1.y >= b.0.y && a.0.y <= b.1.y
}

/// True if any living enemy overlaps any barrier's bounding box
pub fn formation_touches_barrier(state: &GameState) -> bool {
    state.alive_enemies().any(|enemy| {
        let bounds = enemy.bounds();
        state.barriers.iter().any(|b| boxes_overlap(bounds, b.bounds()))
    })
}

/// Erode barrier cells under active bullets. A bullet that destroys a cell
/// is spent; one over an empty or off-grid column keeps flying.
pub fn resolve_barrier_hits(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let volleys = [
        (&mut state.bullets, StrikeFrom::Below),
        (&mut state.enemy_bullets, StrikeFrom::Above),
    ];
    for (bullets, from) in volleys {
        for bullet in bullets.iter_mut().filter(|b| b.active) {
            for barrier in state.barriers.iter_mut() {
                if !barrier.contains(bullet.pos) {
                    continue;
                }
                let Some(col) = barrier.column_at(bullet.pos.x) else {
                    continue;
                };
                if barrier.erode(col, from) {
                    bullet.active = false;
                    events.push(GameEvent::BarrierHit);
                    break;
                }
            }
        }
    }
}

/// Resolve player bullets against the formation, then the bonus target.
/// Each bullet kills at most one enemy per frame.
pub fn resolve_player_bullets<R: Rng + ?Sized>(
    state: &mut GameState,
    metrics: &mut GameMetrics,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    for bullet in state.bullets.iter_mut().filter(|b| b.active) {
        for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
            if !circle_hit(bullet.pos, enemy.pos, ENEMY_HIT_RADIUS) {
                continue;
            }
            let points = enemy.kind.points();
            enemy.alive = false;
            bullet.active = false;
            state.score += u64::from(points);
            metrics.shots_hit += 1;
            metrics.enemies_killed += 1;
            events.push(GameEvent::EnemyKilled {
                kind: enemy.kind,
                points,
            });
            state
                .particles
                .extend(create_explosion(enemy.pos, ParticleColor::Magenta, rng));
            break;
        }

        if !bullet.active {
            continue;
        }
        let hit = state
            .bonus
            .target()
            .is_some_and(|t| circle_hit(bullet.pos, t.pos, BONUS_HIT_RADIUS));
        if !hit {
            continue;
        }
        if let Some(target) = state.bonus.take() {
            bullet.active = false;
            state.score += u64::from(target.points);
            metrics.shots_hit += 1;
            events.push(GameEvent::BonusTargetKilled {
                points: target.points,
            });
            state
                .particles
                .extend(create_explosion(target.pos, ParticleColor::Yellow, rng));
        }
    }
}

/// Resolve enemy bullets against the player.
///
/// The cooldown gate is evaluated once per frame, so several bullets
/// overlapping the player on the same frame each cost a life.
pub fn resolve_player_hits<R: Rng + ?Sized>(
    state: &mut GameState,
    now_ms: u64,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    if !state.can_take_hit(now_ms) {
        return;
    }

    let player = state.player_pos();
    for bullet in state.enemy_bullets.iter_mut().filter(|b| b.active) {
        if !circle_hit(bullet.pos, player, PLAYER_HIT_RADIUS) {
            continue;
        }
        bullet.active = false;
        state.lives = state.lives.saturating_sub(1);
        state.last_hit_ms = Some(now_ms);
        events.push(GameEvent::PlayerHit);
        state
            .particles
            .extend(create_explosion(player, ParticleColor::Cyan, rng));
        if state.lives == 0 {
            state.is_game_over = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BonusSlot, BonusTarget, Bullet};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fixture() -> (GameState, GameMetrics, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut state = GameState::new(&mut rng);
        state.is_playing = true;
        (state, GameMetrics::new(0), rng)
    }

    fn bullet_at(pos: Vec2) -> Bullet {
        Bullet {
            pos,
            ..Bullet::player(pos.x)
        }
    }

    #[test]
    fn test_circle_hit_is_strict() {
        assert!(circle_hit(Vec2::ZERO, Vec2::new(19.9, 0.0), ENEMY_HIT_RADIUS));
        assert!(!circle_hit(Vec2::ZERO, Vec2::new(20.0, 0.0), ENEMY_HIT_RADIUS));
    }

    #[test]
    fn test_bullet_kills_exactly_one_enemy() {
        let (mut state, mut metrics, mut rng) = fixture();
        // Stack two enemies on the same spot
        let target = state.enemies[12].pos;
        state.enemies[13].pos = target;
        state.bullets.push(bullet_at(target));
        let mut events = Vec::new();

        resolve_player_bullets(&mut state, &mut metrics, &mut rng, &mut events);

        assert!(!state.enemies[12].alive);
        assert!(state.enemies[13].alive);
        assert!(!state.bullets[0].active);
        assert_eq!(state.score, 20);
        assert_eq!(metrics.shots_hit, 1);
        assert_eq!(metrics.enemies_killed, 1);
        assert_eq!(state.particles.len(), EXPLOSION_PARTICLES);
        assert_eq!(
            events,
            vec![GameEvent::EnemyKilled {
                kind: state.enemies[12].kind,
                points: 20
            }]
        );
    }

    #[test]
    fn test_bonus_target_hit() {
        let (mut state, mut metrics, mut rng) = fixture();
        state.bonus = BonusSlot::Present(BonusTarget {
            pos: Vec2::new(400.0, BONUS_Y),
            speed: BONUS_SPEED,
            points: 150,
        });
        state.bullets.push(bullet_at(Vec2::new(430.0, BONUS_Y)));
        let mut events = Vec::new();

        resolve_player_bullets(&mut state, &mut metrics, &mut rng, &mut events);

        assert_eq!(state.bonus, BonusSlot::Absent);
        assert_eq!(state.score, 150);
        assert_eq!(metrics.shots_hit, 1);
        assert_eq!(metrics.enemies_killed, 0);
        assert_eq!(events, vec![GameEvent::BonusTargetKilled { points: 150 }]);
        assert!(state.particles.iter().all(|p| p.color == ParticleColor::Yellow));
    }

    #[test]
    fn test_player_bullet_erodes_bottom_cell() {
        let (mut state, _, _) = fixture();
        let origin = state.barriers[0].origin;
        state.bullets.push(bullet_at(origin + Vec2::new(3.0, 20.0)));
        let mut events = Vec::new();

        resolve_barrier_hits(&mut state, &mut events);

        assert!(!state.bullets[0].active);
        assert!(!state.barriers[0].cells[BARRIER_ROWS - 1][0]);
        assert_eq!(events, vec![GameEvent::BarrierHit]);
    }

    #[test]
    fn test_enemy_bullet_erodes_top_cell() {
        let (mut state, _, _) = fixture();
        let origin = state.barriers[1].origin;
        let mut bullet = Bullet::enemy(Vec2::ZERO);
        bullet.pos = origin + Vec2::new(15.0, 1.0);
        state.enemy_bullets.push(bullet);
        let mut events = Vec::new();

        resolve_barrier_hits(&mut state, &mut events);

        assert!(!state.enemy_bullets[0].active);
        assert!(!state.barriers[1].cells[0][2]);
    }

    #[test]
    fn test_off_grid_column_passes_through() {
        let (mut state, _, _) = fixture();
        let origin = state.barriers[0].origin;
        state.bullets.push(bullet_at(origin + Vec2::new(70.0, 10.0)));
        let mut events = Vec::new();

        resolve_barrier_hits(&mut state, &mut events);

        assert!(state.bullets[0].active);
        assert!(state.barriers[0].is_pristine());
        assert!(events.is_empty());
    }

    #[test]
    fn test_player_hit_respects_cooldown() {
        let (mut state, _, mut rng) = fixture();
        let mut bullet = Bullet::enemy(Vec2::ZERO);
        bullet.pos = state.player_pos();
        state.enemy_bullets.push(bullet);
        state.last_hit_ms = Some(1_000);
        let mut events = Vec::new();

        resolve_player_hits(&mut state, 2_000, &mut rng, &mut events);
        assert_eq!(state.lives, STARTING_LIVES as u32);
        assert!(state.enemy_bullets[0].active);

        resolve_player_hits(&mut state, 2_001, &mut rng, &mut events);
        assert_eq!(state.lives, STARTING_LIVES as u32 - 1);
        assert_eq!(state.last_hit_ms, Some(2_001));
        assert_eq!(events, vec![GameEvent::PlayerHit]);
    }

    #[test]
    fn test_simultaneous_hits_each_cost_a_life() {
        let (mut state, _, mut rng) = fixture();
        for dx in [-5.0, 0.0, 5.0] {
            let mut bullet = Bullet::enemy(Vec2::ZERO);
            bullet.pos = state.player_pos() + Vec2::new(dx, 0.0);
            state.enemy_bullets.push(bullet);
        }
        let mut events = Vec::new();

        resolve_player_hits(&mut state, 5_000, &mut rng, &mut events);

        assert_eq!(state.lives, 0);
        assert!(state.is_game_over);
        assert_eq!(events.len(), 3);
        assert!(state.enemy_bullets.iter().all(|b| !b.active));
    }

    #[test]
    fn test_formation_touching_barrier() {
        let (mut state, _, _) = fixture();
        assert!(!formation_touches_barrier(&state));
        state.enemies[0].pos = state.barriers[2].origin;
        assert!(formation_touches_barrier(&state));
        state.enemies[0].alive = false;
        assert!(!formation_touches_barrier(&state));
    }
}
