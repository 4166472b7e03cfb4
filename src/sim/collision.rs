//! Collision detection, scoring and cleanup
//!
//! Three ordered passes per tick: projectiles against asteroids, asteroids
//! against the ship, asteroids against the planet. Each pass only marks
//! removals while iterating and compacts its collections afterwards, so an
//! asteroid removed by one pass is never seen by the next.

use glam::Vec2;

use super::state::{Asteroid, GameEvent, GameOverCause, GameState, Projectile, Ship};
use crate::consts::*;
use crate::in_field;

/// Summary of one tick's collision passes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    /// Asteroids destroyed by projectiles
    pub kills: u32,
    pub ship_hits: u32,
    pub planet_hits: u32,
    pub game_over: Option<GameOverCause>,
}

/// Strict point-in-circle test
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) < radius
}

/// A projectile hits when its center is inside the asteroid's circle
#[inline]
pub fn projectile_hits_asteroid(projectile: &Projectile, asteroid: &Asteroid) -> bool {
    point_in_circle(projectile.body.pos, asteroid.body.pos, asteroid.radius())
}

/// The ship is hit when its center is inside the asteroid's circle
#[inline]
pub fn asteroid_hits_ship(asteroid: &Asteroid, ship: &Ship) -> bool {
    point_in_circle(ship.position(), asteroid.body.pos, asteroid.radius())
}

/// The planet is hit when the two circles overlap
#[inline]
pub fn asteroid_hits_planet(asteroid: &Asteroid) -> bool {
    point_in_circle(asteroid.body.pos, PLANET_CENTER, PLANET_RADIUS + asteroid.radius())
}

/// Drop every element whose flag is set, preserving order
fn compact<T>(items: &mut Vec<T>, removed: &[bool]) {
    debug_assert_eq!(items.len(), removed.len());
    let mut index = 0;
    items.retain(|_| {
        let keep = !removed[index];
        index += 1;
        keep
    });
}

/// Pass 1: each projectile destroys at most one asteroid (first match in ID order).
///
/// Returns the number of kills.
pub fn projectile_pass(state: &mut GameState) -> u32 {
    let mut asteroid_removed = vec![false; state.asteroids.len()];
    let mut projectile_removed = vec![false; state.projectiles.len()];
    let mut kills = 0;

    for (pi, projectile) in state.projectiles.iter().enumerate() {
        let hit = state
            .asteroids
            .iter()
            .enumerate()
            .find(|(ai, asteroid)| {
                !asteroid_removed[*ai] && projectile_hits_asteroid(projectile, asteroid)
            })
            .map(|(ai, asteroid)| (ai, asteroid.id, asteroid.body.pos));

        if let Some((ai, asteroid_id, pos)) = hit {
            asteroid_removed[ai] = true;
            projectile_removed[pi] = true;
            state.score += SCORE_PER_KILL;
            kills += 1;
            state.events.push(GameEvent::AsteroidDestroyed {
                asteroid: asteroid_id,
                projectile: projectile.id,
                pos,
            });
            log::debug!(
                "Projectile {} destroyed asteroid {} (score {})",
                projectile.id,
                asteroid_id,
                state.score
            );
        }
    }

    if kills > 0 {
        compact(&mut state.asteroids, &asteroid_removed);
        compact(&mut state.projectiles, &projectile_removed);
        state.stats.asteroids_destroyed += kills;
    }
    kills
}

/// Pass 2: asteroids ramming the ship.
///
/// Stops at the hit that destroys the ship. Returns (hits, ship destroyed).
pub fn ship_pass(state: &mut GameState) -> (u32, bool) {
    let mut removed = vec![false; state.asteroids.len()];
    let mut hits = 0;
    let mut destroyed = false;

    for (ai, asteroid) in state.asteroids.iter().enumerate() {
        if !asteroid_hits_ship(asteroid, &state.ship) {
            continue;
        }
        removed[ai] = true;
        hits += 1;
        let health = state.ship.take_damage(SHIP_DAMAGE);
        state.events.push(GameEvent::ShipHit {
            asteroid: asteroid.id,
            health,
        });
        log::debug!("Asteroid {} hit ship (health {})", asteroid.id, health);
        if state.ship.is_destroyed() {
            destroyed = true;
            break;
        }
    }

    if hits > 0 {
        compact(&mut state.asteroids, &removed);
        state.stats.ship_hits += hits;
    }
    (hits, destroyed)
}

/// Pass 3: asteroids reaching the planet.
///
/// Stops at the impact that destroys the planet. Returns (hits, planet destroyed).
pub fn planet_pass(state: &mut GameState) -> (u32, bool) {
    let mut removed = vec![false; state.asteroids.len()];
    let mut hits = 0;
    let mut destroyed = false;

    for (ai, asteroid) in state.asteroids.iter().enumerate() {
        if !asteroid_hits_planet(asteroid) {
            continue;
        }
        removed[ai] = true;
        hits += 1;
        state.planet_health = state.planet_health.saturating_sub(PLANET_DAMAGE);
        state.events.push(GameEvent::PlanetHit {
            asteroid: asteroid.id,
            health: state.planet_health,
        });
        log::debug!(
            "Asteroid {} struck the planet (health {})",
            asteroid.id,
            state.planet_health
        );
        if state.planet_health == 0 {
            destroyed = true;
            break;
        }
    }

    if hits > 0 {
        compact(&mut state.asteroids, &removed);
        state.stats.planet_hits += hits;
    }
    (hits, destroyed)
}

/// Run all three passes in order, transitioning to GameOver when the ship or
/// planet is destroyed. A destroyed ship skips the planet pass.
pub fn run(state: &mut GameState) -> CollisionOutcome {
    let mut outcome = CollisionOutcome {
        kills: projectile_pass(state),
        ..Default::default()
    };

    let (ship_hits, ship_destroyed) = ship_pass(state);
    outcome.ship_hits = ship_hits;
    if ship_destroyed {
        state.game_over(GameOverCause::ShipDestroyed);
        outcome.game_over = Some(GameOverCause::ShipDestroyed);
        return outcome;
    }

    let (planet_hits, planet_destroyed) = planet_pass(state);
    outcome.planet_hits = planet_hits;
    if planet_destroyed {
        state.game_over(GameOverCause::PlanetDestroyed);
        outcome.game_over = Some(GameOverCause::PlanetDestroyed);
    }

    outcome
}

/// Remove projectiles that left the field. Returns how many were removed.
pub fn cleanup(state: &mut GameState) -> usize {
    let before = state.projectiles.len();
    let events = &mut state.events;
    state.projectiles.retain(|p| {
        let keep = in_field(p.body.pos);
        if !keep {
            events.push(GameEvent::ProjectileExpired { id: p.id });
        }
        keep
    });
    before - state.projectiles.len()
}
