//! Asteroid spawning and the difficulty ramp
//!
//! Asteroids appear on a ring whose radius is half the field's longer side
//! and head for the planet. Every spawn shortens the interval until the next one
//! by a tick, down to a hard floor.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{Asteroid, GameEvent, GameState};
use crate::consts::*;
use crate::polar_to_cartesian;

/// Radius of the spawn ring around the planet center
pub const SPAWN_RING_RADIUS: f32 = (if WIDTH > HEIGHT { WIDTH } else { HEIGHT }) / 2.0;

/// True if an asteroid is due on the given 1-based tick
#[inline]
pub fn spawn_due(tick_number: u64, spawn_interval: u32) -> bool {
    tick_number % spawn_interval as u64 == 0
}

/// Interval after one more spawn
#[inline]
pub fn next_interval(spawn_interval: u32) -> u32 {
    if spawn_interval > MIN_SPAWN_INTERVAL {
        spawn_interval - 1
    } else {
        spawn_interval
    }
}

/// Pick a point on the spawn ring
pub fn spawn_point<R: Rng>(rng: &mut R) -> Vec2 {
    let angle = rng.random_range(0.0..TAU);
    PLANET_CENTER + polar_to_cartesian(SPAWN_RING_RADIUS, angle)
}

/// Spawn step for the tick being simulated.
///
/// Returns the new asteroid's ID if one was spawned.
pub fn run(state: &mut GameState, tick_number: u64) -> Option<u32> {
    if !spawn_due(tick_number, state.spawn_interval) {
        return None;
    }

    let pos = spawn_point(&mut state.rng);
    let id = state.next_entity_id();
    let asteroid = Asteroid::spawn(id, pos, &mut state.rng);
    log::debug!(
        "Spawned asteroid {} at ({:.0}, {:.0}) r={:.1} (interval {})",
        id,
        pos.x,
        pos.y,
        asteroid.radius(),
        state.spawn_interval
    );
    state.events.push(GameEvent::AsteroidSpawned {
        id,
        pos,
        radius: asteroid.radius(),
    });
    state.asteroids.push(asteroid);
    state.stats.asteroids_spawned += 1;

    let previous = state.spawn_interval;
    state.spawn_interval = next_interval(previous);
    if state.spawn_interval == MIN_SPAWN_INTERVAL && previous != MIN_SPAWN_INTERVAL {
        log::info!(
            "Spawn interval reached floor of {} ticks at tick {}",
            MIN_SPAWN_INTERVAL,
            tick_number
        );
    }

    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_ring_radius() {
        assert_eq!(SPAWN_RING_RADIUS, 450.0);
    }

    #[test]
    fn test_spawn_point_on_ring() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..100 {
            let p = spawn_point(&mut rng);
            assert!((p.distance(PLANET_CENTER) - SPAWN_RING_RADIUS).abs() < 1e-2);
        }
    }

    #[test]
    fn test_next_interval_floor() {
        assert_eq!(next_interval(100), 99);
        assert_eq!(next_interval(31), 30);
        assert_eq!(next_interval(30), 30);
    }

    #[test]
    fn test_run_only_on_due_ticks() {
        let mut state = GameState::new(5);
        state.start_session();
        assert_eq!(run(&mut state, 99), None);
        assert!(state.asteroids.is_empty());

        let id = run(&mut state, 100);
        assert!(id.is_some());
        assert_eq!(state.asteroids.len(), 1);
        assert_eq!(state.spawn_interval, 99);
        assert_eq!(state.stats.asteroids_spawned, 1);
        // 100 is not a multiple of 99
        assert_eq!(run(&mut state, 100), None);
        assert!(run(&mut state, 198).is_some());
        assert_eq!(state.spawn_interval, 98);
    }

    #[test]
    fn test_interval_ramp_reaches_floor() {
        let mut state = GameState::new(9);
        state.start_session();
        let mut last = state.spawn_interval;
        for tick in 1..=20_000u64 {
            run(&mut state, tick);
            assert!(state.spawn_interval <= last);
            assert!(state.spawn_interval >= MIN_SPAWN_INTERVAL);
            last = state.spawn_interval;
        }
        assert_eq!(state.spawn_interval, MIN_SPAWN_INTERVAL);
    }
}
