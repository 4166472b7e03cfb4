//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session by exactly one logical tick.

use glam::Vec2;

use super::collision::{self, CollisionOutcome};
use super::spawner;
use super::state::{GameState, Rotation};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held rotation (applied once per tick)
    pub rotation: Rotation,
    /// Fire toward this point before simulating
    pub fire: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// False when the session was not running
    pub advanced: bool,
    /// Asteroid spawned this tick
    pub spawned: Option<u32>,
    pub collisions: CollisionOutcome,
    /// Projectiles removed by cleanup
    pub expired: usize,
}

/// Advance the game state by one fixed timestep.
///
/// Events pile up in `state.events` until a caller drains them with
/// [`GameState::take_events`]; past `MAX_PENDING_EVENTS` the oldest are dropped.
pub fn tick(state: &mut GameState, input: &TickInput) -> TickReport {
    // Handle pause toggle; pausing freezes this tick too
    if input.pause && state.toggle_pause() && !state.is_running() {
        return TickReport::default();
    }

    // Shots land before the step, like intents drained by the engine
    if let Some(target) = input.fire {
        state.fire(target);
    }

    // Don't tick unless playing
    if !state.is_running() {
        return TickReport::default();
    }

    let tick_number = state.time_ticks + 1;

    state.ship.rotate(input.rotation);
    let spawned = spawner::run(state, tick_number);

    state.ship.update();
    for projectile in &mut state.projectiles {
        projectile.update();
    }
    for asteroid in &mut state.asteroids {
        asteroid.update();
    }

    let collisions = collision::run(state);
    let expired = collision::cleanup(state);

    state.time_ticks = tick_number;
    state.trim_events();

    #[cfg(debug_assertions)]
    if let Err(violation) = state.validate() {
        panic!("invariant violated at tick {tick_number}: {violation}");
    }

    log::trace!(
        "Tick {}: {} asteroids, {} projectiles, score {}",
        tick_number,
        state.asteroids.len(),
        state.projectiles.len(),
        state.score
    );

    TickReport {
        advanced: true,
        spawned,
        collisions,
        expired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Asteroid, GameEvent, GamePhase, MAX_PENDING_EVENTS};

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start_session();
        state
    }

    #[test]
    fn test_menu_does_not_tick() {
        let mut state = GameState::new(12345);
        let report = tick(&mut state, &TickInput::default());
        assert!(!report.advanced);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_undrained_events_stay_bounded() {
        let mut state = playing_state(12345);
        state.events = vec![GameEvent::Paused; MAX_PENDING_EVENTS + 10];
        tick(&mut state, &TickInput::default());
        assert_eq!(state.events.len(), MAX_PENDING_EVENTS);
    }

    #[test]
    fn test_tick_advances_counter() {
        let mut state = playing_state(12345);
        for _ in 0..10 {
            assert!(tick(&mut state, &TickInput::default()).advanced);
        }
        assert_eq!(state.time_ticks, 10);
    }

    #[test]
    fn test_first_spawn_on_tick_100() {
        let mut state = playing_state(12345);
        for _ in 0..99 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.asteroids.is_empty());

        let report = tick(&mut state, &TickInput::default());
        assert!(report.spawned.is_some());
        assert_eq!(state.asteroids.len(), 1);
        assert_eq!(state.spawn_interval, INITIAL_SPAWN_INTERVAL - 1);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = playing_state(12345);
        tick(&mut state, &TickInput::default());

        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        // Pause
        let report = tick(&mut state, &input);
        assert!(!report.advanced);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.time_ticks, 1);

        // Paused ticks are frozen
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, 1);

        // Unpause resumes in the same tick
        let report = tick(&mut state, &input);
        assert!(report.advanced);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_rotation_input() {
        let mut state = playing_state(1);
        let input = TickInput {
            rotation: Rotation::Left,
            ..Default::default()
        };
        tick(&mut state, &input);
        tick(&mut state, &input);
        assert!((state.ship.angle + 2.0 * SHIP_ROTATION_SPEED).abs() < 1e-6);
    }

    #[test]
    fn test_fire_moves_projectile_same_tick() {
        let mut state = playing_state(1);
        let origin = state.ship.position();
        let input = TickInput {
            fire: Some(origin + Vec2::new(0.0, -100.0)),
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.projectiles.len(), 1);
        let p = &state.projectiles[0];
        assert!((p.body.pos.y - (origin.y - PROJECTILE_SPEED)).abs() < 1e-3);
    }

    #[test]
    fn test_projectiles_leave_field() {
        let mut state = playing_state(1);
        // Straight right from (650, 350): off the field after 17 ticks
        state.fire(Vec2::new(WIDTH, PLANET_CENTER.y));
        let mut expired = 0;
        for _ in 0..20 {
            expired += tick(&mut state, &TickInput::default()).expired;
        }
        assert_eq!(expired, 1);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_kill_scores() {
        let mut state = playing_state(1);
        let ship = state.ship.position();
        let target = ship + Vec2::new(0.0, -150.0);
        let id = state.next_entity_id();
        state.asteroids.push(Asteroid::new(id, target, 0.0, 30.0, 0.0, 0));

        state.fire(target);
        let mut ticks = 0;
        while state.score == 0 && ticks < 20 {
            tick(&mut state, &TickInput::default());
            ticks += 1;
        }
        assert_eq!(state.score, SCORE_PER_KILL);
        assert!(state.asteroids.is_empty());
        assert!(ticks <= 10);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = playing_state(99999);
        let mut state2 = playing_state(99999);

        let inputs = [
            TickInput {
                rotation: Rotation::Right,
                ..Default::default()
            },
            TickInput {
                fire: Some(Vec2::new(100.0, 100.0)),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.asteroids.len(), state2.asteroids.len());
        for (a, b) in state1.asteroids.iter().zip(&state2.asteroids) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.body, b.body);
        }
        assert!((state1.ship.angle - state2.ship.angle).abs() < 0.0001);
    }
}
