//! Read-only render view of a session
//!
//! Everything a presentation layer needs to draw a frame, decoupled from the
//! simulation's internal representation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{GameEvent, GamePhase, GameState, SessionStats};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub tick: u64,
    pub paused: bool,
    pub ship: ShipSnapshot,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub asteroids: Vec<AsteroidSnapshot>,
    pub score: u64,
    pub planet_health: u32,
    pub spawn_interval: u32,
    /// Set once the session is over
    pub final_score: Option<u64>,
    /// Events produced since the previous snapshot
    pub events: Vec<GameEvent>,
    pub stats: SessionStats,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ShipSnapshot {
    pub position: Vec2,
    /// Orbit angle; the hull points along it
    pub angle: f32,
    /// Turret direction toward `aim`
    pub turret_angle: f32,
    pub health: u32,
    pub aim: Vec2,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    pub id: u32,
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct AsteroidSnapshot {
    pub id: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub shape_seed: u32,
}

impl RenderSnapshot {
    /// Capture the current state along with events collected by the caller
    pub fn capture(state: &GameState, events: Vec<GameEvent>) -> Self {
        Self {
            phase: state.phase,
            tick: state.time_ticks,
            paused: state.phase == GamePhase::Paused,
            ship: ShipSnapshot {
                position: state.ship.position(),
                angle: state.ship.angle,
                turret_angle: state.ship.turret_angle(),
                health: state.ship.health,
                aim: state.ship.aim,
            },
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileSnapshot {
                    id: p.id,
                    position: p.body.pos,
                    velocity: p.body.vel,
                })
                .collect(),
            asteroids: state
                .asteroids
                .iter()
                .map(|a| AsteroidSnapshot {
                    id: a.id,
                    position: a.body.pos,
                    velocity: a.body.vel,
                    radius: a.radius(),
                    rotation: a.rotation,
                    shape_seed: a.shape_seed,
                })
                .collect(),
            score: state.score,
            planet_health: state.planet_health,
            spawn_interval: state.spawn_interval,
            final_score: state.final_score,
            events,
            stats: state.stats,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};

    #[test]
    fn test_capture_mirrors_state() {
        let mut state = GameState::new(4);
        state.start_session();
        state.fire(Vec2::new(0.0, 0.0));
        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
        }
        let events = state.take_events();
        let snap = RenderSnapshot::capture(&state, events);

        assert_eq!(snap.phase, GamePhase::Playing);
        assert!(!snap.paused);
        assert_eq!(snap.tick, 100);
        assert_eq!(snap.asteroids.len(), state.asteroids.len());
        assert_eq!(snap.projectiles.len(), state.projectiles.len());
        assert_eq!(snap.ship.health, state.ship.health);
        assert!(
            snap.events
                .iter()
                .any(|e| matches!(e, GameEvent::AsteroidSpawned { .. }))
        );
        assert_eq!(snap.final_score, None);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let mut state = GameState::new(4);
        state.start_session();
        let snap = RenderSnapshot::capture(&state, state.events.clone());
        let json = serde_json::to_value(&snap).expect("serialize");
        assert_eq!(json["phase"], "Playing");
        assert_eq!(json["ship"]["health"], 100);
        assert_eq!(json["events"][0], "SessionStarted");
    }
}
