//! Session invariant checks
//!
//! Cheap enough to run after every tick in debug builds.

use super::state::{GamePhase, GameState};
use crate::consts::*;
use crate::error::InvariantViolation;

/// Orbit tolerance; position is recomputed from the angle each tick
const ORBIT_EPSILON: f32 = 1e-2;

impl GameState {
    /// Check every session invariant, returning the first violation found
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if self.ship.health > SHIP_MAX_HEALTH {
            return Err(InvariantViolation::ShipHealthOutOfRange {
                health: self.ship.health,
            });
        }
        if self.planet_health > PLANET_MAX_HEALTH {
            return Err(InvariantViolation::PlanetHealthOutOfRange {
                health: self.planet_health,
            });
        }
        if !(MIN_SPAWN_INTERVAL..=INITIAL_SPAWN_INTERVAL).contains(&self.spawn_interval) {
            return Err(InvariantViolation::SpawnIntervalOutOfRange {
                interval: self.spawn_interval,
            });
        }
        if self.score % SCORE_PER_KILL != 0 {
            return Err(InvariantViolation::ScoreNotWholeKills { score: self.score });
        }

        let distance = self.ship.position().distance(PLANET_CENTER);
        if (distance - SHIP_ORBIT_RADIUS).abs() > ORBIT_EPSILON {
            return Err(InvariantViolation::ShipOffOrbit { distance });
        }

        check_ids("projectiles", self.projectiles.iter().map(|p| (p.id, &p.body)))?;
        check_ids("asteroids", self.asteroids.iter().map(|a| (a.id, &a.body)))?;

        let game_over = self.phase == GamePhase::GameOver;
        if game_over != self.final_score.is_some() {
            return Err(InvariantViolation::FinalScoreMismatch);
        }
        if matches!(self.phase, GamePhase::Playing | GamePhase::Paused)
            && (self.ship.is_destroyed() || self.planet_health == 0)
        {
            return Err(InvariantViolation::DeadButPlaying);
        }

        Ok(())
    }
}

fn check_ids<'a>(
    collection: &'static str,
    bodies: impl Iterator<Item = (u32, &'a super::state::Body)>,
) -> Result<(), InvariantViolation> {
    let mut last: Option<u32> = None;
    for (id, body) in bodies {
        if last.is_some_and(|prev| id <= prev) {
            return Err(InvariantViolation::UnorderedIds { collection, id });
        }
        if !body.pos.is_finite() || !body.vel.is_finite() {
            return Err(InvariantViolation::NonFiniteEntity { collection, id });
        }
        last = Some(id);
    }
    Ok(())
}
