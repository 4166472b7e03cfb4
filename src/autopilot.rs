//! Demo player
//!
//! Reads only the render snapshot, so it exercises the same boundary a human
//! player's presentation layer would. Used by the headless runner and as an
//! attract mode.

use std::collections::HashMap;

use glam::Vec2;

use crate::consts::*;
use crate::engine::Intent;
use crate::sim::{GamePhase, Rotation};
use crate::snapshot::{AsteroidSnapshot, RenderSnapshot};

/// Default ticks between shots
pub const DEFAULT_FIRE_COOLDOWN: u32 = 8;
/// Start dodging when an asteroid's edge is this close to the ship
const DODGE_MARGIN: f32 = 60.0;
/// Extra ticks before re-engaging a target we already shot at
const ENGAGE_GRACE_TICKS: u64 = 3;

/// Earliest positive time at which a shot of `speed` from the origin meets a
/// target at `rel_pos` moving with `target_vel`
pub fn intercept_time(rel_pos: Vec2, target_vel: Vec2, speed: f32) -> Option<f32> {
    let a = target_vel.length_squared() - speed * speed;
    let b = 2.0 * rel_pos.dot(target_vel);
    let c = rel_pos.length_squared();

    if a.abs() < 1e-6 {
        // Target as fast as the shot: linear case
        if b >= 0.0 {
            return None;
        }
        return Some(-c / b);
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);
    [t1, t2]
        .into_iter()
        .filter(|t| *t >= 0.0)
        .min_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal))
}

/// Ticks until an asteroid reaches the planet at its current speed
fn time_to_impact(asteroid: &AsteroidSnapshot) -> f32 {
    let gap = asteroid.position.distance(PLANET_CENTER) - PLANET_RADIUS - asteroid.radius;
    let speed = asteroid.velocity.length().max(1e-3);
    gap.max(0.0) / speed
}

/// Snapshot-driven demo player
#[derive(Debug, Clone)]
pub struct Autopilot {
    fire_cooldown: u32,
    cooldown: u32,
    /// Asteroid id -> tick after which our shot should have landed
    engaged: HashMap<u32, u64>,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(DEFAULT_FIRE_COOLDOWN)
    }
}

impl Autopilot {
    pub fn new(fire_cooldown: u32) -> Self {
        Self {
            fire_cooldown,
            cooldown: 0,
            engaged: HashMap::new(),
        }
    }

    /// Decide this tick's intents
    pub fn next_intents(&mut self, snap: &RenderSnapshot) -> Vec<Intent> {
        match snap.phase {
            GamePhase::Menu => return vec![Intent::StartSession],
            GamePhase::Paused | GamePhase::GameOver => {
                self.engaged.clear();
                self.cooldown = 0;
                return Vec::new();
            }
            GamePhase::Playing => {}
        }

        self.cooldown = self.cooldown.saturating_sub(1);
        self.engaged
            .retain(|id, until| *until > snap.tick && snap.asteroids.iter().any(|a| a.id == *id));

        let mut intents = vec![Intent::SetRotating(self.dodge(snap))];

        let ship = snap.ship.position;
        let target = snap
            .asteroids
            .iter()
            .filter(|a| !self.engaged.contains_key(&a.id))
            .filter_map(|a| {
                let t = intercept_time(a.position - ship, a.velocity, PROJECTILE_SPEED)?;
                let point = a.position + a.velocity * t;
                crate::in_field(point).then_some((a, t, point))
            })
            .min_by(|(a, ..), (b, ..)| {
                time_to_impact(a)
                    .partial_cmp(&time_to_impact(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        match target {
            Some((asteroid, t, point)) if self.cooldown == 0 => {
                intents.push(Intent::Fire(point));
                self.cooldown = self.fire_cooldown;
                self.engaged
                    .insert(asteroid.id, snap.tick + t.ceil() as u64 + ENGAGE_GRACE_TICKS);
            }
            Some((_, _, point)) => intents.push(Intent::SetAiming(point)),
            None => {}
        }

        intents
    }

    /// Rotate away from the closest asteroid about to ram the ship
    fn dodge(&self, snap: &RenderSnapshot) -> Rotation {
        let ship = snap.ship.position;
        let threat = snap
            .asteroids
            .iter()
            .map(|a| (a, a.position.distance(ship) - a.radius))
            .filter(|(_, gap)| *gap < DODGE_MARGIN)
            .min_by(|(_, x), (_, y)| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));

        let Some((asteroid, _)) = threat else {
            return Rotation::None;
        };
        // Direction the ship moves when its orbit angle increases
        let tangent = Vec2::new(-snap.ship.angle.sin(), snap.ship.angle.cos());
        if (ship - asteroid.position).dot(tangent) >= 0.0 {
            Rotation::Right
        } else {
            Rotation::Left
        }
    }
}
