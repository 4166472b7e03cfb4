//! Orbital Defender - an orbital turret arcade game
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (entities, spawning, collisions, game state)
//! - `engine`: Presentation boundary (intents in, snapshots out, fixed clock)
//! - `snapshot`: Read-only render view of a session
//! - `autopilot`: Demo player driven from snapshots
//! - `settings`: Runner configuration
//! - `error`: Invariant and settings errors

pub mod autopilot;
pub mod engine;
pub mod error;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use autopilot::Autopilot;
pub use engine::{Engine, FixedClock, Intent, IntentSender};
pub use error::{InvariantViolation, SettingsError};
pub use settings::Settings;
pub use snapshot::RenderSnapshot;

use glam::Vec2;

/// Game configuration constants
///
/// Gameplay values are tuned in ticks, not seconds.
pub mod consts {
    use glam::Vec2;

    /// Logical simulation rate
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the clock will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Play-field dimensions
    pub const WIDTH: f32 = 900.0;
    pub const HEIGHT: f32 = 700.0;
    /// Planet sits at the field center
    pub const PLANET_CENTER: Vec2 = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);
    pub const PLANET_RADIUS: f32 = 50.0;
    pub const PLANET_MAX_HEALTH: u32 = 1000;
    pub const PLANET_DAMAGE: u32 = 50;

    /// Ship orbit
    pub const SHIP_ORBIT_RADIUS: f32 = 200.0;
    pub const SHIP_ROTATION_SPEED: f32 = 0.05; // radians per tick
    pub const SHIP_SIZE: f32 = 20.0;
    pub const SHIP_MAX_HEALTH: u32 = 100;
    pub const SHIP_DAMAGE: u32 = 25;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 15.0; // units per tick
    pub const PROJECTILE_SIZE: f32 = 5.0;

    /// Asteroid randomization ranges (half-open)
    pub const ASTEROID_MIN_SPEED: f32 = 1.0;
    pub const ASTEROID_MAX_SPEED: f32 = 3.0;
    pub const ASTEROID_MIN_RADIUS: f32 = 20.0;
    pub const ASTEROID_MAX_RADIUS: f32 = 50.0;
    pub const ASTEROID_MAX_SPIN: f32 = 0.025; // radians per tick, either direction

    /// Spawn cadence (ticks between asteroids)
    pub const INITIAL_SPAWN_INTERVAL: u32 = 100;
    pub const MIN_SPAWN_INTERVAL: u32 = 30;

    pub const SCORE_PER_KILL: u64 = 100;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector pointing from `from` toward `to`, computed via atan2.
///
/// Coincident points yield angle 0 (pointing along +x), same as atan2(0, 0).
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    polar_to_cartesian(1.0, delta.y.atan2(delta.x))
}

/// True if `pos` lies inside the play field, edges included
#[inline]
pub fn in_field(pos: Vec2) -> bool {
    (0.0..=consts::WIDTH).contains(&pos.x) && (0.0..=consts::HEIGHT).contains(&pos.y)
}
