//! Fixed-step simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only (one call to `tick` is one logical tick)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawner;
pub mod state;
pub mod tick;
mod validate;

pub use collision::{CollisionOutcome, cleanup};
pub use state::{
    Asteroid, Body, GameEvent, GameOverCause, GamePhase, GameState, MAX_PENDING_EVENTS, Projectile,
    Rotation, SessionStats, Ship,
};
pub use tick::{TickInput, TickReport, tick};
