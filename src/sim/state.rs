//! Game state and core simulation types
//!
//! Everything a session needs to advance deterministically lives here:
//! entities, session counters and the seeded RNG.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{direction_to, polar_to_cartesian};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no simulation
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen, still rendered
    Paused,
    /// Run ended, waiting for retry
    GameOver,
}

/// Held rotation input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    /// Counter-clockwise on screen (angle decreases)
    Left,
    /// Clockwise on screen (angle increases)
    Right,
}

impl Rotation {
    pub fn sign(self) -> f32 {
        match self {
            Rotation::None => 0.0,
            Rotation::Left => -1.0,
            Rotation::Right => 1.0,
        }
    }
}

/// Shared kinematic data for every entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        debug_assert!(radius > 0.0, "body radius must be positive, got {radius}");
        debug_assert!(pos.is_finite(), "body position must be finite, got {pos}");
        debug_assert!(vel.is_finite(), "body velocity must be finite, got {vel}");
        Self { pos, vel, radius }
    }

    /// One Euler step (one tick)
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }
}

/// The player's ship, pinned to a circular orbit around the planet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub body: Body,
    /// Orbit angle (radians)
    pub angle: f32,
    pub health: u32,
    /// Turret target point
    pub aim: Vec2,
}

impl Default for Ship {
    fn default() -> Self {
        let mut ship = Self {
            body: Body::new(PLANET_CENTER, Vec2::ZERO, SHIP_SIZE),
            angle: 0.0,
            health: SHIP_MAX_HEALTH,
            aim: Vec2::new(WIDTH / 2.0, 0.0),
        };
        ship.update();
        ship
    }
}

impl Ship {
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.pos
    }

    /// Step the orbit angle one tick in the given direction
    pub fn rotate(&mut self, rotation: Rotation) {
        if rotation == Rotation::None {
            return;
        }
        self.angle += rotation.sign() * SHIP_ROTATION_SPEED;
        self.update();
    }

    /// Recompute position from the orbit angle
    pub fn update(&mut self) {
        self.body.pos = PLANET_CENTER + polar_to_cartesian(SHIP_ORBIT_RADIUS, self.angle);
    }

    pub fn aim(&mut self, point: Vec2) {
        self.aim = point;
    }

    /// Turret direction in radians (rendering only)
    pub fn turret_angle(&self) -> f32 {
        let d = self.aim - self.body.pos;
        d.y.atan2(d.x)
    }

    /// Apply damage, clamping at zero. Returns remaining health.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }
}

/// A projectile fired from the ship. Velocity is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub body: Body,
}

impl Projectile {
    pub fn new(id: u32, origin: Vec2, target: Vec2) -> Self {
        let vel = direction_to(origin, target) * PROJECTILE_SPEED;
        Self {
            id,
            body: Body::new(origin, vel, PROJECTILE_SIZE),
        }
    }

    pub fn update(&mut self) {
        self.body.integrate();
    }
}

/// An asteroid drifting straight at the planet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    pub body: Body,
    /// Visual spin angle (radians)
    pub rotation: f32,
    /// Spin rate (radians per tick)
    pub spin: f32,
    /// Seed for procedural outline generation
    pub shape_seed: u32,
}

impl Asteroid {
    /// Build an asteroid at `pos` heading for the planet center
    pub fn new(id: u32, pos: Vec2, speed: f32, radius: f32, spin: f32, shape_seed: u32) -> Self {
        let vel = direction_to(pos, PLANET_CENTER) * speed;
        Self {
            id,
            body: Body::new(pos, vel, radius),
            rotation: 0.0,
            spin,
            shape_seed,
        }
    }

    /// Roll speed, size, spin and shape from the session RNG
    pub fn spawn<R: Rng>(id: u32, pos: Vec2, rng: &mut R) -> Self {
        let speed = rng.random_range(ASTEROID_MIN_SPEED..ASTEROID_MAX_SPEED);
        let radius = rng.random_range(ASTEROID_MIN_RADIUS..ASTEROID_MAX_RADIUS);
        let spin = rng.random_range(-ASTEROID_MAX_SPIN..ASTEROID_MAX_SPIN);
        let shape_seed = rng.random();
        Self::new(id, pos, speed, radius, spin, shape_seed)
    }

    pub fn update(&mut self) {
        self.body.integrate();
        self.rotation += self.spin;
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.body.radius
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    ShipDestroyed,
    PlanetDestroyed,
}

/// Gameplay events for presentation (sound, particles, HUD flashes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted,
    Paused,
    Resumed,
    ProjectileFired { id: u32, origin: Vec2, target: Vec2 },
    AsteroidSpawned { id: u32, pos: Vec2, radius: f32 },
    AsteroidDestroyed { asteroid: u32, projectile: u32, pos: Vec2 },
    ShipHit { asteroid: u32, health: u32 },
    PlanetHit { asteroid: u32, health: u32 },
    ProjectileExpired { id: u32 },
    GameOver { cause: GameOverCause, final_score: u64 },
}

/// Per-session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub shots_fired: u32,
    pub asteroids_spawned: u32,
    pub asteroids_destroyed: u32,
    pub ship_hits: u32,
    pub planet_hits: u32,
}

/// Undrained events kept before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 1024;

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Session RNG, continues across retries
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Simulated ticks this session
    pub time_ticks: u64,
    pub score: u64,
    pub planet_health: u32,
    /// Ticks between asteroid spawns (the difficulty ramp)
    pub spawn_interval: u32,
    pub ship: Ship,
    /// Live projectiles (sorted by id)
    pub projectiles: Vec<Projectile>,
    /// Live asteroids (sorted by id)
    pub asteroids: Vec<Asteroid>,
    /// Score at the moment of GameOver
    pub final_score: Option<u64>,
    pub stats: SessionStats,
    /// Events since the last drain, capped at `MAX_PENDING_EVENTS` (not part of the simulation)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state in the menu
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            time_ticks: 0,
            score: 0,
            planet_health: PLANET_MAX_HEALTH,
            spawn_interval: INITIAL_SPAWN_INTERVAL,
            ship: Ship::default(),
            projectiles: Vec::new(),
            asteroids: Vec::new(),
            final_score: None,
            stats: SessionStats::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Menu -> Playing
    pub fn start_session(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            return false;
        }
        self.reset_session();
        log::info!("Session started (seed {})", self.seed);
        true
    }

    /// GameOver -> Playing, with a full reset
    pub fn retry_session(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        let previous = self.final_score.unwrap_or(self.score);
        self.reset_session();
        log::info!("Session restarted (previous score {})", previous);
        true
    }

    fn reset_session(&mut self) {
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.score = 0;
        self.planet_health = PLANET_MAX_HEALTH;
        self.spawn_interval = INITIAL_SPAWN_INTERVAL;
        self.ship = Ship::default();
        self.projectiles.clear();
        self.asteroids.clear();
        self.final_score = None;
        self.stats = SessionStats::default();
        self.next_id = 1;
        self.events.push(GameEvent::SessionStarted);
    }

    /// Playing <-> Paused. No-op in other phases.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::Paused);
                log::debug!("Paused at tick {}", self.time_ticks);
                true
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.events.push(GameEvent::Resumed);
                log::debug!("Resumed at tick {}", self.time_ticks);
                true
            }
            _ => false,
        }
    }

    /// Move the turret target. Accepted while playing or paused.
    pub fn aim(&mut self, point: Vec2) -> bool {
        if !point.is_finite() {
            return false;
        }
        match self.phase {
            GamePhase::Playing | GamePhase::Paused => {
                self.ship.aim(point);
                true
            }
            _ => false,
        }
    }

    /// Fire from the ship's current position toward `target`.
    ///
    /// Returns the new projectile's ID, or `None` when not playing or the
    /// target is not a finite point.
    pub fn fire(&mut self, target: Vec2) -> Option<u32> {
        if self.phase != GamePhase::Playing || !target.is_finite() {
            return None;
        }
        self.ship.aim(target);
        let origin = self.ship.position();
        let id = self.next_entity_id();
        self.projectiles.push(Projectile::new(id, origin, target));
        self.stats.shots_fired += 1;
        self.events.push(GameEvent::ProjectileFired { id, origin, target });
        Some(id)
    }

    /// End the session and freeze the score
    pub fn game_over(&mut self, cause: GameOverCause) {
        self.phase = GamePhase::GameOver;
        self.final_score = Some(self.score);
        self.events.push(GameEvent::GameOver {
            cause,
            final_score: self.score,
        });
        log::info!(
            "Game over ({:?}) at tick {}: score {}",
            cause,
            self.time_ticks,
            self.score
        );
    }

    /// True while the simulation advances
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Drain accumulated events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop the oldest events past `MAX_PENDING_EVENTS`
    pub(crate) fn trim_events(&mut self) {
        if self.events.len() <= MAX_PENDING_EVENTS {
            return;
        }
        let excess = self.events.len() - MAX_PENDING_EVENTS;
        self.events.drain(..excess);
        log::warn!("Event buffer full, dropped {} undrained events", excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_in_menu() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.ship.health, SHIP_MAX_HEALTH);
        assert_eq!(state.planet_health, PLANET_MAX_HEALTH);
        assert_eq!(state.spawn_interval, INITIAL_SPAWN_INTERVAL);
    }

    #[test]
    fn test_ship_starts_right_of_planet() {
        let ship = Ship::default();
        let expected = PLANET_CENTER + Vec2::new(SHIP_ORBIT_RADIUS, 0.0);
        assert!(ship.position().distance(expected) < 1e-3);
        assert_eq!(ship.aim, Vec2::new(WIDTH / 2.0, 0.0));
    }

    #[test]
    fn test_ship_rotation_stays_on_orbit() {
        let mut ship = Ship::default();
        for _ in 0..37 {
            ship.rotate(Rotation::Right);
        }
        assert!((ship.angle - 37.0 * SHIP_ROTATION_SPEED).abs() < 1e-4);
        let r = ship.position().distance(PLANET_CENTER);
        assert!((r - SHIP_ORBIT_RADIUS).abs() < 1e-2);

        ship.rotate(Rotation::Left);
        assert!((ship.angle - 36.0 * SHIP_ROTATION_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_take_damage_clamps() {
        let mut ship = Ship::default();
        assert_eq!(ship.take_damage(SHIP_DAMAGE), 75);
        assert_eq!(ship.take_damage(1000), 0);
        assert!(ship.is_destroyed());
    }

    #[test]
    fn test_projectile_velocity_fixed_speed() {
        let p = Projectile::new(1, Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        assert!((p.body.vel.length() - PROJECTILE_SPEED).abs() < 1e-4);
        assert!((p.body.vel.x - 9.0).abs() < 1e-4);
        assert!((p.body.vel.y - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_asteroid_spawn_ranges() {
        let mut rng = Pcg32::seed_from_u64(7);
        for id in 0..200 {
            let pos = Vec2::new(0.0, 0.0);
            let a = Asteroid::spawn(id, pos, &mut rng);
            let speed = a.body.vel.length();
            assert!(speed >= ASTEROID_MIN_SPEED - 1e-4 && speed < ASTEROID_MAX_SPEED + 1e-4);
            assert!(a.radius() >= ASTEROID_MIN_RADIUS && a.radius() < ASTEROID_MAX_RADIUS);
            assert!(a.spin >= -ASTEROID_MAX_SPIN && a.spin < ASTEROID_MAX_SPIN);
            // Heading toward the planet
            assert!(a.body.vel.dot(PLANET_CENTER - pos) > 0.0);
        }
    }

    #[test]
    fn test_asteroid_update_spins() {
        let mut a = Asteroid::new(1, Vec2::new(0.0, HEIGHT / 2.0), 2.0, 30.0, 0.01, 0);
        a.update();
        assert!((a.body.pos.x - 2.0).abs() < 1e-4);
        assert!((a.rotation - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_fire_only_while_playing() {
        let mut state = GameState::new(1);
        assert_eq!(state.fire(Vec2::ZERO), None);

        assert!(state.start_session());
        let id = state.fire(Vec2::new(0.0, 0.0));
        assert_eq!(id, Some(1));
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.ship.aim, Vec2::ZERO);
        assert_eq!(state.stats.shots_fired, 1);

        state.toggle_pause();
        assert_eq!(state.fire(Vec2::ZERO), None);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_phase_transitions_are_guarded() {
        let mut state = GameState::new(1);
        assert!(!state.toggle_pause());
        assert!(!state.retry_session());
        assert!(state.start_session());
        assert!(!state.start_session());
        assert!(!state.retry_session());

        state.game_over(GameOverCause::PlanetDestroyed);
        assert!(!state.toggle_pause());
        assert!(!state.aim(Vec2::ZERO));
        assert!(state.retry_session());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_aim_allowed_while_paused() {
        let mut state = GameState::new(1);
        state.start_session();
        state.toggle_pause();
        assert!(state.aim(Vec2::new(10.0, 20.0)));
        assert_eq!(state.ship.aim, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_non_finite_targets_rejected() {
        let mut state = GameState::new(1);
        state.start_session();
        assert_eq!(state.fire(Vec2::new(f32::NAN, 10.0)), None);
        assert_eq!(state.fire(Vec2::new(f32::INFINITY, 0.0)), None);
        assert!(!state.aim(Vec2::NAN));
        assert!(state.projectiles.is_empty());
        assert_eq!(state.stats.shots_fired, 0);
        assert!(state.ship.turret_angle().is_finite());
    }

    #[test]
    fn test_event_buffer_is_bounded() {
        let mut state = GameState::new(1);
        state.events = vec![GameEvent::Paused; MAX_PENDING_EVENTS + 50];
        state.events.push(GameEvent::Resumed);
        state.trim_events();
        assert_eq!(state.events.len(), MAX_PENDING_EVENTS);
        assert_eq!(state.events.last(), Some(&GameEvent::Resumed));
    }

    #[test]
    fn test_take_events_drains() {
        let mut state = GameState::new(1);
        state.start_session();
        let events = state.take_events();
        assert_eq!(events, vec![GameEvent::SessionStarted]);
        assert!(state.take_events().is_empty());
    }
}
