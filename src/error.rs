//! Error types.
//!
//! The simulation itself has no recoverable failures: losing is a phase
//! transition and out-of-phase commands are no-ops. What remains is
//! invariant checking ([`InvariantViolation`], produced by
//! [`GameState::validate`](crate::sim::GameState::validate)) and runner
//! configuration loading ([`SettingsError`]).

use std::fmt;
use std::path::PathBuf;

/// A broken session invariant
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// Ship health above its maximum
    ShipHealthOutOfRange { health: u32 },
    /// Planet health above its maximum
    PlanetHealthOutOfRange { health: u32 },
    /// Spawn interval outside [floor, initial]
    SpawnIntervalOutOfRange { interval: u32 },
    /// Score not a whole number of kills
    ScoreNotWholeKills { score: u64 },
    /// Ship drifted off its orbit circle
    ShipOffOrbit { distance: f32 },
    /// Entity IDs not strictly increasing within a collection
    UnorderedIds {
        collection: &'static str,
        id: u32,
    },
    /// Entity with a non-finite position or velocity
    NonFiniteEntity {
        collection: &'static str,
        id: u32,
    },
    /// `final_score` set outside GameOver, or missing in GameOver
    FinalScoreMismatch,
    /// A destroyed ship or planet in a running session
    DeadButPlaying,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShipHealthOutOfRange { health } => {
                write!(f, "ship health {health} exceeds maximum")
            }
            Self::PlanetHealthOutOfRange { health } => {
                write!(f, "planet health {health} exceeds maximum")
            }
            Self::SpawnIntervalOutOfRange { interval } => {
                write!(f, "spawn interval {interval} outside allowed range")
            }
            Self::ScoreNotWholeKills { score } => {
                write!(f, "score {score} is not a multiple of the kill reward")
            }
            Self::ShipOffOrbit { distance } => {
                write!(f, "ship is {distance:.3} units from the planet center")
            }
            Self::UnorderedIds { collection, id } => {
                write!(f, "{collection} id {id} out of order or duplicated")
            }
            Self::NonFiniteEntity { collection, id } => {
                write!(f, "{collection} id {id} has non-finite kinematics")
            }
            Self::FinalScoreMismatch => write!(f, "final score does not match phase"),
            Self::DeadButPlaying => write!(f, "session still running with zero health"),
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Failure loading runner settings
#[derive(Debug)]
pub enum SettingsError {
    /// File could not be read
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// File is not valid settings JSON
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, .. } => write!(f, "cannot read settings file {}", path.display()),
            Self::Parse { path, .. } => {
                write!(f, "invalid settings in {}", path.display())
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}
