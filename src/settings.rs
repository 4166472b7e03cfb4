//! Runner settings
//!
//! Controls how a session is driven (seed, length, demo player), never game
//! balance. Stored as JSON; missing keys fall back to defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::autopilot::DEFAULT_FIRE_COOLDOWN;
use crate::error::SettingsError;

/// Headless runner settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; random when absent
    pub seed: Option<u64>,
    /// Stop after this many simulated ticks
    pub max_ticks: u64,
    /// Let the demo player drive the ship
    pub autopilot: bool,
    /// Pace ticks against the wall clock instead of running flat out
    pub realtime: bool,
    /// Log progress every N ticks (0 disables)
    pub report_interval: u64,
    /// Ticks between autopilot shots
    pub autopilot_fire_cooldown: u32,
    /// Start a new session after GameOver until `max_ticks` is spent
    pub auto_retry: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            max_ticks: 60 * 60 * 5, // five minutes at 60 Hz
            autopilot: true,
            realtime: false,
            report_interval: 600,
            autopilot_fire_cooldown: DEFAULT_FIRE_COOLDOWN,
            auto_retry: false,
        }
    }
}

impl Settings {
    /// Parse settings JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Seed to use for this run
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "realtime": true }"#).expect("parse");
        assert_eq!(settings.seed, Some(42));
        assert!(settings.realtime);
        assert_eq!(settings.max_ticks, Settings::default().max_ticks);
        assert!(settings.autopilot);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json(r#"{ "max_ticks": "lots" }"#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "orbital-defender-settings-{}.json",
            std::process::id()
        ));
        let settings = Settings {
            seed: Some(7),
            auto_retry: true,
            ..Default::default()
        };
        settings.save(&path).expect("save");
        let loaded = Settings::load(&path).expect("load");
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_fixed_seed_resolves() {
        let settings = Settings {
            seed: Some(99),
            ..Default::default()
        };
        assert_eq!(settings.resolve_seed(), 99);
    }
}
