//! Player settings
//!
//! Persisted as JSON by the host (LocalStorage on web, a file natively) and
//! handed to the simulation as plain values when a round is built.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::highscores::HighScores;

/// Agent shape factors, each in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Overall body width
    pub width: f32,
    /// How far the walls lean outward
    pub skew: f32,
    /// Wall and floor thickness
    pub thickness: f32,
    /// Wall height
    pub height: f32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            width: 0.5,
            skew: 0.5,
            thickness: 0.5,
            height: 0.5,
        }
    }
}

impl AgentSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("agent.width", self.width),
            ("agent.skew", self.skew),
            ("agent.thickness", self.thickness),
            ("agent.height", self.height),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        Ok(())
    }
}

/// Everything the host persists between sessions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub agent: AgentSettings,
    /// Tutorial finished at least once
    pub played_tutorial: bool,
    pub high_scores: HighScores,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.agent.validate()
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
