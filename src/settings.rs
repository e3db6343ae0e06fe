//! Game settings and difficulty tables
//!
//! This is the configuration surface handed over by the settings dialog:
//! which marker the human plays, how often the computer blunders, and how
//! dense the obstacle field is.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_THINK_DELAY, DEFAULT_TICK_RATE};
use crate::sim::Marker;

/// Errors raised while loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown difficulty tier `{0}`")]
    UnknownTier(String),
}

/// How likely the computer is to ignore search and play a random cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiDifficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Impossible,
}

impl AiDifficulty {
    pub const ALL: [AiDifficulty; 4] = [
        AiDifficulty::Easy,
        AiDifficulty::Medium,
        AiDifficulty::Hard,
        AiDifficulty::Impossible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AiDifficulty::Easy => "easy",
            AiDifficulty::Medium => "medium",
            AiDifficulty::Hard => "hard",
            AiDifficulty::Impossible => "impossible",
        }
    }

    pub fn from_name(s: &str) -> Result<Self, SettingsError> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(AiDifficulty::Easy),
            "medium" | "med" => Ok(AiDifficulty::Medium),
            "hard" => Ok(AiDifficulty::Hard),
            "impossible" => Ok(AiDifficulty::Impossible),
            _ => Err(SettingsError::UnknownTier(s.to_string())),
        }
    }

    /// Probability of substituting a random move for the searched one
    pub fn randomness(&self) -> f64 {
        match self {
            AiDifficulty::Easy => 0.6,
            AiDifficulty::Medium => 0.3,
            AiDifficulty::Hard => 0.1,
            AiDifficulty::Impossible => 0.0,
        }
    }
}

/// Obstacle field parameters for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObstacleTier {
    pub min_size: f32,
    pub max_size: f32,
    /// Units per second
    pub min_speed: f32,
    pub max_speed: f32,
    pub spawn_interval_seconds: f32,
}

/// Named obstacle density levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl ObstacleDifficulty {
    pub const ALL: [ObstacleDifficulty; 3] = [
        ObstacleDifficulty::Easy,
        ObstacleDifficulty::Medium,
        ObstacleDifficulty::Hard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleDifficulty::Easy => "easy",
            ObstacleDifficulty::Medium => "medium",
            ObstacleDifficulty::Hard => "hard",
        }
    }

    pub fn from_name(s: &str) -> Result<Self, SettingsError> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(ObstacleDifficulty::Easy),
            "medium" | "med" => Ok(ObstacleDifficulty::Medium),
            "hard" => Ok(ObstacleDifficulty::Hard),
            _ => Err(SettingsError::UnknownTier(s.to_string())),
        }
    }

    pub fn tier(&self) -> ObstacleTier {
        match self {
            ObstacleDifficulty::Easy => ObstacleTier {
                min_size: 15.0,
                max_size: 30.0,
                min_speed: 90.0,
                max_speed: 180.0,
                spawn_interval_seconds: 0.5,
            },
            // 2-5 px per frame at 60 fps, a new obstacle every quarter second
            ObstacleDifficulty::Medium => ObstacleTier {
                min_size: 20.0,
                max_size: 40.0,
                min_speed: 120.0,
                max_speed: 300.0,
                spawn_interval_seconds: 0.25,
            },
            ObstacleDifficulty::Hard => ObstacleTier {
                min_size: 25.0,
                max_size: 50.0,
                min_speed: 180.0,
                max_speed: 360.0,
                spawn_interval_seconds: 0.2,
            },
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Marker played by the human. The computer takes the other one; X moves first.
    pub marker: Marker,
    pub ai_difficulty: AiDifficulty,
    pub obstacle_difficulty: ObstacleDifficulty,
    /// Simulation steps per second
    pub tick_rate: u32,
    /// Computer thinking pause (seconds)
    pub think_delay_secs: f32,
    pub player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            marker: Marker::X,
            ai_difficulty: AiDifficulty::default(),
            obstacle_difficulty: ObstacleDifficulty::default(),
            tick_rate: DEFAULT_TICK_RATE,
            think_delay_secs: DEFAULT_THINK_DELAY,
            player_name: "Player".to_string(),
        }
    }
}

impl Settings {
    /// Computer's marker
    pub fn computer_marker(&self) -> Marker {
        self.marker.other()
    }

    /// Whether the human opens the game
    pub fn human_moves_first(&self) -> bool {
        self.marker == Marker::X
    }

    /// Fixed simulation timestep in seconds
    pub fn sim_dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded settings from {} (ai: {}, obstacles: {})",
            path.as_ref().display(),
            settings.ai_difficulty.as_str(),
            settings.obstacle_difficulty.as_str()
        );
        Ok(settings)
    }
}
