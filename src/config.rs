/// Runtime configuration, read from an optional JSON file.
///
/// Every field has a default, so `{}` is a valid config and any subset of
/// fields can be overridden.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::ScreenSize;
use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Logical screen width in pixels.
    pub screen_width: f32,
    /// Logical screen height in pixels.
    pub screen_height: f32,
    /// Frame budget; 33 ms is roughly 30 FPS.
    pub frame_millis: u64,
    /// Fixed RNG seed for reproducible asteroid layouts.
    pub seed: Option<u64>,
    /// Where the best score is kept between sessions.
    pub high_score_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let screen = ScreenSize::default();
        Self {
            screen_width: screen.width,
            screen_height: screen.height,
            frame_millis: 33,
            seed: None,
            high_score_path: None,
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.screen_width > 0.0) {
            return Err(ConfigError::Invalid {
                field: "screen_width",
                reason: format!("must be positive, got {}", self.screen_width),
            });
        }
        if !(self.screen_height > 0.0) {
            return Err(ConfigError::Invalid {
                field: "screen_height",
                reason: format!("must be positive, got {}", self.screen_height),
            });
        }
        if self.frame_millis == 0 {
            return Err(ConfigError::Invalid {
                field: "frame_millis",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn screen(&self) -> ScreenSize {
        ScreenSize {
            width: self.screen_width,
            height: self.screen_height,
        }
    }

    /// Configured high-score file, or `$HOME/.space_shooter_score`.
    pub fn high_score_file(&self) -> PathBuf {
        self.high_score_path.clone().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".space_shooter_score")
        })
    }
}
