//! Application settings, read from an optional TOML file.
//!
//! ```toml
//! frame_delay_ms = 16
//! maps_dir = "maps"
//!
//! [window]
//! width = 800
//! height = 600
//!
//! [render]
//! sample_step = 2
//! ceiling_shade = 0.8
//! side_shade = 0.7
//! horizon_color = 0x808080FF
//! ```
//! Every key is optional.
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::render::color::{NEUTRAL_GRAY, Pixel};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Renderer knobs.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Floor/ceiling sampling stride in pixels, both axes.
    pub sample_step: usize,
    /// Multiplier applied to ceiling samples after lighting.
    pub ceiling_shade: f32,
    /// Multiplier applied to walls reached by a y step.
    pub side_shade: f32,
    pub horizon_color: Pixel,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_step: 2,
            ceiling_shade: 0.8,
            side_shade: 0.7,
            horizon_color: NEUTRAL_GRAY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { width: 800, height: 600, title: "lumencast".to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub frame_delay_ms: u64,
    pub maps_dir: PathBuf,
    pub textures_dir: PathBuf,
    /// Seed for the procedural textures used when bitmap files are missing.
    pub texture_seed: u64,
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.sample_step == 0 {
            return Err(ConfigError::Invalid("render.sample_step must be at least 1".into()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".into()));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            render: RenderConfig::default(),
            frame_delay_ms: 16,
            maps_dir: PathBuf::from("maps"),
            textures_dir: PathBuf::from("textures"),
            texture_seed: 0x5EED,
        }
    }
}
