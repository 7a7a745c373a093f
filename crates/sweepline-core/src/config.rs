use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailPreset {
    pub name: String,
    pub max_vertex_count: u32,
    pub header_cool_down_threshold: f32,
    pub max_segment_lifetime: f32,
    pub interpolation_step_count: u32,
    pub cubic_hermite_tangent_scale: f32,
}

impl Default for TrailPreset {
    fn default() -> Self {
        Self {
            name: "Default".into(),
            max_vertex_count: 1000,
            header_cool_down_threshold: 20.0,
            max_segment_lifetime: 1000.0,
            interpolation_step_count: 1,
            cubic_hermite_tangent_scale: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub trails: Vec<TrailPreset>,
    /// Frames stepped by the headless driver.
    pub frames: u32,
    pub delta_time: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trails: vec![TrailPreset::default()],
            frames: 100,
            delta_time: 10.0,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
