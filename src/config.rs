use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::batch::{DEFAULT_CAPACITY, MAX_CAPACITY};
use crate::error::RenderError;
use crate::utils::Color;

/// Environment variable naming a JSON config file for the demo.
pub const CONFIG_ENV: &str = "SAP_RENDER_CONFIG";

/// Window and renderer settings. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: Color,
    pub vsync: bool,
    pub batch_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "sap".to_string(),
            width: 800,
            height: 700,
            clear_color: Color::rgba(10, 10, 23, 255),
            vsync: true,
            batch_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl RenderConfig {
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the renderer cannot honor.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.batch_capacity > MAX_CAPACITY {
            return Err(RenderError::BatchCapacity {
                requested: self.batch_capacity,
                max: MAX_CAPACITY,
            });
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Loads the file named by [`CONFIG_ENV`], or returns defaults when unset.
    pub fn from_env() -> Result<Self, RenderError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                log::info!("loading render config from {:?}", path);
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }
}
