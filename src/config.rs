use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{BenkyoError, Result};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub focus: FocusConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// "light" (default) or "dark"; the persisted theme wins once set.
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

fn default_theme() -> String {
    "light".into()
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct StorageConfig {
    /// Path to the state file (default: ~/.benkyo/state.json).
    #[serde(default)]
    pub path: Option<String>,
}

impl StorageConfig {
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("~"))
            .join(".benkyo")
    }

    pub fn state_path(&self) -> PathBuf {
        self.path
            .as_deref()
            .map(|s| PathBuf::from(shellexpand::tilde(s).into_owned()))
            .unwrap_or_else(|| Self::default_dir().join("state.json"))
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FocusConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
        }
    }
}

fn default_focus_minutes() -> u32 {
    crate::timer::DEFAULT_FOCUS_MINUTES
}

fn default_short_break_minutes() -> u32 {
    crate::timer::SHORT_BREAK_MINUTES
}

fn default_long_break_minutes() -> u32 {
    crate::timer::LONG_BREAK_MINUTES
}

impl Config {
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| BenkyoError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| BenkyoError::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("benkyo").join("config.toml"))
    }
}
