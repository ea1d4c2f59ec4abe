use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{
    error::WeatherError,
    model::{Coordinates, UnitSystem},
};

pub const DEFAULT_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline/";

/// Everything the query builder needs, injected rather than read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub credential: String,
    pub base_url: String,
    pub unit_system: UnitSystem,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// unit_system = "metric"
///
/// [home]
/// latitude = 52.52
/// longitude = 13.405
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,

    #[serde(default)]
    pub unit_system: UnitSystem,

    /// Overrides [`DEFAULT_BASE_URL`]; mostly useful for testing against a local server.
    pub base_url: Option<String>,

    /// Coordinates used when no location is given and no device fix is wanted.
    pub home: Option<Coordinates>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-window", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace the stored key when `api_key` is non-blank. Blank overrides are ignored.
    pub fn override_api_key(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Settings for the query builder. Fails before any request when the key is missing.
    pub fn provider_settings(&self) -> Result<ProviderSettings, WeatherError> {
        let credential = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| WeatherError::Configuration("no API key configured".to_string()))?;

        Ok(ProviderSettings {
            credential: credential.to_string(),
            base_url: self.base_url().to_string(),
            unit_system: self.unit_system,
        })
    }
}
