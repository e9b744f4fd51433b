use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::{Location, TemperatureUnit};

/// Top-level configuration stored on disk as TOML.
///
/// Every field has a default, so a missing or partial file is fine: the
/// app works out of the box and the file only needs to list overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the weather forecast API.
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,

    /// Base URL of the geocoding API.
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,

    /// Location shown before the user picks one.
    #[serde(default = "default_location")]
    pub default_location: Location,

    /// Temperature unit used until toggled.
    #[serde(default)]
    pub default_unit: TemperatureUnit,

    /// Quiet window after a keystroke before a geocoding request is issued.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum number of search suggestions shown.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Maximum number of stored favorite cities.
    #[serde(default = "default_max_favorites")]
    pub max_favorites: usize,

    /// Days of daily forecast to request.
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_location() -> Location {
    Location::new(60.17, 24.94, "Helsinki, Finland")
}

const fn default_debounce_ms() -> u64 {
    300
}

const fn default_max_suggestions() -> usize {
    5
}

const fn default_max_favorites() -> usize {
    50
}

const fn default_forecast_days() -> u8 {
    5
}

const fn default_http_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weather_base_url: default_weather_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            default_location: default_location(),
            default_unit: TemperatureUnit::default(),
            debounce_ms: default_debounce_ms(),
            max_suggestions: default_max_suggestions(),
            max_favorites: default_max_favorites(),
            forecast_days: default_forecast_days(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if the file doesn't exist yet.
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
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the persisted favorites list (JSON array).
    pub fn favorites_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("favorites.json"))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }
}
