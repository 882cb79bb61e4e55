use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::module::location::Coordinates;

pub const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u64,

    /// Fixed starting position; either half may be left out
    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    /// JSON `[lat, lng]` file re-read on every fetch, takes precedence over
    /// `latitude`/`longitude` when set
    #[serde(default)]
    pub location_file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_retention_days() -> u64 {
    3
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            log_retention_days: default_log_retention_days(),
            latitude: None,
            longitude: None,
            location_file: None,
        }
    }
}

impl TrackerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: TrackerConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    ///
    /// Logging is not up yet when this runs, so the fallback is reported on stderr.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            eprintln!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
