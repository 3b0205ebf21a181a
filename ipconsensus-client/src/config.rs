use anyhow::{Context, Result};
use ipconsensus_shared::config::ConsensusConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(flatten)]
    pub consensus: ConsensusConfig,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            consensus: ConsensusConfig::default(),
        }
    }
}

impl Config {
    /// Load the config file, or the defaults when none has been written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            debug!("Loading config from: {:?}", config_path);
            let contents =
                std::fs::read_to_string(config_path).context("Failed to read config file")?;
            let config: Config =
                serde_json::from_str(&contents).context("Failed to parse config file")?;
            Ok(config)
        } else {
            debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_file_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        let config_dir = config_path
            .parent()
            .context("Failed to get config directory")?;

        std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        info!("Config saved to: {:?}", config_path);
        Ok(())
    }

    /// Remove the config file. Returns false when there was nothing to remove.
    pub fn clear() -> Result<bool> {
        Self::clear_at(&Self::config_file_path()?)
    }

    pub fn clear_at(config_path: &Path) -> Result<bool> {
        if !config_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(config_path).context("Failed to remove config file")?;
        Ok(true)
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("ipconsensus").join("config.json"))
    }
}
