use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_base_url() -> String {
    "https://api.coinbase.com".to_string()
}

fn default_api_version() -> String {
    "2017-08-07".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: default_base_url(),
            api_version: default_api_version(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HubConfig {
    pub url: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_platform() -> String {
    "wns".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub symbols: Vec<String>,
    #[serde(default = "default_quote_currency")]
    pub quote_currency: String,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    pub hub: HubConfig,
}

fn default_quote_currency() -> String {
    "USD".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_interval_secs() -> u64 {
    300
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "cointile")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        anyhow::ensure!(
            !config.symbols.is_empty(),
            "Config must list at least one symbol"
        );
        anyhow::ensure!(
            config.fetch_timeout_secs > 0,
            "Config fetch_timeout_secs must be greater than zero"
        );
        anyhow::ensure!(
            config.interval_secs > 0,
            "Config interval_secs must be greater than zero"
        );
        debug!("Successfully loaded config");
        Ok(config)
    }
}
