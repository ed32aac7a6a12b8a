use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::gateway::GatewayMode;

/// Backend used when neither the flag nor the config names one
pub const DEFAULT_SERVER: &str = "http://localhost:5000/api";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub server: Option<String>,
    #[serde(default)]
    pub mode: GatewayMode,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: None,
            mode: GatewayMode::Live,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GatewayConfig {
    pub fn server_url(&self) -> &str {
        self.server.as_deref().unwrap_or(DEFAULT_SERVER)
    }
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "vidmuse", "vidmuse")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Set a value by its `config set` key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server" => self.gateway.server = Some(value.to_string()),
            "mode" => self.gateway.mode = value.parse()?,
            "timeout" => self.gateway.timeout_secs = value.parse()?,
            _ => anyhow::bail!("Unknown config key: {}. Valid keys: server, mode, timeout", key),
        }
        Ok(())
    }

    /// Read a value by its `config get` key
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "server" => self.gateway.server_url().to_string(),
            "mode" => self.gateway.mode.to_string(),
            "timeout" => self.gateway.timeout_secs.to_string(),
            _ => anyhow::bail!("Unknown config key: {}", key),
        };
        Ok(value)
    }
}
