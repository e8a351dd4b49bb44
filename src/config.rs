use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

use crate::photo::DEFAULT_THUMBNAIL_SIZE;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "KANAHCIAN_API_URL";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub photo: PhotoConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Villager details have lived on a separate host
    #[serde(default)]
    pub villager_base_url: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PhotoConfig {
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: String,
}

fn default_timeout() -> u64 {
    30
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_thumbnail_size() -> String {
    DEFAULT_THUMBNAIL_SIZE.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            villager_base_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            thumbnail_size: default_thumbnail_size(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load `path` if given, otherwise defaults, then apply overrides.
    pub fn resolve(path: Option<&Path>, api_url: Option<String>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        if let Some(url) = api_url {
            config.api.base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))?;
        if let Some(url) = &self.api.villager_base_url {
            Url::parse(url).with_context(|| format!("Invalid villager base URL: {}", url))?;
        }
        Ok(())
    }
}
