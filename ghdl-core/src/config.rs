//! Configuration management for ghdl
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (GHDL_*)
//! 3. Config file (~/.config/ghdl/config.toml)
//! 4. Default values

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Error, Result};

/// GitHub endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Base URL of the REST API
    pub api_url: String,

    /// Base URL of the raw content host
    pub raw_url: String,

    /// Base URL of the web UI, used for archive redirects
    pub web_url: String,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Connect timeout, and the longest a response may stall between reads.
    /// Slow but steady downloads are not cut off.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            raw_url: "https://raw.githubusercontent.com".to_string(),
            web_url: "https://github.com".to_string(),
            user_agent: "ghdl".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Download behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Upper bound on concurrent file fetches for directory downloads.
    /// `None` fetches every file at once.
    pub max_concurrency: Option<usize>,

    /// Branch used for repository archives when the URL names none
    pub default_branch: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            default_branch: "master".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// GitHub endpoints
    pub github: GitHubConfig,

    /// Download behavior
    pub download: DownloadConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/ghdl/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ghdl").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - GHDL_API_URL: REST API base URL
    /// - GHDL_RAW_URL: raw content base URL
    /// - GHDL_WEB_URL: web UI base URL
    /// - GHDL_MAX_CONCURRENCY: concurrent file fetch limit
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(api_url) = std::env::var("GHDL_API_URL") {
            self.github.api_url = api_url;
        }

        if let Ok(raw_url) = std::env::var("GHDL_RAW_URL") {
            self.github.raw_url = raw_url;
        }

        if let Ok(web_url) = std::env::var("GHDL_WEB_URL") {
            self.github.web_url = web_url;
        }

        if let Ok(limit) = std::env::var("GHDL_MAX_CONCURRENCY") {
            match limit.parse::<usize>() {
                Ok(n) if n > 0 => self.download.max_concurrency = Some(n),
                _ => warn!(value = %limit, "Ignoring invalid GHDL_MAX_CONCURRENCY"),
            }
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, max_concurrency: Option<usize>) -> Self {
        if let Some(n) = max_concurrency {
            self.download.max_concurrency = Some(n);
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(max_concurrency: Option<usize>) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()
            .with_cli_overrides(max_concurrency))
    }
}
