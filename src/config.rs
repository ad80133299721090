//! Runtime configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! command-line flags (see [`Cli`](crate::cli::Cli)). Every field is optional
//! in the YAML file.
//!
//! ```yaml
//! base_url: https://www.prospektmaschine.de
//! listing_path: /hypermarkte/
//! timeout_secs: 10
//! output: prospekty.json
//! ```

use crate::error::ConfigError;
use crate::outputs::json::DEFAULT_OUTPUT;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.prospektmaschine.de";
pub const DEFAULT_LISTING_PATH: &str = "/hypermarkte/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Site root; relative links are resolved against it.
    pub base_url: String,
    /// Path of the top-level listing page, appended to `base_url`.
    pub listing_path: String,
    /// Per-request timeout. No retries.
    pub timeout_secs: u64,
    pub user_agent: String,
    pub output: PathBuf,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            listing_path: DEFAULT_LISTING_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("prospekt_crawler/", env!("CARGO_PKG_VERSION")).to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl CrawlerConfig {
    /// Load a YAML config file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] or [`ConfigError::Parse`].
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        info!("Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Parsed `base_url`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBaseUrl`] if it is not an absolute URL.
    pub fn base(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })
    }

    /// Absolute URL of the listing page.
    pub fn listing_url(&self) -> Result<String, ConfigError> {
        let base = self.base()?;
        base.join(&self.listing_path)
            .map(|u| u.to_string())
            .map_err(|source| ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                source,
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
