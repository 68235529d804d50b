//! Provider configuration for the Pingdom provider
//!
//! The configuration is assembled once at startup from an optional YAML file
//! and environment overrides, then handed by reference to every operation.

pub mod error;

pub use error::*;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.pingdom.com/api/3.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CONFIG_PATH_ENV: &str = "PINGDOM_CONFIG_PATH";
const API_TOKEN_ENV: &str = "PINGDOM_API_TOKEN";
const BASE_URL_ENV: &str = "PINGDOM_BASE_URL";
const SOLARWINDS_USER_ENV: &str = "SOLARWINDS_USER";
const SOLARWINDS_PASSWD_ENV: &str = "SOLARWINDS_PASSWD";

/// Get the provider configuration directory (`~/.config/pingdom`)
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("pingdom");
    Ok(config_dir)
}

/// Locate the provider config file
///
/// Search order:
/// 1. the explicitly given path (must exist)
/// 2. `PINGDOM_CONFIG_PATH`
/// 3. `~/.config/pingdom/provider.yaml`
///
/// Returns `Ok(None)` when no file is configured; the environment alone is
/// then enough to build a configuration.
pub fn find_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::Invalid(format!(
                "config file does not exist: {}",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
        tracing::warn!(
            "{} points to a missing file: {}",
            CONFIG_PATH_ENV,
            path.display()
        );
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join("pingdom").join("provider.yaml");
        if global.exists() {
            return Ok(Some(global));
        }
    }

    Ok(None)
}

/// Credentials and client settings for the Pingdom API
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_token: Option<String>,
    /// SolarWinds login, accepted so existing provider configs keep loading
    ///
    /// Only checked to be set together with `solarwinds_password`. The
    /// maintenance endpoints authenticate with `api_token` alone, so neither
    /// value is sent to Pingdom.
    pub solarwinds_user: Option<String>,
    pub solarwinds_password: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    /// Build the configuration from the config file (if any) and environment
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match find_config_file(explicit)? {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!("Loaded provider config from {}", path.display());
        Ok(config)
    }

    /// Overlay environment variables on top of file values
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(token) = non_empty_env(API_TOKEN_ENV) {
            self.api_token = Some(token);
        }
        if let Some(url) = non_empty_env(BASE_URL_ENV) {
            self.base_url = Some(url);
        }

        if let Some(user) = non_empty_env(SOLARWINDS_USER_ENV) {
            let password = non_empty_env(SOLARWINDS_PASSWD_ENV)
                .ok_or(ConfigError::PartialSolarwindsCredentials)?;
            self.solarwinds_user = Some(user);
            self.solarwinds_password = Some(password);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_token.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::MissingApiToken);
        }
        if self.solarwinds_user.is_some() != self.solarwinds_password.is_some() {
            return Err(ConfigError::PartialSolarwindsCredentials);
        }
        if let Some(url) = &self.base_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid(format!(
                "base_url must be an http(s) URL: {url}"
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn api_token(&self) -> &str {
        self.api_token.as_deref().unwrap_or_default()
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
