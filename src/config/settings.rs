//! Configuration settings management
//!
//! This module handles loading configuration from the optional
//! configuration file and the environment, and validating the result.
//! Configuration is read-only: blobsize never writes it back.

use crate::error::{BlobsizeError, Result};
use crate::utils::format::OutputFormat;
use crate::utils::helpers::validate_subscription_id;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const GUID_LEN: usize = 36;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub debug: bool,
    /// Subscription id or display name; empty means prompt the operator
    pub subscription_id: String,
    /// Upper bound on container listings in flight per account
    pub max_concurrency: usize,
    /// Deadline for one account pass in seconds; 0 disables it
    pub account_timeout_secs: u64,
    pub show_failures: bool,
    pub output_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            subscription_id: String::new(),
            max_concurrency: crate::blob::aggregator::DEFAULT_MAX_CONCURRENCY,
            account_timeout_secs: 0,
            show_failures: false,
            output_format: OutputFormat::Text,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(BlobsizeError::config("max_concurrency must be at least 1"));
        }

        // Display names are matched as-is; only GUID-shaped values are checked
        let id = self.subscription_id.trim();
        if id.len() == GUID_LEN && id.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
            validate_subscription_id(id)?;
        }

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            use std::env;
            let config_dir = if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
                PathBuf::from(xdg_config_home)
            } else {
                let home_dir = env::var("HOME")
                    .map_err(|_| BlobsizeError::config("HOME environment variable not set"))?;
                PathBuf::from(home_dir).join(".config")
            };
            Ok(config_dir.join("blobsize").join("blobsize.toml"))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            let config_dir = dirs::config_dir()
                .ok_or_else(|| BlobsizeError::config("Unable to determine config directory"))?;
            Ok(config_dir.join("blobsize").join("blobsize.toml"))
        }
    }

    pub fn account_timeout(&self) -> Option<Duration> {
        (self.account_timeout_secs > 0).then(|| Duration::from_secs(self.account_timeout_secs))
    }

    /// Subscription to select without prompting, if one is configured
    pub fn preselected_subscription(&self) -> Option<&str> {
        let trimmed = self.subscription_id.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Load configuration from multiple sources with priority order:
/// 1. Command-line flags (applied by the CLI afterwards)
/// 2. Environment variables
/// 3. Configuration file
/// 4. Default values
pub async fn load_config() -> Result<Config> {
    let mut config = Config::default();

    let config_path = Config::get_config_path()?;
    if config_path.exists() {
        config = load_from_file(&config_path).await?;
    }

    load_from_env(&mut config);

    Ok(config)
}

pub async fn load_from_file(path: &Path) -> Result<Config> {
    let contents = tokio::fs::read_to_string(path).await?;

    // Try to parse as TOML first, then JSON as fallback
    match toml::from_str::<Config>(&contents) {
        Ok(config) => Ok(config),
        Err(toml_error) => serde_json::from_str::<Config>(&contents).map_err(|_| {
            BlobsizeError::config(format!(
                "Failed to parse {}: {}",
                path.display(),
                toml_error
            ))
        }),
    }
}

fn load_from_env(config: &mut Config) {
    apply_env(config, |key| std::env::var(key).ok());
}

fn apply_env<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("DEBUG") {
        config.debug = value.to_lowercase() == "true" || value == "1";
    }

    if let Some(value) = lookup("AZURE_SUBSCRIPTION_ID") {
        config.subscription_id = value;
    }

    if let Some(value) = lookup("BLOBSIZE_MAX_CONCURRENCY") {
        if let Ok(limit) = value.parse::<usize>() {
            config.max_concurrency = limit;
        }
    }

    if let Some(value) = lookup("BLOBSIZE_ACCOUNT_TIMEOUT") {
        if let Ok(seconds) = value.parse::<u64>() {
            config.account_timeout_secs = seconds;
        }
    }

    if let Some(value) = lookup("BLOBSIZE_SHOW_FAILURES") {
        config.show_failures = value.to_lowercase() == "true" || value == "1";
    }
}
