//! Configuration Loader - File Loading, Env Overrides and Validation
//!
//! Handles loading `config.toml`, applying `EXPENSE_TRACKER_*`
//! environment overrides, and validating the result with clear
//! error messages.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};

use super::AppConfig;

/// Env var naming the config file path.
pub const CONFIG_PATH_ENV: &str = "EXPENSE_TRACKER_CONFIG";

const BIND_ADDRESS_ENV: &str = "EXPENSE_TRACKER_BIND_ADDRESS";
const DATA_FILE_ENV: &str = "EXPENSE_TRACKER_DATA_FILE";
const LOG_LEVEL_ENV: &str = "EXPENSE_TRACKER_LOG_LEVEL";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Load, override and validate configuration.
///
/// A missing file is not an error: defaults are used and the second
/// element of the result is `false`. A file that exists but cannot be
/// read or parsed is an error.
pub fn load_config(path: &str) -> Result<(AppConfig, bool)> {
  let path = Path::new(path);

  let (mut config, from_file) = match std::fs::read_to_string(path) {
    Ok(content) => (parse_config(&content)?, true),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => (AppConfig::default(), false),
    Err(e) => {
      return Err(e).with_context(|| format!("Failed to read config file: {}", path.display()));
    }
  };

  apply_overrides(&mut config, |key| std::env::var(key).ok());
  validate_config(&config)?;

  Ok((config, from_file))
}

/// Parse TOML content into a config without overrides or validation.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  toml::from_str(content).context("Failed to parse config.toml")
}

/// Apply overrides from a key lookup (the process environment in
/// production).
pub fn apply_overrides<F>(config: &mut AppConfig, lookup: F)
where
  F: Fn(&str) -> Option<String>,
{
  if let Some(addr) = lookup(BIND_ADDRESS_ENV) {
    config.server.bind_address = addr;
  }
  if let Some(file) = lookup(DATA_FILE_ENV) {
    config.persistence.data_file = file;
  }
  if let Some(level) = lookup(LOG_LEVEL_ENV) {
    config.service.log_level = level;
  }
}

/// Validate all configuration parameters.
pub fn validate_config(config: &AppConfig) -> Result<()> {
  config
    .server
    .bind_address
    .parse::<SocketAddr>()
    .with_context(|| format!("Invalid bind_address: {}", config.server.bind_address))?;

  anyhow::ensure!(
    !config.persistence.data_file.trim().is_empty(),
    "persistence.data_file must not be empty"
  );

  anyhow::ensure!(
    LOG_LEVELS.contains(&config.service.log_level.to_ascii_lowercase().as_str()),
    "log_level must be one of {:?}, got {}",
    LOG_LEVELS,
    config.service.log_level
  );

  Ok(())
}
