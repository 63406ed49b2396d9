//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml` with
//! environment variable overrides. Every field has a default, so the
//! service also starts without a config file.

pub mod loader;

use serde::Deserialize;

use crate::adapters::persistence::DecodeMode;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Service identity and logging.
  pub service: ServiceConfig,
  /// HTTP listener and static pages.
  pub server: ServerConfig,
  /// Data file location and parsing.
  pub persistence: PersistenceConfig,
  /// Metrics and monitoring.
  pub metrics: MetricsConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
  /// Human-readable service name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  pub log_level: String,
  /// Emit JSON log lines instead of the human-readable format.
  pub json_logs: bool,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  /// Listener address, e.g. `0.0.0.0:8080`.
  pub bind_address: String,
  /// Directory holding the HTML pages.
  pub pages_dir: String,
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
  /// CSV data file.
  pub data_file: String,
  /// Whether malformed rows abort startup (`strict`) or are skipped (`lenient`).
  pub decode_mode: DecodeMode,
}

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
  /// Expose Prometheus metrics on `/metrics`.
  pub enabled: bool,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      name: "expense-tracker".to_string(),
      log_level: "info".to_string(),
      json_logs: true,
    }
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: "0.0.0.0:8080".to_string(),
      pages_dir: "static".to_string(),
    }
  }
}

impl Default for PersistenceConfig {
  fn default() -> Self {
    Self {
      data_file: "data.csv".to_string(),
      decode_mode: DecodeMode::Strict,
    }
  }
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self { enabled: true }
  }
}
