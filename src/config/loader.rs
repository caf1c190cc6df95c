// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_HEALTH_TIMEOUT_MS, DEFAULT_INTERVAL_MS, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_STATUS_TIMEOUT_MS, DEFAULT_SUBMIT_TIMEOUT_MS, ENDPOINT_ENV_PREFIX,
};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level backend registry file.
///
/// Loaded once at startup and treated as read-only afterwards.
///
/// # Fields
/// * `polling` - Default poll budget for asynchronous backends (optional)
/// * `backends` - Every backend this process may dispatch to
///
/// # Example
/// ```yaml
/// polling:
///   max_attempts: 30
///   interval_ms: 2000
/// backends:
///   - name: local
///     role: local
///     mode: synchronous
///     endpoint: "inproc://local"
///   - name: gateway
///     role: distributed
///     mode: asynchronous
///     endpoint: "http://127.0.0.1:8080"
///     supports_attachments: true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub polling: PollingConfig,
    pub backends: Vec<BackendDescriptor>,
}

/// Poll budget: at most `max_attempts` status queries, `interval_ms` apart.
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

/// Which slot of the routing table a backend fills.
#[derive(Debug, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum BackendRole {
    Local,
    Distributed,
}

impl BackendRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendRole::Local => "local",
            BackendRole::Distributed => "distributed",
        }
    }
}

/// Whether a backend answers in the submission response or hands back a
/// correlation id to poll.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    Synchronous,
    Asynchronous,
}

/// Static description of one compute backend.
///
/// # Fields
/// * `name` - Unique backend name, used in logs, errors and result metadata
/// * `role` - Routing slot (`local` or `distributed`)
/// * `mode` - `synchronous` or `asynchronous`
/// * `endpoint` - `inproc://…`, `http://…` or `https://…`
/// * `supports_attachments` - Whether binary parts may be sent (defaults false)
/// * `timeouts` - Per-call transport timeouts (optional)
#[derive(Debug, Clone, Deserialize)]
pub struct BackendDescriptor {
    pub name: String,
    pub role: BackendRole,
    pub mode: BackendMode,
    pub endpoint: String,
    #[serde(default)]
    pub supports_attachments: bool,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl BackendDescriptor {
    pub fn is_synchronous(&self) -> bool {
        self.mode == BackendMode::Synchronous
    }
}

/// Per-call transport timeouts, in milliseconds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeoutConfig {
    pub submit_ms: Option<u64>,
    pub status_ms: Option<u64>,
    pub health_ms: Option<u64>,
}

impl TimeoutConfig {
    pub fn submit(&self) -> Duration {
        Duration::from_millis(self.submit_ms.unwrap_or(DEFAULT_SUBMIT_TIMEOUT_MS))
    }

    pub fn status(&self) -> Duration {
        Duration::from_millis(self.status_ms.unwrap_or(DEFAULT_STATUS_TIMEOUT_MS))
    }

    pub fn health(&self) -> Duration {
        Duration::from_millis(self.health_ms.unwrap_or(DEFAULT_HEALTH_TIMEOUT_MS))
    }
}

/// Load a registry file. `.toml` files are parsed as TOML, anything else as
/// YAML. Endpoint overrides from the environment are applied after parsing.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    let mut cfg: Config = if is_toml {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    apply_endpoint_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

/// Load a registry file and validate it
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_registry(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

/// Name of the variable that overrides `backend`'s endpoint.
pub fn endpoint_override_key(backend: &str) -> String {
    format!(
        "{}{}_ENDPOINT",
        ENDPOINT_ENV_PREFIX,
        backend.to_ascii_uppercase().replace('-', "_")
    )
}

fn apply_endpoint_overrides<F>(cfg: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for backend in &mut cfg.backends {
        if let Some(endpoint) = lookup(&endpoint_override_key(&backend.name)) {
            backend.endpoint = endpoint;
        }
    }
}
