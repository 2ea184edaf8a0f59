use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use super::cache::MAX_WINDOW_SECS;
use super::{
    BusConfig, CacheConfig, ConfigError, DatabaseConfig, LoggingConfig, QueueConfig,
    ResolverConfig, SchedulerConfig, TopicsConfig,
};

const DEFAULT_CONFIG_PATH: &str = "./rdns-cache.toml";

/// Top-level configuration, one field per TOML section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub bus: BusConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub queue: QueueConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub topics: TopicsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_path: Option<String>,
    pub bus_host: Option<String>,
    pub bus_port: Option<u16>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load from `config_path`, or from `./rdns-cache.toml` when present,
    /// falling back to defaults. CLI overrides are applied last.
    pub fn load(config_path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH)?,
            None => Config::default(),
        };

        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&raw)
    }

    fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(path) = overrides.database_path {
            self.database.path = path;
        }
        if let Some(host) = overrides.bus_host {
            self.bus.host = host;
        }
        if let Some(port) = overrides.bus_port {
            self.bus.port = port;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.batch_size == 0 {
            return Err(ConfigError::Validation(
                "queue.batch_size must be at least 1".to_string(),
            ));
        }

        if self.queue.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "queue.poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.cache.freshness_window_secs == 0 {
            return Err(ConfigError::Validation(
                "cache.freshness_window_secs must be greater than 0".to_string(),
            ));
        }

        for (name, secs) in [
            ("freshness_window_secs", self.cache.freshness_window_secs),
            ("eviction_window_secs", self.cache.eviction_window_secs),
        ] {
            if secs > MAX_WINDOW_SECS {
                return Err(ConfigError::Validation(format!(
                    "cache.{} ({}) must not exceed {}",
                    name, secs, MAX_WINDOW_SECS
                )));
            }
        }

        if self.cache.eviction_window_secs < self.cache.freshness_window_secs {
            return Err(ConfigError::Validation(format!(
                "cache.eviction_window_secs ({}) must not be shorter than cache.freshness_window_secs ({})",
                self.cache.eviction_window_secs, self.cache.freshness_window_secs
            )));
        }

        if self.scheduler.snapshot_interval_secs == 0 || self.scheduler.eviction_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "scheduler intervals must be greater than 0".to_string(),
            ));
        }

        if self.resolver.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "resolver.timeout_ms must be greater than 0".to_string(),
            ));
        }

        self.resolver.server.parse::<SocketAddr>().map_err(|e| {
            ConfigError::Validation(format!(
                "resolver.server '{}' is not a socket address: {}",
                self.resolver.server, e
            ))
        })?;

        if self.cache.not_found_hostname.trim().is_empty() {
            return Err(ConfigError::Validation(
                "cache.not_found_hostname must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
