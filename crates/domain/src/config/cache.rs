use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Upper bound for either window, about a century.
pub const MAX_WINDOW_SECS: u64 = 100 * 365 * 86_400;

/// Cache freshness and eviction windows
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Entries younger than this are served without a lookup
    #[serde(default = "default_freshness_window_secs")]
    pub freshness_window_secs: u64,

    /// Entries older than this are purged by the eviction sweep
    #[serde(default = "default_eviction_window_secs")]
    pub eviction_window_secs: u64,

    /// Hostname recorded for addresses without a PTR record
    #[serde(default = "default_not_found_hostname")]
    pub not_found_hostname: String,
}

impl CacheConfig {
    pub fn freshness_window(&self) -> TimeDelta {
        TimeDelta::seconds(self.freshness_window_secs.min(MAX_WINDOW_SECS) as i64)
    }

    pub fn eviction_window(&self) -> TimeDelta {
        TimeDelta::seconds(self.eviction_window_secs.min(MAX_WINDOW_SECS) as i64)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness_window_secs: default_freshness_window_secs(),
            eviction_window_secs: default_eviction_window_secs(),
            not_found_hostname: default_not_found_hostname(),
        }
    }
}

fn default_freshness_window_secs() -> u64 {
    3_600
}

fn default_eviction_window_secs() -> u64 {
    86_400
}

fn default_not_found_hostname() -> String {
    "NXDOMAIN".to_string()
}
