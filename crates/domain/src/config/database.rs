use serde::{Deserialize, Serialize};

/// SQLite store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file (default: "./rdns-cache.db")
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Lock-wait timeout before a write reports the store as busy
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Attempts made on `StoreBusy` before giving up
    #[serde(default = "default_busy_retries")]
    pub busy_retries: u32,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite:{}", self.path)
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            max_connections: default_max_connections(),
            busy_retries: default_busy_retries(),
        }
    }
}

fn default_db_path() -> String {
    "./rdns-cache.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    30_000
}

fn default_max_connections() -> u32 {
    8
}

fn default_busy_retries() -> u32 {
    5
}
