use serde::{Deserialize, Serialize};
use std::time::Duration;

/// When a partially filled batch may be drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FillPolicy {
    /// Wait until `batch_size` rows are queued.
    Strict,
    /// Flush whatever is queued once `flush_timeout_ms` passes without a full batch.
    #[default]
    Lenient,
}

/// Work queue draining
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    #[serde(default)]
    pub fill_policy: FillPolicy,

    #[serde(default = "default_flush_timeout_ms")]
    pub flush_timeout_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How often the dispatcher warns while still waiting for readiness
    #[serde(default = "default_ready_warn_secs")]
    pub ready_warn_secs: u64,
}

impl QueueConfig {
    pub fn flush_timeout(&self) -> Duration {
        Duration::from_millis(self.flush_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn ready_warn_interval(&self) -> Duration {
        Duration::from_secs(self.ready_warn_secs)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            fill_policy: FillPolicy::default(),
            flush_timeout_ms: default_flush_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            ready_warn_secs: default_ready_warn_secs(),
        }
    }
}

fn default_batch_size() -> u32 {
    5
}

fn default_flush_timeout_ms() -> u64 {
    5_000
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_ready_warn_secs() -> u64 {
    30
}
