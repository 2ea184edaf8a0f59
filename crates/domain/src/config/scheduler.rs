use serde::{Deserialize, Serialize};

/// Periodic snapshot export and eviction
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_snapshot_interval_secs")]
    pub snapshot_interval_secs: u64,

    #[serde(default = "default_eviction_interval_secs")]
    pub eviction_interval_secs: u64,

    /// Optional file the snapshot JSON is also written to
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            snapshot_interval_secs: default_snapshot_interval_secs(),
            eviction_interval_secs: default_eviction_interval_secs(),
            snapshot_path: None,
        }
    }
}

fn default_snapshot_interval_secs() -> u64 {
    300
}

fn default_eviction_interval_secs() -> u64 {
    3_600
}
