use serde::{Deserialize, Serialize};

/// Upstream PTR resolution
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// DNS server queried for PTR records (e.g., "1.1.1.1:53")
    #[serde(default = "default_server")]
    pub server: String,

    /// Per-lookup timeout; a slower answer counts as a transient failure
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_server() -> String {
    "8.8.8.8:53".to_string()
}

fn default_timeout_ms() -> u64 {
    2_000
}
