use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusKind {
    /// Single-process bus; all roles must run in the same process.
    InProcess,
    /// Redis pub/sub, for roles split across processes.
    Redis,
}

/// Message bus configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BusConfig {
    #[serde(default = "default_kind")]
    pub kind: BusKind,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds between keepalive pings on the broker connection
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            host: default_host(),
            port: default_port(),
            keepalive_secs: default_keepalive_secs(),
        }
    }
}

fn default_kind() -> BusKind {
    BusKind::InProcess
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6379
}

fn default_keepalive_secs() -> u64 {
    60
}
