use serde::{Deserialize, Serialize};

/// Topic names on the message bus
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopicsConfig {
    #[serde(default = "default_request")]
    pub request: String,

    #[serde(default = "default_availability")]
    pub availability: String,

    #[serde(default = "default_snapshot")]
    pub snapshot: String,

    /// Producers publish raw addresses here for ingestion
    #[serde(default = "default_ingest")]
    pub ingest: String,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            request: default_request(),
            availability: default_availability(),
            snapshot: default_snapshot(),
            ingest: default_ingest(),
        }
    }
}

fn default_request() -> String {
    "resolution-request".to_string()
}

fn default_availability() -> String {
    "availability".to_string()
}

fn default_snapshot() -> String {
    "cache-snapshot".to_string()
}

fn default_ingest() -> String {
    "ip-address".to_string()
}
