use crate::services::CacheEngine;
use rdns_cache_domain::{CacheEntry, DomainError};
use std::sync::Arc;
use tracing::debug;

/// Use case: serialize the committed cache contents as a JSON array of
/// `{ip_address, hostname, last_resolved}` objects.
pub struct ExportSnapshotUseCase {
    engine: Arc<CacheEngine>,
}

impl ExportSnapshotUseCase {
    pub fn new(engine: Arc<CacheEngine>) -> Self {
        Self { engine }
    }

    pub async fn execute(&self) -> Result<String, DomainError> {
        let entries = self.engine.snapshot().await?;
        debug!(entries = entries.len(), "Cache snapshot taken");
        Self::to_json(&entries)
    }

    pub fn to_json(entries: &[CacheEntry]) -> Result<String, DomainError> {
        serde_json::to_string_pretty(entries)
            .map_err(|e| DomainError::IoError(format!("Failed to encode snapshot: {}", e)))
    }

    pub fn from_json(raw: &str) -> Result<Vec<CacheEntry>, DomainError> {
        serde_json::from_str(raw)
            .map_err(|e| DomainError::IoError(format!("Failed to decode snapshot: {}", e)))
    }
}
