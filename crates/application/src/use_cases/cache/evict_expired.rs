use crate::services::CacheEngine;
use chrono::{TimeDelta, Utc};
use rdns_cache_domain::DomainError;
use std::sync::Arc;
use tracing::{debug, info};

/// Use case: purge cache rows older than the eviction window.
/// Run periodically by the eviction job.
pub struct EvictExpiredEntriesUseCase {
    engine: Arc<CacheEngine>,
}

impl EvictExpiredEntriesUseCase {
    pub fn new(engine: Arc<CacheEngine>) -> Self {
        Self { engine }
    }

    pub async fn execute(&self, eviction_window: TimeDelta) -> Result<u64, DomainError> {
        let cutoff = Utc::now()
            .checked_sub_signed(eviction_window)
            .ok_or(DomainError::EvictionWindowOutOfRange(eviction_window.num_seconds()))?;
        debug!(cutoff = %cutoff, "Evicting expired cache entries");

        let deleted = self.engine.evict_expired(cutoff).await?;
        if deleted > 0 {
            info!(deleted, "Evicted expired cache entries");
        }
        Ok(deleted)
    }
}
