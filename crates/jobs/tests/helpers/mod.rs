#![allow(dead_code)]
pub mod mock_repositories;

pub use mock_repositories::*;

use chrono::TimeDelta;
use rdns_cache_application::ports::Subscription;
use rdns_cache_application::services::{BusyRetry, CacheEngine, FillSettings, WorkQueue};
use rdns_cache_domain::FillPolicy;
use std::sync::Arc;
use std::time::Duration;

pub const REQUEST_TOPIC: &str = "resolution-request";
pub const AVAILABILITY_TOPIC: &str = "availability";
pub const SNAPSHOT_TOPIC: &str = "cache-snapshot";
pub const INGEST_TOPIC: &str = "ip-address";

pub fn fast_retry() -> BusyRetry {
    BusyRetry::new(3).with_delays(Duration::from_millis(1), Duration::from_millis(5))
}

pub fn make_queue(repo: Arc<MockQueueRepository>) -> Arc<WorkQueue> {
    Arc::new(WorkQueue::new(repo).with_retry(fast_retry()))
}

pub fn make_engine(
    repo: Arc<MockCacheRepository>,
    provider: Arc<MockResolutionProvider>,
) -> Arc<CacheEngine> {
    Arc::new(CacheEngine::new(repo, provider, TimeDelta::hours(1)).with_retry(fast_retry()))
}

pub fn fill(policy: FillPolicy) -> FillSettings {
    FillSettings {
        policy,
        flush_timeout: Duration::from_millis(50),
        poll_interval: Duration::from_millis(5),
    }
}

/// Next message on `sub`, or `None` if nothing arrives within `wait`.
pub async fn next_within(sub: &mut Subscription, wait: Duration) -> Option<String> {
    tokio::time::timeout(wait, sub.recv())
        .await
        .ok()
        .flatten()
        .map(|m| String::from_utf8_lossy(&m.payload).into_owned())
}
