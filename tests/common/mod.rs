#![allow(dead_code)]

use async_trait::async_trait;
use chrono::TimeDelta;
use rdns_cache_application::ports::{CacheRepository, QueueRepository, ResolutionProvider};
use rdns_cache_application::services::{BusyRetry, CacheEngine, WorkQueue};
use rdns_cache_domain::config::DatabaseConfig;
use rdns_cache_domain::DomainError;
use rdns_cache_infrastructure::database::create_pool;
use rdns_cache_infrastructure::repositories::{SqliteCacheRepository, SqliteQueueRepository};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tempfile::TempDir;

/// Provider answering from a fixed table; unknown addresses are NotFound.
pub struct StubProvider {
    answers: RwLock<HashMap<IpAddr, String>>,
    calls: AtomicU64,
}

impl StubProvider {
    pub fn new(answers: &[(&str, &str)]) -> Self {
        Self {
            answers: RwLock::new(
                answers
                    .iter()
                    .map(|(ip, host)| (ip.parse().unwrap(), host.to_string()))
                    .collect(),
            ),
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResolutionProvider for StubProvider {
    async fn resolve(&self, ip: IpAddr) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .read()
            .unwrap()
            .get(&ip)
            .cloned()
            .ok_or(DomainError::HostnameNotFound(ip))
    }
}

/// SQLite-backed engine and queue sharing one temporary database.
pub struct TestStore {
    _dir: TempDir,
    pub pool: SqlitePool,
    pub cache_repo: Arc<SqliteCacheRepository>,
    pub queue_repo: Arc<SqliteQueueRepository>,
    pub provider: Arc<StubProvider>,
    pub engine: Arc<CacheEngine>,
    pub queue: Arc<WorkQueue>,
}

impl TestStore {
    pub async fn open(answers: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("rdns-cache.db").display());
        let cfg = DatabaseConfig {
            busy_timeout_ms: 5_000,
            ..Default::default()
        };
        let pool = create_pool(&url, &cfg).await.unwrap();

        let cache_repo = Arc::new(SqliteCacheRepository::new(pool.clone()));
        let queue_repo = Arc::new(SqliteQueueRepository::new(pool.clone()));
        let provider = Arc::new(StubProvider::new(answers));
        let retry = BusyRetry::new(5).with_delays(Duration::from_millis(5), Duration::from_millis(50));

        let cache_port: Arc<dyn CacheRepository> = cache_repo.clone();
        let queue_port: Arc<dyn QueueRepository> = queue_repo.clone();
        let engine = Arc::new(
            CacheEngine::new(cache_port, provider.clone(), TimeDelta::hours(1)).with_retry(retry),
        );
        let queue = Arc::new(WorkQueue::new(queue_port).with_retry(retry));

        Self {
            _dir: dir,
            pool,
            cache_repo,
            queue_repo,
            provider,
            engine,
            queue,
        }
    }
}

/// Poll `check` every 20ms until it holds or `timeout` runs out.
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
