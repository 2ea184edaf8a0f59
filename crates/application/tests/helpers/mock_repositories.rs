#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use rdns_cache_application::ports::{CacheRepository, QueueRepository, ResolutionProvider};
use rdns_cache_domain::{CacheEntry, DomainError, QueueItem};
use std::collections::{BTreeMap, HashMap};
use std::net::IpAddr;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

// ============================================================================
// Mock CacheRepository
// ============================================================================

pub struct MockCacheRepository {
    rows: Arc<RwLock<HashMap<IpAddr, CacheEntry>>>,
    busy_failures: Arc<AtomicU32>,
    upsert_count: Arc<AtomicU64>,
}

impl MockCacheRepository {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
            busy_failures: Arc::new(AtomicU32::new(0)),
            upsert_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn insert_aged(&self, ip: &str, hostname: &str, age: TimeDelta) {
        let ip: IpAddr = ip.parse().unwrap();
        self.rows
            .write()
            .await
            .insert(ip, CacheEntry::new(ip, hostname, Utc::now() - age));
    }

    pub async fn entry(&self, ip: &str) -> Option<CacheEntry> {
        self.rows.read().await.get(&ip.parse().unwrap()).cloned()
    }

    pub async fn count(&self) -> usize {
        self.rows.read().await.len()
    }

    pub fn upsert_count(&self) -> u64 {
        self.upsert_count.load(Ordering::Relaxed)
    }

    /// The next `n` repository calls fail with `StoreBusy`.
    pub fn fail_busy(&self, n: u32) {
        self.busy_failures.store(n, Ordering::SeqCst);
    }

    fn check_busy(&self) -> Result<(), DomainError> {
        let remaining = self.busy_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.busy_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(DomainError::StoreBusy("database is locked".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheRepository for MockCacheRepository {
    async fn get(&self, ip: IpAddr) -> Result<Option<CacheEntry>, DomainError> {
        self.check_busy()?;
        Ok(self.rows.read().await.get(&ip).cloned())
    }

    async fn upsert(&self, entry: &CacheEntry) -> Result<(), DomainError> {
        self.check_busy()?;
        self.upsert_count.fetch_add(1, Ordering::Relaxed);
        let mut rows = self.rows.write().await;
        let last_resolved = rows
            .get(&entry.ip_address)
            .map(|existing| existing.last_resolved.max(entry.last_resolved))
            .unwrap_or(entry.last_resolved);
        rows.insert(
            entry.ip_address,
            CacheEntry::new(entry.ip_address, entry.hostname.clone(), last_resolved),
        );
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<CacheEntry>, DomainError> {
        self.check_busy()?;
        let mut all: Vec<_> = self.rows.read().await.values().cloned().collect();
        all.sort_by_key(|e| e.ip_address);
        Ok(all)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        self.check_busy()?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, entry| entry.last_resolved >= cutoff);
        Ok((before - rows.len()) as u64)
    }
}

// ============================================================================
// Mock QueueRepository
// ============================================================================

pub struct MockQueueRepository {
    rows: Arc<RwLock<BTreeMap<i64, IpAddr>>>,
    next_id: Arc<AtomicU64>,
}

impl MockQueueRepository {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub async fn count(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl QueueRepository for MockQueueRepository {
    async fn push(&self, ip: IpAddr) -> Result<i64, DomainError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        self.rows.write().await.insert(id, ip);
        Ok(id)
    }

    async fn take_batch(&self, limit: u32) -> Result<Vec<QueueItem>, DomainError> {
        let mut rows = self.rows.write().await;
        let ids: Vec<i64> = rows.keys().take(limit as usize).copied().collect();
        Ok(ids
            .into_iter()
            .filter_map(|id| rows.remove(&id).map(|ip_address| QueueItem { id, ip_address }))
            .collect())
    }

    async fn len(&self) -> Result<u64, DomainError> {
        Ok(self.rows.read().await.len() as u64)
    }
}

// ============================================================================
// Mock ResolutionProvider
// ============================================================================

pub struct MockResolutionProvider {
    responses: Arc<RwLock<HashMap<IpAddr, Result<String, DomainError>>>>,
    call_count: Arc<AtomicU64>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockResolutionProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            call_count: Arc::new(AtomicU64::new(0)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_hostname(&self, ip: &str, hostname: &str) {
        self.responses
            .write()
            .await
            .insert(ip.parse().unwrap(), Ok(hostname.to_string()));
    }

    pub async fn set_transient(&self, ip: &str) {
        let ip: IpAddr = ip.parse().unwrap();
        self.responses.write().await.insert(
            ip,
            Err(DomainError::ResolutionTransient {
                ip,
                reason: "SERVFAIL".to_string(),
            }),
        );
    }

    pub async fn set_error(&self, ip: &str, error: DomainError) {
        self.responses.write().await.insert(ip.parse().unwrap(), Err(error));
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ResolutionProvider for MockResolutionProvider {
    async fn resolve(&self, ip: IpAddr) -> Result<String, DomainError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .read()
            .await
            .get(&ip)
            .cloned()
            .unwrap_or(Err(DomainError::HostnameNotFound(ip)))
    }
}
