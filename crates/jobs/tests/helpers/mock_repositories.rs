#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeDelta, Utc};
use rdns_cache_application::ports::{
    BusMessage, CacheRepository, MessageBus, QoS, QueueRepository, ResolutionProvider,
    Subscription,
};
use rdns_cache_domain::{CacheEntry, DomainError, QueueItem};
use std::collections::{BTreeMap, HashMap};
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

// ============================================================================
// Mock CacheRepository
// ============================================================================

pub struct MockCacheRepository {
    rows: Arc<RwLock<HashMap<IpAddr, CacheEntry>>>,
}

impl MockCacheRepository {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
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
}

#[async_trait]
impl CacheRepository for MockCacheRepository {
    async fn get(&self, ip: IpAddr) -> Result<Option<CacheEntry>, DomainError> {
        Ok(self.rows.read().await.get(&ip).cloned())
    }

    async fn upsert(&self, entry: &CacheEntry) -> Result<(), DomainError> {
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
        let mut all: Vec<_> = self.rows.read().await.values().cloned().collect();
        all.sort_by_key(|e| e.ip_address);
        Ok(all)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
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

    pub async fn addresses(&self) -> Vec<IpAddr> {
        self.rows.read().await.values().copied().collect()
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
    hostnames: Arc<RwLock<HashMap<IpAddr, String>>>,
    call_count: Arc<AtomicU64>,
}

impl MockResolutionProvider {
    pub fn new() -> Self {
        Self {
            hostnames: Arc::new(RwLock::new(HashMap::new())),
            call_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn set_hostname(&self, ip: &str, hostname: &str) {
        self.hostnames
            .write()
            .await
            .insert(ip.parse().unwrap(), hostname.to_string());
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ResolutionProvider for MockResolutionProvider {
    async fn resolve(&self, ip: IpAddr) -> Result<String, DomainError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.hostnames
            .read()
            .await
            .get(&ip)
            .cloned()
            .ok_or(DomainError::HostnameNotFound(ip))
    }
}

// ============================================================================
// Mock MessageBus
// ============================================================================

/// Channel fan-out that also records every publish.
pub struct MockBus {
    subscribers: Arc<RwLock<HashMap<String, Vec<mpsc::UnboundedSender<BusMessage>>>>>,
    published: Arc<RwLock<Vec<BusMessage>>>,
    attempts: Arc<RwLock<HashMap<String, u32>>>,
    pending_failures: Arc<RwLock<HashMap<String, u32>>>,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            published: Arc::new(RwLock::new(Vec::new())),
            attempts: Arc::new(RwLock::new(HashMap::new())),
            pending_failures: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Make the next `n` publishes on `topic` fail with `BusPublish`.
    pub async fn fail_next_publishes(&self, topic: &str, n: u32) {
        self.pending_failures
            .write()
            .await
            .insert(topic.to_string(), n);
    }

    /// Publish calls on `topic`, failed ones included.
    pub async fn publish_attempts(&self, topic: &str) -> u32 {
        self.attempts.read().await.get(topic).copied().unwrap_or(0)
    }

    pub async fn published_on(&self, topic: &str) -> Vec<Bytes> {
        self.published
            .read()
            .await
            .iter()
            .filter(|m| m.topic == topic)
            .map(|m| m.payload.clone())
            .collect()
    }

    pub async fn send(&self, topic: &str, payload: &'static [u8]) {
        self.publish(topic, Bytes::from_static(payload), QoS::AtMostOnce)
            .await
            .unwrap();
    }
}

#[async_trait]
impl MessageBus for MockBus {
    async fn publish(&self, topic: &str, payload: Bytes, _qos: QoS) -> Result<(), DomainError> {
        *self.attempts.write().await.entry(topic.to_string()).or_default() += 1;
        if let Some(remaining) = self.pending_failures.write().await.get_mut(topic) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DomainError::BusPublish(format!("broker rejected '{}'", topic)));
            }
        }

        let message = BusMessage::new(topic, payload);
        self.published.write().await.push(message.clone());
        if let Some(senders) = self.subscribers.write().await.get_mut(topic) {
            senders.retain(|tx| tx.send(message.clone()).is_ok());
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<Subscription, DomainError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .write()
            .await
            .entry(topic.to_string())
            .or_default()
            .push(tx);
        Ok(Subscription::new(topic, rx))
    }
}
