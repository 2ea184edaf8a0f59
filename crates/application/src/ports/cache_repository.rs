use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rdns_cache_domain::{CacheEntry, DomainError};
use std::net::IpAddr;

#[async_trait]
pub trait CacheRepository: Send + Sync {
    async fn get(&self, ip: IpAddr) -> Result<Option<CacheEntry>, DomainError>;

    /// Insert or replace the row for `entry.ip_address` in one statement.
    /// The stored `last_resolved` never moves backwards.
    async fn upsert(&self, entry: &CacheEntry) -> Result<(), DomainError>;

    /// All committed rows, ordered by address
    async fn get_all(&self) -> Result<Vec<CacheEntry>, DomainError>;

    /// Delete rows with `last_resolved < cutoff`, returning how many went.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError>;
}
