use async_trait::async_trait;
use rdns_cache_domain::{DomainError, QueueItem};
use std::net::IpAddr;

#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Append an address, returning the id the store assigned.
    async fn push(&self, ip: IpAddr) -> Result<i64, DomainError>;

    /// Remove and return up to `limit` of the oldest rows, id-ascending.
    /// Selection and deletion happen in a single transaction.
    async fn take_batch(&self, limit: u32) -> Result<Vec<QueueItem>, DomainError>;

    async fn len(&self) -> Result<u64, DomainError>;
}
