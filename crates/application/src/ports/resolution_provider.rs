use async_trait::async_trait;
use rdns_cache_domain::DomainError;
use std::net::IpAddr;

/// Reverse lookup backend.
///
/// Implementations fail with `DomainError::HostnameNotFound` when the address
/// has no PTR record, and `DomainError::ResolutionTransient` for anything that
/// may succeed on a later attempt.
#[async_trait]
pub trait ResolutionProvider: Send + Sync {
    async fn resolve(&self, ip: IpAddr) -> Result<String, DomainError>;
}
