use std::net::IpAddr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("No PTR record for {0}")]
    HostnameNotFound(IpAddr),

    #[error("Transient resolution failure for {ip}: {reason}")]
    ResolutionTransient { ip: IpAddr, reason: String },

    #[error("Store busy: {0}")]
    StoreBusy(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Message bus connect failed: {0}")]
    BusConnect(String),

    #[error("Message bus publish failed: {0}")]
    BusPublish(String),

    #[error("Malformed batch: {0}")]
    MalformedBatch(String),

    #[error("Eviction cutoff out of range for window of {0}s")]
    EvictionWindowOutOfRange(i64),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl DomainError {
    /// Store contention that the caller should retry with backoff.
    pub fn is_busy(&self) -> bool {
        matches!(self, DomainError::StoreBusy(_))
    }

    /// Resolution failures that must not be cached.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::ResolutionTransient { .. })
    }
}
