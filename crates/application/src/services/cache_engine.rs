use chrono::{DateTime, TimeDelta, Utc};
use rdns_cache_domain::{CacheEntry, DomainError};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use super::BusyRetry;
use crate::ports::{CacheRepository, ResolutionProvider};

const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(2);

/// Cache-first reverse resolution over the durable store.
///
/// Each operation maps to a single atomic repository call, so the engine
/// holds no locks of its own and can be shared freely across tasks.
pub struct CacheEngine {
    repo: Arc<dyn CacheRepository>,
    provider: Arc<dyn ResolutionProvider>,
    freshness_window: TimeDelta,
    provider_timeout: Duration,
    retry: BusyRetry,
}

impl CacheEngine {
    pub fn new(
        repo: Arc<dyn CacheRepository>,
        provider: Arc<dyn ResolutionProvider>,
        freshness_window: TimeDelta,
    ) -> Self {
        Self {
            repo,
            provider,
            freshness_window,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            retry: BusyRetry::default(),
        }
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: BusyRetry) -> Self {
        self.retry = retry;
        self
    }

    /// Return the cached hostname while fresh, otherwise ask the provider and
    /// cache a successful answer.
    ///
    /// Provider failures are never cached. Anything other than
    /// `HostnameNotFound` is reported as `ResolutionTransient`, including a
    /// lookup that outlives the per-call timeout.
    #[instrument(skip(self))]
    pub async fn resolve(&self, ip: IpAddr) -> Result<String, DomainError> {
        let now = Utc::now();
        let cached = self
            .retry
            .run("cache.get", || self.repo.get(ip))
            .await?;

        if let Some(entry) = cached {
            if entry.is_fresh(now, self.freshness_window) {
                debug!(ip = %ip, hostname = %entry.hostname, "Cache hit");
                return Ok(entry.hostname);
            }
            debug!(ip = %ip, last_resolved = %entry.last_resolved, "Cache entry stale");
        }

        let hostname = match tokio::time::timeout(self.provider_timeout, self.provider.resolve(ip)).await {
            Ok(Ok(hostname)) => hostname,
            Ok(Err(DomainError::HostnameNotFound(_))) => {
                return Err(DomainError::HostnameNotFound(ip));
            }
            Ok(Err(e @ DomainError::ResolutionTransient { .. })) => return Err(e),
            Ok(Err(e)) => {
                return Err(DomainError::ResolutionTransient {
                    ip,
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                return Err(DomainError::ResolutionTransient {
                    ip,
                    reason: format!("lookup exceeded {}ms", self.provider_timeout.as_millis()),
                });
            }
        };

        self.record(ip, &hostname).await?;
        debug!(ip = %ip, hostname = %hostname, "Resolved and cached");
        Ok(hostname)
    }

    /// Upsert `hostname` for `ip` stamped with the current time.
    pub async fn record(&self, ip: IpAddr, hostname: &str) -> Result<CacheEntry, DomainError> {
        let entry = CacheEntry::new(ip, hostname, Utc::now());
        self.retry
            .run("cache.upsert", || self.repo.upsert(&entry))
            .await?;
        Ok(entry)
    }

    pub async fn snapshot(&self) -> Result<Vec<CacheEntry>, DomainError> {
        self.retry.run("cache.get_all", || self.repo.get_all()).await
    }

    /// Remove entries with `last_resolved < cutoff`. Idempotent.
    #[instrument(skip(self))]
    pub async fn evict_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        self.retry
            .run("cache.delete_older_than", || self.repo.delete_older_than(cutoff))
            .await
    }
}
