use crate::services::{decode_batch, CacheEngine};
use rdns_cache_domain::DomainError;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Per-batch tally reported by `ResolveBatchUseCase`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub resolved: u64,
    pub not_found: u64,
    pub transient: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl BatchOutcome {
    pub fn total(&self) -> u64 {
        self.resolved + self.not_found + self.transient + self.failed + self.skipped
    }
}

/// Use case: resolve one request payload through the cache.
///
/// Addresses are handled one at a time in payload order; the batch size
/// is the only bound on provider load. An address without a PTR record is
/// cached under the not-found sentinel, a transient failure is left uncached.
pub struct ResolveBatchUseCase {
    engine: Arc<CacheEngine>,
    not_found_hostname: String,
}

impl ResolveBatchUseCase {
    pub fn new(engine: Arc<CacheEngine>, not_found_hostname: impl Into<String>) -> Self {
        Self {
            engine,
            not_found_hostname: not_found_hostname.into(),
        }
    }

    /// Returns `MalformedBatch` only when the payload cannot be decoded at
    /// all. Per-address failures are counted, never propagated.
    pub async fn execute(&self, payload: &[u8]) -> Result<BatchOutcome, DomainError> {
        let decoded = decode_batch(payload)?;
        let mut outcome = BatchOutcome {
            skipped: decoded.rejected.len() as u64,
            ..Default::default()
        };

        for token in &decoded.rejected {
            warn!(token = %token, "Skipping token that is not an IP address");
        }

        for ip in decoded.addresses {
            match self.engine.resolve(ip).await {
                Ok(hostname) => {
                    debug!(ip = %ip, hostname = %hostname, "Address resolved");
                    outcome.resolved += 1;
                }
                Err(DomainError::HostnameNotFound(_)) => {
                    outcome.not_found += 1;
                    if let Err(e) = self.engine.record(ip, &self.not_found_hostname).await {
                        error!(ip = %ip, error = %e, "Failed to record not-found sentinel");
                    }
                }
                Err(e @ DomainError::ResolutionTransient { .. }) => {
                    warn!(ip = %ip, error = %e, "Transient resolution failure, not cached");
                    outcome.transient += 1;
                }
                Err(e) => {
                    error!(ip = %ip, error = %e, "Resolution failed");
                    outcome.failed += 1;
                }
            }
        }

        info!(
            resolved = outcome.resolved,
            not_found = outcome.not_found,
            transient = outcome.transient,
            failed = outcome.failed,
            skipped = outcome.skipped,
            "Batch processed"
        );
        Ok(outcome)
    }
}
