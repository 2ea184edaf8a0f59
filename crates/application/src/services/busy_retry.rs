use super::Backoff;
use rdns_cache_domain::DomainError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retries an operation while the store reports `StoreBusy`, with exponential
/// backoff and jitter. Any other outcome is returned as-is, and the last
/// `StoreBusy` is surfaced once attempts run out.
#[derive(Debug, Clone, Copy)]
pub struct BusyRetry {
    max_attempts: u32,
    backoff: Backoff,
}

impl BusyRetry {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::default(),
        }
    }

    pub fn with_delays(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.backoff = Backoff::new(base_delay, max_delay);
        self
    }

    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut op: F) -> Result<T, DomainError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Err(e) if e.is_busy() && attempt < self.max_attempts => {
                    let delay = self.backoff.delay(attempt);
                    warn!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Store busy, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

}

impl Default for BusyRetry {
    fn default() -> Self {
        Self::new(5)
    }
}
