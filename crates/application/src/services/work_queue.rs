use rdns_cache_domain::{DomainError, FillPolicy, QueueItem};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

use super::BusyRetry;
use crate::ports::QueueRepository;

/// How long `wait_for_batch` holds out for a full batch.
#[derive(Debug, Clone, Copy)]
pub struct FillSettings {
    pub policy: FillPolicy,
    pub flush_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for FillSettings {
    fn default() -> Self {
        Self {
            policy: FillPolicy::Lenient,
            flush_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Durable FIFO of addresses awaiting resolution.
pub struct WorkQueue {
    repo: Arc<dyn QueueRepository>,
    retry: BusyRetry,
}

impl WorkQueue {
    pub fn new(repo: Arc<dyn QueueRepository>) -> Self {
        Self {
            repo,
            retry: BusyRetry::default(),
        }
    }

    pub fn with_retry(mut self, retry: BusyRetry) -> Self {
        self.retry = retry;
        self
    }

    pub async fn enqueue(&self, ip: IpAddr) -> Result<i64, DomainError> {
        self.retry.run("queue.push", || self.repo.push(ip)).await
    }

    /// Atomically remove and return up to `n` of the oldest items. An item is
    /// never handed out by more than one call.
    #[instrument(skip(self))]
    pub async fn dequeue_batch(&self, n: u32) -> Result<Vec<QueueItem>, DomainError> {
        if n == 0 {
            return Ok(Vec::new());
        }
        self.retry.run("queue.take_batch", || self.repo.take_batch(n)).await
    }

    pub async fn len(&self) -> Result<u64, DomainError> {
        self.retry.run("queue.len", || self.repo.len()).await
    }

    /// Poll until a batch of `batch_size` may be drained under `fill`,
    /// returning the queue length that satisfied it.
    ///
    /// Under `Lenient`, a non-empty queue is also accepted once it has stayed
    /// short of `batch_size` for `flush_timeout`. The future holds no state
    /// outside itself and can be dropped at any await point.
    pub async fn wait_for_batch(&self, batch_size: u32, fill: &FillSettings) -> Result<u64, DomainError> {
        let target = u64::from(batch_size.max(1));
        let mut pending_since: Option<Instant> = None;

        loop {
            let len = self.len().await?;
            if len >= target {
                return Ok(len);
            }

            if len == 0 {
                pending_since = None;
            } else if fill.policy == FillPolicy::Lenient {
                let since = *pending_since.get_or_insert_with(Instant::now);
                if since.elapsed() >= fill.flush_timeout {
                    debug!(pending = len, batch_size, "Flushing partial batch");
                    return Ok(len);
                }
            }

            tokio::time::sleep(fill.poll_interval).await;
        }
    }
}
