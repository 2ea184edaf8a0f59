use chrono::TimeDelta;
use rdns_cache_application::use_cases::EvictExpiredEntriesUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct EvictionJob {
    evict: Arc<EvictExpiredEntriesUseCase>,
    eviction_window: TimeDelta,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl EvictionJob {
    pub fn new(evict: Arc<EvictExpiredEntriesUseCase>, eviction_window: TimeDelta) -> Self {
        Self {
            evict,
            eviction_window,
            interval_secs: 3600,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) -> JoinHandle<()> {
        info!(
            eviction_window_secs = self.eviction_window.num_seconds(),
            interval_secs = self.interval_secs,
            "Starting cache eviction job"
        );

        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(self.interval_secs.max(1)));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("EvictionJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match self.evict.execute(self.eviction_window).await {
                            Ok(deleted) => info!(deleted, "Cache eviction completed"),
                            Err(e) => error!(error = %e, "Cache eviction failed"),
                        }
                    }
                }
            }
        })
    }
}
