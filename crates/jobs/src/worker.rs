use bytes::Bytes;
use rdns_cache_application::ports::{MessageBus, QoS, Subscription};
use rdns_cache_application::services::Backoff;
use rdns_cache_application::use_cases::ResolveBatchUseCase;
use rdns_cache_domain::{DomainError, READY_SIGNAL};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Consumes request batches and signals readiness after each one.
///
/// Batches are resolved on this task, never on the bus's delivery loop.
/// A failed READY publish is retried with backoff until it goes through or
/// shutdown is requested, since the dispatcher never advances without it.
pub struct ResolutionWorker {
    resolve_batch: Arc<ResolveBatchUseCase>,
    bus: Arc<dyn MessageBus>,
    request_topic: String,
    availability_topic: String,
    ready_backoff: Backoff,
    shutdown: CancellationToken,
}

impl ResolutionWorker {
    pub fn new(
        resolve_batch: Arc<ResolveBatchUseCase>,
        bus: Arc<dyn MessageBus>,
        request_topic: impl Into<String>,
        availability_topic: impl Into<String>,
    ) -> Self {
        Self {
            resolve_batch,
            bus,
            request_topic: request_topic.into(),
            availability_topic: availability_topic.into(),
            ready_backoff: Backoff::default(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_ready_backoff(mut self, backoff: Backoff) -> Self {
        self.ready_backoff = backoff;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Subscribe, then serve on a background task. Subscription failures
    /// are returned to the caller.
    pub async fn start(self: Arc<Self>) -> Result<JoinHandle<()>, DomainError> {
        info!(topic = %self.request_topic, "Starting resolution worker");
        let requests = self.bus.subscribe(&self.request_topic).await?;

        Ok(tokio::spawn(async move {
            if let Err(e) = self.serve(requests).await {
                error!(error = %e, "Resolution worker stopped");
            }
        }))
    }

    async fn serve(&self, mut requests: Subscription) -> Result<(), DomainError> {
        // Announce availability once subscribed, in case a dispatcher is
        // already waiting on us.
        if !self.signal_ready().await {
            return Ok(());
        }

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("ResolutionWorker: shutting down");
                    return Ok(());
                }
                message = requests.recv() => {
                    let Some(message) = message else {
                        return Err(DomainError::BusConnect(format!(
                            "subscription to '{}' closed",
                            requests.topic()
                        )));
                    };

                    match self.resolve_batch.execute(&message.payload).await {
                        Ok(outcome) => {
                            debug!(addresses = outcome.total(), "Batch done, signalling ready");
                        }
                        Err(e) => {
                            warn!(error = %e, len = message.payload.len(), "Discarding malformed batch");
                        }
                    }

                    if !self.signal_ready().await {
                        info!("ResolutionWorker: shutting down");
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Publish READY, retrying until it succeeds. Returns `false` if
    /// shutdown was requested first.
    async fn signal_ready(&self) -> bool {
        let mut attempt = 1;
        loop {
            match self
                .bus
                .publish(
                    &self.availability_topic,
                    Bytes::from_static(READY_SIGNAL.as_bytes()),
                    QoS::AtLeastOnce,
                )
                .await
            {
                Ok(()) => return true,
                Err(e) => {
                    let delay = self.ready_backoff.delay(attempt);
                    error!(
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Failed to publish readiness, retrying"
                    );
                    tokio::select! {
                        _ = self.shutdown.cancelled() => return false,
                        _ = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
            }
        }
    }
}
