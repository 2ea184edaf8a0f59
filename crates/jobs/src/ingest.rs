use rdns_cache_application::ports::{MessageBus, Subscription};
use rdns_cache_application::use_cases::IngestAddressesUseCase;
use rdns_cache_domain::DomainError;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Feeds addresses published on the ingest topic into the work queue.
pub struct IngestJob {
    ingest: Arc<IngestAddressesUseCase>,
    bus: Arc<dyn MessageBus>,
    topic: String,
    shutdown: CancellationToken,
}

impl IngestJob {
    pub fn new(
        ingest: Arc<IngestAddressesUseCase>,
        bus: Arc<dyn MessageBus>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            ingest,
            bus,
            topic: topic.into(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) -> Result<JoinHandle<()>, DomainError> {
        info!(topic = %self.topic, "Starting ingest job");
        let subscription = self.bus.subscribe(&self.topic).await?;

        Ok(tokio::spawn(async move {
            if let Err(e) = self.serve(subscription).await {
                error!(error = %e, "Ingest job stopped");
            }
        }))
    }

    async fn serve(&self, mut subscription: Subscription) -> Result<(), DomainError> {

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("IngestJob: shutting down");
                    return Ok(());
                }
                message = subscription.recv() => {
                    let Some(message) = message else {
                        return Err(DomainError::BusConnect(format!(
                            "subscription to '{}' closed",
                            self.topic
                        )));
                    };

                    match self.ingest.execute(&message.payload).await {
                        Ok(outcome) => {
                            debug!(accepted = outcome.accepted, rejected = outcome.rejected, "Addresses ingested");
                        }
                        Err(e) => {
                            warn!(error = %e, "Ingest failed");
                        }
                    }
                }
            }
        }
    }
}
