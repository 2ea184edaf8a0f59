use bytes::Bytes;
use rdns_cache_application::ports::{MessageBus, QoS, Subscription};
use rdns_cache_application::services::{encode_batch, FillSettings, WorkQueue};
use rdns_cache_domain::{DomainError, READY_SIGNAL};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const DEFAULT_READY_WARN_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    Idle,
    WaitingForBatch,
    Published,
    AwaitingReady,
}

/// Drains the work queue onto the request topic, one batch per readiness
/// signal.
///
/// The dispatcher holds a single credit. It starts with it, spends it on
/// each published batch, and only gets it back when `READY` arrives on the
/// availability topic. Any `READY` already sitting in the subscription when
/// a batch goes out is discarded, so a signal can never be counted twice.
///
/// Known gap: `READY` carries no batch id, so a signal that is still in
/// flight when the pre-publish drain runs is credited to the batch just
/// published. The usual case is the worker's startup `READY` landing after
/// the first batch went out on the initial credit. The dispatcher then sends
/// a second batch while the first is still being resolved, so two batches
/// can be outstanding for a short time.
pub struct QueueDispatcher {
    queue: Arc<WorkQueue>,
    bus: Arc<dyn MessageBus>,
    request_topic: String,
    availability_topic: String,
    batch_size: u32,
    fill: FillSettings,
    ready_warn_interval: Duration,
    shutdown: CancellationToken,
}

impl QueueDispatcher {
    pub fn new(
        queue: Arc<WorkQueue>,
        bus: Arc<dyn MessageBus>,
        request_topic: impl Into<String>,
        availability_topic: impl Into<String>,
    ) -> Self {
        Self {
            queue,
            bus,
            request_topic: request_topic.into(),
            availability_topic: availability_topic.into(),
            batch_size: 5,
            fill: FillSettings::default(),
            ready_warn_interval: DEFAULT_READY_WARN_INTERVAL,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_fill(mut self, fill: FillSettings) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_ready_warn_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.ready_warn_interval = interval;
        }
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) -> Result<JoinHandle<()>, DomainError> {
        info!(
            batch_size = self.batch_size,
            policy = ?self.fill.policy,
            topic = %self.request_topic,
            "Starting queue dispatcher"
        );
        let availability = self.bus.subscribe(&self.availability_topic).await?;

        Ok(tokio::spawn(async move {
            if let Err(e) = self.drive(availability).await {
                error!(error = %e, "Queue dispatcher stopped");
            }
        }))
    }

    /// Drive the state machine until cancelled. Only fails if the
    /// availability subscription cannot be opened or is closed by the bus.
    pub async fn run(&self) -> Result<(), DomainError> {
        let availability = self.bus.subscribe(&self.availability_topic).await?;
        self.drive(availability).await
    }

    async fn drive(&self, mut availability: Subscription) -> Result<(), DomainError> {
        let mut state = DispatcherState::Idle;

        while !self.shutdown.is_cancelled() {
            state = match state {
                DispatcherState::Idle => DispatcherState::WaitingForBatch,
                DispatcherState::WaitingForBatch => {
                    tokio::select! {
                        _ = self.shutdown.cancelled() => break,
                        ready = self.queue.wait_for_batch(self.batch_size, &self.fill) => match ready {
                            Ok(pending) => {
                                debug!(pending, "Batch ready");
                                DispatcherState::Published
                            }
                            Err(e) => {
                                error!(error = %e, "Failed to poll work queue");
                                self.pause(self.fill.poll_interval).await;
                                DispatcherState::WaitingForBatch
                            }
                        }
                    }
                }
                DispatcherState::Published => match self.publish_batch(&mut availability).await {
                    Ok(0) => DispatcherState::Idle,
                    Ok(_) => DispatcherState::AwaitingReady,
                    Err(e) => {
                        error!(error = %e, "Failed to publish batch");
                        self.pause(self.fill.poll_interval).await;
                        DispatcherState::Idle
                    }
                },
                DispatcherState::AwaitingReady => {
                    if !self.await_ready(&mut availability).await? {
                        break;
                    }
                    DispatcherState::Idle
                }
            };
        }

        info!("QueueDispatcher: shutting down");
        Ok(())
    }

    async fn publish_batch(&self, availability: &mut Subscription) -> Result<usize, DomainError> {
        let stale = availability.drain();
        if stale > 0 {
            debug!(stale, "Discarded stale readiness signals");
        }

        let items = self.queue.dequeue_batch(self.batch_size).await?;
        if items.is_empty() {
            debug!("Queue drained by another consumer");
            return Ok(0);
        }

        let payload: Bytes = encode_batch(&items);
        self.bus
            .publish(&self.request_topic, payload, QoS::AtLeastOnce)
            .await
            .map_err(|e| {
                // Rows are already gone from the queue
                warn!(lost = items.len(), "Dequeued batch was not delivered");
                e
            })?;

        info!(
            size = items.len(),
            first_id = items[0].id,
            "Published resolution batch"
        );
        Ok(items.len())
    }

    /// Wait for `READY`. Returns `false` on shutdown.
    async fn await_ready(&self, availability: &mut Subscription) -> Result<bool, DomainError> {
        let started = Instant::now();
        let mut reminder = tokio::time::interval_at(
            started + self.ready_warn_interval,
            self.ready_warn_interval,
        );

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => return Ok(false),
                _ = reminder.tick() => {
                    warn!(
                        waited_secs = started.elapsed().as_secs(),
                        topic = %self.availability_topic,
                        "Still waiting for worker readiness"
                    );
                }
                message = availability.recv() => match message {
                    Some(message) if is_ready(&message.payload) => {
                        debug!(waited_ms = started.elapsed().as_millis() as u64, "Worker ready");
                        return Ok(true);
                    }
                    Some(message) => {
                        debug!(len = message.payload.len(), "Ignoring non-READY availability message");
                    }
                    None => {
                        return Err(DomainError::BusConnect(format!(
                            "subscription to '{}' closed",
                            self.availability_topic
                        )));
                    }
                }
            }
        }
    }

    async fn pause(&self, duration: Duration) {
        tokio::select! {
            _ = self.shutdown.cancelled() => {}
            _ = tokio::time::sleep(duration) => {}
        }
    }
}

fn is_ready(payload: &[u8]) -> bool {
    std::str::from_utf8(payload)
        .map(|s| s.trim() == READY_SIGNAL)
        .unwrap_or(false)
}
