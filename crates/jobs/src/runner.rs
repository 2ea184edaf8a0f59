use crate::{EvictionJob, IngestJob, QueueDispatcher, ResolutionWorker, SnapshotJob};
use rdns_cache_domain::DomainError;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Central orchestrator for all long-running tasks.
///
/// Register the roles this process should play, then call `.start()` once.
/// The returned handles finish after the tasks observe their cancellation
/// token. A subscription that cannot be opened aborts startup.
///
/// # Example
///
/// ```rust,ignore
/// let handles = JobRunner::new()
///     .with_worker(worker)
///     .with_dispatcher(dispatcher)
///     .with_eviction(EvictionJob::new(evict, window))
///     .start()
///     .await?;
/// ```
#[derive(Default)]
pub struct JobRunner {
    ingest: Option<IngestJob>,
    worker: Option<ResolutionWorker>,
    dispatcher: Option<QueueDispatcher>,
    snapshot: Option<SnapshotJob>,
    eviction: Option<EvictionJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ingest(mut self, job: IngestJob) -> Self {
        self.ingest = Some(job);
        self
    }

    pub fn with_worker(mut self, worker: ResolutionWorker) -> Self {
        self.worker = Some(worker);
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: QueueDispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn with_snapshot(mut self, job: SnapshotJob) -> Self {
        self.snapshot = Some(job);
        self
    }

    pub fn with_eviction(mut self, job: EvictionJob) -> Self {
        self.eviction = Some(job);
        self
    }

    /// Start everything registered. Consumers subscribe before the
    /// dispatcher so the first batch has somewhere to go.
    pub async fn start(self) -> Result<Vec<JoinHandle<()>>, DomainError> {
        info!("Starting background job runner");
        let mut handles = Vec::new();

        if let Some(job) = self.ingest {
            handles.push(Arc::new(job).start().await?);
        }

        if let Some(worker) = self.worker {
            handles.push(Arc::new(worker).start().await?);
        }

        if let Some(dispatcher) = self.dispatcher {
            handles.push(Arc::new(dispatcher).start().await?);
        }

        if let Some(job) = self.snapshot {
            handles.push(Arc::new(job).start().await);
        }

        if let Some(job) = self.eviction {
            handles.push(Arc::new(job).start().await);
        }

        info!(tasks = handles.len(), "All background jobs started");
        Ok(handles)
    }
}
