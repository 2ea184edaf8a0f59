//! Wiring from configuration to ports, services and jobs.

use rdns_cache_application::ports::{
    CacheRepository, MessageBus, QueueRepository, ResolutionProvider,
};
use rdns_cache_application::services::{BusyRetry, CacheEngine, FillSettings, WorkQueue};
use rdns_cache_application::use_cases::{
    EvictExpiredEntriesUseCase, ExportSnapshotUseCase, IngestAddressesUseCase, ResolveBatchUseCase,
};
use rdns_cache_domain::Config;
use rdns_cache_infrastructure::dns::PtrResolutionProvider;
use rdns_cache_infrastructure::repositories::{SqliteCacheRepository, SqliteQueueRepository};
use rdns_cache_jobs::{EvictionJob, IngestJob, QueueDispatcher, ResolutionWorker, SnapshotJob};
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct Services {
    pub engine: Arc<CacheEngine>,
    pub queue: Arc<WorkQueue>,
}

impl Services {
    pub fn new(config: &Config, pool: SqlitePool) -> anyhow::Result<Self> {
        let retry = BusyRetry::new(config.database.busy_retries);

        let cache_repo: Arc<dyn CacheRepository> =
            Arc::new(SqliteCacheRepository::new(pool.clone()));
        let queue_repo: Arc<dyn QueueRepository> = Arc::new(SqliteQueueRepository::new(pool));

        let server: SocketAddr = config.resolver.server.parse()?;
        let provider_timeout = Duration::from_millis(config.resolver.timeout_ms);
        let provider: Arc<dyn ResolutionProvider> =
            Arc::new(PtrResolutionProvider::new(server, provider_timeout));

        let engine = CacheEngine::new(cache_repo, provider, config.cache.freshness_window())
            .with_provider_timeout(provider_timeout)
            .with_retry(retry);
        let queue = WorkQueue::new(queue_repo).with_retry(retry);

        Ok(Self {
            engine: Arc::new(engine),
            queue: Arc::new(queue),
        })
    }
}

/// Builds each role's job from one config, bus and shutdown token.
pub struct Jobs<'a> {
    config: &'a Config,
    services: &'a Services,
    bus: Arc<dyn MessageBus>,
    shutdown: CancellationToken,
}

impl<'a> Jobs<'a> {
    pub fn new(
        config: &'a Config,
        services: &'a Services,
        bus: Arc<dyn MessageBus>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            services,
            bus,
            shutdown,
        }
    }

    pub fn ingest(&self) -> IngestJob {
        let ingest = Arc::new(IngestAddressesUseCase::new(self.services.queue.clone()));
        IngestJob::new(ingest, self.bus.clone(), &self.config.topics.ingest)
            .with_cancellation(self.shutdown.clone())
    }

    pub fn dispatcher(&self) -> QueueDispatcher {
        let queue = &self.config.queue;
        QueueDispatcher::new(
            self.services.queue.clone(),
            self.bus.clone(),
            &self.config.topics.request,
            &self.config.topics.availability,
        )
        .with_batch_size(queue.batch_size)
        .with_fill(FillSettings {
            policy: queue.fill_policy,
            flush_timeout: queue.flush_timeout(),
            poll_interval: queue.poll_interval(),
        })
        .with_ready_warn_interval(queue.ready_warn_interval())
        .with_cancellation(self.shutdown.clone())
    }

    pub fn worker(&self) -> ResolutionWorker {
        let resolve = Arc::new(ResolveBatchUseCase::new(
            self.services.engine.clone(),
            &self.config.cache.not_found_hostname,
        ));
        ResolutionWorker::new(
            resolve,
            self.bus.clone(),
            &self.config.topics.request,
            &self.config.topics.availability,
        )
        .with_cancellation(self.shutdown.clone())
    }

    pub fn snapshot(&self) -> SnapshotJob {
        let export = Arc::new(ExportSnapshotUseCase::new(self.services.engine.clone()));
        let job = SnapshotJob::new(export, self.bus.clone(), &self.config.topics.snapshot)
            .with_interval(self.config.scheduler.snapshot_interval_secs)
            .with_cancellation(self.shutdown.clone());

        match &self.config.scheduler.snapshot_path {
            Some(path) => job.with_output_path(path),
            None => job,
        }
    }

    pub fn eviction(&self) -> EvictionJob {
        let evict = Arc::new(EvictExpiredEntriesUseCase::new(self.services.engine.clone()));
        EvictionJob::new(evict, self.config.cache.eviction_window())
            .with_interval(self.config.scheduler.eviction_interval_secs)
            .with_cancellation(self.shutdown.clone())
    }
}
