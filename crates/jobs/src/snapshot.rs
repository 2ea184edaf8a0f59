use bytes::Bytes;
use rdns_cache_application::ports::{MessageBus, QoS};
use rdns_cache_application::use_cases::ExportSnapshotUseCase;
use rdns_cache_domain::DomainError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Replace `path` with `json` through a sibling `.tmp` file and a rename, so
/// readers only ever see a complete snapshot.
pub async fn write_snapshot_file(path: &Path, json: &str) -> Result<(), DomainError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let io_error = |e: std::io::Error| {
        DomainError::IoError(format!("Failed to write snapshot to {}: {}", path.display(), e))
    };

    if let Err(e) = tokio::fs::write(&tmp, json.as_bytes()).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(io_error(e));
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(io_error(e));
    }
    Ok(())
}

/// Periodically publishes the whole cache as JSON on the snapshot topic.
pub struct SnapshotJob {
    export: Arc<ExportSnapshotUseCase>,
    bus: Arc<dyn MessageBus>,
    topic: String,
    output_path: Option<PathBuf>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl SnapshotJob {
    pub fn new(
        export: Arc<ExportSnapshotUseCase>,
        bus: Arc<dyn MessageBus>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            export,
            bus,
            topic: topic.into(),
            output_path: None,
            interval_secs: 300,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    /// Also write every snapshot to `path`, replacing the previous one.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Take one snapshot now, returning the number of bytes published.
    pub async fn run_once(&self) -> Result<usize, DomainError> {
        let json = self.export.execute().await?;

        if let Some(path) = &self.output_path {
            write_snapshot_file(path, &json).await?;
        }

        let size = json.len();
        self.bus
            .publish(&self.topic, Bytes::from(json), QoS::AtLeastOnce)
            .await?;
        Ok(size)
    }

    pub async fn start(self: Arc<Self>) -> JoinHandle<()> {
        info!(
            interval_secs = self.interval_secs,
            topic = %self.topic,
            "Starting snapshot job"
        );

        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(self.interval_secs.max(1)));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("SnapshotJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match self.run_once().await {
                            Ok(bytes) => info!(bytes, "Cache snapshot published"),
                            Err(e) => error!(error = %e, "Cache snapshot failed"),
                        }
                    }
                }
            }
        })
    }
}
