pub mod dispatcher;
pub mod eviction;
pub mod ingest;
pub mod runner;
pub mod snapshot;
pub mod worker;

pub use dispatcher::{DispatcherState, QueueDispatcher};
pub use eviction::EvictionJob;
pub use ingest::IngestJob;
pub use runner::JobRunner;
pub use snapshot::{write_snapshot_file, SnapshotJob};
pub use worker::ResolutionWorker;
