pub mod evict_expired;
pub mod export_snapshot;
pub mod resolve_batch;

pub use evict_expired::EvictExpiredEntriesUseCase;
pub use export_snapshot::ExportSnapshotUseCase;
pub use resolve_batch::{BatchOutcome, ResolveBatchUseCase};
