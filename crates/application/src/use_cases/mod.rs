pub mod cache;
pub mod queue;

pub use cache::{
    BatchOutcome, EvictExpiredEntriesUseCase, ExportSnapshotUseCase, ResolveBatchUseCase,
};
pub use queue::{IngestAddressesUseCase, IngestOutcome};
