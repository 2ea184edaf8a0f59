pub mod cache_repository;
pub mod queue_repository;

pub use cache_repository::SqliteCacheRepository;
pub use queue_repository::SqliteQueueRepository;
