//! rdns-cache domain layer
pub mod cache_entry;
pub mod config;
pub mod errors;
pub mod queue_item;

pub use cache_entry::CacheEntry;
pub use config::{CliOverrides, Config, ConfigError, FillPolicy};
pub use errors::DomainError;
pub use queue_item::QueueItem;

/// Literal readiness signal published on the availability topic.
pub const READY_SIGNAL: &str = "READY";
