//! Configuration for rdns-cache
//!
//! One module per section of the TOML file:
//! - `root`: top-level `Config`, loading and CLI overrides
//! - `database`: SQLite store location and contention limits
//! - `bus`: message bus transport
//! - `resolver`: upstream PTR resolution
//! - `cache`: freshness and eviction windows
//! - `queue`: batch size and fill policy
//! - `scheduler`: snapshot and eviction intervals
//! - `topics`: topic names
//! - `logging`: log level

pub mod bus;
pub mod cache;
pub mod database;
pub mod errors;
pub mod logging;
pub mod queue;
pub mod resolver;
pub mod root;
pub mod scheduler;
pub mod topics;

pub use bus::{BusConfig, BusKind};
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use queue::{FillPolicy, QueueConfig};
pub use resolver::ResolverConfig;
pub use root::{CliOverrides, Config};
pub use scheduler::SchedulerConfig;
pub use topics::TopicsConfig;
