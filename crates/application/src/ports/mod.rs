pub mod cache_repository;
pub mod message_bus;
pub mod queue_repository;
pub mod resolution_provider;

pub use cache_repository::CacheRepository;
pub use message_bus::{BusMessage, MessageBus, QoS, Subscription};
pub use queue_repository::QueueRepository;
pub use resolution_provider::ResolutionProvider;
