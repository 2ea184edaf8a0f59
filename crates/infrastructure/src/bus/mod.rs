pub mod in_process;
pub mod redis_bus;

pub use in_process::InProcessBus;
pub use redis_bus::RedisBus;
