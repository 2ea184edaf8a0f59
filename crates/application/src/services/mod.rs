pub mod backoff;
pub mod batch_codec;
pub mod busy_retry;
pub mod cache_engine;
pub mod work_queue;

pub use backoff::Backoff;
pub use batch_codec::{decode_batch, encode_batch, DecodedBatch};
pub use busy_retry::BusyRetry;
pub use cache_engine::CacheEngine;
pub use work_queue::{FillSettings, WorkQueue};
