use std::net::IpAddr;

/// A pending address in the durable work queue. `id` is assigned by the store
/// and strictly increases in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    pub id: i64,
    pub ip_address: IpAddr,
}
