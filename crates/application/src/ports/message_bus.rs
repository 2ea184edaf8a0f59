use async_trait::async_trait;
use bytes::Bytes;
use rdns_cache_domain::DomainError;
use tokio::sync::mpsc;

/// Delivery guarantee requested from the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QoS {
    #[default]
    AtMostOnce,
    AtLeastOnce,
}

#[derive(Debug, Clone)]
pub struct BusMessage {
    pub topic: String,
    pub payload: Bytes,
}

impl BusMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Receiving end of a topic subscription.
///
/// The bus's own delivery loop only pushes into the channel behind this
/// handle, so whatever the consumer does with a message never stalls delivery
/// on other topics.
#[derive(Debug)]
pub struct Subscription {
    topic: String,
    receiver: mpsc::UnboundedReceiver<BusMessage>,
}

impl Subscription {
    pub fn new(topic: impl Into<String>, receiver: mpsc::UnboundedReceiver<BusMessage>) -> Self {
        Self {
            topic: topic.into(),
            receiver,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Next message, or `None` once the bus side has gone away.
    pub async fn recv(&mut self) -> Option<BusMessage> {
        self.receiver.recv().await
    }

    /// Discard everything already delivered, returning how many were dropped.
    pub fn drain(&mut self) -> usize {
        let mut dropped = 0;
        while self.receiver.try_recv().is_ok() {
            dropped += 1;
        }
        dropped
    }
}

#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Fire-and-forget publish; only transport-level failures are reported.
    async fn publish(&self, topic: &str, payload: Bytes, qos: QoS) -> Result<(), DomainError>;

    async fn subscribe(&self, topic: &str) -> Result<Subscription, DomainError>;
}
