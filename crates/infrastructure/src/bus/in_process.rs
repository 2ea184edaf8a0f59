use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use rdns_cache_application::ports::{BusMessage, MessageBus, QoS, Subscription};
use rdns_cache_domain::DomainError;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Topic fan-out inside a single process.
///
/// Every subscriber owns an unbounded channel; publishing clones the payload
/// (a cheap `Bytes` refcount bump) into each of them. Subscribers that have
/// been dropped are pruned on the next publish to their topic.
#[derive(Default)]
pub struct InProcessBus {
    topics: DashMap<String, Vec<mpsc::UnboundedSender<BusMessage>>>,
}

impl InProcessBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .get(topic)
            .map(|senders| senders.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl MessageBus for InProcessBus {
    async fn publish(&self, topic: &str, payload: Bytes, _qos: QoS) -> Result<(), DomainError> {
        let Some(mut senders) = self.topics.get_mut(topic) else {
            trace!(topic, "Publish with no subscribers");
            return Ok(());
        };

        let message = BusMessage::new(topic, payload);
        senders.retain(|tx| tx.send(message.clone()).is_ok());

        trace!(topic, delivered = senders.len(), "Message published");
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<Subscription, DomainError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.topics.entry(topic.to_string()).or_default().push(tx);

        debug!(topic, "Subscribed");
        Ok(Subscription::new(topic, rx))
    }
}
