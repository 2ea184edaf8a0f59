//! Redis pub/sub transport.
//!
//! Redis channels are fire-and-forget, so every publish is effectively
//! at-most-once regardless of the requested [`QoS`]. Components that need a
//! stronger guarantee already get it from the SQLite queue.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use rdns_cache_application::ports::{BusMessage, MessageBus, QoS, Subscription};
use rdns_cache_domain::DomainError;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub struct RedisBus {
    client: Client,
    publisher: ConnectionManager,
    keepalive: Option<JoinHandle<()>>,
}

impl RedisBus {
    /// Connect to `host:port` and start a PING loop every `keepalive`.
    /// A zero interval disables the loop.
    pub async fn connect(host: &str, port: u16, keepalive: Duration) -> Result<Self, DomainError> {
        let url = format!("redis://{}:{}/", host, port);
        info!(url = %url, "Connecting to message bus");

        let client = Client::open(url.as_str()).map_err(|e| {
            error!(error = %e, "Invalid message bus address");
            DomainError::BusConnect(format!("{}: {}", url, e))
        })?;

        let publisher = ConnectionManager::new(client.clone()).await.map_err(|e| {
            error!(error = %e, "Failed to connect to message bus");
            DomainError::BusConnect(format!("{}: {}", url, e))
        })?;

        let keepalive = (!keepalive.is_zero())
            .then(|| Self::spawn_keepalive(publisher.clone(), keepalive));

        Ok(Self {
            client,
            publisher,
            keepalive,
        })
    }

    fn spawn_keepalive(mut conn: ConnectionManager, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;
            loop {
                interval.tick().await;
                let pong: redis::RedisResult<String> =
                    redis::cmd("PING").query_async(&mut conn).await;
                if let Err(e) = pong {
                    warn!(error = %e, "Message bus keepalive failed");
                }
            }
        })
    }
}

impl Drop for RedisBus {
    fn drop(&mut self) {
        if let Some(handle) = self.keepalive.take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl MessageBus for RedisBus {
    async fn publish(&self, topic: &str, payload: Bytes, qos: QoS) -> Result<(), DomainError> {
        let mut conn = self.publisher.clone();
        let receivers: i64 = conn.publish(topic, payload.as_ref()).await.map_err(|e| {
            error!(topic, error = %e, "Publish failed");
            DomainError::BusPublish(format!("{}: {}", topic, e))
        })?;

        debug!(topic, receivers, qos = ?qos, "Message published");
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<Subscription, DomainError> {
        let mut pubsub = self.client.get_async_pubsub().await.map_err(|e| {
            error!(topic, error = %e, "Failed to open subscriber connection");
            DomainError::BusConnect(format!("subscribe {}: {}", topic, e))
        })?;

        pubsub.subscribe(topic).await.map_err(|e| {
            error!(topic, error = %e, "Subscribe failed");
            DomainError::BusConnect(format!("subscribe {}: {}", topic, e))
        })?;

        let (tx, rx) = mpsc::unbounded_channel();
        let owned_topic = topic.to_string();

        tokio::spawn(async move {
            let mut stream = pubsub.into_on_message();
            while let Some(msg) = stream.next().await {
                let message = BusMessage::new(
                    msg.get_channel_name().to_string(),
                    Bytes::copy_from_slice(msg.get_payload_bytes()),
                );
                if tx.send(message).is_err() {
                    debug!(topic = %owned_topic, "Subscriber dropped, closing forwarder");
                    return;
                }
            }
            warn!(topic = %owned_topic, "Message bus subscription stream ended");
        });

        info!(topic, "Subscribed");
        Ok(Subscription::new(topic, rx))
    }
}
