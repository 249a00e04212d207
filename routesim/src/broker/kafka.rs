//! Kafka adapters built on `rdkafka`.
//!
//! - [`KafkaEventSource`] consumes route-start events and forwards them to
//!   the dispatcher channel.
//! - [`KafkaPublisher`] publishes position payloads, either fire-and-forget
//!   (queued in librdkafka) or confirmed (awaits the delivery report).

use std::time::Duration;

use futures::future::BoxFuture;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{BrokerError, DeliveryMode, InboundEvent, PositionPublisher, DEFAULT_DELIVERY_TIMEOUT};

/// Pause after a consumer error before polling again.
const CONSUME_ERROR_PAUSE: Duration = Duration::from_secs(1);

/// Connection settings shared by the Kafka consumer and producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaConfig {
    /// `bootstrap.servers`
    pub bootstrap_servers: String,
    /// Consumer `group.id`
    pub group_id: String,
    /// Topic route-start events are consumed from.
    pub consume_topic: String,
    /// Acknowledgement contract for publishes.
    pub delivery: DeliveryMode,
    /// Maximum wait for an acknowledgement in confirm mode.
    pub delivery_timeout: Duration,
}

impl KafkaConfig {
    /// Create a config with fire-and-forget delivery.
    pub fn new(
        bootstrap_servers: impl Into<String>,
        group_id: impl Into<String>,
        consume_topic: impl Into<String>,
    ) -> Self {
        Self {
            bootstrap_servers: bootstrap_servers.into(),
            group_id: group_id.into(),
            consume_topic: consume_topic.into(),
            delivery: DeliveryMode::FireAndForget,
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }

    /// Set the delivery mode.
    pub fn with_delivery(mut self, delivery: DeliveryMode) -> Self {
        self.delivery = delivery;
        self
    }

    /// Set the confirm-mode timeout.
    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    /// librdkafka settings for the producer.
    pub fn producer_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.bootstrap_servers)
            .set(
                "message.timeout.ms",
                self.delivery_timeout.as_millis().to_string(),
            );
        config
    }

    /// librdkafka settings for the consumer.
    pub fn consumer_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.bootstrap_servers)
            .set("group.id", &self.group_id)
            .set("enable.auto.commit", "true");
        config
    }
}

/// Kafka-backed [`PositionPublisher`].
pub struct KafkaPublisher {
    producer: FutureProducer,
    delivery: DeliveryMode,
    delivery_timeout: Duration,
}

impl KafkaPublisher {
    /// Create the producer.
    pub fn new(config: &KafkaConfig) -> Result<Self, BrokerError> {
        let producer: FutureProducer = config.producer_config().create()?;
        info!(
            bootstrap_servers = %config.bootstrap_servers,
            delivery = %config.delivery,
            "Kafka producer created"
        );
        Ok(Self {
            producer,
            delivery: config.delivery,
            delivery_timeout: config.delivery_timeout,
        })
    }
}

impl PositionPublisher for KafkaPublisher {
    fn publish<'a>(
        &'a self,
        topic: &'a str,
        key: &'a str,
        payload: String,
    ) -> BoxFuture<'a, Result<(), BrokerError>> {
        Box::pin(async move {
            let record = FutureRecord::to(topic).key(key).payload(&payload);

            let delivery = self
                .producer
                .send_result(record)
                .map_err(|(e, _record)| BrokerError::Enqueue(e.to_string()))?;

            match self.delivery {
                // The message stays queued in librdkafka when the future is dropped.
                DeliveryMode::FireAndForget => Ok(()),
                DeliveryMode::Confirm => {
                    match tokio::time::timeout(self.delivery_timeout, delivery).await {
                        Err(_) => Err(BrokerError::Timeout(self.delivery_timeout)),
                        Ok(Err(_canceled)) => Err(BrokerError::Closed),
                        Ok(Ok(Err((e, _message)))) => Err(BrokerError::Delivery(e.to_string())),
                        Ok(Ok(Ok(_))) => Ok(()),
                    }
                }
            }
        })
    }

    fn flush(&self, timeout: Duration) -> Result<(), BrokerError> {
        self.producer
            .flush(timeout)
            .map_err(|e| BrokerError::Delivery(e.to_string()))
    }

    fn name(&self) -> &str {
        "kafka"
    }
}

/// Consumes route-start events from Kafka.
pub struct KafkaEventSource {
    consumer: StreamConsumer,
    topic: String,
}

impl KafkaEventSource {
    /// Create the consumer and subscribe to the inbound topic.
    pub fn new(config: &KafkaConfig) -> Result<Self, BrokerError> {
        let consumer: StreamConsumer = config.consumer_config().create()?;
        consumer.subscribe(&[config.consume_topic.as_str()])?;
        info!(
            bootstrap_servers = %config.bootstrap_servers,
            group_id = %config.group_id,
            topic = %config.consume_topic,
            "Kafka consumer subscribed"
        );
        Ok(Self {
            consumer,
            topic: config.consume_topic.clone(),
        })
    }

    /// Forward consumed events to `tx` until shutdown or the receiver closes.
    pub async fn run(self, tx: mpsc::Sender<InboundEvent>, shutdown: CancellationToken) {
        loop {
            let event = tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Kafka consumer shutting down");
                    break;
                }

                received = self.consumer.recv() => match received {
                    Ok(message) => InboundEvent {
                        payload: message.payload().map(<[u8]>::to_vec).unwrap_or_default(),
                        key: message.key().map(<[u8]>::to_vec),
                        topic: message.topic().to_string(),
                    },
                    Err(e) => {
                        warn!(error = %e, topic = %self.topic, "Kafka consume error");
                        tokio::time::sleep(CONSUME_ERROR_PAUSE).await;
                        continue;
                    }
                },
            };

            debug!(payload = %event.payload_str(), "Received route event");

            if tx.send(event).await.is_err() {
                warn!("Dispatcher channel closed, stopping Kafka consumer");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kafka_config_builder() {
        let config = KafkaConfig::new("broker:9092", "sim", "route.new-direction")
            .with_delivery(DeliveryMode::Confirm)
            .with_delivery_timeout(Duration::from_millis(1500));

        assert_eq!(config.delivery, DeliveryMode::Confirm);
        assert_eq!(config.delivery_timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_client_configs() {
        let config = KafkaConfig::new("broker:9092", "sim", "route.new-direction");

        let producer = config.producer_config();
        assert_eq!(producer.get("bootstrap.servers"), Some("broker:9092"));
        assert_eq!(producer.get("message.timeout.ms"), Some("5000"));

        let consumer = config.consumer_config();
        assert_eq!(consumer.get("group.id"), Some("sim"));
        assert_eq!(consumer.get("bootstrap.servers"), Some("broker:9092"));
    }
}
