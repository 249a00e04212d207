//! Message broker seam.
//!
//! The dispatch loop only depends on [`PositionPublisher`] and receives
//! [`InboundEvent`]s over a channel, so the broker client is replaceable:
//!
//! ```text
//! KafkaEventSource ──► mpsc<InboundEvent> ──► DispatchDaemon ──► dyn PositionPublisher
//!   (route starts)                                                 ├── KafkaPublisher
//!                                                                  └── MemoryPublisher
//! ```
//!
//! The Kafka adapters live behind the `kafka` feature (enabled by default).

mod error;
#[cfg(feature = "kafka")]
mod kafka;
mod memory;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use futures::future::BoxFuture;

pub use error::BrokerError;
#[cfg(feature = "kafka")]
pub use kafka::{KafkaConfig, KafkaEventSource, KafkaPublisher};
pub use memory::{MemoryPublisher, PublishedMessage};

/// Default channel capacity between the event source and the dispatcher.
pub const DEFAULT_INBOUND_CHANNEL_CAPACITY: usize = 1000;

/// Default time to wait for a delivery acknowledgement in confirm mode.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// A raw event received from the inbound topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Message body.
    pub payload: Vec<u8>,
    /// Message key, if any.
    pub key: Option<Vec<u8>>,
    /// Topic the event was consumed from.
    pub topic: String,
}

impl InboundEvent {
    /// Create an event with the given body and no key.
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            key: None,
            topic: String::new(),
        }
    }

    /// Set the source topic.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Body as lossy UTF-8, for logging.
    pub fn payload_str(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Whether a publish waits for the broker to acknowledge the message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Return once the message is queued by the client.
    #[default]
    FireAndForget,
    /// Wait for the broker acknowledgement (bounded by a timeout).
    Confirm,
}

impl FromStr for DeliveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "fire_and_forget" => Ok(DeliveryMode::FireAndForget),
            "confirm" => Ok(DeliveryMode::Confirm),
            other => Err(format!("unknown delivery mode '{}'", other)),
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::FireAndForget => write!(f, "fire_and_forget"),
            DeliveryMode::Confirm => write!(f, "confirm"),
        }
    }
}

/// Publishes serialized position payloads to a topic.
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// route task.
pub trait PositionPublisher: Send + Sync {
    /// Publish one payload. `key` is the route id.
    fn publish<'a>(
        &'a self,
        topic: &'a str,
        key: &'a str,
        payload: String,
    ) -> BoxFuture<'a, Result<(), BrokerError>>;

    /// Block until queued messages are delivered or `timeout` expires.
    fn flush(&self, _timeout: Duration) -> Result<(), BrokerError> {
        Ok(())
    }

    /// Short name for logs.
    fn name(&self) -> &str;
}
