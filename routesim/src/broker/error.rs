//! Broker error types.

use std::time::Duration;

use thiserror::Error;

/// Errors raised by broker clients.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Client construction or subscription failed.
    #[error("Broker client error: {0}")]
    Client(String),

    /// The message could not be queued for sending.
    #[error("Failed to enqueue message: {0}")]
    Enqueue(String),

    /// The broker rejected or failed to deliver the message.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// No delivery acknowledgement within the configured timeout.
    #[error("Delivery not acknowledged within {0:?}")]
    Timeout(Duration),

    /// The client was shut down before the operation completed.
    #[error("Broker client is closed")]
    Closed,
}

#[cfg(feature = "kafka")]
impl From<rdkafka::error::KafkaError> for BrokerError {
    fn from(e: rdkafka::error::KafkaError) -> Self {
        BrokerError::Client(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broker_error_display() {
        assert_eq!(
            BrokerError::Enqueue("queue full".to_string()).to_string(),
            "Failed to enqueue message: queue full"
        );
        assert_eq!(
            BrokerError::Timeout(Duration::from_millis(250)).to_string(),
            "Delivery not acknowledged within 250ms"
        );
        assert_eq!(BrokerError::Closed.to_string(), "Broker client is closed");
    }
}
