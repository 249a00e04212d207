//! Application error types.

use std::fmt;

use crate::broker::BrokerError;

/// Errors that can occur during application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// Failed to create the position publisher.
    PublisherCreation(BrokerError),

    /// Failed to create or subscribe the event consumer.
    ConsumerCreation(BrokerError),

    /// Configuration error.
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::PublisherCreation(e) => {
                write!(f, "Failed to create position publisher: {}", e)
            }
            AppError::ConsumerCreation(e) => {
                write!(f, "Failed to create event consumer: {}", e)
            }
            AppError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::PublisherCreation(e) => Some(e),
            AppError::ConsumerCreation(e) => Some(e),
            AppError::Config(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_and_source() {
        let err = AppError::PublisherCreation(BrokerError::Client("no brokers".to_string()));
        assert!(err.to_string().starts_with("Failed to create position publisher"));
        assert!(err.source().is_some());

        let err = AppError::Config("produce topic must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: produce topic must not be empty"
        );
        assert!(err.source().is_none());
    }
}
