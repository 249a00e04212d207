//! In-memory publisher.
//!
//! Records every publish with the (tokio) instant it happened, so pacing
//! can be checked under a paused clock. Selected publish attempts can be
//! made to fail.

use std::collections::HashSet;
use std::sync::Mutex;

use futures::future::BoxFuture;
use tokio::time::Instant;

use super::{BrokerError, PositionPublisher};

/// A message accepted by [`MemoryPublisher`].
#[derive(Debug, Clone)]
pub struct PublishedMessage {
    pub topic: String,
    pub key: String,
    pub payload: String,
    pub published_at: Instant,
}

#[derive(Debug, Default)]
struct State {
    messages: Vec<PublishedMessage>,
    attempts: usize,
}

/// Publisher that keeps messages in memory.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    state: Mutex<State>,
    /// Zero-based publish attempts that fail with `Delivery`.
    failing_attempts: HashSet<usize>,
}

impl MemoryPublisher {
    /// Create a publisher that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the given zero-based publish attempts fail.
    pub fn failing_on(attempts: impl IntoIterator<Item = usize>) -> Self {
        Self {
            state: Mutex::default(),
            failing_attempts: attempts.into_iter().collect(),
        }
    }

    /// Copy of all accepted messages, in publish order.
    pub fn messages(&self) -> Vec<PublishedMessage> {
        self.lock().messages.clone()
    }

    /// Accepted messages with the given key, in publish order.
    pub fn messages_for(&self, key: &str) -> Vec<PublishedMessage> {
        self.lock()
            .messages
            .iter()
            .filter(|m| m.key == key)
            .cloned()
            .collect()
    }

    /// Number of publish calls, including failed ones.
    pub fn attempts(&self) -> usize {
        self.lock().attempts
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned lock only means a test panicked mid-publish.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PositionPublisher for MemoryPublisher {
    fn publish<'a>(
        &'a self,
        topic: &'a str,
        key: &'a str,
        payload: String,
    ) -> BoxFuture<'a, Result<(), BrokerError>> {
        let result = {
            let mut state = self.lock();
            let attempt = state.attempts;
            state.attempts += 1;

            if self.failing_attempts.contains(&attempt) {
                Err(BrokerError::Delivery(format!(
                    "injected failure on attempt {}",
                    attempt
                )))
            } else {
                state.messages.push(PublishedMessage {
                    topic: topic.to_string(),
                    key: key.to_string(),
                    payload,
                    published_at: Instant::now(),
                });
                Ok(())
            }
        };
        Box::pin(async move { result })
    }

    fn name(&self) -> &str {
        "memory"
    }
}
