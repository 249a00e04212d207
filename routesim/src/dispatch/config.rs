//! Dispatch loop configuration.

use std::time::Duration;

use crate::broker::DEFAULT_INBOUND_CHANNEL_CAPACITY;

/// Default topic positions are published to.
pub const DEFAULT_OUTPUT_TOPIC: &str = "route.new-position";

/// Default delay between two positions of the same route.
pub const DEFAULT_PUBLISH_INTERVAL: Duration = Duration::from_millis(500);

/// Default number of routes simulated at once.
pub const DEFAULT_MAX_IN_FLIGHT_ROUTES: usize = 256;

/// Configuration for the dispatch daemon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Topic positions are published to.
    pub output_topic: String,

    /// Delay between successive publishes of one route.
    pub publish_interval: Duration,

    /// Maximum routes simulated concurrently; `0` means unbounded.
    pub max_in_flight_routes: usize,

    /// Inbound channel capacity.
    pub channel_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            output_topic: DEFAULT_OUTPUT_TOPIC.to_string(),
            publish_interval: DEFAULT_PUBLISH_INTERVAL,
            max_in_flight_routes: DEFAULT_MAX_IN_FLIGHT_ROUTES,
            channel_capacity: DEFAULT_INBOUND_CHANNEL_CAPACITY,
        }
    }
}

impl DispatchConfig {
    /// Create a config publishing to `output_topic` with default pacing.
    pub fn new(output_topic: impl Into<String>) -> Self {
        Self {
            output_topic: output_topic.into(),
            ..Self::default()
        }
    }

    /// Set the delay between publishes.
    pub fn with_publish_interval(mut self, interval: Duration) -> Self {
        self.publish_interval = interval;
        self
    }

    /// Set the admission limit (`0` = unbounded).
    pub fn with_max_in_flight_routes(mut self, max: usize) -> Self {
        self.max_in_flight_routes = max;
        self
    }

    /// Set the inbound channel capacity (at least 1).
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}
