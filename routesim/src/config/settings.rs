//! Settings structs and their defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::broker::{DeliveryMode, DEFAULT_DELIVERY_TIMEOUT};
use crate::dispatch::{
    DEFAULT_MAX_IN_FLIGHT_ROUTES, DEFAULT_OUTPUT_TOPIC, DEFAULT_PUBLISH_INTERVAL,
};
use crate::route::{ParseMode, DEFAULT_DESTINATIONS_DIR};

/// Default Kafka bootstrap servers.
pub const DEFAULT_BOOTSTRAP_SERVERS: &str = "localhost:9092";

/// Default topic route-start events are consumed from.
pub const DEFAULT_CONSUME_TOPIC: &str = "route.new-direction";

/// Default consumer group.
pub const DEFAULT_GROUP_ID: &str = "route-simulator";

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "routesim.log";

/// Complete configuration as loaded from `config.ini` and the environment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub kafka: KafkaSettings,
    pub simulation: SimulationSettings,
    pub logging: LoggingSettings,
}

/// `[kafka]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct KafkaSettings {
    pub bootstrap_servers: String,
    pub consume_topic: String,
    pub produce_topic: String,
    pub group_id: String,
    pub delivery: DeliveryMode,
    pub delivery_timeout: Duration,
}

impl Default for KafkaSettings {
    fn default() -> Self {
        Self {
            bootstrap_servers: DEFAULT_BOOTSTRAP_SERVERS.to_string(),
            consume_topic: DEFAULT_CONSUME_TOPIC.to_string(),
            produce_topic: DEFAULT_OUTPUT_TOPIC.to_string(),
            group_id: DEFAULT_GROUP_ID.to_string(),
            delivery: DeliveryMode::default(),
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }
}

/// `[simulation]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    /// Directory holding `<routeId>.txt` coordinate records.
    pub destinations: PathBuf,
    pub publish_interval: Duration,
    /// `0` means unbounded.
    pub max_in_flight_routes: usize,
    pub parse_mode: ParseMode,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            destinations: PathBuf::from(DEFAULT_DESTINATIONS_DIR),
            publish_interval: DEFAULT_PUBLISH_INTERVAL,
            max_in_flight_routes: DEFAULT_MAX_IN_FLIGHT_ROUTES,
            parse_mode: ParseMode::default(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: super::file::config_directory().join(DEFAULT_LOG_FILE_NAME),
        }
    }
}
