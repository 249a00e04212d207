//! Application configuration for `SimulatorApp`.
//!
//! `AppConfig` gathers everything needed to bootstrap the simulator and is
//! passed explicitly; nothing is read from globals after startup.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::broker::{DeliveryMode, DEFAULT_DELIVERY_TIMEOUT};
use crate::config::{
    ConfigFile, DEFAULT_BOOTSTRAP_SERVERS, DEFAULT_CONSUME_TOPIC, DEFAULT_GROUP_ID,
};
use crate::dispatch::DispatchConfig;
use crate::route::{DirectoryStore, ParseMode, PositionReader, DEFAULT_DESTINATIONS_DIR};

/// Broker connection settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrokerAppConfig {
    pub bootstrap_servers: String,
    pub consume_topic: String,
    pub group_id: String,
    pub delivery: DeliveryMode,
    pub delivery_timeout: Duration,
}

impl Default for BrokerAppConfig {
    fn default() -> Self {
        Self {
            bootstrap_servers: DEFAULT_BOOTSTRAP_SERVERS.to_string(),
            consume_topic: DEFAULT_CONSUME_TOPIC.to_string(),
            group_id: DEFAULT_GROUP_ID.to_string(),
            delivery: DeliveryMode::default(),
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }
}

/// Application configuration combining all component configs.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Dispatch loop settings (output topic, pacing, admission limit).
    pub dispatch: DispatchConfig,

    /// Directory holding `<routeId>.txt` coordinate records.
    pub destinations: PathBuf,

    /// Handling of malformed record lines.
    pub parse_mode: ParseMode,

    /// Broker connection settings.
    pub broker: BrokerAppConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dispatch: DispatchConfig::default(),
            destinations: PathBuf::from(DEFAULT_DESTINATIONS_DIR),
            parse_mode: ParseMode::default(),
            broker: BrokerAppConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create application config from the loaded configuration file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            dispatch: DispatchConfig::new(config.kafka.produce_topic.clone())
                .with_publish_interval(config.simulation.publish_interval)
                .with_max_in_flight_routes(config.simulation.max_in_flight_routes),
            destinations: config.simulation.destinations.clone(),
            parse_mode: config.simulation.parse_mode,
            broker: BrokerAppConfig {
                bootstrap_servers: config.kafka.bootstrap_servers.clone(),
                consume_topic: config.kafka.consume_topic.clone(),
                group_id: config.kafka.group_id.clone(),
                delivery: config.kafka.delivery,
                delivery_timeout: config.kafka.delivery_timeout,
            },
        }
    }

    /// Set the destinations directory.
    pub fn with_destinations(mut self, destinations: impl Into<PathBuf>) -> Self {
        self.destinations = destinations.into();
        self
    }

    /// Set the record parse mode.
    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }

    /// Set the dispatch config.
    pub fn with_dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Reader over the destinations directory.
    pub fn position_reader(&self) -> PositionReader {
        PositionReader::new(
            Arc::new(DirectoryStore::new(self.destinations.clone())),
            self.parse_mode,
        )
    }

    /// Check settings that would make every route fail.
    pub fn validate(&self) -> Result<(), String> {
        if self.dispatch.output_topic.trim().is_empty() {
            return Err("produce topic must not be empty".to_string());
        }
        if self.broker.consume_topic.trim().is_empty() {
            return Err("consume topic must not be empty".to_string());
        }
        if self.broker.bootstrap_servers.trim().is_empty() {
            return Err("bootstrap servers must not be empty".to_string());
        }
        Ok(())
    }

    /// Kafka client settings.
    #[cfg(feature = "kafka")]
    pub fn kafka_config(&self) -> crate::broker::KafkaConfig {
        crate::broker::KafkaConfig::new(
            self.broker.bootstrap_servers.clone(),
            self.broker.group_id.clone(),
            self.broker.consume_topic.clone(),
        )
        .with_delivery(self.broker.delivery)
        .with_delivery_timeout(self.broker.delivery_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_file() {
        let mut file = ConfigFile::default();
        file.kafka.produce_topic = "positions".to_string();
        file.kafka.consume_topic = "directions".to_string();
        file.kafka.delivery = DeliveryMode::Confirm;
        file.simulation.destinations = PathBuf::from("/srv/routes");
        file.simulation.publish_interval = Duration::from_millis(250);
        file.simulation.max_in_flight_routes = 4;
        file.simulation.parse_mode = ParseMode::Strict;

        let config = AppConfig::from_config_file(&file);

        assert_eq!(config.dispatch.output_topic, "positions");
        assert_eq!(config.dispatch.publish_interval, Duration::from_millis(250));
        assert_eq!(config.dispatch.max_in_flight_routes, 4);
        assert_eq!(config.destinations, PathBuf::from("/srv/routes"));
        assert_eq!(config.parse_mode, ParseMode::Strict);
        assert_eq!(config.broker.consume_topic, "directions");
        assert_eq!(config.broker.delivery, DeliveryMode::Confirm);
    }

    #[test]
    fn test_defaults_match_config_file_defaults() {
        assert_eq!(
            AppConfig::from_config_file(&ConfigFile::default()),
            AppConfig::default()
        );
    }

    #[test]
    fn test_validate() {
        assert!(AppConfig::default().validate().is_ok());

        let config = AppConfig::default().with_dispatch(DispatchConfig::new(" "));
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.broker.bootstrap_servers.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_position_reader_uses_parse_mode() {
        let config = AppConfig::default().with_parse_mode(ParseMode::Strict);
        assert_eq!(config.position_reader().mode(), ParseMode::Strict);
    }

    #[cfg(feature = "kafka")]
    #[test]
    fn test_kafka_config() {
        let mut config = AppConfig::default();
        config.broker.group_id = "fleet".to_string();
        let kafka = config.kafka_config();
        assert_eq!(kafka.group_id, "fleet");
        assert_eq!(kafka.consume_topic, DEFAULT_CONSUME_TOPIC);
    }
}
