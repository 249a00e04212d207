//! Environment overlay.
//!
//! Four variables override the Kafka settings. They are read from an
//! optional `.env` file and from the process environment; the process
//! environment wins when both define a key.

use std::collections::HashMap;
use std::path::Path;

use ini::Ini;
use tracing::debug;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Bootstrap servers.
pub const ENV_BOOTSTRAP_SERVERS: &str = "KafkaBootstrapServers";
/// Topic route-start events are consumed from.
pub const ENV_READ_TOPIC: &str = "KafkaReadTopic";
/// Topic positions are published to.
pub const ENV_PRODUCE_TOPIC: &str = "KafkaProduceTopic";
/// Consumer group.
pub const ENV_CONSUMER_GROUP_ID: &str = "KafkaConsumerGroupId";

/// Default `.env` file name, looked up in the working directory.
pub const DOTENV_FILE: &str = ".env";

/// Overlay environment values onto `config` using `lookup`.
///
/// Empty values are ignored.
pub fn apply_env<F>(config: &mut ConfigFile, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get(ENV_BOOTSTRAP_SERVERS) {
        config.kafka.bootstrap_servers = v;
    }
    if let Some(v) = get(ENV_READ_TOPIC) {
        config.kafka.consume_topic = v;
    }
    if let Some(v) = get(ENV_PRODUCE_TOPIC) {
        config.kafka.produce_topic = v;
    }
    if let Some(v) = get(ENV_CONSUMER_GROUP_ID) {
        config.kafka.group_id = v;
    }
}

/// Read `KEY=value` pairs from a `.env` file.
///
/// A missing file yields an empty map.
pub fn load_dotenv(path: &Path) -> Result<HashMap<String, String>, ConfigFileError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let ini = Ini::load_from_file(path)?;
    let values: HashMap<String, String> = ini
        .general_section()
        .iter()
        .map(|(k, v)| (k.to_string(), v.trim().to_string()))
        .collect();

    debug!(path = %path.display(), keys = values.len(), "Loaded .env file");
    Ok(values)
}

/// Apply the `.env` file at `dotenv` (if any) and then the process environment.
pub fn apply_environment(
    config: &mut ConfigFile,
    dotenv: Option<&Path>,
) -> Result<(), ConfigFileError> {
    let file_values = match dotenv {
        Some(path) => load_dotenv(path)?,
        None => HashMap::new(),
    };

    apply_env(config, |key| {
        std::env::var(key)
            .ok()
            .or_else(|| file_values.get(key).cloned())
    });
    Ok(())
}
