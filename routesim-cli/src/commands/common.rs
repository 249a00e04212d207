//! Common arguments and config resolution shared across CLI commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use routesim::broker::DeliveryMode;
use routesim::config::{apply_environment, config_file_path, ConfigFile, DOTENV_FILE};
use routesim::route::ParseMode;

use crate::error::CliError;

/// Where configuration comes from and how routes are read.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Config file (default: ~/.routesim/config.ini)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Environment file read before the process environment
    #[arg(long, value_name = "PATH", default_value = DOTENV_FILE)]
    pub env_file: PathBuf,

    /// Directory holding <routeId>.txt coordinate records
    #[arg(long, value_name = "DIR")]
    pub destinations: Option<PathBuf>,

    /// Fail a route on its first malformed record line
    #[arg(long)]
    pub strict: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Broker and pacing overrides for `run`.
#[derive(Debug, Clone, Default, Args)]
pub struct KafkaArgs {
    /// Kafka bootstrap servers
    #[arg(long, value_name = "HOSTS")]
    pub bootstrap_servers: Option<String>,

    /// Topic route-start events are consumed from
    #[arg(long, value_name = "TOPIC")]
    pub consume_topic: Option<String>,

    /// Topic positions are published to
    #[arg(long, value_name = "TOPIC")]
    pub produce_topic: Option<String>,

    /// Kafka consumer group
    #[arg(long, value_name = "GROUP")]
    pub group_id: Option<String>,

    /// Delay between two positions of one route, in milliseconds
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Routes simulated at once (0 = unbounded)
    #[arg(long, value_name = "N")]
    pub max_routes: Option<usize>,

    /// Wait for the broker to acknowledge each position
    #[arg(long)]
    pub confirm_delivery: bool,
}

/// Load configuration: defaults, config file, `.env`, process environment,
/// then command-line flags.
pub fn resolve_config(
    args: &ConfigArgs,
    kafka: Option<&KafkaArgs>,
) -> Result<ConfigFile, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "config file '{}' does not exist",
                    path.display()
                )));
            }
            ConfigFile::load_from(path)?
        }
        None => ConfigFile::load_from(&config_file_path())?,
    };

    apply_environment(&mut config, Some(args.env_file.as_path()))?;
    apply_config_args(&mut config, args);
    if let Some(kafka) = kafka {
        apply_kafka_args(&mut config, kafka);
    }

    Ok(config)
}

fn apply_config_args(config: &mut ConfigFile, args: &ConfigArgs) {
    if let Some(dir) = &args.destinations {
        config.simulation.destinations = dir.clone();
    }
    if args.strict {
        config.simulation.parse_mode = ParseMode::Strict;
    }
}

fn apply_kafka_args(config: &mut ConfigFile, args: &KafkaArgs) {
    if let Some(v) = &args.bootstrap_servers {
        config.kafka.bootstrap_servers = v.clone();
    }
    if let Some(v) = &args.consume_topic {
        config.kafka.consume_topic = v.clone();
    }
    if let Some(v) = &args.produce_topic {
        config.kafka.produce_topic = v.clone();
    }
    if let Some(v) = &args.group_id {
        config.kafka.group_id = v.clone();
    }
    if let Some(ms) = args.interval_ms {
        config.simulation.publish_interval = Duration::from_millis(ms);
    }
    if let Some(n) = args.max_routes {
        config.simulation.max_in_flight_routes = n;
    }
    if args.confirm_delivery {
        config.kafka.delivery = DeliveryMode::Confirm;
    }
}

/// Display a path relative to the working directory when possible.
pub fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args_in(dir: &TempDir) -> ConfigArgs {
        ConfigArgs {
            config: Some(dir.path().join("config.ini")),
            env_file: dir.path().join(".env"),
            ..ConfigArgs::default()
        }
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let args = args_in(&dir);
        assert!(matches!(
            resolve_config(&args, None),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_flags_override_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.ini"),
            "[kafka]\nproduce_topic = from-file\n[simulation]\npublish_interval_ms = 100\n",
        )
        .unwrap();

        let mut args = args_in(&dir);
        args.destinations = Some(PathBuf::from("/tmp/routes"));
        args.strict = true;
        let kafka = KafkaArgs {
            produce_topic: Some("from-flag".to_string()),
            max_routes: Some(3),
            confirm_delivery: true,
            ..KafkaArgs::default()
        };

        let config = resolve_config(&args, Some(&kafka)).unwrap();
        assert_eq!(config.kafka.produce_topic, "from-flag");
        assert_eq!(config.kafka.delivery, DeliveryMode::Confirm);
        assert_eq!(config.simulation.publish_interval, Duration::from_millis(100));
        assert_eq!(config.simulation.max_in_flight_routes, 3);
        assert_eq!(config.simulation.parse_mode, ParseMode::Strict);
        assert_eq!(config.simulation.destinations, PathBuf::from("/tmp/routes"));
    }
}
