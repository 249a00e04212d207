//! INI parsing: maps `config.ini` keys onto [`ConfigFile`] fields.

use std::path::PathBuf;
use std::time::Duration;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [kafka] section
    if let Some(section) = ini.section(Some("kafka")) {
        if let Some(v) = non_empty(section.get("bootstrap_servers")) {
            config.kafka.bootstrap_servers = v.to_string();
        }
        if let Some(v) = non_empty(section.get("consume_topic")) {
            config.kafka.consume_topic = v.to_string();
        }
        if let Some(v) = non_empty(section.get("produce_topic")) {
            config.kafka.produce_topic = v.to_string();
        }
        if let Some(v) = non_empty(section.get("group_id")) {
            config.kafka.group_id = v.to_string();
        }
        if let Some(v) = section.get("delivery") {
            config.kafka.delivery = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "kafka".to_string(),
                key: "delivery".to_string(),
                value: v.to_string(),
                reason: "must be 'fire_and_forget' or 'confirm'".to_string(),
            })?;
        }
        if let Some(v) = section.get("delivery_timeout_ms") {
            config.kafka.delivery_timeout = parse_millis(v, "kafka", "delivery_timeout_ms")?;
        }
    }

    // [simulation] section
    if let Some(section) = ini.section(Some("simulation")) {
        if let Some(v) = non_empty(section.get("destinations")) {
            config.simulation.destinations = expand_tilde(v);
        }
        if let Some(v) = section.get("publish_interval_ms") {
            config.simulation.publish_interval =
                parse_millis(v, "simulation", "publish_interval_ms")?;
        }
        if let Some(v) = section.get("max_in_flight_routes") {
            config.simulation.max_in_flight_routes =
                v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "simulation".to_string(),
                    key: "max_in_flight_routes".to_string(),
                    value: v.to_string(),
                    reason: "must be a non-negative integer (0 = unbounded)".to_string(),
                })?;
        }
        if let Some(v) = section.get("parse_mode") {
            config.simulation.parse_mode =
                v.parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "simulation".to_string(),
                    key: "parse_mode".to_string(),
                    value: v.to_string(),
                    reason: "must be 'lenient' or 'strict'".to_string(),
                })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section.get("file")) {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_millis(value: &str, section: &str, key: &str) -> Result<Duration, ConfigFileError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be a non-negative integer (milliseconds)".to_string(),
        })
}

/// Expand a leading `~` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None if path == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::DeliveryMode;
    use crate::route::ParseMode;

    fn parse(text: &str) -> Result<ConfigFile, ConfigFileError> {
        parse_ini(&Ini::load_from_str(text).unwrap())
    }

    #[test]
    fn test_empty_ini_gives_defaults() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_overlays_values() {
        let config = parse(
            "[kafka]\n\
             bootstrap_servers = broker:29092\n\
             consume_topic = in\n\
             produce_topic = out\n\
             group_id = sim\n\
             delivery = confirm\n\
             delivery_timeout_ms = 2500\n\
             [simulation]\n\
             destinations = /srv/routes\n\
             publish_interval_ms = 100\n\
             max_in_flight_routes = 0\n\
             parse_mode = strict\n\
             [logging]\n\
             file = /var/log/routesim.log\n",
        )
        .unwrap();

        assert_eq!(config.kafka.bootstrap_servers, "broker:29092");
        assert_eq!(config.kafka.consume_topic, "in");
        assert_eq!(config.kafka.produce_topic, "out");
        assert_eq!(config.kafka.group_id, "sim");
        assert_eq!(config.kafka.delivery, DeliveryMode::Confirm);
        assert_eq!(config.kafka.delivery_timeout, Duration::from_millis(2500));
        assert_eq!(config.simulation.destinations, PathBuf::from("/srv/routes"));
        assert_eq!(config.simulation.publish_interval, Duration::from_millis(100));
        assert_eq!(config.simulation.max_in_flight_routes, 0);
        assert_eq!(config.simulation.parse_mode, ParseMode::Strict);
        assert_eq!(config.logging.file, PathBuf::from("/var/log/routesim.log"));
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = parse("[kafka]\nbootstrap_servers =\n").unwrap();
        assert_eq!(
            config.kafka.bootstrap_servers,
            ConfigFile::default().kafka.bootstrap_servers
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for text in [
            "[kafka]\ndelivery = sometimes\n",
            "[kafka]\ndelivery_timeout_ms = soon\n",
            "[simulation]\npublish_interval_ms = -5\n",
            "[simulation]\nmax_in_flight_routes = lots\n",
            "[simulation]\nparse_mode = picky\n",
        ] {
            assert!(
                matches!(parse(text), Err(ConfigFileError::InvalidValue { .. })),
                "accepted: {}",
                text
            );
        }
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("relative"), PathBuf::from("relative"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/routes"), home.join("routes"));
        }
    }
}
