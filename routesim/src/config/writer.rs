//! INI serialization for `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[kafka]
; Comma-separated broker list
bootstrap_servers = {}
; Topic route-start events are consumed from
consume_topic = {}
; Topic positions are published to
produce_topic = {}
group_id = {}
; fire_and_forget - return once the client has queued the message
; confirm         - wait for the broker acknowledgement
delivery = {}
delivery_timeout_ms = {}

[simulation]
; Directory holding <routeId>.txt coordinate records
destinations = {}
; Delay between two positions of the same route
publish_interval_ms = {}
; Routes simulated at once (0 = unbounded)
max_in_flight_routes = {}
; lenient - stop at the first malformed line, keep what was read
; strict  - fail the whole route on a malformed line
parse_mode = {}

[logging]
file = {}
"#,
        config.kafka.bootstrap_servers,
        config.kafka.consume_topic,
        config.kafka.produce_topic,
        config.kafka.group_id,
        config.kafka.delivery,
        config.kafka.delivery_timeout.as_millis(),
        path_to_string(&config.simulation.destinations),
        config.simulation.publish_interval.as_millis(),
        config.simulation.max_in_flight_routes,
        config.simulation.parse_mode,
        path_to_string(&config.logging.file),
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
