//! RouteSim - vehicle route position simulator
//!
//! Consumes "route started" events from a message broker, loads the route's
//! coordinates from a per-route text file and publishes one position message
//! per coordinate, paced at a fixed interval, with the last one flagged as
//! finished.
//!
//! - [`route`]: coordinate records, parsing and payload expansion
//! - [`broker`]: publisher trait, Kafka adapters and an in-memory publisher
//! - [`dispatch`]: the receive loop and per-route simulation tasks
//! - [`app`]: service bootstrap and shutdown
//! - [`config`], [`logging`], [`telemetry`]: ambient support

pub mod app;
pub mod broker;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod route;
pub mod telemetry;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
