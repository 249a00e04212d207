//! Dispatch loop: turns route-start events into paced position publishes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         DispatchDaemon                            │
//! │                                                                   │
//! │  InboundEvent ──► ┌────────────┐                                  │
//! │   (mpsc)          │ Admission  │──► wait for a free route slot    │
//! │                   └─────┬──────┘                                  │
//! │                         ▼  tokio::spawn (one task per event)      │
//! │                   ┌────────────────┐                              │
//! │                   │ RouteSimulator │ decode ─► load ─► expand      │
//! │                   └─────┬──────────┘                              │
//! │                         ▼                                         │
//! │                   publish, sleep(interval), publish, ... finished │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Per-route failures are logged and counted; they never stop the daemon.
//!
//! # Example
//!
//! ```ignore
//! use routesim::dispatch::{DispatchConfig, DispatchDaemon};
//!
//! let (daemon, tx) = DispatchDaemon::new(config, reader, publisher, metrics);
//! let shutdown = CancellationToken::new();
//! tokio::spawn(daemon.run(shutdown.clone()));
//!
//! tx.send(InboundEvent::new(r#"{"routeId":"1","clientId":"a"}"#)).await?;
//! ```

mod config;
mod daemon;
mod simulation;

pub use config::{
    DispatchConfig, DEFAULT_MAX_IN_FLIGHT_ROUTES, DEFAULT_OUTPUT_TOPIC, DEFAULT_PUBLISH_INTERVAL,
};
pub use daemon::DispatchDaemon;
pub use simulation::{RouteOutcome, RouteSimulator};
