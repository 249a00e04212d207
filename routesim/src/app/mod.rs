//! Application bootstrap and lifecycle management.
//!
//! `SimulatorApp` starts the pieces in order and stops them in reverse:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        SimulatorApp                           │
//! │                                                               │
//! │  1. Publisher (Kafka producer or in-memory)                   │
//! │  2. DispatchDaemon ◄──── mpsc ──── 3. KafkaEventSource        │
//! │                                                               │
//! │  shutdown: cancel token ─► join tasks ─► flush publisher      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use routesim::app::{AppConfig, SimulatorApp};
//! use routesim::config::ConfigFile;
//!
//! let config = AppConfig::from_config_file(&ConfigFile::load()?);
//! let app = SimulatorApp::start(config).await?;
//! // ...
//! app.shutdown().await;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::SimulatorApp;
pub use config::{AppConfig, BrokerAppConfig};
pub use error::AppError;
