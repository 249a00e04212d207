//! CLI runner for common setup.
//!
//! Owns the logging guard and the resolved configuration for the lifetime
//! of a command.

use tokio::runtime::Runtime;
use tracing::info;

use routesim::config::ConfigFile;
use routesim::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Resolved configuration
    config: ConfigFile,
}

impl CliRunner {
    /// Initialize logging to the configured file.
    ///
    /// # Arguments
    ///
    /// * `config` - Resolved configuration (file, environment, flags)
    /// * `stdout` - Also log to stdout
    /// * `debug` - Force debug-level logging regardless of RUST_LOG
    pub fn new(config: ConfigFile, stdout: bool, debug: bool) -> Result<Self, CliError> {
        let logging_guard = init_logging(&config.logging.file, stdout, debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the resolved configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("RouteSim v{}", routesim::VERSION);
        info!(log_file = %self.config.logging.file.display(), "RouteSim CLI: {} command", command);
    }

    /// Create the multi-threaded runtime used by async commands.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)
    }
}
