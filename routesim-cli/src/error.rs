//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and exit code 1.

use std::fmt;
use std::path::PathBuf;
use std::process;

use routesim::app::AppError;
use routesim::config::ConfigFileError;
use routesim::route::RouteError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Config file could not be read, parsed or written
    ConfigFile(ConfigFileError),
    /// Failed to start or run the simulator
    App(AppError),
    /// Failed to create the Tokio runtime
    Runtime(std::io::Error),
    /// A route could not be loaded or expanded
    Route(RouteError),
    /// Failed to read a directory or file
    Io { path: PathBuf, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::App(AppError::PublisherCreation(_) | AppError::ConsumerCreation(_)) => {
                eprintln!();
                eprintln!("Check that the broker is reachable:");
                eprintln!("  1. KafkaBootstrapServers (or --bootstrap-servers) points at it");
                eprintln!("  2. The consume topic exists or auto-creation is enabled");
            }
            CliError::Route(RouteError::RecordNotFound { .. }) => {
                eprintln!();
                eprintln!("Use 'routesim routes' to list the available route ids.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::App(e) => write!(f, "{}", e),
            CliError::Runtime(e) => write!(f, "Failed to create Tokio runtime: {}", e),
            CliError::Route(e) => write!(f, "{}", e),
            CliError::Io { path, error } => {
                write!(f, "Failed to read '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::App(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Route(e) => Some(e),
            CliError::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<RouteError> for CliError {
    fn from(e: RouteError) -> Self {
        CliError::Route(e)
    }
}
