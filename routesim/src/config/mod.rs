//! User configuration.
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. Built-in defaults ([`ConfigFile::default`])
//! 2. `~/.routesim/config.ini` (or an explicit path)
//! 3. `.env` in the working directory
//! 4. Process environment
//!
//! Command-line flags are applied on top by the CLI.
//!
//! # Example
//!
//! ```ignore
//! use routesim::config::{apply_environment, ConfigFile, DOTENV_FILE};
//! use std::path::Path;
//!
//! let mut config = ConfigFile::load()?;
//! apply_environment(&mut config, Some(Path::new(DOTENV_FILE)))?;
//! ```

mod env;
mod file;
mod parser;
mod settings;
mod writer;

pub use env::{
    apply_env, apply_environment, load_dotenv, DOTENV_FILE, ENV_BOOTSTRAP_SERVERS,
    ENV_CONSUMER_GROUP_ID, ENV_PRODUCE_TOPIC, ENV_READ_TOPIC,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, KafkaSettings, LoggingSettings, SimulationSettings, DEFAULT_BOOTSTRAP_SERVERS,
    DEFAULT_CONSUME_TOPIC, DEFAULT_GROUP_ID, DEFAULT_LOG_FILE_NAME,
};
