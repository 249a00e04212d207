//! Configuration management CLI commands.
//!
//! Provides `config show`, `config path` and `config init`.

use std::path::PathBuf;

use clap::Subcommand;
use routesim::config::{config_file_path, ConfigFile};

use super::common::{resolve_config, ConfigArgs};
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration (file, environment and flags applied)
    Show {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Show the configuration file path
    Path,

    /// Write a config file with default values
    Init {
        /// Target path (default: ~/.routesim/config.ini)
        #[arg(long, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show { config } => run_show(&config),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Init { path, force } => run_init(path, force),
    }
}

fn run_show(args: &ConfigArgs) -> Result<(), CliError> {
    let config = resolve_config(args, None)?;
    print!("{}", config.to_config_string());
    Ok(())
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

fn run_init(path: Option<PathBuf>, force: bool) -> Result<(), CliError> {
    let path = path.unwrap_or_else(config_file_path);
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }

    ConfigFile::default().save_to(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
