//! RouteSim CLI - Command-line interface
//!
//! Runs the route simulator service and offers helpers to inspect routes
//! and configuration.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::preview::PreviewArgs;
use commands::routes::RoutesArgs;
use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "routesim")]
#[command(version, about = "Replays recorded vehicle routes as position events", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Consume route events and publish positions until Ctrl+C
    Run(RunArgs),

    /// Print the payloads a route would publish
    Preview(PreviewArgs),

    /// List route ids in the destinations directory
    Routes(RoutesArgs),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Preview(args) => commands::preview::run(args),
        Commands::Routes(args) => commands::routes::run(args),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
