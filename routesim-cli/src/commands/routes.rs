//! `routesim routes`: list the route ids available in the destinations directory.

use clap::Args;
use routesim::route::{DirectoryStore, RouteStore};

use super::common::{display_path, resolve_config, ConfigArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `routes`.
#[derive(Debug, Clone, Args)]
pub struct RoutesArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// List route ids, one per line.
pub fn run(args: RoutesArgs) -> Result<(), CliError> {
    let config = resolve_config(&args.config, None)?;
    let runner = CliRunner::new(config, false, args.config.debug)?;
    runner.log_startup("routes");

    let store = DirectoryStore::new(runner.config().simulation.destinations.clone());
    let runtime = runner.runtime()?;

    let routes = runtime
        .block_on(store.list_routes())
        .map_err(|error| CliError::Io {
            path: store.directory().to_path_buf(),
            error,
        })?;

    if routes.is_empty() {
        eprintln!("No routes in {}", display_path(store.directory()));
        return Ok(());
    }

    for route_id in routes {
        println!("{}", route_id);
    }
    Ok(())
}
