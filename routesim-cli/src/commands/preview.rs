//! `routesim preview`: print the position payloads a route would publish.
//!
//! Reads the same record and produces the same JSON as `run`, without a
//! broker. With `--paced` the lines are printed at the publish interval.

use std::time::Duration;

use clap::Args;
use routesim::app::AppConfig;
use routesim::route::{expand, Route};

use super::common::{resolve_config, ConfigArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `preview`.
#[derive(Debug, Clone, Args)]
pub struct PreviewArgs {
    /// Route id (record file name without .txt)
    pub route_id: String,

    /// Client id placed in each payload
    #[arg(long, default_value = "preview")]
    pub client_id: String,

    /// Sleep for the publish interval between lines
    #[arg(long)]
    pub paced: bool,

    /// Override the publish interval, in milliseconds
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Print the payloads for one route.
pub fn run(args: PreviewArgs) -> Result<(), CliError> {
    let mut config = resolve_config(&args.config, None)?;
    if let Some(ms) = args.interval_ms {
        config.simulation.publish_interval = Duration::from_millis(ms);
    }

    let runner = CliRunner::new(config, false, args.config.debug)?;
    runner.log_startup("preview");

    let app_config = AppConfig::from_config_file(runner.config());
    let interval = app_config.dispatch.publish_interval;
    let reader = app_config.position_reader();

    let runtime = runner.runtime()?;
    runtime.block_on(async move {
        let mut route = Route::new(args.route_id, args.client_id);
        reader.load_positions(&mut route).await?;

        for (index, payload) in expand(&route)?.into_iter().enumerate() {
            if args.paced && index > 0 {
                tokio::time::sleep(interval).await;
            }
            println!("{}", payload);
        }

        if route.is_empty() {
            eprintln!("Route '{}' has no coordinates.", route.id);
        }
        Ok::<(), CliError>(())
    })
}
