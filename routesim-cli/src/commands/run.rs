//! `routesim run`: consume route events and publish positions until Ctrl+C.

#[cfg(feature = "kafka")]
use std::time::Duration;

use clap::Args;
use routesim::telemetry::TelemetrySnapshot;

use super::common::{display_path, resolve_config, ConfigArgs, KafkaArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// How often progress is logged while running.
#[cfg(feature = "kafka")]
const TELEMETRY_INTERVAL: Duration = Duration::from_secs(30);

/// Arguments for `run`.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub kafka: KafkaArgs,

    /// Do not mirror log output to stdout
    #[arg(long)]
    pub quiet: bool,
}

/// Run the simulator service.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let config = resolve_config(&args.config, Some(&args.kafka))?;
    let runner = CliRunner::new(config, !args.quiet, args.config.debug)?;
    runner.log_startup("run");

    let settings = runner.config();
    println!("RouteSim v{}", routesim::VERSION);
    println!("  Brokers:      {}", settings.kafka.bootstrap_servers);
    println!(
        "  Topics:       {} -> {}",
        settings.kafka.consume_topic, settings.kafka.produce_topic
    );
    println!(
        "  Destinations: {}",
        display_path(&settings.simulation.destinations)
    );
    println!("  Log file:     {}", display_path(&settings.logging.file));
    println!();
    println!("Press Ctrl+C to stop.");

    let summary = serve(&runner)?;
    print_summary(&summary);
    Ok(())
}

#[cfg(feature = "kafka")]
fn serve(runner: &CliRunner) -> Result<TelemetrySnapshot, CliError> {
    use routesim::app::{AppConfig, SimulatorApp};
    use tracing::{info, warn};

    let app_config = AppConfig::from_config_file(runner.config());
    let runtime = runner.runtime()?;

    runtime.block_on(async move {
        let app = SimulatorApp::start(app_config).await?;

        let mut ticker = tokio::time::interval(TELEMETRY_INTERVAL);
        ticker.tick().await;

        loop {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        warn!(error = %e, "Failed to listen for Ctrl+C");
                    }
                    info!("Ctrl+C received");
                    break;
                }
                _ = ticker.tick() => {
                    let snapshot = app.telemetry_snapshot();
                    if snapshot.events_received > 0 || snapshot.routes_active > 0 {
                        info!(
                            uptime = %snapshot.uptime_human(),
                            routes_active = snapshot.routes_active,
                            routes_completed = snapshot.routes_completed,
                            routes_failed = snapshot.routes_failed,
                            positions_published = snapshot.positions_published,
                            publish_failures = snapshot.publish_failures,
                            "Telemetry"
                        );
                    }
                    if app.is_finished() {
                        warn!("Dispatch daemon stopped unexpectedly");
                        break;
                    }
                }
            }
        }

        println!();
        println!("Shutting down...");
        Ok::<_, CliError>(app.shutdown().await)
    })
}

#[cfg(not(feature = "kafka"))]
fn serve(_runner: &CliRunner) -> Result<TelemetrySnapshot, CliError> {
    Err(CliError::Config(
        "this build has no Kafka support; rebuild with the 'kafka' feature".to_string(),
    ))
}

fn print_summary(snapshot: &TelemetrySnapshot) {
    println!();
    println!("Session Summary");
    println!("===============");
    if snapshot.events_received == 0 {
        println!("  No route events received.");
        println!("  Uptime: {}", snapshot.uptime_human());
        return;
    }
    print!("{}", snapshot);
}
