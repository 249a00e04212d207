//! Application bootstrap implementation.
//!
//! `SimulatorApp` wires the dispatch daemon to a publisher and, with Kafka,
//! to a consumer task. It owns the shutdown token and the task handles so
//! the whole service stops in one place.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::config::AppConfig;
#[cfg(feature = "kafka")]
use super::error::AppError;
use crate::broker::{InboundEvent, PositionPublisher};
use crate::dispatch::DispatchDaemon;
use crate::telemetry::{DispatchMetrics, TelemetrySnapshot};

/// Upper bound on flushing queued messages at shutdown.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Route simulator service with lifecycle management.
///
/// # Example
///
/// ```ignore
/// use routesim::app::{AppConfig, SimulatorApp};
///
/// let app = SimulatorApp::start(AppConfig::default()).await?;
/// tokio::signal::ctrl_c().await?;
/// let summary = app.shutdown().await;
/// println!("{}", summary);
/// ```
pub struct SimulatorApp {
    /// Shared publisher, flushed on shutdown.
    publisher: Arc<dyn PositionPublisher>,

    /// Counters updated by the daemon and route tasks.
    metrics: Arc<DispatchMetrics>,

    /// Cancels the consumer, the daemon and every in-flight route.
    shutdown: CancellationToken,

    /// Background tasks (daemon first, then event sources).
    tasks: Vec<JoinHandle<()>>,

    /// Application configuration (retained for accessors).
    config: AppConfig,
}

impl SimulatorApp {
    /// Start the service against Kafka.
    ///
    /// Creates the producer and the consumer, then spawns the dispatch
    /// daemon and the consumer task on the current runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or a Kafka client cannot
    /// be created.
    #[cfg(feature = "kafka")]
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        use crate::broker::{KafkaEventSource, KafkaPublisher};

        config.validate().map_err(AppError::Config)?;
        info!("Starting route simulator");

        let kafka = config.kafka_config();
        let publisher = KafkaPublisher::new(&kafka).map_err(AppError::PublisherCreation)?;
        let source = KafkaEventSource::new(&kafka).map_err(AppError::ConsumerCreation)?;

        let (mut app, tx) = Self::with_publisher(config, Arc::new(publisher));

        let shutdown = app.shutdown.clone();
        app.tasks.push(tokio::spawn(source.run(tx, shutdown)));

        info!("Route simulator started");
        Ok(app)
    }

    /// Start the dispatch daemon with the given publisher.
    ///
    /// Returns the app and the sender feeding the daemon. Events are
    /// processed until the token is cancelled or every sender is dropped.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn with_publisher(
        config: AppConfig,
        publisher: Arc<dyn PositionPublisher>,
    ) -> (Self, mpsc::Sender<InboundEvent>) {
        if !config.destinations.is_dir() {
            warn!(
                destinations = %config.destinations.display(),
                "Destinations directory not found, routes will fail until it exists"
            );
        }

        let metrics = Arc::new(DispatchMetrics::new());
        let shutdown = CancellationToken::new();

        let (daemon, tx) = DispatchDaemon::new(
            config.dispatch.clone(),
            config.position_reader(),
            Arc::clone(&publisher),
            Arc::clone(&metrics),
        );

        info!(
            publisher = publisher.name(),
            output_topic = %config.dispatch.output_topic,
            destinations = %config.destinations.display(),
            publish_interval_ms = config.dispatch.publish_interval.as_millis() as u64,
            max_in_flight_routes = config.dispatch.max_in_flight_routes,
            parse_mode = %config.parse_mode,
            "Dispatch daemon configured"
        );

        let daemon_task = tokio::spawn(daemon.run(shutdown.clone()));

        let app = Self {
            publisher,
            metrics,
            shutdown,
            tasks: vec![daemon_task],
            config,
        };

        (app, tx)
    }

    /// Get the application configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the shared metrics.
    pub fn metrics(&self) -> Arc<DispatchMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Current telemetry.
    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        self.metrics.snapshot()
    }

    /// Token that stops the service when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Whether the daemon has stopped on its own (e.g. its channel closed).
    pub fn is_finished(&self) -> bool {
        self.tasks.first().map_or(true, JoinHandle::is_finished)
    }

    /// Shut down gracefully.
    ///
    /// Cancels consumption and in-flight routes, waits for the tasks and
    /// flushes the publisher. Returns the final telemetry.
    pub async fn shutdown(self) -> TelemetrySnapshot {
        info!("Shutting down route simulator");
        self.shutdown.cancel();
        self.wait().await
    }

    /// Wait for the background tasks to finish without cancelling them,
    /// then flush the publisher. Returns the final telemetry.
    pub async fn wait(self) -> TelemetrySnapshot {
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Background task ended abnormally");
            }
        }

        let publisher = Arc::clone(&self.publisher);
        match tokio::task::spawn_blocking(move || publisher.flush(FLUSH_TIMEOUT)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Failed to flush queued positions"),
            Err(e) => warn!(error = %e, "Flush task ended abnormally"),
        }

        let snapshot = self.metrics.snapshot();
        info!(
            routes_completed = snapshot.routes_completed,
            routes_failed = snapshot.routes_failed,
            routes_cancelled = snapshot.routes_cancelled,
            positions_published = snapshot.positions_published,
            "Route simulator shutdown complete"
        );
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::MemoryPublisher;
    use crate::dispatch::DispatchConfig;
    use tempfile::tempdir;

    fn create_test_config(destinations: &std::path::Path) -> AppConfig {
        AppConfig::default()
            .with_destinations(destinations)
            .with_dispatch(
                DispatchConfig::new("positions").with_publish_interval(Duration::from_millis(5)),
            )
    }

    #[tokio::test]
    async fn test_app_processes_events_until_channel_closes() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("1.txt"), "10.0,20.0\n11.0,21.0\n").unwrap();

        let publisher = Arc::new(MemoryPublisher::new());
        let (app, tx) =
            SimulatorApp::with_publisher(create_test_config(temp_dir.path()), publisher.clone());

        tx.send(InboundEvent::new(r#"{"routeId":"1","clientId":"a"}"#))
            .await
            .unwrap();
        drop(tx);

        let snapshot = app.wait().await;
        assert_eq!(snapshot.routes_completed, 1);
        assert_eq!(snapshot.positions_published, 2);

        let messages = publisher.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].topic, "positions");
        assert!(messages[1].payload.ends_with(r#""finished":true}"#));
    }

    #[tokio::test]
    async fn test_app_shutdown() {
        let temp_dir = tempdir().unwrap();
        let publisher = Arc::new(MemoryPublisher::new());
        let (app, _tx) =
            SimulatorApp::with_publisher(create_test_config(temp_dir.path()), publisher);

        assert!(!app.is_finished());
        assert_eq!(app.config().dispatch.output_topic, "positions");

        let snapshot = app.shutdown().await;
        assert_eq!(snapshot.events_received, 0);
    }

    #[tokio::test]
    async fn test_app_missing_route_is_counted() {
        let temp_dir = tempdir().unwrap();
        let publisher = Arc::new(MemoryPublisher::new());
        let (app, tx) =
            SimulatorApp::with_publisher(create_test_config(temp_dir.path()), publisher.clone());

        tx.send(InboundEvent::new(r#"{"routeId":"nope","clientId":"a"}"#))
            .await
            .unwrap();
        drop(tx);

        let snapshot = app.wait().await;
        assert_eq!(snapshot.routes_failed, 1);
        assert_eq!(publisher.attempts(), 0);
    }
}
