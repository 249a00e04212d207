//! Dispatch daemon.
//!
//! Receives inbound events over a channel and spawns one route task per
//! event. The receive loop never waits on a route's pacing; it only waits
//! for a free slot when the admission limit is reached.

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::config::DispatchConfig;
use super::simulation::RouteSimulator;
use crate::broker::{InboundEvent, PositionPublisher};
use crate::route::PositionReader;
use crate::telemetry::DispatchMetrics;

/// The dispatch daemon.
///
/// Owns the receiving end of the inbound channel and runs as a long-lived
/// background task.
pub struct DispatchDaemon {
    /// Shared per-route logic, cloned into each task.
    simulator: RouteSimulator,

    /// Admission limit; `None` when unbounded.
    limiter: Option<Arc<Semaphore>>,

    /// Channel receiver for inbound events.
    request_rx: mpsc::Receiver<InboundEvent>,
}

impl DispatchDaemon {
    /// Creates a new daemon with its channel.
    ///
    /// Returns the daemon and a sender that can be cloned for event sources.
    pub fn new(
        config: DispatchConfig,
        reader: PositionReader,
        publisher: Arc<dyn PositionPublisher>,
        metrics: Arc<DispatchMetrics>,
    ) -> (Self, mpsc::Sender<InboundEvent>) {
        let (request_tx, request_rx) = mpsc::channel(config.channel_capacity.max(1));

        let limiter = match config.max_in_flight_routes {
            0 => None,
            max => Some(Arc::new(Semaphore::new(max))),
        };

        let simulator = RouteSimulator::new(
            reader,
            publisher,
            metrics,
            config.output_topic.as_str(),
            config.publish_interval,
        );

        let daemon = Self {
            simulator,
            limiter,
            request_rx,
        };

        (daemon, request_tx)
    }

    /// Runs the daemon until shutdown is signalled or every sender is dropped.
    ///
    /// On shutdown, in-flight routes stop at their next pacing point. When
    /// the channel closes instead, in-flight routes run to completion before
    /// this returns.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            max_in_flight_routes = self.limiter.as_ref().map(|s| s.available_permits()),
            "Dispatch daemon starting"
        );

        let Self {
            simulator,
            limiter,
            mut request_rx,
        } = self;

        let mut routes = JoinSet::new();

        loop {
            let event = tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Dispatch daemon shutting down");
                    break;
                }

                // Reap finished route tasks so the set does not grow unbounded
                Some(result) = routes.join_next(), if !routes.is_empty() => {
                    Self::log_join_result(result);
                    continue;
                }

                received = request_rx.recv() => match received {
                    Some(event) => event,
                    None => {
                        info!("Inbound channel closed, draining in-flight routes");
                        break;
                    }
                },
            };

            info!(payload = %event.payload_str(), "Route event received");
            simulator.metrics().event_received();

            let permit = match &limiter {
                Some(semaphore) => {
                    if semaphore.available_permits() == 0 {
                        debug!("Admission limit reached, waiting for a route to finish");
                    }
                    tokio::select! {
                        biased;

                        _ = shutdown.cancelled() => {
                            info!("Dispatch daemon shutting down");
                            break;
                        }

                        permit = Arc::clone(semaphore).acquire_owned() => match permit {
                            Ok(permit) => Some(permit),
                            Err(_) => break,
                        },
                    }
                }
                None => None,
            };

            let simulator = simulator.clone();
            let route_shutdown = shutdown.child_token();
            routes.spawn(async move {
                let _permit = permit;
                simulator.run(event, &route_shutdown).await;
            });
        }

        while let Some(result) = routes.join_next().await {
            Self::log_join_result(result);
        }

        info!("Dispatch daemon stopped");
    }

    fn log_join_result(result: Result<(), tokio::task::JoinError>) {
        if let Err(e) = result {
            if e.is_panic() {
                error!(error = %e, "Route task panicked");
            }
        }
    }
}
