//! Per-route simulation task.
//!
//! Decodes the inbound event, loads and expands the route, then publishes
//! each position with a fixed delay between publishes.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::broker::{InboundEvent, PositionPublisher};
use crate::route::{expand, PositionReader, Route, RouteError};
use crate::telemetry::DispatchMetrics;

/// How a route task ended.
#[derive(Debug)]
pub enum RouteOutcome {
    /// Every payload was handed to the publisher.
    Completed { published: usize, failed: usize },
    /// Loading or expansion failed; nothing was published.
    Failed(RouteError),
    /// Shutdown interrupted the pacing loop.
    Cancelled { published: usize, failed: usize },
}

impl RouteOutcome {
    /// Number of payloads the publisher accepted.
    pub fn published(&self) -> usize {
        match self {
            RouteOutcome::Completed { published, .. } | RouteOutcome::Cancelled { published, .. } => {
                *published
            }
            RouteOutcome::Failed(_) => 0,
        }
    }
}

/// Runs one route from inbound event to final publish.
///
/// Cheap to clone; every route task holds its own copy.
#[derive(Clone)]
pub struct RouteSimulator {
    reader: PositionReader,
    publisher: Arc<dyn PositionPublisher>,
    metrics: Arc<DispatchMetrics>,
    topic: Arc<str>,
    interval: Duration,
}

impl RouteSimulator {
    /// Create a simulator publishing to `topic`, `interval` apart.
    pub fn new(
        reader: PositionReader,
        publisher: Arc<dyn PositionPublisher>,
        metrics: Arc<DispatchMetrics>,
        topic: impl Into<Arc<str>>,
        interval: Duration,
    ) -> Self {
        Self {
            reader,
            publisher,
            metrics,
            topic: topic.into(),
            interval,
        }
    }

    /// Counters this simulator reports to.
    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    /// Decode the route skeleton from an event.
    ///
    /// An undecodable body yields an empty route, which then fails to load
    /// with [`RouteError::MissingIdentifier`].
    pub fn decode(&self, event: &InboundEvent) -> Route {
        Route::from_event_payload(&event.payload).unwrap_or_else(|e| {
            warn!(
                error = %e,
                payload = %event.payload_str(),
                "Undecodable route event, continuing with an empty route"
            );
            self.metrics.event_undecodable();
            Route::default()
        })
    }

    /// Load the route's coordinates and expand them into payloads.
    pub async fn prepare(&self, route: &mut Route) -> Result<Vec<String>, RouteError> {
        self.reader.load_positions(route).await?;
        expand(route)
    }

    /// Simulate the route carried by `event`.
    pub async fn run(&self, event: InboundEvent, shutdown: &CancellationToken) -> RouteOutcome {
        self.metrics.route_started();

        let mut route = self.decode(&event);
        let payloads = match self.prepare(&mut route).await {
            Ok(payloads) => payloads,
            Err(e) => {
                warn!(
                    route_id = %route.id,
                    client_id = %route.client_id,
                    kind = e.kind(),
                    error = %e,
                    "Route failed"
                );
                self.metrics.route_failed();
                return RouteOutcome::Failed(e);
            }
        };

        info!(
            route_id = %route.id,
            client_id = %route.client_id,
            positions = payloads.len(),
            "Simulating route"
        );

        let mut published = 0;
        let mut failed = 0;

        for (index, payload) in payloads.into_iter().enumerate() {
            let cancelled = if index == 0 {
                shutdown.is_cancelled()
            } else {
                tokio::select! {
                    biased;

                    _ = shutdown.cancelled() => true,
                    _ = tokio::time::sleep(self.interval) => false,
                }
            };
            if cancelled {
                info!(route_id = %route.id, published, "Route cancelled by shutdown");
                self.metrics.route_cancelled();
                return RouteOutcome::Cancelled { published, failed };
            }

            match self.publisher.publish(&self.topic, &route.id, payload).await {
                Ok(()) => {
                    published += 1;
                    self.metrics.position_published();
                    debug!(route_id = %route.id, index, "Position published");
                }
                Err(e) => {
                    failed += 1;
                    self.metrics.publish_failed();
                    warn!(route_id = %route.id, index, error = %e, "Failed to publish position");
                }
            }
        }

        info!(route_id = %route.id, published, failed, "Route finished");
        self.metrics.route_completed();
        RouteOutcome::Completed { published, failed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::MemoryPublisher;
    use crate::route::{MemoryStore, OutboundPosition, ParseMode};

    fn simulator(store: MemoryStore, publisher: Arc<MemoryPublisher>) -> RouteSimulator {
        RouteSimulator::new(
            PositionReader::new(Arc::new(store), ParseMode::Lenient),
            publisher,
            Arc::new(DispatchMetrics::new()),
            "positions",
            Duration::from_millis(500),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_publishes_paced_positions() {
        let publisher = Arc::new(MemoryPublisher::new());
        let sim = simulator(
            MemoryStore::new().with_record("R1", "1.0,2.0\n3.0,4.0\n5.0,6.0\n"),
            publisher.clone(),
        );

        let event = InboundEvent::new(r#"{"routeId":"R1","clientId":"C1"}"#);
        let outcome = sim.run(event, &CancellationToken::new()).await;

        assert!(matches!(outcome, RouteOutcome::Completed { published: 3, failed: 0 }));

        let messages = publisher.messages();
        assert_eq!(messages.len(), 3);
        for pair in messages.windows(2) {
            let gap = pair[1].published_at - pair[0].published_at;
            assert!(gap >= Duration::from_millis(500), "gap was {:?}", gap);
        }

        let last: OutboundPosition = serde_json::from_str(&messages[2].payload).unwrap();
        assert!(last.finished);
        assert_eq!(last.position, [6.0, 5.0]);
        assert_eq!(messages[0].topic, "positions");
        assert_eq!(messages[0].key, "R1");
    }

    #[tokio::test]
    async fn test_run_undecodable_event_fails_with_missing_identifier() {
        let publisher = Arc::new(MemoryPublisher::new());
        let sim = simulator(MemoryStore::new(), publisher.clone());

        let outcome = sim
            .run(InboundEvent::new("garbage"), &CancellationToken::new())
            .await;

        assert!(matches!(
            outcome,
            RouteOutcome::Failed(RouteError::MissingIdentifier)
        ));
        assert_eq!(publisher.attempts(), 0);
        let snapshot = sim.metrics.snapshot();
        assert_eq!(snapshot.events_undecodable, 1);
        assert_eq!(snapshot.routes_failed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_continues_after_publish_failure() {
        let publisher = Arc::new(MemoryPublisher::failing_on([1]));
        let sim = simulator(
            MemoryStore::new().with_record("R1", "1.0,2.0\n3.0,4.0\n5.0,6.0\n"),
            publisher.clone(),
        );

        let outcome = sim
            .run(
                InboundEvent::new(r#"{"routeId":"R1","clientId":"C1"}"#),
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(outcome, RouteOutcome::Completed { published: 2, failed: 1 }));
        assert_eq!(publisher.attempts(), 3);
        assert_eq!(sim.metrics.snapshot().publish_failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_shutdown() {
        let publisher = Arc::new(MemoryPublisher::new());
        let sim = simulator(
            MemoryStore::new().with_record("R1", "1.0,2.0\n3.0,4.0\n5.0,6.0\n"),
            publisher.clone(),
        );
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let outcome = sim
            .run(
                InboundEvent::new(r#"{"routeId":"R1","clientId":"C1"}"#),
                &shutdown,
            )
            .await;

        assert!(matches!(outcome, RouteOutcome::Cancelled { published: 0, .. }));
        assert_eq!(publisher.attempts(), 0);
        assert_eq!(sim.metrics.snapshot().routes_cancelled, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cancelled_mid_route_keeps_published_count() {
        let publisher = Arc::new(MemoryPublisher::new());
        let sim = Arc::new(simulator(
            MemoryStore::new().with_record("R1", "1.0,2.0\n3.0,4.0\n5.0,6.0\n"),
            publisher.clone(),
        ));
        let shutdown = CancellationToken::new();

        let task = {
            let sim = sim.clone();
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                sim.run(
                    InboundEvent::new(r#"{"routeId":"R1","clientId":"C1"}"#),
                    &shutdown,
                )
                .await
            })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.cancel();
        let outcome = task.await.unwrap();

        assert!(matches!(outcome, RouteOutcome::Cancelled { published: 1, .. }));
        assert_eq!(publisher.attempts(), 1);
    }

    #[tokio::test]
    async fn test_run_empty_record_completes_without_publishing() {
        let publisher = Arc::new(MemoryPublisher::new());
        let sim = simulator(MemoryStore::new().with_record("R1", ""), publisher.clone());

        let outcome = sim
            .run(
                InboundEvent::new(r#"{"routeId":"R1","clientId":"C1"}"#),
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(outcome, RouteOutcome::Completed { published: 0, failed: 0 }));
        assert_eq!(publisher.attempts(), 0);
    }
}
