//! Lock-free atomic metrics collection.
//!
//! Uses `AtomicU64` and `AtomicUsize` counters with `Relaxed` ordering; the
//! counters are independent measurements and need no ordering between them.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

use super::TelemetrySnapshot;

/// Counters for the dispatch loop and its route tasks.
#[derive(Debug)]
pub struct DispatchMetrics {
    /// When metrics collection started
    start_time: Instant,

    // === Inbound ===
    /// Events received from the inbound channel
    events_received: AtomicU64,
    /// Events whose body could not be decoded
    events_undecodable: AtomicU64,

    // === Routes ===
    /// Routes currently being simulated
    routes_active: AtomicUsize,
    /// Routes that published every position
    routes_completed: AtomicU64,
    /// Routes that failed to load or expand
    routes_failed: AtomicU64,
    /// Routes stopped by shutdown before finishing
    routes_cancelled: AtomicU64,

    // === Publishing ===
    /// Positions accepted by the publisher
    positions_published: AtomicU64,
    /// Positions the publisher rejected
    publish_failures: AtomicU64,
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchMetrics {
    /// Creates a new metrics instance.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            events_received: AtomicU64::new(0),
            events_undecodable: AtomicU64::new(0),
            routes_active: AtomicUsize::new(0),
            routes_completed: AtomicU64::new(0),
            routes_failed: AtomicU64::new(0),
            routes_cancelled: AtomicU64::new(0),
            positions_published: AtomicU64::new(0),
            publish_failures: AtomicU64::new(0),
        }
    }

    // === Inbound tracking ===

    /// Record an inbound event.
    pub fn event_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an inbound event whose body could not be decoded.
    pub fn event_undecodable(&self) {
        self.events_undecodable.fetch_add(1, Ordering::Relaxed);
    }

    // === Route tracking ===

    /// Record a route task starting.
    pub fn route_started(&self) {
        self.routes_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a route that published all of its positions.
    pub fn route_completed(&self) {
        self.routes_active.fetch_sub(1, Ordering::Relaxed);
        self.routes_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a route that failed before publishing.
    pub fn route_failed(&self) {
        self.routes_active.fetch_sub(1, Ordering::Relaxed);
        self.routes_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a route stopped by shutdown.
    pub fn route_cancelled(&self) {
        self.routes_active.fetch_sub(1, Ordering::Relaxed);
        self.routes_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    // === Publish tracking ===

    /// Record a published position.
    pub fn position_published(&self) {
        self.positions_published.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed publish.
    pub fn publish_failed(&self) {
        self.publish_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        let uptime = self.start_time.elapsed();
        let uptime_secs = uptime.as_secs_f64().max(0.001); // Avoid division by zero

        let positions_published = self.positions_published.load(Ordering::Relaxed);

        TelemetrySnapshot {
            uptime,
            events_received: self.events_received.load(Ordering::Relaxed),
            events_undecodable: self.events_undecodable.load(Ordering::Relaxed),
            routes_active: self.routes_active.load(Ordering::Relaxed),
            routes_completed: self.routes_completed.load(Ordering::Relaxed),
            routes_failed: self.routes_failed.load(Ordering::Relaxed),
            routes_cancelled: self.routes_cancelled.load(Ordering::Relaxed),
            positions_published,
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
            positions_per_second: positions_published as f64 / uptime_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_lifecycle_counters() {
        let metrics = DispatchMetrics::new();

        metrics.event_received();
        metrics.event_received();
        metrics.event_received();
        metrics.route_started();
        metrics.route_started();
        metrics.route_started();
        metrics.route_completed();
        metrics.route_failed();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.events_received, 3);
        assert_eq!(snapshot.routes_active, 1);
        assert_eq!(snapshot.routes_completed, 1);
        assert_eq!(snapshot.routes_failed, 1);

        metrics.route_cancelled();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.routes_active, 0);
        assert_eq!(snapshot.routes_cancelled, 1);
    }

    #[test]
    fn test_publish_counters() {
        let metrics = DispatchMetrics::new();
        metrics.position_published();
        metrics.position_published();
        metrics.publish_failed();
        metrics.event_undecodable();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.positions_published, 2);
        assert_eq!(snapshot.publish_failures, 1);
        assert_eq!(snapshot.events_undecodable, 1);
        assert!(snapshot.positions_per_second > 0.0);
    }
}
