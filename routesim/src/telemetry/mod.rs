//! Dispatch telemetry for observability and user feedback.
//!
//! Lock-free atomic counters updated by the dispatch loop and route tasks,
//! with point-in-time snapshots for display.
//!
//! # Architecture
//!
//! ```text
//! DispatchDaemon / route tasks ─────► DispatchMetrics ─────► TelemetrySnapshot ─────► CLI
//!                                     (atomic counters)      (point-in-time copy)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use routesim::telemetry::DispatchMetrics;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(DispatchMetrics::new());
//! metrics.event_received();
//! metrics.route_started();
//! metrics.position_published();
//! metrics.route_completed();
//!
//! let snapshot = metrics.snapshot();
//! println!("Routes completed: {}", snapshot.routes_completed);
//! ```

mod metrics;
mod snapshot;

pub use metrics::DispatchMetrics;
pub use snapshot::TelemetrySnapshot;
