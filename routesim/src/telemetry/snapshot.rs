//! Point-in-time telemetry snapshot.
//!
//! Provides an immutable view of dispatch metrics for display and reporting.

use std::fmt;
use std::time::Duration;

/// A point-in-time snapshot of dispatch metrics.
#[derive(Clone, Debug, Default)]
pub struct TelemetrySnapshot {
    /// How long the dispatcher has been running
    pub uptime: Duration,

    /// Events received from the inbound topic
    pub events_received: u64,
    /// Events whose body could not be decoded
    pub events_undecodable: u64,

    /// Routes currently being simulated
    pub routes_active: usize,
    /// Routes that published every position
    pub routes_completed: u64,
    /// Routes that failed to load or expand
    pub routes_failed: u64,
    /// Routes stopped by shutdown
    pub routes_cancelled: u64,

    /// Positions accepted by the publisher
    pub positions_published: u64,
    /// Positions the publisher rejected
    pub publish_failures: u64,

    /// Published positions per second over the uptime
    pub positions_per_second: f64,
}

impl TelemetrySnapshot {
    /// Routes that reached a final state.
    pub fn routes_finished(&self) -> u64 {
        self.routes_completed + self.routes_failed + self.routes_cancelled
    }

    /// Returns the route failure rate (0.0 - 1.0).
    pub fn route_failure_rate(&self) -> f64 {
        let total = self.routes_finished();
        if total == 0 {
            0.0
        } else {
            self.routes_failed as f64 / total as f64
        }
    }

    /// Returns the publish failure rate (0.0 - 1.0).
    pub fn publish_failure_rate(&self) -> f64 {
        let total = self.positions_published + self.publish_failures;
        if total == 0 {
            0.0
        } else {
            self.publish_failures as f64 / total as f64
        }
    }

    /// Returns uptime in human-readable format.
    pub fn uptime_human(&self) -> String {
        format_duration(self.uptime)
    }
}

impl fmt::Display for TelemetrySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dispatch Telemetry (uptime: {})", self.uptime_human())?;
        writeln!(f, "─────────────────────────────────────────")?;
        writeln!(
            f,
            "Events:    {} received ({} undecodable)",
            self.events_received, self.events_undecodable
        )?;
        writeln!(
            f,
            "Routes:    {} completed, {} failed, {} cancelled, {} active",
            self.routes_completed, self.routes_failed, self.routes_cancelled, self.routes_active
        )?;
        writeln!(
            f,
            "Positions: {} published ({:.1}/s), {} failed ({:.1}%)",
            self.positions_published,
            self.positions_per_second,
            self.publish_failures,
            self.publish_failure_rate() * 100.0
        )
    }
}

/// Format duration in human-readable form.
fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_snapshot() -> TelemetrySnapshot {
        TelemetrySnapshot {
            uptime: Duration::from_secs(3661),
            events_received: 12,
            events_undecodable: 1,
            routes_active: 2,
            routes_completed: 7,
            routes_failed: 2,
            routes_cancelled: 1,
            positions_published: 95,
            publish_failures: 5,
            positions_per_second: 0.026,
        }
    }

    #[test]
    fn test_rates() {
        let snapshot = test_snapshot();
        assert_eq!(snapshot.routes_finished(), 10);
        assert!((snapshot.route_failure_rate() - 0.2).abs() < 1e-9);
        assert!((snapshot.publish_failure_rate() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_rates_with_no_data() {
        let snapshot = TelemetrySnapshot::default();
        assert_eq!(snapshot.route_failure_rate(), 0.0);
        assert_eq!(snapshot.publish_failure_rate(), 0.0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(59)), "00:59");
        assert_eq!(format_duration(Duration::from_secs(3661)), "01:01:01");
    }

    #[test]
    fn test_display() {
        let text = test_snapshot().to_string();
        assert!(text.contains("uptime: 01:01:01"));
        assert!(text.contains("7 completed, 2 failed, 1 cancelled, 2 active"));
        assert!(text.contains("95 published"));
    }
}
