//! Post-hoc KPI computation from the request log.

use std::fmt;

use serde::Serialize;

use super::request::{PassengerRequest, RequestStatus};

/// Aggregate service-quality indicators for a complete run.
///
/// Computed post-hoc from the request log so the report always agrees with
/// the exported per-request data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiReport {
    /// Number of requests submitted.
    pub total_requests: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Requests still pending, waiting or in transit.
    pub outstanding: usize,
    /// Mean time from submission to pickup (ms), over picked-up requests.
    pub mean_wait_ms: f64,
    /// Longest submission-to-pickup time (ms).
    pub max_wait_ms: u64,
    /// Mean time from pickup to dropoff (ms), over completed requests.
    pub mean_ride_ms: f64,
    /// Mean submission-to-dropoff time (ms), over completed requests.
    pub mean_journey_ms: f64,
}

impl KpiReport {
    /// Computes all KPIs from the request log.
    ///
    /// # Arguments
    ///
    /// * `requests` - Every request of the run, in any order
    pub fn from_requests(requests: &[PassengerRequest]) -> Self {
        let mut report = Self {
            total_requests: requests.len(),
            ..Self::default()
        };

        let mut wait_sum = 0_u64;
        let mut waits = 0_u64;
        let mut ride_sum = 0_u64;
        let mut journey_sum = 0_u64;

        for r in requests {
            match r.status {
                RequestStatus::Completed => report.completed += 1,
                RequestStatus::Cancelled => report.cancelled += 1,
                _ => report.outstanding += 1,
            }
            if let Some(wait) = r.wait_ms() {
                wait_sum += wait;
                waits += 1;
                report.max_wait_ms = report.max_wait_ms.max(wait);
            }
            if let (Some(ride), Some(dropoff)) = (r.ride_ms(), r.dropoff_at) {
                ride_sum += ride;
                journey_sum += dropoff.saturating_sub(r.created_at);
            }
        }

        report.mean_wait_ms = mean(wait_sum, waits);
        report.mean_ride_ms = mean(ride_sum, report.completed as u64);
        report.mean_journey_ms = mean(journey_sum, report.completed as u64);
        report
    }
}

fn mean(sum: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(
            f,
            "Requests:              {} ({} completed, {} cancelled, {} outstanding)",
            self.total_requests, self.completed, self.cancelled, self.outstanding
        )?;
        writeln!(
            f,
            "Wait time:             {:.1} s mean, {:.1} s max",
            self.mean_wait_ms / 1000.0,
            self.max_wait_ms as f64 / 1000.0
        )?;
        writeln!(f, "Ride time:             {:.1} s mean", self.mean_ride_ms / 1000.0)?;
        write!(f, "Journey time:          {:.1} s mean", self.mean_journey_ms / 1000.0)
    }
}
