//! API response and query types.
//!
//! Request records use the same field names as the CSV export.

use serde::{Deserialize, Serialize};

use crate::sim::kpi::KpiReport;
use crate::sim::request::{PassengerRequest, RequestId, RequestStatus};
use crate::sim::types::{BuildingConfig, CabinId, CabinSnapshot};

/// Combined state response: config, KPIs, and final cabin states.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub config: BuildingConfig,
    pub kpi: KpiReport,
    pub cabins: Vec<CabinSnapshot>,
    /// Simulated time of the last tick.
    pub ended_at_ms: u64,
}

/// One request in CSV schema v1 naming.
///
/// Maps internal `PassengerRequest` fields to the public API contract:
/// - `created_at` → `created_ms`
/// - `assigned_at` → `assigned_ms`
/// - `pickup_at` → `pickup_ms`
/// - `dropoff_at` → `dropoff_ms`
#[derive(Debug, Serialize)]
pub struct RequestRecord {
    pub id: RequestId,
    pub source: i32,
    pub destination: i32,
    pub priority: u8,
    pub status: RequestStatus,
    pub cabin: Option<CabinId>,
    pub created_ms: u64,
    pub assigned_ms: Option<u64>,
    pub pickup_ms: Option<u64>,
    pub dropoff_ms: Option<u64>,
    pub wait_ms: Option<u64>,
    pub ride_ms: Option<u64>,
}

impl From<&PassengerRequest> for RequestRecord {
    fn from(r: &PassengerRequest) -> Self {
        Self {
            id: r.id,
            source: r.source,
            destination: r.destination,
            priority: r.priority,
            status: r.status,
            cabin: r.cabin,
            created_ms: r.created_at,
            assigned_ms: r.assigned_at,
            pickup_ms: r.pickup_at,
            dropoff_ms: r.dropoff_at,
            wait_ms: r.wait_ms(),
            ride_ms: r.ride_ms(),
        }
    }
}

/// Optional status filter for the requests endpoint.
#[derive(Debug, Deserialize)]
pub struct RequestsQuery {
    /// Snake-case status name, e.g. `completed`.
    pub status: Option<String>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
