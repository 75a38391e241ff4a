//! Passenger trip requests and their lifecycle.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use super::types::{CabinId, Direction};

/// Engine-assigned identity of a passenger request.
pub type RequestId = u64;

/// Lifecycle of a passenger request.
///
/// `PendingAssignment → WaitingForPickup → InTransit → Completed`, with
/// `Cancelled` reachable from the first two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    PendingAssignment,
    WaitingForPickup,
    InTransit,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::PendingAssignment,
        RequestStatus::WaitingForPickup,
        RequestStatus::InTransit,
        RequestStatus::Completed,
        RequestStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::PendingAssignment => "pending_assignment",
            RequestStatus::WaitingForPickup => "waiting_for_pickup",
            RequestStatus::InTransit => "in_transit",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    /// Parses the snake_case name produced by [`as_str`](Self::as_str).
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    pub fn is_finished(self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One passenger's trip intent from `source` to `destination`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassengerRequest {
    pub id: RequestId,
    pub source: i32,
    pub destination: i32,
    pub status: RequestStatus,
    /// Higher values are dispatched first.
    pub priority: u8,
    pub created_at: u64,
    pub assigned_at: Option<u64>,
    pub pickup_at: Option<u64>,
    pub dropoff_at: Option<u64>,
    pub cabin: Option<CabinId>,
}

impl PassengerRequest {
    pub fn new(id: RequestId, source: i32, destination: i32, priority: u8, now: u64) -> Self {
        Self {
            id,
            source,
            destination,
            status: RequestStatus::PendingAssignment,
            priority,
            created_at: now,
            assigned_at: None,
            pickup_at: None,
            dropoff_at: None,
            cabin: None,
        }
    }

    /// Travel direction of the trip itself.
    pub fn direction(&self) -> Direction {
        Direction::between(self.source, self.destination)
    }

    /// PENDING → WAITING: a dispatcher picked `cabin`.
    pub fn assign(&mut self, cabin: CabinId, now: u64) {
        debug_assert_eq!(self.status, RequestStatus::PendingAssignment);
        self.status = RequestStatus::WaitingForPickup;
        self.cabin = Some(cabin);
        self.assigned_at = Some(now);
    }

    /// WAITING → IN_TRANSIT: the passenger stepped into the cabin.
    pub fn board(&mut self, now: u64) {
        debug_assert_eq!(self.status, RequestStatus::WaitingForPickup);
        self.status = RequestStatus::InTransit;
        self.pickup_at = Some(now);
    }

    /// IN_TRANSIT → COMPLETED.
    pub fn alight(&mut self, now: u64) {
        debug_assert_eq!(self.status, RequestStatus::InTransit);
        self.status = RequestStatus::Completed;
        self.dropoff_at = Some(now);
    }

    /// Back to PENDING for re-dispatch; the cabin assignment is always cleared.
    pub fn revert_to_pending(&mut self) {
        self.status = RequestStatus::PendingAssignment;
        self.cabin = None;
        self.assigned_at = None;
    }

    /// Passenger left the cabin before arriving; the trip restarts at `floor`.
    pub fn evict_at(&mut self, floor: i32) {
        self.source = floor;
        self.pickup_at = None;
        self.revert_to_pending();
    }

    pub fn cancel(&mut self) {
        debug_assert!(matches!(
            self.status,
            RequestStatus::PendingAssignment | RequestStatus::WaitingForPickup
        ));
        self.status = RequestStatus::Cancelled;
    }

    /// Time from creation to pickup.
    pub fn wait_ms(&self) -> Option<u64> {
        self.pickup_at.map(|p| p.saturating_sub(self.created_at))
    }

    /// Time from pickup to dropoff.
    pub fn ride_ms(&self) -> Option<u64> {
        match (self.pickup_at, self.dropoff_at) {
            (Some(p), Some(d)) => Some(d.saturating_sub(p)),
            _ => None,
        }
    }
}

/// Wrapper ordering pending requests for a max-heap: higher priority first,
/// then earlier creation, then lower id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending(pub PassengerRequest);

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .priority
            .cmp(&other.0.priority)
            .then_with(|| other.0.created_at.cmp(&self.0.created_at))
            .then_with(|| other.0.id.cmp(&self.0.id))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
