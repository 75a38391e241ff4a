//! Error taxonomy for the scheduling engine.

use thiserror::Error;

use super::request::{RequestId, RequestStatus};
use super::types::CabinId;

/// Errors surfaced by engine construction and the engine's public operations.
///
/// A request no cabin can take is not an error: it stays pending and is
/// retried on a later tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Building configuration rejected at construction time.
    #[error("invalid config: {field} {message}")]
    InvalidConfig { field: &'static str, message: String },

    /// No cabin with this id exists in the building.
    #[error("unknown cabin: {0}")]
    UnknownCabin(CabinId),

    /// No request with this id is known to the engine.
    #[error("unknown request: {0}")]
    UnknownRequest(RequestId),

    /// Floor outside `0..floor_count`.
    #[error("floor {floor} is outside 0..{floor_count}")]
    InvalidFloor { floor: i32, floor_count: i32 },

    /// Source and destination are the same floor.
    #[error("source and destination are both floor {0}")]
    SameFloor(i32),

    /// The request has already boarded, completed or been cancelled.
    #[error("request {id} cannot be cancelled while {status}")]
    NotCancellable { id: RequestId, status: RequestStatus },

    /// ETA projection gave up (suspended cabin or iteration cap reached).
    #[error("cabin {cabin} cannot reach floor {floor}")]
    EtaUnreachable { cabin: CabinId, floor: i32 },

    /// `tick` was called with a time earlier than the previous tick.
    #[error("non-monotonic time: {now} ms after {previous} ms (tick ignored)")]
    NonMonotonicTime { previous: u64, now: u64 },
}
