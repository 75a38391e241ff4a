//! Core simulation types: building configuration, cabin states, and snapshots.

use std::fmt;

use serde::Serialize;

use super::dispatch::DispatchStrategy;
use super::error::EngineError;

/// Index of a cabin within its building (`0..cabin_count`).
pub type CabinId = usize;

/// Immutable per-building parameters.
///
/// Construct with [`BuildingConfig::new`], which refuses configurations the
/// engine cannot run. All durations are in milliseconds of simulated time.
///
/// # Examples
///
/// ```
/// use elevator_sim::sim::dispatch::DispatchStrategy;
/// use elevator_sim::sim::types::{BuildingConfig, Timing};
///
/// let timing = Timing {
///     floor_travel_ms: 1000,
///     door_transition_ms: 500,
///     door_open_ms: 2000,
///     boarding_ms: 1000,
///     tick_ms: 100,
/// };
/// let cfg = BuildingConfig::new(10, 2, 8, 0, timing, DispatchStrategy::ClosestCabin);
/// assert!(cfg.is_ok());
/// assert!(BuildingConfig::new(1, 2, 8, 0, timing, DispatchStrategy::ClosestCabin).is_err());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct BuildingConfig {
    /// Number of floors, numbered `0..floor_count`.
    pub floor_count: i32,
    /// Number of cabins in the building.
    pub cabin_count: usize,
    /// Maximum onboard passengers per cabin.
    pub capacity: usize,
    /// Floor every cabin starts on (and returns to on reset).
    pub initial_floor: i32,
    /// Timing constants shared by every cabin.
    pub timing: Timing,
    /// Dispatch heuristic used for every request in this building.
    pub strategy: DispatchStrategy,
}

/// Timing constants for one building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timing {
    /// Travel time between adjacent floors.
    pub floor_travel_ms: u64,
    /// Duration of a door opening or closing movement.
    pub door_transition_ms: u64,
    /// Minimum time the doors stay fully open at a stop.
    pub door_open_ms: u64,
    /// Per-passenger boarding or alighting time.
    pub boarding_ms: u64,
    /// Granularity the tick source advances by.
    pub tick_ms: u64,
}

impl BuildingConfig {
    /// Validates and builds a building configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if there are fewer than two
    /// floors, no cabins, zero capacity, any zero timing constant, or an
    /// initial floor outside the building.
    pub fn new(
        floor_count: i32,
        cabin_count: usize,
        capacity: usize,
        initial_floor: i32,
        timing: Timing,
        strategy: DispatchStrategy,
    ) -> Result<Self, EngineError> {
        if floor_count < 2 {
            return Err(invalid("floor_count", "must be >= 2"));
        }
        if cabin_count < 1 {
            return Err(invalid("cabin_count", "must be >= 1"));
        }
        if capacity < 1 {
            return Err(invalid("capacity", "must be >= 1"));
        }
        if !(0..floor_count).contains(&initial_floor) {
            return Err(invalid("initial_floor", "must be a floor of the building"));
        }
        for (field, value) in [
            ("floor_travel_ms", timing.floor_travel_ms),
            ("door_transition_ms", timing.door_transition_ms),
            ("door_open_ms", timing.door_open_ms),
            ("boarding_ms", timing.boarding_ms),
            ("tick_ms", timing.tick_ms),
        ] {
            if value == 0 {
                return Err(invalid(field, "must be > 0"));
            }
        }

        Ok(Self {
            floor_count,
            cabin_count,
            capacity,
            initial_floor,
            timing,
            strategy,
        })
    }

    /// Returns `true` when `floor` exists in this building.
    pub fn contains_floor(&self, floor: i32) -> bool {
        (0..self.floor_count).contains(&floor)
    }
}

fn invalid(field: &'static str, message: &str) -> EngineError {
    EngineError::InvalidConfig {
        field,
        message: message.to_string(),
    }
}

/// Travel direction of a cabin or a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Idle,
}

impl Direction {
    /// Direction needed to get from `from` to `to`.
    pub fn between(from: i32, to: i32) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Direction::Up,
            std::cmp::Ordering::Less => Direction::Down,
            std::cmp::Ordering::Equal => Direction::Idle,
        }
    }

    /// Floor delta for one step of travel.
    pub fn step(self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
            Direction::Idle => 0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Idle => Direction::Idle,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Idle => "idle",
        };
        f.pad(s)
    }
}

/// States of the per-cabin finite-state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinState {
    Idle,
    MovingUp,
    MovingDown,
    StoppedAtFloor,
    DoorOpening,
    DoorOpen,
    DoorClosing,
    Maintenance,
    OutOfService,
    EmergencyStop,
}

impl CabinState {
    /// Externally triggered states that freeze all automatic transitions.
    pub fn is_suspended(self) -> bool {
        matches!(
            self,
            CabinState::Maintenance | CabinState::OutOfService | CabinState::EmergencyStop
        )
    }

    pub fn is_moving(self) -> bool {
        matches!(self, CabinState::MovingUp | CabinState::MovingDown)
    }
}

impl fmt::Display for CabinState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CabinState::Idle => "idle",
            CabinState::MovingUp => "moving_up",
            CabinState::MovingDown => "moving_down",
            CabinState::StoppedAtFloor => "stopped_at_floor",
            CabinState::DoorOpening => "door_opening",
            CabinState::DoorOpen => "door_open",
            CabinState::DoorClosing => "door_closing",
            CabinState::Maintenance => "maintenance",
            CabinState::OutOfService => "out_of_service",
            CabinState::EmergencyStop => "emergency_stop",
        };
        f.pad(s)
    }
}

/// Physical state of a cabin's doors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Read-only view of one cabin for presentation collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct CabinSnapshot {
    pub id: CabinId,
    pub floor: i32,
    pub direction: Direction,
    pub state: CabinState,
    pub door: DoorState,
    pub passenger_count: usize,
    pub capacity: usize,
    /// Total floors queued across both stop queues.
    pub queued_stops: usize,
}

impl fmt::Display for CabinSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cabin {} | floor {:>3} {:<4} | {:<16} | {}/{} aboard | {} stops",
            self.id,
            self.floor,
            self.direction,
            self.state,
            self.passenger_count,
            self.capacity,
            self.queued_stops,
        )
    }
}
