//! Arrival-time estimates by replaying a cabin's queued stops forward.

use super::cabin::Cabin;
use super::error::EngineError;
use super::types::{CabinState, Direction};

/// Upper bound on simulated stops per estimate.
pub const ETA_MAX_ITERATIONS: usize = 128;

/// Estimates how long `cabin` needs, from `now`, to reach `floor`.
///
/// The projection works on a copy of the cabin's stop plan with `floor`
/// inserted, and walks it in SCAN/LOOK order: every intermediate stop costs
/// travel plus a full door cycle (open, dwell, close). Extra boarding time
/// is not predicted.
///
/// # Errors
///
/// Returns [`EngineError::EtaUnreachable`] for suspended cabins and when the
/// projection exceeds [`ETA_MAX_ITERATIONS`] stops.
pub fn estimate_arrival(cabin: &Cabin, floor: i32, now: u64) -> Result<u64, EngineError> {
    let unreachable = EngineError::EtaUnreachable {
        cabin: cabin.id(),
        floor,
    };
    let timing = cabin.timing_config();
    let dwell = 2 * timing.door_transition_ms + timing.door_open_ms;
    let remaining = cabin.timing().remaining_action(now);

    let mut position = cabin.floor();
    let mut direction = cabin.direction();
    let mut elapsed = match cabin.state() {
        CabinState::Maintenance | CabinState::OutOfService | CabinState::EmergencyStop => {
            return Err(unreachable);
        }
        CabinState::Idle => 0,
        CabinState::MovingUp | CabinState::MovingDown => {
            position += direction.step();
            remaining
        }
        CabinState::StoppedAtFloor | CabinState::DoorOpening | CabinState::DoorOpen
            if floor == position =>
        {
            return Ok(0);
        }
        CabinState::StoppedAtFloor => dwell,
        CabinState::DoorOpening => remaining + timing.door_open_ms + timing.door_transition_ms,
        CabinState::DoorOpen => {
            let door_left = cabin
                .timing()
                .door_open_until()
                .into_iter()
                .chain(cabin.timing().activity_until())
                .max()
                .map_or(0, |until| until.saturating_sub(now));
            door_left.max(remaining) + timing.door_transition_ms
        }
        CabinState::DoorClosing => remaining,
    };

    let mut plan = cabin.stops().clone();
    let heading = if cabin.state().is_moving() {
        direction
    } else {
        Direction::Idle
    };
    plan.insert(floor, position, heading);

    for _ in 0..ETA_MAX_ITERATIONS {
        let Some(next) = plan.next_target(position, &mut direction) else {
            break;
        };
        elapsed += u64::from((next - position).unsigned_abs()) * timing.floor_travel_ms;
        position = next;
        plan.consume(next);
        if next == floor {
            return Ok(elapsed);
        }
        elapsed += dwell;
    }
    Err(unreachable)
}

impl Cabin {
    /// See [`estimate_arrival`].
    pub fn eta_to(&self, floor: i32, now: u64) -> Result<u64, EngineError> {
        estimate_arrival(self, floor, now)
    }
}
