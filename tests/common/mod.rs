//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use elevator_sim::logging;
use elevator_sim::sim::dispatch::DispatchStrategy;
use elevator_sim::sim::engine::{SchedulingEngine, TickReport};
use elevator_sim::sim::request::{RequestId, RequestStatus};
use elevator_sim::sim::types::{BuildingConfig, Timing};

/// Tick granularity used by every fixture.
pub const TICK_MS: u64 = 100;

/// Default timings (1 s per floor, 0.5 s door movement, 2 s open, 1 s boarding).
pub fn timing() -> Timing {
    Timing {
        floor_travel_ms: 1_000,
        door_transition_ms: 500,
        door_open_ms: 2_000,
        boarding_ms: 1_000,
        tick_ms: TICK_MS,
    }
}

/// Building with every cabin starting on floor 0.
pub fn building(
    floors: i32,
    cabins: usize,
    capacity: usize,
    strategy: DispatchStrategy,
) -> BuildingConfig {
    BuildingConfig::new(floors, cabins, capacity, 0, timing(), strategy).expect("valid building")
}

/// Engine over a [`building`] using the closest-cabin heuristic.
///
/// Also installs the debug-level test subscriber, so failing tests show the
/// cabin transitions that led there.
pub fn engine(floors: i32, cabins: usize, capacity: usize) -> SchedulingEngine {
    logging::init_test();
    SchedulingEngine::new(building(floors, cabins, capacity, DispatchStrategy::ClosestCabin))
        .expect("valid engine")
}

/// Ticks from `start` until `done` holds, returning the time of that tick.
///
/// Panics after 100 simulated minutes.
pub fn run_until(
    engine: &mut SchedulingEngine,
    start: u64,
    mut done: impl FnMut(&SchedulingEngine) -> bool,
) -> u64 {
    let mut now = start;
    while now < start + 6_000_000 {
        engine.tick(now).expect("monotonic tick");
        if done(engine) {
            return now;
        }
        now += TICK_MS;
    }
    panic!("engine never reached the expected state");
}

/// Like [`run_until`] but hands every tick report to `observe`.
pub fn run_observed(
    engine: &mut SchedulingEngine,
    start: u64,
    mut observe: impl FnMut(&SchedulingEngine, &TickReport),
    mut done: impl FnMut(&SchedulingEngine) -> bool,
) -> u64 {
    let mut now = start;
    while now < start + 6_000_000 {
        let report = engine.tick(now).expect("monotonic tick");
        observe(engine, &report);
        if done(engine) {
            return now;
        }
        now += TICK_MS;
    }
    panic!("engine never reached the expected state");
}

pub fn status(engine: &SchedulingEngine, id: RequestId) -> RequestStatus {
    engine.request(id).expect("known request").status
}
