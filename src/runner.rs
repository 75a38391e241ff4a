//! Drives a scenario end to end: traffic in, ticks through, request log out.

use tracing::info;

use crate::config::ScenarioConfig;
use crate::sim::clock::Clock;
use crate::sim::engine::SchedulingEngine;
use crate::sim::error::EngineError;
use crate::sim::kpi::KpiReport;
use crate::sim::request::PassengerRequest;
use crate::sim::traffic::TrafficGenerator;
use crate::sim::types::{BuildingConfig, CabinSnapshot};

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Building the run used.
    pub config: BuildingConfig,
    /// Every request, ordered by id.
    pub requests: Vec<PassengerRequest>,
    /// Cabin states at the end of the run.
    pub cabins: Vec<CabinSnapshot>,
    pub kpi: KpiReport,
    /// Simulated time of the last tick.
    pub ended_at_ms: u64,
    pub ticks: usize,
    /// Total stops served across all cabins.
    pub stops_served: usize,
}

/// Runs `config` until traffic has ended and every cabin is at rest, or
/// until `simulation.max_duration_ms`.
///
/// Calls become visible to the engine on the first tick at or after their
/// arrival time.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfig`] if the scenario fails validation.
pub fn run_scenario(config: &ScenarioConfig) -> Result<SimulationResult, EngineError> {
    let errors = config.validate();
    if !errors.is_empty() {
        let message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(EngineError::InvalidConfig {
            field: "scenario",
            message,
        });
    }

    let building = config.building_config()?;
    let mut engine = SchedulingEngine::new(building.clone())?;

    let tr = &config.traffic;
    let calls = TrafficGenerator::new(
        building.floor_count,
        building.initial_floor,
        tr.mean_interval_ms,
        tr.lobby_bias,
        tr.priority_call_ratio,
        tr.seed,
    )
    .generate(tr.duration_ms);
    info!(calls = calls.len(), seed = tr.seed, "traffic generated");

    let mut clock = Clock::new(building.timing.tick_ms, config.simulation.max_duration_ms);
    let mut next_call = 0;
    let mut ticks = 0;
    let mut stops_served = 0;
    let mut ended_at_ms = 0;

    while let Some(now) = clock.tick() {
        let report = engine.tick(now)?;
        ticks += 1;
        stops_served += report.served_stops.len();
        ended_at_ms = now;

        while let Some(call) = calls.get(next_call).filter(|c| c.at_ms <= now) {
            engine.submit_request_with_priority(call.source, call.destination, call.priority)?;
            next_call += 1;
        }

        if next_call == calls.len() && now >= tr.duration_ms && engine.is_quiescent() {
            break;
        }
    }

    let requests = engine.request_log();
    let kpi = KpiReport::from_requests(&requests);
    info!(
        ended_at_ms,
        ticks,
        completed = kpi.completed,
        outstanding = kpi.outstanding,
        "simulation finished"
    );

    Ok(SimulationResult {
        config: building,
        requests,
        cabins: engine.cabins(),
        kpi,
        ended_at_ms,
        ticks,
        stops_served,
    })
}
