//! Integration tests for config presets, TOML scenarios, and CSV export.

use std::fs;

use elevator_sim::config::ScenarioConfig;
use elevator_sim::io::export::{export_csv, write_csv};
use elevator_sim::runner::run_scenario;
use elevator_sim::sim::dispatch::DispatchStrategy;
use elevator_sim::sim::error::EngineError;

/// Shortens a preset's traffic window so the suite stays fast.
fn shortened(name: &str) -> ScenarioConfig {
    let mut scenario = ScenarioConfig::from_preset(name).expect("known preset");
    scenario.traffic.duration_ms = 120_000;
    scenario
}

#[test]
fn every_preset_runs_and_accounts_for_all_requests() {
    for name in ScenarioConfig::PRESETS {
        let scenario = shortened(name);
        assert!(scenario.validate().is_empty(), "preset {name} invalid");

        let result = run_scenario(&scenario).expect("preset runs");
        let kpi = &result.kpi;
        assert!(kpi.total_requests > 0, "preset {name} generated no calls");
        assert_eq!(
            kpi.completed + kpi.cancelled + kpi.outstanding,
            kpi.total_requests,
            "preset {name}"
        );
        assert!(kpi.completed > 0, "preset {name} completed nothing");
        assert_eq!(result.cabins.len(), scenario.building.cabin_count);
        for cabin in &result.cabins {
            assert!((0..scenario.building.floor_count).contains(&cabin.floor));
        }
    }
}

#[test]
fn preset_run_is_reproducible_for_a_seed() {
    let run = |seed| {
        let mut scenario = shortened("morning_rush");
        scenario.traffic.seed = seed;
        let result = run_scenario(&scenario).expect("preset runs");
        let mut csv = Vec::new();
        write_csv(&result.requests, &mut csv).expect("export");
        csv
    };
    assert_eq!(run(7), run(7));
    assert_ne!(run(7), run(8));
}

#[test]
fn toml_scenario_overrides_defaults() {
    let scenario = ScenarioConfig::from_toml_str(
        r#"
        [building]
        floor_count = 6
        cabin_count = 1
        capacity = 2

        [dispatch]
        strategy = "least_stops"

        [traffic]
        seed = 11
        duration_ms = 60000
        mean_interval_ms = 15000
        "#,
    )
    .expect("valid TOML");

    assert_eq!(scenario.strategy(), Some(DispatchStrategy::LeastStops));
    assert_eq!(scenario.timing.floor_travel_ms, 1_000);

    let result = run_scenario(&scenario).expect("scenario runs");
    assert_eq!(result.config.floor_count, 6);
    assert_eq!(result.config.strategy, DispatchStrategy::LeastStops);
    assert_eq!(result.kpi.outstanding, 0);
    assert!(
        result
            .requests
            .iter()
            .all(|r| (0..6).contains(&r.source) && (0..6).contains(&r.destination))
    );
}

#[test]
fn unknown_strategy_is_rejected_before_running() {
    let mut scenario = ScenarioConfig::baseline();
    scenario.dispatch.strategy = "random".into();

    let errors = scenario.validate();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "dispatch.strategy");
    assert!(matches!(
        run_scenario(&scenario),
        Err(EngineError::InvalidConfig { .. })
    ));
}

#[test]
fn export_writes_one_row_per_request() {
    let mut scenario = shortened("baseline");
    scenario.traffic.mean_interval_ms = 20_000;
    let result = run_scenario(&scenario).expect("scenario runs");

    let path = std::env::temp_dir().join(format!(
        "elevator_sim_export_{}.csv",
        std::process::id()
    ));
    export_csv(&result.requests, &path).expect("export succeeds");
    let text = fs::read_to_string(&path).expect("readable CSV");
    let _ = fs::remove_file(&path);

    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some(
            "id,source,destination,priority,status,cabin,created_ms,assigned_ms,pickup_ms,dropoff_ms,wait_ms,ride_ms"
        )
    );
    assert_eq!(lines.count(), result.requests.len());
}
