//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use elevator_sim::api::{AppState, router};
use elevator_sim::config::ScenarioConfig;
use elevator_sim::runner::run_scenario;

/// Runs a short baseline scenario and returns the API state.
fn build_api_state() -> Arc<AppState> {
    let mut scenario = ScenarioConfig::baseline();
    scenario.traffic.duration_ms = 90_000;
    let result = run_scenario(&scenario).expect("baseline runs");
    Arc::new(AppState::from(result))
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(state);
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn state_reports_run_summary() {
    let state = build_api_state();
    let (status, json) = get(state.clone(), "/state").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(json["config"]["floor_count"], 10);
    assert_eq!(json["config"]["strategy"], "closest_cabin");
    assert_eq!(
        json["kpi"]["total_requests"].as_u64(),
        Some(state.requests.len() as u64)
    );
    let cabins = json["cabins"].as_array().expect("cabins array");
    assert_eq!(cabins.len(), 2);
    for cabin in cabins {
        assert!(cabin.get("floor").is_some());
        assert!(cabin.get("state").is_some());
    }
}

#[tokio::test]
async fn requests_filter_matches_kpi_counts() {
    let state = build_api_state();
    let (status, json) = get(state.clone(), "/requests?status=completed").await;
    assert_eq!(status, StatusCode::OK);

    let rows = json.as_array().expect("rows array");
    assert_eq!(rows.len(), state.kpi.completed);
    for row in rows {
        assert_eq!(row["status"], "completed");
        assert!(row["dropoff_ms"].is_u64());
        assert!(row["wait_ms"].is_u64());
    }

    let (_, all) = get(state.clone(), "/requests").await;
    assert_eq!(all.as_array().map(Vec::len), Some(state.requests.len()));
}

#[tokio::test]
async fn requests_with_bad_status_is_400() {
    let (status, json) = get(build_api_state(), "/requests?status=teleported").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = json["error"].as_str().expect("error message");
    assert!(message.contains("teleported"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = router(build_api_state());
    let req = Request::builder()
        .uri("/nonexistent")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
