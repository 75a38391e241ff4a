//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, RequestRecord, RequestsQuery, StateResponse};
use crate::sim::request::RequestStatus;

/// Returns building config, KPI report, and final cabin snapshots.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        config: state.config.clone(),
        kpi: state.kpi.clone(),
        cabins: state.cabins.clone(),
        ended_at_ms: state.ended_at_ms,
    })
}

/// Returns the request log, optionally filtered by status.
///
/// `GET /requests` → 200 + `Vec<RequestRecord>` JSON
/// `GET /requests?status=completed` → only completed requests
/// `GET /requests?status=bogus` → 400 + `ErrorResponse`
pub async fn get_requests(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RequestsQuery>,
) -> impl IntoResponse {
    let filter = match query.status.as_deref() {
        None => None,
        Some(name) => match RequestStatus::parse(name) {
            Some(status) => Some(status),
            None => {
                let known: Vec<&str> = RequestStatus::ALL.iter().map(|s| s.as_str()).collect();
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!(
                            "unknown status \"{name}\", expected one of {}",
                            known.join(", ")
                        ),
                    }),
                ));
            }
        },
    };

    let records: Vec<RequestRecord> = state
        .requests
        .iter()
        .filter(|r| filter.is_none_or(|status| r.status == status))
        .map(RequestRecord::from)
        .collect();

    Ok(Json(records))
}
