//! REST API over a finished simulation run.
//!
//! Provides two GET endpoints:
//! - `/state`: building config, KPI report, and final cabin snapshots
//! - `/requests`: the request log, optionally filtered by status

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::runner::SimulationResult;
use crate::sim::kpi::KpiReport;
use crate::sim::request::PassengerRequest;
use crate::sim::types::{BuildingConfig, CabinSnapshot};

pub use types::{ErrorResponse, RequestRecord, RequestsQuery, StateResponse};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the simulation run completes and wrapped in
/// `Arc`. All data is read-only, so no locks are needed.
pub struct AppState {
    /// Building configuration used for this run.
    pub config: BuildingConfig,
    /// Aggregate KPI report.
    pub kpi: KpiReport,
    /// Cabin snapshots at the end of the run.
    pub cabins: Vec<CabinSnapshot>,
    /// Every request of the run, ordered by id.
    pub requests: Vec<PassengerRequest>,
    /// Simulated time of the last tick.
    pub ended_at_ms: u64,
}

impl From<SimulationResult> for AppState {
    fn from(result: SimulationResult) -> Self {
        Self {
            config: result.config,
            kpi: result.kpi,
            cabins: result.cabins,
            requests: result.requests,
            ended_at_ms: result.ended_at_ms,
        }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/requests", get(handlers::get_requests))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the
/// server stops with an error.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
