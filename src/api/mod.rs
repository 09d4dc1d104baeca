//! Read-only REST API over a completed run.
//!
//! Provides two GET endpoints:
//! - `/summary`: scenario, run KPIs and storage capacity
//! - `/trace`: per-step records with optional range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::config::ScenarioConfig;
use crate::sim::kpi::RunSummary;
use crate::sim::types::SimulationTrace;

pub use types::{SummaryResponse, TraceQuery, TraceRecord};

/// Immutable application state shared across all request handlers.
///
/// Built once after the run completes and wrapped in `Arc`; nothing is
/// mutated while serving.
pub struct AppState {
    /// Scenario the run was resolved from.
    pub scenario: ScenarioConfig,
    pub summary: RunSummary,
    pub trace: SimulationTrace,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/trace", get(handlers::get_trace))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an I/O error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, router(state)).await
}
