//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, SummaryResponse, TraceQuery, TraceRecord};

/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        scenario: state.scenario.clone(),
        summary: state.summary.clone(),
        steps: state.trace.steps.len(),
    })
}

/// Returns trace records, optionally filtered by step range.
///
/// `GET /trace` → 200 + `Vec<TraceRecord>` JSON
/// `GET /trace?from=N&to=M` → inclusive range
/// `GET /trace?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_trace(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TraceQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<TraceRecord> = state
        .trace
        .steps
        .iter()
        .filter(|r| (from..=to).contains(&r.step))
        .map(TraceRecord::from)
        .collect();

    Ok(Json(records))
}
