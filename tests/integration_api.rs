//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use gridsim::api::{AppState, router};
use gridsim::config::ScenarioConfig;
use gridsim::sim::engine::run_dispatch;
use gridsim::sim::kpi::RunSummary;

/// Runs a preset end to end and returns the API state.
fn build_api_state(preset: &str) -> Arc<AppState> {
    let scenario = ScenarioConfig::from_preset(preset).unwrap();
    let (inputs, horizon) = scenario.resolve().unwrap();
    let trace = run_dispatch(inputs, horizon).unwrap();
    let summary = RunSummary::from_trace(&trace);
    Arc::new(AppState {
        scenario,
        summary,
        trace,
    })
}

async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn summary_reports_scenario_and_kpis() {
    let (status, json) = get_json(build_api_state("dunkelflaute_2035"), "/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["scenario"]["simulation"]["year"], 2035);
    assert_eq!(json["scenario"]["simulation"]["weather"], "dunkelflaute");
    assert_eq!(json["steps"], 96);
    assert!(json["summary"]["unmet_demand_gwh"].as_f64().unwrap_or(0.0) > 0.0);
}

#[tokio::test]
async fn trace_records_carry_generation_by_name() {
    let (status, json) =
        get_json(build_api_state("summer_windy_2035"), "/trace?from=12&to=12").await;
    assert_eq!(status, StatusCode::OK);
    let records = json.as_array().cloned().unwrap_or_default();
    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert_eq!(r["step"], 12);
    assert_eq!(r["regime"], "Surplus");
    assert!(r["generation"]["Wind_Offshore"].as_f64().is_some());
    assert_eq!(r["storage"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn trace_range_past_end_is_empty() {
    let (status, json) = get_json(build_api_state("baseline"), "/trace?from=500").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn trace_rejects_inverted_range() {
    let (status, json) = get_json(build_api_state("baseline"), "/trace?from=10&to=5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().is_some());
}
