//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::fleet::SourceMap;
use crate::sim::kpi::RunSummary;
use crate::sim::types::{Regime, StepRecord, StorageFlow};

/// Scenario and run-level indicators.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub scenario: ScenarioConfig,
    pub summary: RunSummary,
    /// Number of steps available from `/trace`.
    pub steps: usize,
}

/// One step of the trace as served by the API.
///
/// Carries dispatched generation only; pre-allocation potential stays in
/// the CSV export.
#[derive(Debug, Serialize)]
pub struct TraceRecord {
    pub step: usize,
    pub hour_of_day: usize,
    pub demand_gw: f64,
    pub regime: Regime,
    /// Dispatched output keyed by source name (GW).
    pub generation: SourceMap,
    pub storage: Vec<StorageFlow>,
    pub residual_excess_gw: f64,
    /// Demand left unserved after storage (GW).
    pub unmet_demand_gw: f64,
    pub wasted_gw: f64,
    pub renewable_curtailment_gw: f64,
}

impl From<&StepRecord> for TraceRecord {
    fn from(r: &StepRecord) -> Self {
        Self {
            step: r.step,
            hour_of_day: r.hour_of_day,
            demand_gw: r.demand_gw,
            regime: r.regime,
            generation: r.generation.clone(),
            storage: r.storage.clone(),
            residual_excess_gw: r.residual_excess_gw,
            unmet_demand_gw: r.unmet_demand_gw(),
            wasted_gw: r.wasted_gw,
            renewable_curtailment_gw: r.renewable_curtailment_gw,
        }
    }
}

/// Optional range query parameters for the trace endpoint.
#[derive(Debug, Deserialize)]
pub struct TraceQuery {
    /// First step (inclusive).
    pub from: Option<usize>,
    /// Last step (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
