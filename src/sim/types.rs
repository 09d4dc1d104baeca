//! Core simulation types: horizon, engine inputs, and per-step records.

use std::fmt;

use serde::Serialize;

use crate::error::ConfigError;
use crate::fleet::{DaylightWindow, SourceMap, StorageAsset, StorageKind};

/// Hours in one simulated day; every step is one hour.
pub const HOURS_PER_DAY: usize = 24;

/// Simulation horizon in whole days of hourly steps.
///
/// # Examples
///
/// ```
/// use gridsim::sim::types::Horizon;
///
/// let horizon = Horizon::default();
/// assert_eq!(horizon.total_steps(), 96);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Horizon {
    /// Number of days to simulate, in `1..=Horizon::MAX_DAYS`.
    pub days: usize,
}

impl Horizon {
    /// Longest accepted run: one leap year.
    pub const MAX_DAYS: usize = 366;

    pub fn new(days: usize) -> Self {
        Self { days }
    }

    /// Total number of hourly steps across all days.
    ///
    /// Saturates for day counts that [`Horizon::validate`] rejects.
    pub fn total_steps(&self) -> usize {
        self.days.saturating_mul(HOURS_PER_DAY)
    }

    /// Checks that the day count is in `1..=MAX_DAYS`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` on `simulation.days` otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.days == 0 {
            return Err(ConfigError::new("simulation.days", "must be > 0"));
        }
        if self.days > Self::MAX_DAYS {
            return Err(ConfigError::new(
                "simulation.days",
                format!("must be <= {}, got {}", Self::MAX_DAYS, self.days),
            ));
        }
        Ok(())
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self { days: 4 }
    }
}

/// Fully resolved inputs for one dispatch run.
#[derive(Debug, Clone)]
pub struct DispatchInputs {
    /// Installed capacity per source (GW).
    pub capacities: SourceMap,
    /// Availability factor per source; the Solar entry is the peak factor.
    pub availability: SourceMap,
    /// Daylight arc for solar output.
    pub daylight: DaylightWindow,
    /// Storage fleet. State of charge is reset to full when a run starts.
    pub storage: Vec<StorageAsset>,
    /// Demand per step (GW), one entry per horizon step.
    pub demand_gw: Vec<f64>,
}

/// Balance state of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Regime {
    /// Potential generation covers demand.
    Surplus,
    /// Potential generation falls short of demand.
    Deficit,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Surplus => f.pad("surplus"),
            Regime::Deficit => f.pad("deficit"),
        }
    }
}

/// Charge, discharge and resulting state of one storage asset in one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageFlow {
    pub kind: StorageKind,
    /// Grid power absorbed (GW, >= 0).
    pub charge_gw: f64,
    /// Power delivered to the grid (GW, >= 0).
    pub discharge_gw: f64,
    /// State of charge after the step (GWh).
    pub soc_gwh: f64,
}

/// Complete record of one simulation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    /// Step index from the start of the run.
    pub step: usize,
    pub hour_of_day: usize,
    pub demand_gw: f64,
    pub regime: Regime,
    /// Pre-allocation potential per source (GW).
    pub potential: SourceMap,
    /// Dispatched output per source (GW), including output attributed to storage charging.
    pub generation: SourceMap,
    /// Per-asset storage activity, in fleet order.
    pub storage: Vec<StorageFlow>,
    /// Total potential minus demand, ignoring storage (GW).
    pub generation_excess_gw: f64,
    /// Total grid power absorbed by storage (GW).
    pub charged_gw: f64,
    /// Total power delivered by storage (GW).
    pub discharged_gw: f64,
    /// Surplus (positive) or unmet demand (negative) after storage acted (GW).
    pub residual_excess_gw: f64,
    /// Surplus neither consumed nor stored (GW).
    pub wasted_gw: f64,
    /// Share of the residual surplus attributable to renewable sources (GW).
    pub renewable_curtailment_gw: f64,
}

impl StepRecord {
    /// Unmet demand after storage (GW, >= 0).
    pub fn unmet_demand_gw(&self) -> f64 {
        (-self.residual_excess_gw).max(0.0)
    }

    /// Sum of dispatched generation across sources (GW).
    pub fn total_generation_gw(&self) -> f64 {
        self.generation.values().sum()
    }
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h={:>3} (D{} {:02}:00) {:<7} | demand={:>7.2} GW  gen={:>7.2} GW \
             | store +{:.2}/-{:.2} GW | residual={:>7.2} GW  curtailed={:.2} GW",
            self.step,
            self.step / HOURS_PER_DAY + 1,
            self.hour_of_day,
            self.regime,
            self.demand_gw,
            self.total_generation_gw(),
            self.charged_gw,
            self.discharged_gw,
            self.residual_excess_gw,
            self.renewable_curtailment_gw,
        )?;
        for flow in &self.storage {
            write!(f, "  {}={:.1} GWh", flow.kind, flow.soc_gwh)?;
        }
        Ok(())
    }
}

/// Ordered per-step output of a run, plus run-level accumulators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationTrace {
    pub steps: Vec<StepRecord>,
    /// Total storage energy capacity of the fleet (GWh).
    pub storage_energy_gwh: f64,
    /// Renewable energy curtailed over the run (GWh).
    pub renewable_curtailed_gwh: f64,
    /// Surplus energy neither consumed nor stored over the run (GWh).
    pub wasted_gwh: f64,
}
