//! Post-hoc KPI computation from a simulation trace.

use std::fmt;

use serde::Serialize;

use super::types::{Regime, SimulationTrace};

/// Aggregate adequacy indicators derived from a complete run.
///
/// Computed post-hoc from the trace so reported figures always agree with
/// the per-step data. Steps are one hour, so GW summed over steps is GWh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of steps in the run.
    pub steps: usize,
    /// Total demand energy (GWh).
    pub demand_gwh: f64,
    /// Demand left unserved after storage (GWh).
    pub unmet_demand_gwh: f64,
    /// Largest single-hour shortfall after storage (GW).
    pub peak_unmet_gw: f64,
    /// Hours with unserved demand after storage.
    pub shortfall_hours: usize,
    /// Hours where potential generation covered demand.
    pub surplus_hours: usize,
    /// Renewable energy curtailed (GWh).
    pub renewable_curtailed_gwh: f64,
    /// Surplus neither consumed nor stored (GWh).
    pub wasted_gwh: f64,
    /// Grid energy absorbed by storage (GWh).
    pub charged_gwh: f64,
    /// Energy delivered by storage (GWh).
    pub discharged_gwh: f64,
    /// Total storage energy capacity (GWh).
    pub storage_energy_gwh: f64,
    /// Lowest fleet-wide state of charge reached, as a fraction of capacity.
    pub min_storage_fraction: f64,
}

impl RunSummary {
    /// Computes all KPIs from a complete trace.
    pub fn from_trace(trace: &SimulationTrace) -> Self {
        let mut demand_gwh = 0.0_f64;
        let mut unmet_demand_gwh = 0.0_f64;
        let mut peak_unmet_gw = 0.0_f64;
        let mut shortfall_hours = 0_usize;
        let mut surplus_hours = 0_usize;
        let mut charged_gwh = 0.0_f64;
        let mut discharged_gwh = 0.0_f64;
        let mut min_storage_fraction = 1.0_f64;

        for r in &trace.steps {
            demand_gwh += r.demand_gw;
            charged_gwh += r.charged_gw;
            discharged_gwh += r.discharged_gw;

            let unmet = r.unmet_demand_gw();
            if unmet > 0.0 {
                unmet_demand_gwh += unmet;
                peak_unmet_gw = peak_unmet_gw.max(unmet);
                shortfall_hours += 1;
            }
            if r.regime == Regime::Surplus {
                surplus_hours += 1;
            }

            if trace.storage_energy_gwh > 0.0 {
                let stored: f64 = r.storage.iter().map(|f| f.soc_gwh).sum();
                min_storage_fraction = min_storage_fraction.min(stored / trace.storage_energy_gwh);
            }
        }

        Self {
            steps: trace.steps.len(),
            demand_gwh,
            unmet_demand_gwh,
            peak_unmet_gw,
            shortfall_hours,
            surplus_hours,
            renewable_curtailed_gwh: trace.renewable_curtailed_gwh,
            wasted_gwh: trace.wasted_gwh,
            charged_gwh,
            discharged_gwh,
            storage_energy_gwh: trace.storage_energy_gwh,
            min_storage_fraction,
        }
    }

    /// Share of demand energy that was served (0.0 to 1.0).
    pub fn served_fraction(&self) -> f64 {
        if self.demand_gwh > 0.0 {
            1.0 - self.unmet_demand_gwh / self.demand_gwh
        } else {
            1.0
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Adequacy Report ({} h) ---", self.steps)?;
        writeln!(f, "Demand:                {:.1} GWh", self.demand_gwh)?;
        writeln!(
            f,
            "Unmet demand:          {:.1} GWh ({:.2}% served)",
            self.unmet_demand_gwh,
            self.served_fraction() * 100.0
        )?;
        writeln!(f, "Peak shortfall:        {:.2} GW", self.peak_unmet_gw)?;
        writeln!(f, "Shortfall hours:       {}", self.shortfall_hours)?;
        writeln!(f, "Surplus hours:         {}", self.surplus_hours)?;
        writeln!(f, "Renewable curtailed:   {:.1} GWh", self.renewable_curtailed_gwh)?;
        writeln!(f, "Unstored surplus:      {:.1} GWh", self.wasted_gwh)?;
        writeln!(
            f,
            "Storage throughput:    +{:.1} / -{:.1} GWh",
            self.charged_gwh, self.discharged_gwh
        )?;
        write!(
            f,
            "Storage capacity:      {:.1} GWh (min {:.1}% full)",
            self.storage_energy_gwh,
            self.min_storage_fraction * 100.0
        )
    }
}
