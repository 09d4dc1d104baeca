//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use gridsim::fleet::{DaylightWindow, Source, SourceMap, StorageAsset, StorageKind};
use gridsim::sim::types::{DispatchInputs, Horizon};

/// Tolerance for floating point comparisons (GW or GWh).
pub const EPS: f64 = 1e-9;

/// Every source available at the given factor.
pub fn availability(factor: f64) -> SourceMap {
    Source::MERIT_ORDER.into_iter().map(|s| (s, factor)).collect()
}

/// Inputs with full availability, a 06:00-18:00 daylight window and flat demand.
pub fn flat_inputs(
    capacities: &[(Source, f64)],
    demand_gw: f64,
    storage: Vec<StorageAsset>,
    horizon: Horizon,
) -> DispatchInputs {
    DispatchInputs {
        capacities: capacities.iter().copied().collect(),
        availability: availability(1.0),
        daylight: DaylightWindow::new(6.0, 12.0),
        storage,
        demand_gw: vec![demand_gw; horizon.total_steps()],
    }
}

/// Same as [`flat_inputs`] with a 24-hour demand profile repeated each day.
pub fn profile_inputs(
    capacities: &[(Source, f64)],
    profile: &[f64; 24],
    storage: Vec<StorageAsset>,
    horizon: Horizon,
) -> DispatchInputs {
    DispatchInputs {
        demand_gw: profile
            .iter()
            .copied()
            .cycle()
            .take(horizon.total_steps())
            .collect(),
        ..flat_inputs(capacities, 0.0, storage, horizon)
    }
}

pub fn battery(power_gw: f64, energy_gwh: f64, efficiency: f64) -> StorageAsset {
    StorageAsset::new(StorageKind::Batteries, power_gw, power_gw, energy_gwh, efficiency)
        .expect("valid battery")
}

pub fn pumped_hydro(power_gw: f64, charge_gw: f64, energy_gwh: f64) -> StorageAsset {
    StorageAsset::new(StorageKind::PumpedHydro, power_gw, charge_gw, energy_gwh, 0.75)
        .expect("valid pumped hydro")
}

pub fn one_day() -> Horizon {
    Horizon::new(1)
}
