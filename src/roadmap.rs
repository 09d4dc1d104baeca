//! Fleet and demand-component milestones with yearly interpolation.
//!
//! Milestones are published for 2025, 2030 and 2035; intermediate years
//! interpolate linearly between the two surrounding milestones.

use serde::Serialize;

use crate::error::ConfigError;
use crate::fleet::{Source, SourceMap};

/// First year covered by the roadmap.
pub const FIRST_YEAR: u16 = 2025;
/// Last year covered by the roadmap.
pub const LAST_YEAR: u16 = 2035;

const MILESTONE_YEARS: [u16; 3] = [2025, 2030, 2035];

const CAPACITY_MILESTONES: [(Source, [f64; 3]); 10] = [
    (Source::Nuclear, [5.88, 6.5, 11.0]),
    (Source::Solar, [15.7, 45.0, 62.0]),
    (Source::HydroRunOfRiver, [1.47, 1.5, 1.5]),
    (Source::WindOffshore, [15.5, 45.0, 75.0]),
    (Source::WindOnshore, [15.2, 27.0, 36.0]),
    (Source::Biomass, [4.8, 4.0, 3.5]),
    (Source::Interconnectors, [10.8, 18.0, 22.0]),
    (Source::GasCcgt, [30.5, 32.0, 9.0]),
    (Source::GasOcgt, [2.4, 2.5, 2.5]),
    (Source::GasOil, [0.1, 0.5, 0.5]),
];

const STORAGE_POWER_GW: [f64; 3] = [10.8, 25.0, 45.0];
const STORAGE_ENERGY_GWH: [f64; 3] = [42.5, 120.0, 250.0];

const BASELOAD_PEAK_GW: [f64; 3] = [40.0, 42.0, 44.0];
const HEAT_PUMP_PEAK_GW: [f64; 3] = [2.0, 8.0, 18.0];
const EV_PEAK_GW: [f64; 3] = [3.0, 10.0, 20.0];
const SOLAR_BTM_GW: [f64; 3] = [5.0, 10.0, 15.0];

/// Installed fleet for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetPlan {
    pub year: u16,
    /// Generation capacity per source (GW).
    pub capacities: SourceMap,
    /// Aggregate storage discharge power (GW).
    pub storage_power_gw: f64,
    /// Aggregate storage energy (GWh).
    pub storage_energy_gwh: f64,
}

/// Peak size of each demand component for one year (GW).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemandComponents {
    pub baseload_gw: f64,
    pub heat_pump_gw: f64,
    pub ev_gw: f64,
    /// Behind-the-meter solar capacity, netted off demand.
    pub solar_btm_gw: f64,
}

/// Checks that `year` lies inside the roadmap.
pub fn check_year(year: u16) -> Result<(), ConfigError> {
    if (FIRST_YEAR..=LAST_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(ConfigError::new(
            "simulation.year",
            format!("must be in {FIRST_YEAR}..={LAST_YEAR}, got {year}"),
        ))
    }
}

fn interpolate(year: u16, values: &[f64; 3]) -> f64 {
    let idx = MILESTONE_YEARS
        .windows(2)
        .position(|w| year <= w[1])
        .unwrap_or(MILESTONE_YEARS.len() - 2);
    let (y0, y1) = (MILESTONE_YEARS[idx], MILESTONE_YEARS[idx + 1]);
    let t = f64::from(year.saturating_sub(y0)) / f64::from(y1 - y0);
    values[idx] * (1.0 - t) + values[idx + 1] * t
}

/// Fleet installed in `year`.
///
/// # Errors
///
/// Returns a `ConfigError` if `year` is outside 2025..=2035.
pub fn fleet_for_year(year: u16) -> Result<FleetPlan, ConfigError> {
    check_year(year)?;
    Ok(FleetPlan {
        year,
        capacities: CAPACITY_MILESTONES
            .iter()
            .map(|(source, values)| (*source, interpolate(year, values)))
            .collect(),
        storage_power_gw: interpolate(year, &STORAGE_POWER_GW),
        storage_energy_gwh: interpolate(year, &STORAGE_ENERGY_GWH),
    })
}

/// Demand component peaks in `year`.
///
/// # Errors
///
/// Returns a `ConfigError` if `year` is outside 2025..=2035.
pub fn demand_components_for_year(year: u16) -> Result<DemandComponents, ConfigError> {
    check_year(year)?;
    Ok(DemandComponents {
        baseload_gw: interpolate(year, &BASELOAD_PEAK_GW),
        heat_pump_gw: interpolate(year, &HEAT_PUMP_PEAK_GW),
        ev_gw: interpolate(year, &EV_PEAK_GW),
        solar_btm_gw: interpolate(year, &SOLAR_BTM_GW),
    })
}
