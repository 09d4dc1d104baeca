//! Demand suppliers: 24-hour demand shapes tiled over the horizon.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::types::{HOURS_PER_DAY, Horizon};

/// Component-based demand built from seasonal shapes and roadmap peaks.
pub mod components;

pub use components::ComponentDemand;

/// Time of year selecting which demand shapes apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Summer,
    /// Spring and autumn.
    Shoulder,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Winter => "winter",
            Season::Summer => "summer",
            Season::Shoulder => "shoulder",
        };
        f.pad(name)
    }
}

/// Produces the demand series consumed by the dispatch engine.
pub trait DemandSupplier {
    /// Demand for each hour of a representative day (GW).
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the supplier has no data for `year`.
    fn daily_profile(
        &self,
        year: u16,
        season: Season,
    ) -> Result<[f64; HOURS_PER_DAY], ConfigError>;

    /// Demand for every step of the horizon (GW).
    ///
    /// Repeats the daily profile once per simulated day.
    ///
    /// # Errors
    ///
    /// Propagates the error from [`DemandSupplier::daily_profile`].
    fn demand_series(
        &self,
        year: u16,
        season: Season,
        horizon: Horizon,
    ) -> Result<Vec<f64>, ConfigError> {
        let profile = self.daily_profile(year, season)?;
        Ok(profile
            .iter()
            .copied()
            .cycle()
            .take(horizon.total_steps())
            .collect())
    }
}

/// Constant demand at every hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatDemand {
    pub gw: f64,
}

impl DemandSupplier for FlatDemand {
    fn daily_profile(
        &self,
        _year: u16,
        _season: Season,
    ) -> Result<[f64; HOURS_PER_DAY], ConfigError> {
        Ok([self.gw; HOURS_PER_DAY])
    }
}

/// Fixed 24-hour profile, independent of year and season.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileDemand {
    pub hourly_gw: [f64; HOURS_PER_DAY],
}

impl DemandSupplier for ProfileDemand {
    fn daily_profile(
        &self,
        _year: u16,
        _season: Season,
    ) -> Result<[f64; HOURS_PER_DAY], ConfigError> {
        Ok(self.hourly_gw)
    }
}
