//! Weather scenarios and the availability factors they imply.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::demand::Season;
use crate::fleet::{DaylightWindow, Source, SourceMap};

/// A multi-day weather pattern applied uniformly over the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    /// Cold, still, overcast winter spell with little wind or sun.
    #[default]
    Dunkelflaute,
    /// Long windy summer days with strong solar output.
    SummerWindy,
}

impl Weather {
    pub const ALL: [Weather; 2] = [Weather::Dunkelflaute, Weather::SummerWindy];

    pub fn name(self) -> &'static str {
        match self {
            Weather::Dunkelflaute => "dunkelflaute",
            Weather::SummerWindy => "summer_windy",
        }
    }

    pub fn wind_offshore_factor(self) -> f64 {
        match self {
            Weather::Dunkelflaute => 0.10,
            Weather::SummerWindy => 0.85,
        }
    }

    pub fn wind_onshore_factor(self) -> f64 {
        match self {
            Weather::Dunkelflaute => 0.05,
            Weather::SummerWindy => 0.75,
        }
    }

    /// Solar output at the daylight peak as a fraction of capacity.
    pub fn solar_peak_factor(self) -> f64 {
        match self {
            Weather::Dunkelflaute => 0.10,
            Weather::SummerWindy => 0.80,
        }
    }

    /// Net import availability; summer surpluses leave nothing to import.
    pub fn interconnector_factor(self) -> f64 {
        match self {
            Weather::Dunkelflaute => 0.10,
            Weather::SummerWindy => 0.0,
        }
    }

    pub fn daylight(self) -> DaylightWindow {
        match self {
            Weather::Dunkelflaute => DaylightWindow::new(8.0, 8.0),
            Weather::SummerWindy => DaylightWindow::new(5.0, 16.0),
        }
    }

    /// Demand season the weather pattern belongs to.
    pub fn season(self) -> Season {
        match self {
            Weather::Dunkelflaute => Season::Winter,
            Weather::SummerWindy => Season::Summer,
        }
    }

    /// Availability factor for every source under this weather.
    ///
    /// Weather-independent plant uses fixed factors; the Solar entry is the
    /// peak factor applied at the top of the daylight arc.
    pub fn default_availability(self) -> SourceMap {
        Source::MERIT_ORDER
            .into_iter()
            .map(|source| {
                let factor = match source {
                    Source::Nuclear => 0.90,
                    Source::Solar => self.solar_peak_factor(),
                    Source::HydroRunOfRiver => 0.80,
                    Source::WindOffshore => self.wind_offshore_factor(),
                    Source::WindOnshore => self.wind_onshore_factor(),
                    Source::Biomass => 0.95,
                    Source::Interconnectors => self.interconnector_factor(),
                    Source::GasCcgt | Source::GasOcgt | Source::GasOil => 1.0,
                };
                (source, factor)
            })
            .collect()
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
