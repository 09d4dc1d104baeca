//! Generation technologies, their dispatch priority, and renewable tagging.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A generation technology connected to the grid.
///
/// Variant order is the merit order, so `Ord` on `Source` sorts by dispatch
/// priority and a [`SourceMap`] iterates cheapest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Source {
    Nuclear,
    Solar,
    #[serde(rename = "Hydro_RunOfRiver")]
    HydroRunOfRiver,
    #[serde(rename = "Wind_Offshore")]
    WindOffshore,
    #[serde(rename = "Wind_Onshore")]
    WindOnshore,
    Biomass,
    Interconnectors,
    #[serde(rename = "Gas_CCGT")]
    GasCcgt,
    #[serde(rename = "Gas_OCGT")]
    GasOcgt,
    #[serde(rename = "Gas_Oil")]
    GasOil,
}

/// Per-source values (capacity, availability factor, or power in GW).
///
/// A missing key means the source is absent from the fleet.
pub type SourceMap = BTreeMap<Source, f64>;

impl Source {
    /// Dispatch priority, highest first: must-run and renewable plant ahead
    /// of flexible thermal plant.
    pub const MERIT_ORDER: [Source; 10] = [
        Source::Nuclear,
        Source::Solar,
        Source::HydroRunOfRiver,
        Source::WindOffshore,
        Source::WindOnshore,
        Source::Biomass,
        Source::Interconnectors,
        Source::GasCcgt,
        Source::GasOcgt,
        Source::GasOil,
    ];

    /// Whether unused output from this source counts as renewable curtailment.
    pub fn is_renewable(self) -> bool {
        matches!(
            self,
            Source::Solar | Source::HydroRunOfRiver | Source::WindOffshore | Source::WindOnshore
        )
    }

    /// External name used in scenario files, CSV headers, and API payloads.
    pub fn name(self) -> &'static str {
        match self {
            Source::Nuclear => "Nuclear",
            Source::Solar => "Solar",
            Source::HydroRunOfRiver => "Hydro_RunOfRiver",
            Source::WindOffshore => "Wind_Offshore",
            Source::WindOnshore => "Wind_Onshore",
            Source::Biomass => "Biomass",
            Source::Interconnectors => "Interconnectors",
            Source::GasCcgt => "Gas_CCGT",
            Source::GasOcgt => "Gas_OCGT",
            Source::GasOil => "Gas_Oil",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reads `map[source]`, treating a missing entry as zero.
pub fn get_or_zero(map: &SourceMap, source: Source) -> f64 {
    map.get(&source).copied().unwrap_or(0.0)
}
