use super::{DemandSupplier, Season};
use crate::error::ConfigError;
use crate::roadmap::{self, DemandComponents};
use crate::sim::types::HOURS_PER_DAY;

type Shape = [f64; HOURS_PER_DAY];

/// Normalized 24-hour shapes for each demand component in one season.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalShapes {
    pub baseload: Shape,
    pub heat_pump: Shape,
    pub ev_charging: Shape,
    pub solar_btm: Shape,
}

const WINTER: SeasonalShapes = SeasonalShapes {
    baseload: [
        0.69, 0.67, 0.66, 0.65, 0.68, 0.80, 0.99, 1.00, 0.98, 0.95, 0.93, 0.90, 0.88, 0.87, 0.88,
        0.92, 0.97, 1.00, 0.98, 0.94, 0.88, 0.78, 0.73, 0.70,
    ],
    heat_pump: [
        0.60, 0.55, 0.52, 0.50, 0.55, 0.70, 0.85, 0.90, 0.80, 0.70, 0.65, 0.60, 0.55, 0.55, 0.60,
        0.75, 0.95, 1.00, 1.00, 0.95, 0.85, 0.75, 0.68, 0.63,
    ],
    ev_charging: [
        0.15, 0.12, 0.10, 0.08, 0.08, 0.10, 0.20, 0.35, 0.25, 0.15, 0.12, 0.10, 0.10, 0.12, 0.15,
        0.25, 0.50, 0.75, 1.00, 0.95, 0.80, 0.60, 0.40, 0.25,
    ],
    solar_btm: [
        0.00, 0.00, 0.00, 0.00, 0.00, 0.00, 0.00, 0.00, 0.05, 0.15, 0.25, 0.30, 0.30, 0.28, 0.22,
        0.12, 0.03, 0.00, 0.00, 0.00, 0.00, 0.00, 0.00, 0.00,
    ],
};

const SUMMER: SeasonalShapes = SeasonalShapes {
    baseload: [
        0.63, 0.61, 0.60, 0.59, 0.61, 0.68, 0.78, 0.85, 0.88, 0.90, 0.91, 0.92, 0.90, 0.88, 0.87,
        0.88, 0.92, 0.95, 0.93, 0.88, 0.82, 0.75, 0.70, 0.66,
    ],
    heat_pump: [
        0.10, 0.08, 0.08, 0.08, 0.08, 0.10, 0.12, 0.15, 0.18, 0.22, 0.25, 0.28, 0.30, 0.32, 0.33,
        0.33, 0.32, 0.30, 0.28, 0.25, 0.20, 0.15, 0.12, 0.10,
    ],
    ev_charging: [
        0.12, 0.10, 0.08, 0.07, 0.07, 0.08, 0.15, 0.28, 0.22, 0.13, 0.10, 0.09, 0.09, 0.10, 0.12,
        0.20, 0.45, 0.70, 0.95, 0.90, 0.75, 0.55, 0.35, 0.20,
    ],
    solar_btm: [
        0.00, 0.00, 0.00, 0.00, 0.00, 0.05, 0.20, 0.40, 0.60, 0.75, 0.85, 0.92, 0.95, 0.92, 0.85,
        0.75, 0.60, 0.40, 0.20, 0.08, 0.02, 0.00, 0.00, 0.00,
    ],
};

fn blend(winter: &Shape, summer: &Shape, winter_weight: f64) -> Shape {
    std::array::from_fn(|h| winter[h] * winter_weight + summer[h] * (1.0 - winter_weight))
}

impl SeasonalShapes {
    /// Shapes for `season`; shoulder months blend winter and summer.
    pub fn for_season(season: Season) -> Self {
        match season {
            Season::Winter => WINTER,
            Season::Summer => SUMMER,
            Season::Shoulder => Self {
                baseload: blend(&WINTER.baseload, &SUMMER.baseload, 0.6),
                heat_pump: blend(&WINTER.heat_pump, &SUMMER.heat_pump, 0.5),
                ev_charging: blend(&WINTER.ev_charging, &SUMMER.ev_charging, 0.5),
                solar_btm: blend(&WINTER.solar_btm, &SUMMER.solar_btm, 0.3),
            },
        }
    }
}

/// Demand built bottom-up from baseload, heat pumps, EV charging and
/// behind-the-meter solar.
///
/// Each component's normalized seasonal shape is scaled by its roadmap peak
/// for the year. Behind-the-meter solar is netted off, and the total never
/// goes below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComponentDemand {
    /// Fixed component peaks; when `None` they come from the roadmap year.
    pub components: Option<DemandComponents>,
}

impl ComponentDemand {
    pub fn with_components(components: DemandComponents) -> Self {
        Self {
            components: Some(components),
        }
    }

    /// Hourly demand from explicit component peaks.
    pub fn profile_for(components: &DemandComponents, season: Season) -> Shape {
        let shapes = SeasonalShapes::for_season(season);
        std::array::from_fn(|h| {
            let total = shapes.baseload[h] * components.baseload_gw
                + shapes.heat_pump[h] * components.heat_pump_gw
                + shapes.ev_charging[h] * components.ev_gw
                - shapes.solar_btm[h] * components.solar_btm_gw;
            total.max(0.0)
        })
    }
}

impl DemandSupplier for ComponentDemand {
    fn daily_profile(&self, year: u16, season: Season) -> Result<Shape, ConfigError> {
        let components = match self.components {
            Some(c) => c,
            None => roadmap::demand_components_for_year(year)?,
        };
        Ok(Self::profile_for(&components, season))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::types::Horizon;

    fn unit_components() -> DemandComponents {
        DemandComponents {
            baseload_gw: 1.0,
            heat_pump_gw: 1.0,
            ev_gw: 1.0,
            solar_btm_gw: 1.0,
        }
    }

    #[test]
    fn total_is_sum_minus_btm_solar() {
        let p = ComponentDemand::profile_for(&unit_components(), Season::Winter);
        // Hour 12: 0.88 + 0.55 + 0.10 - 0.30
        assert!((p[12] - 1.23).abs() < 1e-12);
        // Hour 0 has no solar.
        assert!((p[0] - (0.69 + 0.60 + 0.15)).abs() < 1e-12);
    }

    #[test]
    fn demand_floored_at_zero() {
        let components = DemandComponents {
            baseload_gw: 1.0,
            heat_pump_gw: 0.0,
            ev_gw: 0.0,
            solar_btm_gw: 10.0,
        };
        let p = ComponentDemand::profile_for(&components, Season::Summer);
        assert_eq!(p[12], 0.0);
        assert!(p[0] > 0.0);
    }

    #[test]
    fn shoulder_blends_winter_and_summer() {
        let s = SeasonalShapes::for_season(Season::Shoulder);
        assert!((s.baseload[0] - (0.69 * 0.6 + 0.63 * 0.4)).abs() < 1e-12);
        assert!((s.heat_pump[17] - (1.00 * 0.5 + 0.30 * 0.5)).abs() < 1e-12);
        assert!((s.solar_btm[12] - (0.30 * 0.3 + 0.95 * 0.7)).abs() < 1e-12);
    }

    #[test]
    fn roadmap_year_drives_peaks() {
        let d = ComponentDemand::default();
        let p2025 = d.daily_profile(2025, Season::Winter).unwrap();
        let p2035 = d.daily_profile(2035, Season::Winter).unwrap();
        // Winter evening peak grows with heat pump and EV uptake.
        assert!(p2035[18] > p2025[18]);
        let expected = 0.98 * 40.0 + 1.00 * 2.0 + 1.00 * 3.0;
        assert!((p2025[18] - expected).abs() < 1e-9);
    }

    #[test]
    fn series_tiles_four_days() {
        let series = ComponentDemand::default()
            .demand_series(2030, Season::Winter, Horizon::default())
            .unwrap();
        assert_eq!(series.len(), 96);
        assert_eq!(series[7], series[7 + 72]);
    }

    #[test]
    fn year_outside_roadmap_is_an_error() {
        let err = ComponentDemand::default()
            .demand_series(2040, Season::Winter, Horizon::default())
            .unwrap_err();
        assert_eq!(err.field, "simulation.year");
        assert!(ComponentDemand::default().daily_profile(2024, Season::Summer).is_err());
    }

    #[test]
    fn explicit_components_ignore_the_roadmap_year() {
        let d = ComponentDemand::with_components(unit_components());
        let p = d.daily_profile(2040, Season::Winter).unwrap();
        assert_eq!(p, ComponentDemand::profile_for(&unit_components(), Season::Winter));
    }
}
