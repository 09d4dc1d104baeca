//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::demand::{ComponentDemand, DemandSupplier, FlatDemand, ProfileDemand, Season};
use crate::error::ConfigError;
use crate::fleet::{DaylightWindow, SourceMap, StorageAsset, StorageKind};
use crate::roadmap;
use crate::sim::types::{DispatchInputs, HOURS_PER_DAY, Horizon};
use crate::weather::Weather;

/// Top-level scenario configuration parsed from TOML.
///
/// Every table is optional. A scenario with no tables at all is the
/// 2025 Dunkelflaute baseline: roadmap fleet, weather availability and
/// component-based demand. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::baseline`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Year, weather and horizon.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Installed capacity per source (GW). Replaces the roadmap fleet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<SourceMap>,
    /// Availability factors merged over the weather defaults.
    #[serde(default, skip_serializing_if = "SourceMap::is_empty")]
    pub availability: SourceMap,
    /// Daylight window replacing the weather's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daylight: Option<DaylightWindow>,
    /// Storage fleet.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Demand model.
    #[serde(default)]
    pub demand: DemandConfig,
}

/// Simulation year, weather and horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Roadmap year (2025..=2035).
    pub year: u16,
    pub weather: Weather,
    /// Number of days to simulate, in `1..=Horizon::MAX_DAYS`.
    pub days: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            year: roadmap::FIRST_YEAR,
            weather: Weather::Dunkelflaute,
            days: Horizon::default().days,
        }
    }
}

/// Storage fleet, either as totals split by the default policy or as
/// explicit per-asset tables.
///
/// With neither, the roadmap totals for the year are split.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Total discharge power (GW).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_gw: Option<f64>,
    /// Total energy capacity (GWh).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_gwh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pumped_hydro: Option<StorageAssetConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batteries: Option<StorageAssetConfig>,
}

/// One storage asset. Charge power and efficiency default per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageAssetConfig {
    /// Discharge power (GW).
    pub power_gw: f64,
    /// Energy capacity (GWh).
    pub energy_gwh: f64,
    /// Charge power (GW).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_gw: Option<f64>,
    /// Charge efficiency in (0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
}

impl StorageAssetConfig {
    fn to_asset(&self, kind: StorageKind) -> Result<StorageAsset, ConfigError> {
        StorageAsset::new(
            kind,
            self.power_gw,
            self.charge_gw
                .unwrap_or(self.power_gw * kind.charge_ratio()),
            self.energy_gwh,
            self.efficiency.unwrap_or(kind.default_efficiency()),
        )
    }
}

/// Demand model selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandModel {
    /// Seasonal component shapes scaled by the roadmap year.
    #[default]
    Components,
    /// Constant `flat_gw` at every hour.
    Flat,
    /// Fixed 24-value `profile_gw` repeated every day.
    Profile,
}

/// Demand model and its parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    pub model: DemandModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_gw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_gw: Option<Vec<f64>>,
    /// Overrides the season implied by the weather.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
}

fn check_non_negative(errors: &mut Vec<ConfigError>, field: String, value: f64) {
    if !value.is_finite() || value < 0.0 {
        errors.push(ConfigError::new(
            field,
            format!("must be finite and >= 0, got {value}"),
        ));
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: 2025 roadmap in a Dunkelflaute.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the 2035 fleet facing a four-day Dunkelflaute.
    pub fn dunkelflaute_2035() -> Self {
        Self {
            simulation: SimulationConfig {
                year: 2035,
                weather: Weather::Dunkelflaute,
                ..SimulationConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the 2035 fleet in windy, sunny summer weather.
    pub fn summer_windy_2035() -> Self {
        Self {
            simulation: SimulationConfig {
                year: 2035,
                weather: Weather::SummerWindy,
                ..SimulationConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "dunkelflaute_2035", "summer_windy_2035"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "dunkelflaute_2035" => Ok(Self::dunkelflaute_2035()),
            "summer_windy_2035" => Ok(Self::summer_windy_2035()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Simulation horizon.
    pub fn horizon(&self) -> Horizon {
        Horizon::new(self.simulation.days)
    }

    /// Demand season: the explicit override, else the weather's season.
    pub fn season(&self) -> Season {
        self.demand
            .season
            .unwrap_or_else(|| self.simulation.weather.season())
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if let Err(e) = roadmap::check_year(s.year) {
            errors.push(e);
        }
        if let Err(e) = self.horizon().validate() {
            errors.push(e);
        }

        if let Some(capacity) = &self.capacity {
            for (source, &gw) in capacity {
                check_non_negative(&mut errors, format!("capacity.{source}"), gw);
            }
        }
        for (source, &factor) in &self.availability {
            check_non_negative(&mut errors, format!("availability.{source}"), factor);
        }

        if let Some(DaylightWindow { start_hour, hours }) = self.daylight {
            if !(0.0..HOURS_PER_DAY as f64).contains(&start_hour) {
                errors.push(ConfigError::new(
                    "daylight.start_hour",
                    format!("must be in [0, 24), got {start_hour}"),
                ));
            }
            if !(hours > 0.0 && hours <= HOURS_PER_DAY as f64) {
                errors.push(ConfigError::new(
                    "daylight.hours",
                    format!("must be in (0, 24], got {hours}"),
                ));
            }
        }

        let st = &self.storage;
        let per_asset = st.pumped_hydro.is_some() || st.batteries.is_some();
        if per_asset && (st.power_gw.is_some() || st.energy_gwh.is_some()) {
            errors.push(ConfigError::new(
                "storage",
                "totals cannot be combined with per-asset tables",
            ));
        }
        if let Some(power) = st.power_gw {
            check_non_negative(&mut errors, "storage.power_gw".into(), power);
        }
        if let Some(energy) = st.energy_gwh {
            check_non_negative(&mut errors, "storage.energy_gwh".into(), energy);
        }
        for (kind, asset) in [
            (StorageKind::PumpedHydro, &st.pumped_hydro),
            (StorageKind::Batteries, &st.batteries),
        ] {
            if let Some(Err(e)) = asset.as_ref().map(|a| a.to_asset(kind)) {
                errors.push(e);
            }
        }

        let d = &self.demand;
        match d.model {
            DemandModel::Components => {}
            DemandModel::Flat => match d.flat_gw {
                Some(gw) => check_non_negative(&mut errors, "demand.flat_gw".into(), gw),
                None => errors.push(ConfigError::new(
                    "demand.flat_gw",
                    "required when demand.model = \"flat\"",
                )),
            },
            DemandModel::Profile => match &d.profile_gw {
                Some(profile) if profile.len() != HOURS_PER_DAY => {
                    errors.push(ConfigError::new(
                        "demand.profile_gw",
                        format!("expected {HOURS_PER_DAY} values, got {}", profile.len()),
                    ));
                }
                Some(profile) => {
                    for (h, &gw) in profile.iter().enumerate() {
                        check_non_negative(&mut errors, format!("demand.profile_gw[{h}]"), gw);
                    }
                }
                None => errors.push(ConfigError::new(
                    "demand.profile_gw",
                    "required when demand.model = \"profile\"",
                )),
            },
        }

        errors
    }

    /// Builds the storage fleet for the scenario.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an invalid year or storage value.
    pub fn storage_assets(&self) -> Result<Vec<StorageAsset>, ConfigError> {
        let st = &self.storage;
        if st.pumped_hydro.is_some() || st.batteries.is_some() {
            // A kind without a table is present with zero ratings.
            return StorageKind::ALL
                .into_iter()
                .map(|kind| {
                    let table = match kind {
                        StorageKind::PumpedHydro => &st.pumped_hydro,
                        StorageKind::Batteries => &st.batteries,
                    };
                    match table {
                        Some(t) => t.to_asset(kind),
                        None => StorageAsset::with_defaults(kind, 0.0, 0.0),
                    }
                })
                .collect();
        }

        let plan = roadmap::fleet_for_year(self.simulation.year)?;
        StorageAsset::default_fleet(
            st.power_gw.unwrap_or(plan.storage_power_gw),
            st.energy_gwh.unwrap_or(plan.storage_energy_gwh),
        )
    }

    fn demand_supplier(&self) -> Box<dyn DemandSupplier> {
        let d = &self.demand;
        match d.model {
            DemandModel::Components => Box::new(ComponentDemand::default()),
            DemandModel::Flat => Box::new(FlatDemand {
                gw: d.flat_gw.unwrap_or(0.0),
            }),
            DemandModel::Profile => {
                let mut hourly_gw = [0.0; HOURS_PER_DAY];
                if let Some(profile) = &d.profile_gw {
                    for (slot, gw) in hourly_gw.iter_mut().zip(profile) {
                        *slot = *gw;
                    }
                }
                Box::new(ProfileDemand { hourly_gw })
            }
        }
    }

    /// Resolves the scenario into engine inputs and a horizon.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, if any.
    pub fn resolve(&self) -> Result<(DispatchInputs, Horizon), ConfigError> {
        if let Some(first) = self.validate().into_iter().next() {
            return Err(first);
        }

        let weather = self.simulation.weather;
        let capacities = match &self.capacity {
            Some(capacity) => capacity.clone(),
            None => roadmap::fleet_for_year(self.simulation.year)?.capacities,
        };
        let mut availability = weather.default_availability();
        availability.extend(self.availability.iter().map(|(&s, &f)| (s, f)));

        let horizon = self.horizon();
        let demand_gw = self
            .demand_supplier()
            .demand_series(self.simulation.year, self.season(), horizon)?;

        let inputs = DispatchInputs {
            capacities,
            availability,
            daylight: self.daylight.unwrap_or_else(|| weather.daylight()),
            storage: self.storage_assets()?,
            demand_gw,
        };
        Ok((inputs, horizon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::Source;
    use crate::fleet::source::get_or_zero;

    #[test]
    fn presets_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name).unwrap();
            let errors = cfg.validate();
            assert!(errors.is_empty(), "{name} should be valid: {errors:?}");
        }
    }

    #[test]
    fn from_preset_unknown() {
        let e = ScenarioConfig::from_preset("nonexistent").unwrap_err();
        assert_eq!(e.field, "preset");
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn empty_toml_is_baseline() {
        let cfg = ScenarioConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, ScenarioConfig::baseline());
        assert_eq!(cfg.horizon().total_steps(), 96);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
year = 2030
weather = "summer_windy"
days = 2

[capacity]
Nuclear = 10.0
Gas_CCGT = 5.0

[availability]
Nuclear = 0.8

[daylight]
start_hour = 6
hours = 12

[storage.pumped_hydro]
power_gw = 3.0
energy_gwh = 20.0

[storage.batteries]
power_gw = 5.0
energy_gwh = 10.0
charge_gw = 4.0
efficiency = 0.9

[demand]
model = "flat"
flat_gw = 12.0
season = "shoulder"
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).unwrap();
        assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());
        assert_eq!(cfg.simulation.weather, Weather::SummerWindy);
        assert_eq!(cfg.season(), Season::Shoulder);

        let (inputs, horizon) = cfg.resolve().unwrap();
        assert_eq!(horizon.total_steps(), 48);
        assert_eq!(inputs.capacities.len(), 2);
        assert_eq!(get_or_zero(&inputs.availability, Source::Nuclear), 0.8);
        assert_eq!(get_or_zero(&inputs.availability, Source::WindOffshore), 0.85);
        assert_eq!(inputs.daylight, DaylightWindow::new(6.0, 12.0));
        assert!(inputs.demand_gw.iter().all(|&d| d == 12.0));

        let ph = &inputs.storage[0];
        assert!((ph.charge_gw - 3.0 * 0.83).abs() < 1e-12);
        assert_eq!(ph.efficiency, 0.75);
        let bat = &inputs.storage[1];
        assert_eq!(bat.charge_gw, 4.0);
        assert_eq!(bat.efficiency, 0.9);
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
days = 2
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_source_rejected() {
        let toml = "[capacity]\nCoal = 3.0\n";
        let e = ScenarioConfig::from_toml_str(toml).unwrap_err();
        assert_eq!(e.field, "toml");
    }

    #[test]
    fn validation_catches_year_outside_roadmap() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.year = 2040;
        assert!(cfg.validate().iter().any(|e| e.field == "simulation.year"));
        assert!(cfg.resolve().is_err());
    }

    #[test]
    fn validation_catches_zero_days() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.days = 0;
        assert!(cfg.validate().iter().any(|e| e.field == "simulation.days"));
    }

    #[test]
    fn oversized_horizon_is_rejected_before_resolving() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.days = usize::MAX / 2;
        assert!(cfg.validate().iter().any(|e| e.field == "simulation.days"));
        let err = cfg.resolve().unwrap_err();
        assert_eq!(err.field, "simulation.days");

        cfg.simulation.days = Horizon::MAX_DAYS;
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validation_collects_every_error() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.days = 0;
        cfg.capacity = Some(SourceMap::from([(Source::Nuclear, -1.0)]));
        cfg.availability.insert(Source::Solar, f64::NAN);
        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"simulation.days".to_string()));
        assert!(fields.contains(&"capacity.Nuclear".to_string()));
        assert!(fields.contains(&"availability.Solar".to_string()));
    }

    #[test]
    fn validation_catches_bad_efficiency() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.storage.batteries = Some(StorageAssetConfig {
            power_gw: 1.0,
            energy_gwh: 2.0,
            charge_gw: None,
            efficiency: Some(1.5),
        });
        assert!(
            cfg.validate()
                .iter()
                .any(|e| e.field == "storage.Batteries.efficiency")
        );
    }

    #[test]
    fn validation_rejects_mixed_storage_forms() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.storage.power_gw = Some(5.0);
        cfg.storage.pumped_hydro = Some(StorageAssetConfig {
            power_gw: 1.0,
            energy_gwh: 2.0,
            charge_gw: None,
            efficiency: None,
        });
        assert!(cfg.validate().iter().any(|e| e.field == "storage"));
    }

    #[test]
    fn validation_catches_short_profile() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.demand.model = DemandModel::Profile;
        cfg.demand.profile_gw = Some(vec![1.0; 12]);
        assert!(cfg.validate().iter().any(|e| e.field == "demand.profile_gw"));
    }

    #[test]
    fn validation_requires_flat_value() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.demand.model = DemandModel::Flat;
        assert!(cfg.validate().iter().any(|e| e.field == "demand.flat_gw"));
    }

    #[test]
    fn validation_catches_daylight_outside_day() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.daylight = Some(DaylightWindow::new(25.0, 0.0));
        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"daylight.start_hour".to_string()));
        assert!(fields.contains(&"daylight.hours".to_string()));
    }

    #[test]
    fn baseline_resolves_roadmap_fleet() {
        let (inputs, horizon) = ScenarioConfig::baseline().resolve().unwrap();
        assert_eq!(horizon.total_steps(), 96);
        assert_eq!(inputs.demand_gw.len(), 96);
        assert_eq!(get_or_zero(&inputs.capacities, Source::GasCcgt), 30.5);
        assert_eq!(inputs.daylight, Weather::Dunkelflaute.daylight());
        let energy: f64 = inputs.storage.iter().map(|a| a.energy_gwh).sum();
        assert!((energy - 42.5).abs() < 1e-9);
    }

    #[test]
    fn storage_totals_override_roadmap() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.storage.energy_gwh = Some(0.0);
        let assets = cfg.storage_assets().unwrap();
        assert!(assets.iter().all(|a| a.energy_gwh == 0.0));
        assert!(assets.iter().any(|a| a.power_gw > 0.0));
    }

    #[test]
    fn single_asset_table_zeroes_the_other_kind() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.storage.batteries = Some(StorageAssetConfig {
            power_gw: 2.0,
            energy_gwh: 8.0,
            charge_gw: None,
            efficiency: None,
        });
        let assets = cfg.storage_assets().unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].kind, StorageKind::PumpedHydro);
        assert_eq!(assets[0].energy_gwh, 0.0);
        assert_eq!(assets[1].power_gw, 2.0);
    }
}
