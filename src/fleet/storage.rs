//! Grid storage assets: ratings, state of charge, and the default fleet mix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Storage technologies modelled on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StorageKind {
    #[serde(rename = "Pumped_Hydro")]
    PumpedHydro,
    Batteries,
}

impl StorageKind {
    pub const ALL: [StorageKind; 2] = [StorageKind::PumpedHydro, StorageKind::Batteries];

    pub fn name(self) -> &'static str {
        match self {
            StorageKind::PumpedHydro => "Pumped_Hydro",
            StorageKind::Batteries => "Batteries",
        }
    }

    /// Round-trip efficiency applied on charge.
    pub fn default_efficiency(self) -> f64 {
        match self {
            StorageKind::PumpedHydro => 0.75,
            StorageKind::Batteries => 0.85,
        }
    }

    /// Charge power as a fraction of discharge power when only the latter is given.
    pub fn charge_ratio(self) -> f64 {
        match self {
            StorageKind::PumpedHydro => 0.83,
            StorageKind::Batteries => 1.0,
        }
    }

    /// Shares of fleet totals `(discharge power, charge power, energy)` used
    /// when storage is configured only by aggregate power and energy.
    fn fleet_shares(self) -> (f64, f64, f64) {
        match self {
            StorageKind::PumpedHydro => (0.30, 0.25, 0.70),
            StorageKind::Batteries => (0.70, 0.70, 0.30),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A grid storage asset with separate charge and discharge power limits.
///
/// Efficiency losses are taken entirely on charge: drawing `x` GW from the
/// grid for one hour adds `x × efficiency` GWh, and discharging `y` GW
/// removes exactly `y` GWh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageAsset {
    pub kind: StorageKind,
    /// Maximum discharge power (GW).
    pub power_gw: f64,
    /// Maximum charge power drawn from the grid (GW).
    pub charge_gw: f64,
    /// Energy capacity (GWh).
    pub energy_gwh: f64,
    /// Charge efficiency in (0, 1].
    pub efficiency: f64,
    /// Stored energy (GWh), starts full.
    pub soc_gwh: f64,
}

impl StorageAsset {
    /// Creates a fully charged asset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if any power or energy value is negative or
    /// non-finite, or the efficiency is outside (0, 1].
    pub fn new(
        kind: StorageKind,
        power_gw: f64,
        charge_gw: f64,
        energy_gwh: f64,
        efficiency: f64,
    ) -> Result<Self, ConfigError> {
        let asset = Self {
            kind,
            power_gw,
            charge_gw,
            energy_gwh,
            efficiency,
            soc_gwh: energy_gwh,
        };
        asset.validate()?;
        Ok(asset)
    }

    /// Checks ratings and efficiency.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = |name: &str| format!("storage.{}.{name}", self.kind.name());
        for (name, value) in [
            ("power_gw", self.power_gw),
            ("charge_gw", self.charge_gw),
            ("energy_gwh", self.energy_gwh),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::new(
                    field(name),
                    format!("must be finite and >= 0, got {value}"),
                ));
            }
        }
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(ConfigError::new(
                field("efficiency"),
                format!("must be in (0, 1], got {}", self.efficiency),
            ));
        }
        Ok(())
    }

    /// Creates an asset from its discharge power and energy, deriving charge
    /// power and efficiency from the kind's defaults.
    pub fn with_defaults(
        kind: StorageKind,
        power_gw: f64,
        energy_gwh: f64,
    ) -> Result<Self, ConfigError> {
        Self::new(
            kind,
            power_gw,
            power_gw * kind.charge_ratio(),
            energy_gwh,
            kind.default_efficiency(),
        )
    }

    /// Splits aggregate fleet power and energy into the standard pumped
    /// hydro / battery mix.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if either total is negative or non-finite.
    pub fn default_fleet(
        total_power_gw: f64,
        total_energy_gwh: f64,
    ) -> Result<Vec<Self>, ConfigError> {
        StorageKind::ALL
            .into_iter()
            .map(|kind| {
                let (power, charge, energy) = kind.fleet_shares();
                Self::new(
                    kind,
                    total_power_gw * power,
                    total_power_gw * charge,
                    total_energy_gwh * energy,
                    kind.default_efficiency(),
                )
            })
            .collect()
    }

    /// Grid energy this asset can still absorb before it is full (GWh),
    /// expressed before efficiency losses.
    ///
    /// Negative when the state of charge is above capacity.
    pub fn charge_headroom_gwh(&self) -> f64 {
        (self.energy_gwh - self.soc_gwh) / self.efficiency
    }

    /// Absorbs up to `offered_gw` for one hour and returns the amount taken.
    ///
    /// Limited by charge power and by headroom, so the post-efficiency SoC
    /// gain never exceeds the remaining energy capacity.
    pub fn charge(&mut self, offered_gw: f64) -> f64 {
        let taken = offered_gw
            .max(0.0)
            .min(self.charge_gw)
            .min(self.charge_headroom_gwh());
        self.soc_gwh += taken * self.efficiency;
        taken
    }

    /// Delivers up to `requested_gw` for one hour and returns the amount delivered.
    pub fn discharge(&mut self, requested_gw: f64) -> f64 {
        let delivered = requested_gw
            .max(0.0)
            .min(self.power_gw)
            .min(self.soc_gwh);
        self.soc_gwh -= delivered;
        delivered
    }

    /// Restores the asset to full charge.
    pub fn refill(&mut self) {
        self.soc_gwh = self.energy_gwh;
    }

    /// State of charge as a fraction of energy capacity (1.0 for empty assets).
    pub fn soc_fraction(&self) -> f64 {
        if self.energy_gwh > 0.0 {
            self.soc_gwh / self.energy_gwh
        } else {
            1.0
        }
    }
}
