//! Merit-order dispatch engine with storage charge and discharge.

use tracing::{debug, info, instrument, trace};

use crate::error::{ConfigError, SimError, SimResult};
use crate::fleet::source::get_or_zero;
use crate::fleet::{DaylightWindow, Source, SourceMap, StorageAsset, potential_output};

use super::split::proportional_split;
use super::types::{
    DispatchInputs, HOURS_PER_DAY, Horizon, Regime, SimulationTrace, StepRecord, StorageFlow,
};

/// Slack allowed for floating point drift when checking invariants (GW or GWh).
const TOLERANCE: f64 = 1e-9;

/// Simulation engine owning the fleet description and the storage state.
///
/// Each step is classified independently as surplus or deficit; only storage
/// state of charge carries over between steps. [`DispatchEngine::run`]
/// refills every asset before the first step, so runs never share state.
#[derive(Debug, Clone)]
pub struct DispatchEngine {
    horizon: Horizon,
    capacities: SourceMap,
    availability: SourceMap,
    daylight: DaylightWindow,
    storage: Vec<StorageAsset>,
    demand_gw: Vec<f64>,
}

/// Outcome of the storage and accounting phase of one step.
struct Balance {
    flows: Vec<StorageFlow>,
    charged_gw: f64,
    discharged_gw: f64,
    residual_excess_gw: f64,
    wasted_gw: f64,
    renewable_curtailment_gw: f64,
}

impl DispatchEngine {
    /// Creates an engine after checking every input.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Config` for an empty or over-long horizon, a demand series of
    /// the wrong length or with negative values, negative or non-finite
    /// capacities or factors, a source with capacity but no availability
    /// factor, a malformed daylight window, or an invalid storage asset.
    pub fn new(inputs: DispatchInputs, horizon: Horizon) -> SimResult<Self> {
        validate_inputs(&inputs, horizon)?;
        let DispatchInputs {
            capacities,
            availability,
            daylight,
            mut storage,
            demand_gw,
        } = inputs;
        storage.iter_mut().for_each(StorageAsset::refill);

        Ok(Self {
            horizon,
            capacities,
            availability,
            daylight,
            storage,
            demand_gw,
        })
    }

    /// Executes one hourly step and returns its record.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Config` if `t` is outside the horizon and
    /// `SimError::Invariant` if storage starts the step out of bounds or the
    /// step leaves the engine in an impossible state.
    pub fn step(&mut self, t: usize) -> SimResult<StepRecord> {
        let demand_gw = *self.demand_gw.get(t).ok_or_else(|| {
            ConfigError::new(
                "step",
                format!("{t} is outside the {}-step horizon", self.demand_gw.len()),
            )
        })?;
        let hour_of_day = t % HOURS_PER_DAY;
        self.check_storage(t)?;

        // 1. Potential output
        let potential = potential_output(
            hour_of_day,
            &self.capacities,
            &self.availability,
            &self.daylight,
        );
        let total_potential_gw: f64 = potential.values().sum();
        let physical_delta = total_potential_gw - demand_gw;

        // 2. Classify and dispatch
        let regime = if physical_delta >= 0.0 {
            Regime::Surplus
        } else {
            Regime::Deficit
        };
        let (generation, balance) = match regime {
            Regime::Surplus => self.dispatch_surplus(&potential, demand_gw, physical_delta),
            Regime::Deficit => self.dispatch_deficit(&potential, physical_delta),
        };

        // 3. Invariants
        self.check_storage(t)?;
        check_generation(t, &potential, &generation)?;

        trace!(
            step = t,
            %regime,
            demand_gw,
            residual_gw = balance.residual_excess_gw,
            charged_gw = balance.charged_gw,
            discharged_gw = balance.discharged_gw,
            "dispatched step"
        );

        Ok(StepRecord {
            step: t,
            hour_of_day,
            demand_gw,
            regime,
            potential,
            generation,
            storage: balance.flows,
            generation_excess_gw: physical_delta,
            charged_gw: balance.charged_gw,
            discharged_gw: balance.discharged_gw,
            residual_excess_gw: balance.residual_excess_gw,
            wasted_gw: balance.wasted_gw,
            renewable_curtailment_gw: balance.renewable_curtailment_gw,
        })
    }

    /// Executes every step of the horizon from full storage.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by [`DispatchEngine::step`].
    #[instrument(
        skip(self),
        fields(steps = self.horizon.total_steps(), assets = self.storage.len())
    )]
    pub fn run(&mut self) -> SimResult<SimulationTrace> {
        self.storage.iter_mut().for_each(StorageAsset::refill);
        debug!("starting dispatch run");

        let total = self.horizon.total_steps();
        let mut steps = Vec::with_capacity(total);
        for t in 0..total {
            steps.push(self.step(t)?);
        }

        // One-hour steps: GW summed over steps is GWh.
        let storage_energy_gwh: f64 = self.storage.iter().map(|a| a.energy_gwh).sum();
        let renewable_curtailed_gwh: f64 = steps.iter().map(|s| s.renewable_curtailment_gw).sum();
        let wasted_gwh: f64 = steps.iter().map(|s| s.wasted_gw).sum();

        info!(
            renewable_curtailed_gwh,
            wasted_gwh,
            storage_energy_gwh,
            "dispatch run complete"
        );

        Ok(SimulationTrace {
            steps,
            storage_energy_gwh,
            renewable_curtailed_gwh,
            wasted_gwh,
        })
    }

    /// Storage fleet with its current state of charge.
    pub fn storage(&self) -> &[StorageAsset] {
        &self.storage
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// Meets demand in merit order, stores what it can of the surplus, and
    /// attributes the rest as curtailment.
    fn dispatch_surplus(
        &mut self,
        potential: &SourceMap,
        demand_gw: f64,
        surplus_gw: f64,
    ) -> (SourceMap, Balance) {
        let mut generation = merit_order_fill(potential, demand_gw);

        let charge_caps: Vec<f64> = self.storage.iter().map(|a| a.charge_gw).collect();
        let offers = proportional_split(surplus_gw, &charge_caps);
        let flows: Vec<StorageFlow> = self
            .storage
            .iter_mut()
            .zip(offers)
            .map(|(asset, offer)| {
                let charge_gw = asset.charge(offer);
                StorageFlow {
                    kind: asset.kind,
                    charge_gw,
                    discharge_gw: 0.0,
                    soc_gwh: asset.soc_gwh,
                }
            })
            .collect();
        let charged_gw: f64 = flows.iter().map(|f| f.charge_gw).sum();

        attribute_to_headroom(potential, &mut generation, charged_gw);

        let residual_excess_gw = surplus_gw - charged_gw;
        let renewable_curtailment_gw =
            renewable_curtailment(potential, &generation, residual_excess_gw);

        (
            generation,
            Balance {
                flows,
                charged_gw,
                discharged_gw: 0.0,
                residual_excess_gw,
                wasted_gw: (surplus_gw - charged_gw).max(0.0),
                renewable_curtailment_gw,
            },
        )
    }

    /// Runs every source flat out and covers what it can of the shortfall
    /// from storage.
    fn dispatch_deficit(
        &mut self,
        potential: &SourceMap,
        physical_delta: f64,
    ) -> (SourceMap, Balance) {
        let generation = potential.clone();
        let deficit_gw = -physical_delta;

        let power_caps: Vec<f64> = self.storage.iter().map(|a| a.power_gw).collect();
        let requests = proportional_split(deficit_gw, &power_caps);
        let flows: Vec<StorageFlow> = self
            .storage
            .iter_mut()
            .zip(requests)
            .map(|(asset, request)| {
                let discharge_gw = asset.discharge(request);
                StorageFlow {
                    kind: asset.kind,
                    charge_gw: 0.0,
                    discharge_gw,
                    soc_gwh: asset.soc_gwh,
                }
            })
            .collect();
        let discharged_gw: f64 = flows.iter().map(|f| f.discharge_gw).sum();

        (
            generation,
            Balance {
                flows,
                charged_gw: 0.0,
                discharged_gw,
                residual_excess_gw: physical_delta + discharged_gw,
                wasted_gw: 0.0,
                renewable_curtailment_gw: 0.0,
            },
        )
    }

    /// Every asset's state of charge must lie in `[0, energy_gwh]`.
    fn check_storage(&self, step: usize) -> SimResult<()> {
        for asset in &self.storage {
            if asset.soc_gwh < -TOLERANCE {
                return Err(SimError::Invariant {
                    step,
                    subject: asset.kind.name().to_string(),
                    detail: "state of charge below zero",
                    value: asset.soc_gwh,
                });
            }
            if asset.soc_gwh > asset.energy_gwh + TOLERANCE {
                return Err(SimError::Invariant {
                    step,
                    subject: asset.kind.name().to_string(),
                    detail: "state of charge above energy capacity",
                    value: asset.soc_gwh,
                });
            }
        }
        Ok(())
    }
}

/// Each source's dispatch must lie in `[0, potential]`.
fn check_generation(step: usize, potential: &SourceMap, generation: &SourceMap) -> SimResult<()> {
    for (&source, &gw) in generation {
        if gw < -TOLERANCE {
            return Err(SimError::Invariant {
                step,
                subject: source.name().to_string(),
                detail: "dispatched below zero",
                value: gw,
            });
        }
        if gw > get_or_zero(potential, source) + TOLERANCE {
            return Err(SimError::Invariant {
                step,
                subject: source.name().to_string(),
                detail: "dispatched above potential",
                value: gw,
            });
        }
    }
    Ok(())
}

/// Builds an engine and runs it over the whole horizon.
///
/// # Errors
///
/// See [`DispatchEngine::new`] and [`DispatchEngine::run`].
pub fn run_dispatch(inputs: DispatchInputs, horizon: Horizon) -> SimResult<SimulationTrace> {
    DispatchEngine::new(inputs, horizon)?.run()
}

/// Assigns demand to sources in merit order until it is met.
///
/// Every source in `potential` gets an entry; sources not needed stay at zero.
fn merit_order_fill(potential: &SourceMap, demand_gw: f64) -> SourceMap {
    let mut generation = SourceMap::new();
    let mut remaining = demand_gw;
    for source in Source::MERIT_ORDER {
        let Some(&available) = potential.get(&source) else {
            continue;
        };
        let used = remaining.min(available).max(0.0);
        generation.insert(source, used);
        remaining -= used;
    }
    generation
}

/// Attributes energy sent to storage to the lowest-priority unused potential first.
fn attribute_to_headroom(potential: &SourceMap, generation: &mut SourceMap, charged_gw: f64) {
    let mut left = charged_gw;
    for source in Source::MERIT_ORDER.into_iter().rev() {
        if left <= 0.0 {
            break;
        }
        let Some(&available) = potential.get(&source) else {
            continue;
        };
        let dispatched = generation.entry(source).or_insert(0.0);
        let added = left.min(available - *dispatched).max(0.0);
        *dispatched += added;
        left -= added;
    }
}

/// Portion of a positive residual surplus that belongs to renewable sources,
/// in proportion to their share of total unused potential.
fn renewable_curtailment(potential: &SourceMap, generation: &SourceMap, residual_gw: f64) -> f64 {
    if residual_gw <= 0.0 {
        return 0.0;
    }
    let (total_unused, renewable_unused) =
        potential
            .iter()
            .fold((0.0, 0.0), |(total, renewable), (&source, &available)| {
                let unused = available - get_or_zero(generation, source);
                if source.is_renewable() {
                    (total + unused, renewable + unused)
                } else {
                    (total + unused, renewable)
                }
            });
    if total_unused > 0.0 {
        residual_gw * renewable_unused / total_unused
    } else {
        0.0
    }
}

fn validate_inputs(inputs: &DispatchInputs, horizon: Horizon) -> Result<(), ConfigError> {
    horizon.validate()?;

    let steps = horizon.total_steps();
    if inputs.demand_gw.len() != steps {
        return Err(ConfigError::new(
            "demand",
            format!(
                "expected {steps} values for the horizon, got {}",
                inputs.demand_gw.len()
            ),
        ));
    }
    if let Some((t, gw)) = inputs
        .demand_gw
        .iter()
        .enumerate()
        .find(|(_, gw)| !gw.is_finite() || **gw < 0.0)
    {
        return Err(ConfigError::new(
            "demand",
            format!("step {t} must be finite and >= 0, got {gw}"),
        ));
    }

    for (&source, &capacity) in &inputs.capacities {
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(ConfigError::new(
                format!("capacity.{source}"),
                format!("must be finite and >= 0, got {capacity}"),
            ));
        }
        if !inputs.availability.contains_key(&source) {
            return Err(ConfigError::new(
                format!("availability.{source}"),
                "missing factor for a source with installed capacity",
            ));
        }
    }
    for (&source, &factor) in &inputs.availability {
        if !factor.is_finite() || factor < 0.0 {
            return Err(ConfigError::new(
                format!("availability.{source}"),
                format!("must be finite and >= 0, got {factor}"),
            ));
        }
    }

    let DaylightWindow { start_hour, hours } = inputs.daylight;
    if !(0.0..HOURS_PER_DAY as f64).contains(&start_hour) {
        return Err(ConfigError::new(
            "daylight.start_hour",
            format!("must be in [0, 24), got {start_hour}"),
        ));
    }
    if !(hours > 0.0 && hours <= HOURS_PER_DAY as f64) {
        return Err(ConfigError::new(
            "daylight.hours",
            format!("must be in (0, 24], got {hours}"),
        ));
    }

    inputs.storage.iter().try_for_each(StorageAsset::validate)
}
