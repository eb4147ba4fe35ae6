//! # Simulation driver
//!
//! ## Purpose
//! Runs the co-digestion model over a fixed output grid. Every grid interval is one
//! "step": the feed is blended with recycled effluent, the 42-state ODE is integrated over
//! the interval, the acid-base and hydrogen equations are solved on the result and the gas
//! phase is evaluated.
//!
//! ## Main Structures
//! - [`SimulationConfig`]: the task description (serde, every field optional in JSON)
//! - [`TimeUnit`]: output resolution of the grid
//! - [`SimulationResult`]: histories of every step plus a [`FinalSummary`]
//! - [`Record`]: column names and row values of a history entry, used by the CSV export
//!
//! ## Usage
//! ```rust, ignore
//! let config = SimulationConfig { days: 30.0, recycle_ratio: 0.2, ..Default::default() };
//! let result = run_simulation(&config)?;
//! println!("pH after 30 days: {}", result.summary.pH);
//! ```
//!
//! ## Interesting Features
//! - Cumulative methane is integrated as `q_ch4·Δt`, once per step.
//! - Newton failures of the algebraic stage do not stop the run: they are logged with
//!   `warn!` and counted in the summary.
//! - Row 0 of every history describes the initial state.
use crate::ADM1::algebraic::AlgebraicSolver;
use crate::ADM1::error::Adm1Error;
use crate::ADM1::inhibition::{INHIBITION_COLUMNS, InhibitionFactors, compute_inhibition_factors};
use crate::ADM1::integrator::{
    IntegrationMethod, IntegrationStats, IntegratorOptions, integrate,
};
use crate::ADM1::kinetics::{Adm1Ode, GasPhase};
use crate::ADM1::parameters::{ModelParameters, ParameterRegime, ParameterSet};
use crate::ADM1::reactor_setup::{ReactorSetup, vss_state};
use crate::ADM1::recycle::RecycleMixer;
use crate::ADM1::scenarios::{InitialScenario, default_influent, rescale_influent};
use crate::ADM1::state::{DynamicState, InfluentVector, STATE_NAMES, StateVar};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/////////////////////////////////////////CONFIGURATION/////////////////////////////////////////

#[allow(non_snake_case)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// nominal feed flow the influent concentrations refer to [m³/d]
    pub q_ad_init: f64,
    /// [t/m³]
    pub density: f64,
    pub VS_per_TS_PS: f64,
    pub VS_per_TS_SS: f64,
    /// total-solids fraction of the diluted feed
    pub TS_fraction: f64,
    /// share of the first feedstock line
    pub mixing_ratio: f64,
    /// primary-sludge share within the first line
    pub mixing_ratio2: f64,
    /// organic loading rate [kg VS/(m³·d)]
    pub OLR: f64,
    pub T_ad: f64,
    pub T_base: f64,
    pub T_op: f64,
    pub recycle_ratio: f64,
    /// "X_in"-keyed feed; the two-sludge default is used when absent
    pub influent: Option<HashMap<String, f64>>,
    /// state-keyed initial values; `initial_scenario` is used when absent
    pub initials: Option<HashMap<String, f64>>,
    pub VSS: Option<f64>,
    pub days: f64,
    pub time_unit: String,
    pub V_liq: Option<f64>,
    pub param_overrides: HashMap<String, f64>,
    pub disable_inhibition: bool,
    pub batch_process: bool,
    pub method: IntegrationMethod,
    pub integrator: IntegratorOptions,
    pub initial_scenario: InitialScenario,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            q_ad_init: 170.0,
            density: 1.0,
            VS_per_TS_PS: 0.8,
            VS_per_TS_SS: 0.8,
            TS_fraction: 0.05,
            mixing_ratio: 0.5,
            mixing_ratio2: 0.5,
            OLR: 2.0,
            T_ad: 308.15,
            T_base: 298.15,
            T_op: 308.15,
            recycle_ratio: 0.0,
            influent: None,
            initials: None,
            VSS: None,
            days: 10.0,
            time_unit: "Day(s)".to_string(),
            V_liq: None,
            param_overrides: HashMap::new(),
            disable_inhibition: false,
            batch_process: false,
            method: IntegrationMethod::Dopri5,
            integrator: IntegratorOptions::default(),
            initial_scenario: InitialScenario::Startup,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Day,
    Hour,
    QuarterHour,
}

impl TimeUnit {
    pub fn steps_per_day(&self) -> usize {
        match self {
            TimeUnit::Day => 1,
            TimeUnit::Hour => 24,
            TimeUnit::QuarterHour => 96,
        }
    }

    /// Equidistant grid of `days·steps_per_day + 1` points on `[0, days]`.
    pub fn grid(&self, days: f64) -> Result<Vec<f64>, Adm1Error> {
        if !days.is_finite() || days <= 0.0 {
            return Err(Adm1Error::Configuration(format!(
                "days must be positive, got {}",
                days
            )));
        }
        let n = (days * self.steps_per_day() as f64).round() as usize;
        if n == 0 {
            return Err(Adm1Error::Configuration(format!(
                "{} days is shorter than one output step",
                days
            )));
        }
        Ok((0..=n).map(|i| days * i as f64 / n as f64).collect())
    }
}

impl FromStr for TimeUnit {
    type Err = Adm1Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Day(s)" => Ok(TimeUnit::Day),
            "Hour(s)" => Ok(TimeUnit::Hour),
            "15 Minute(s)" => Ok(TimeUnit::QuarterHour),
            other => Err(Adm1Error::UnsupportedTimeUnit(other.to_string())),
        }
    }
}

/////////////////////////////////////////RECORDS/////////////////////////////////////////

/// One row of a history table.
pub trait Record {
    fn columns() -> Vec<String>;
    fn values(&self) -> Vec<f64>;
}

#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct StateRow {
    pub time: f64,
    pub state: DynamicState,
    pub pH: f64,
}

impl Record for StateRow {
    fn columns() -> Vec<String> {
        std::iter::once("time")
            .chain(STATE_NAMES.iter().copied())
            .chain(std::iter::once("pH"))
            .map(String::from)
            .collect()
    }
    fn values(&self) -> Vec<f64> {
        let mut row = Vec::with_capacity(STATE_NAMES.len() + 2);
        row.push(self.time);
        row.extend(self.state.values.iter().copied());
        row.push(self.pH);
        row
    }
}

pub const GAS_COLUMNS: [&str; 13] = [
    "p_gas_h2",
    "p_gas_ch4",
    "p_gas_co2",
    "p_gas",
    "q_gas",
    "q_ch4",
    "total_ch4",
    "ch4_fraction",
    "co2_fraction",
    "ch4_yield",
    "co2_yield",
    "cumulative_methane_yield",
    "h2_yield",
];

#[derive(Debug, Clone, PartialEq)]
pub struct GasFlowRecord {
    pub time: f64,
    pub p_gas_h2: f64,
    pub p_gas_ch4: f64,
    pub p_gas_co2: f64,
    pub p_gas: f64,
    pub q_gas: f64,
    pub q_ch4: f64,
    /// methane produced since t = 0 [m³]
    pub total_ch4: f64,
    pub ch4_fraction: f64,
    pub co2_fraction: f64,
    /// per unit of VS fed [m³/t VS]
    pub ch4_yield: f64,
    pub co2_yield: f64,
    pub cumulative_methane_yield: f64,
    pub h2_yield: f64,
}

impl GasFlowRecord {
    #[allow(non_snake_case)]
    fn new(time: f64, gas: &GasPhase, total_ch4: f64, VS_in: f64) -> Self {
        GasFlowRecord {
            time,
            p_gas_h2: gas.p_gas_h2,
            p_gas_ch4: gas.p_gas_ch4,
            p_gas_co2: gas.p_gas_co2,
            p_gas: gas.p_gas,
            q_gas: gas.q_gas,
            q_ch4: gas.q_ch4,
            total_ch4,
            ch4_fraction: gas.p_gas_ch4 / gas.p_gas,
            co2_fraction: gas.p_gas_co2 / gas.p_gas,
            ch4_yield: gas.q_ch4 / VS_in,
            co2_yield: gas.q_co2 / VS_in,
            cumulative_methane_yield: total_ch4 / VS_in,
            h2_yield: gas.q_h2 / VS_in,
        }
    }
}

impl Record for GasFlowRecord {
    fn columns() -> Vec<String> {
        std::iter::once("time")
            .chain(GAS_COLUMNS)
            .map(String::from)
            .collect()
    }
    fn values(&self) -> Vec<f64> {
        vec![
            self.time,
            self.p_gas_h2,
            self.p_gas_ch4,
            self.p_gas_co2,
            self.p_gas,
            self.q_gas,
            self.q_ch4,
            self.total_ch4,
            self.ch4_fraction,
            self.co2_fraction,
            self.ch4_yield,
            self.co2_yield,
            self.cumulative_methane_yield,
            self.h2_yield,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct InhibitionRecord {
    pub time: f64,
    pub factors: InhibitionFactors,
}

impl Record for InhibitionRecord {
    fn columns() -> Vec<String> {
        std::iter::once("time")
            .chain(INHIBITION_COLUMNS)
            .map(String::from)
            .collect()
    }
    fn values(&self) -> Vec<f64> {
        std::iter::once(self.time)
            .chain(self.factors.values())
            .collect()
    }
}

const ION_VARS: [StateVar; 9] = [
    StateVar::S_cation,
    StateVar::S_anion,
    StateVar::S_H_ion,
    StateVar::S_va_ion,
    StateVar::S_bu_ion,
    StateVar::S_pro_ion,
    StateVar::S_ac_ion,
    StateVar::S_hco3_ion,
    StateVar::S_nh4_ion,
];

/// Charged species entering the charge balance.
#[derive(Debug, Clone, PartialEq)]
pub struct IonRecord {
    pub time: f64,
    pub ions: [f64; 9],
}

impl IonRecord {
    fn from_state(time: f64, state: &DynamicState) -> Self {
        IonRecord {
            time,
            ions: ION_VARS.map(|var| state[var]),
        }
    }
}

impl Record for IonRecord {
    fn columns() -> Vec<String> {
        std::iter::once("time".to_string())
            .chain(ION_VARS.iter().map(|var| var.name().to_string()))
            .collect()
    }
    fn values(&self) -> Vec<f64> {
        std::iter::once(self.time).chain(self.ions).collect()
    }
}

/// Feed actually entering the reactor during the step (fresh plus recycle).
#[derive(Debug, Clone)]
pub struct MixedInfluentRecord {
    pub time: f64,
    pub influent: InfluentVector,
}

impl Record for MixedInfluentRecord {
    fn columns() -> Vec<String> {
        std::iter::once("time".to_string())
            .chain(InfluentVector::column_names())
            .collect()
    }
    fn values(&self) -> Vec<f64> {
        std::iter::once(self.time)
            .chain(self.influent.values.iter().copied())
            .collect()
    }
}

/////////////////////////////////////////RESULT/////////////////////////////////////////

#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct FinalSummary {
    pub state: DynamicState,
    pub pH: f64,
    pub p_gas_h2: f64,
    pub p_gas_ch4: f64,
    pub p_gas_co2: f64,
    pub p_gas: f64,
    pub q_gas: f64,
    pub q_ch4: f64,
    pub total_ch4: f64,
    /// q_ch4 per unit VS fed
    pub biomethane_yield: f64,
    /// q_ch4 per unit reactor volume
    pub biomethane_yield2: f64,
    pub cumulative_methane_yield: f64,
    pub VS_in: f64,
    pub VS_out: f64,
    pub VS_reduction: f64,
    pub q_in: f64,
    pub q_in1: f64,
    pub q_in2: f64,
    pub q_out: f64,
    pub q_recycle: f64,
    pub q_ad: f64,
    pub HRT: f64,
    pub V_liq: f64,
    pub V_gas: f64,
    pub V_ad: f64,
    pub TS: f64,
    pub VSS: f64,
    pub TS_fraction_initial: f64,
    pub charge_failures: usize,
    pub hydrogen_failures: usize,
    pub clamped_entries: usize,
    pub integration: IntegrationStats,
}

impl FinalSummary {
    /// Scalar entries in display order.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("pH", self.pH),
            ("p_gas_h2", self.p_gas_h2),
            ("p_gas_ch4", self.p_gas_ch4),
            ("p_gas_co2", self.p_gas_co2),
            ("p_gas", self.p_gas),
            ("q_gas", self.q_gas),
            ("q_ch4", self.q_ch4),
            ("total_ch4", self.total_ch4),
            ("biomethane_yield", self.biomethane_yield),
            ("biomethane_yield2", self.biomethane_yield2),
            ("cumulative_methane_yield", self.cumulative_methane_yield),
            ("VS_in", self.VS_in),
            ("VS_out", self.VS_out),
            ("VS_reduction", self.VS_reduction),
            ("q_in", self.q_in),
            ("q_in1", self.q_in1),
            ("q_in2", self.q_in2),
            ("q_out", self.q_out),
            ("q_recycle", self.q_recycle),
            ("q_ad", self.q_ad),
            ("HRT", self.HRT),
            ("V_liq", self.V_liq),
            ("V_gas", self.V_gas),
            ("V_ad", self.V_ad),
            ("TS", self.TS),
            ("VSS", self.VSS),
            ("TS_fraction_initial", self.TS_fraction_initial),
            ("charge_failures", self.charge_failures as f64),
            ("hydrogen_failures", self.hydrogen_failures as f64),
            ("clamped_entries", self.clamped_entries as f64),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub time: Vec<f64>,
    pub states: Vec<StateRow>,
    pub gas: Vec<GasFlowRecord>,
    pub inhibition: Vec<InhibitionRecord>,
    pub ions: Vec<IonRecord>,
    pub mixed_influent: Vec<MixedInfluentRecord>,
    /// fresh feed after rescaling to the actual inflow
    pub influent: InfluentVector,
    pub reactor: ReactorSetup,
    pub regime: ParameterRegime,
    pub params: ModelParameters,
    pub summary: FinalSummary,
}

/////////////////////////////////////////RUN/////////////////////////////////////////

/// Regime table, overrides and reactor values in that order.
fn build_parameters(
    config: &SimulationConfig,
    reactor: &ReactorSetup,
) -> Result<(ParameterRegime, ModelParameters), Adm1Error> {
    let regime = ParameterRegime::select(config.T_ad);
    info!(
        "T_ad = {:.2} K ({:.1} °C): using the {} parameter set",
        config.T_ad,
        config.T_ad - 273.15,
        regime.name()
    );
    let mut set = ParameterSet::new(regime, config.T_ad, config.T_base, config.mixing_ratio);
    set.set("T_op", config.T_op);
    set.apply_overrides(&config.param_overrides);
    set.set("q_ad", reactor.q_ad);
    set.set("q_in1", reactor.q_in1);
    set.set("q_in2", reactor.q_in2);
    set.set("V_liq", reactor.V_liq);
    set.set("V_gas", reactor.V_gas);
    let params = ModelParameters::from_set(&set)?;
    Ok((regime, params))
}

fn check_temperatures(config: &SimulationConfig) -> Result<(), Adm1Error> {
    for (name, value) in [
        ("T_ad", config.T_ad),
        ("T_base", config.T_base),
        ("T_op", config.T_op),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(Adm1Error::Configuration(format!(
                "{} must be a positive absolute temperature, got {}",
                name, value
            )));
        }
    }
    Ok(())
}

/// Runs one simulation. Every configuration problem is reported before the first step.
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationResult, Adm1Error> {
    use StateVar::*;
    check_temperatures(config)?;
    let unit = TimeUnit::from_str(&config.time_unit)?;
    let grid = unit.grid(config.days)?;

    let fresh = match &config.influent {
        Some(map) => InfluentVector::from_map(map)?,
        None => default_influent(config.mixing_ratio, config.mixing_ratio2)?,
    };
    let initial = match &config.initials {
        Some(map) => DynamicState::from_map(map)?,
        None => config.initial_scenario.state(config.mixing_ratio),
    };
    let reactor = ReactorSetup::calculate(config, &fresh, &initial)?;
    // a batch vessel keeps the nominal feed: the vanishing inflow must not carry a load
    let influent = if config.batch_process {
        fresh
    } else {
        rescale_influent(&fresh, config.mixing_ratio, reactor.q_in, config.q_ad_init)
    };
    let (regime, params) = build_parameters(config, &reactor)?;
    info!(
        "simulating {} days with {} output steps ({}), recycle ratio {}",
        config.days,
        grid.len() - 1,
        config.method,
        config.recycle_ratio
    );

    let mixer = RecycleMixer::new(reactor.q_in, reactor.q_r, reactor.q_ad);
    let solver = AlgebraicSolver::default();
    let disable = config.disable_inhibition;
    let diagnostics = |time: f64, state: &DynamicState, total_ch4: f64| {
        let factors = compute_inhibition_factors(
            state[S_H_ion],
            state[S_IN],
            state[S_h2],
            state[S_nh3],
            &params.inhibition,
            disable,
        );
        let gas = GasPhase::from_state(state, &params);
        (
            InhibitionRecord { time, factors },
            GasFlowRecord::new(time, &gas, total_ch4, reactor.VS_in),
        )
    };

    let n = grid.len();
    let mut states = Vec::with_capacity(n);
    let mut gas_history = Vec::with_capacity(n);
    let mut inhibition = Vec::with_capacity(n);
    let mut ions = Vec::with_capacity(n);
    let mut mixed_influent = Vec::with_capacity(n);

    let mut state = initial;
    let mut total_ch4 = 0.0;
    let mut charge_failures = 0;
    let mut hydrogen_failures = 0;
    let mut clamped_entries = 0;
    let mut stats = IntegrationStats::default();

    let t_start = grid[0];
    let (inhib0, gas0) = diagnostics(t_start, &state, total_ch4);
    states.push(StateRow {
        time: t_start,
        pH: state.pH(),
        state: state.clone(),
    });
    gas_history.push(gas0);
    inhibition.push(inhib0);
    ions.push(IonRecord::from_state(t_start, &state));
    mixed_influent.push(MixedInfluentRecord {
        time: t_start,
        influent: mixer.mix(&influent, &state),
    });

    for (i, window) in grid.windows(2).enumerate() {
        let (t0, t1) = (window[0], window[1]);
        let mixed = mixer.mix(&influent, &state);
        let ode = Adm1Ode::new(&mixed, &params, disable);
        let trajectory = integrate(
            &ode,
            config.method,
            &state.values,
            t0,
            t1,
            &config.integrator,
        )?;
        stats.merge(&trajectory.stats);
        let end = trajectory.last().ok_or_else(|| {
            Adm1Error::Integration(format!("empty trajectory on [{}, {}]", t0, t1))
        })?;
        let provisional = DynamicState::from_vector(*end);
        if !provisional.is_finite() {
            return Err(Adm1Error::Integration(format!(
                "state became non-finite at t = {}",
                t1
            )));
        }

        let solution = solver.solve(&provisional, &mixed, &params);
        if !solution.charge.converged {
            charge_failures += 1;
            warn!(
                "step {} (t = {:.4}): charge balance did not converge after {} iterations, residual {:.3e}",
                i + 1,
                t1,
                solution.charge.iterations,
                solution.charge.residual
            );
        }
        if !solution.hydrogen.converged {
            hydrogen_failures += 1;
            warn!(
                "step {} (t = {:.4}): hydrogen balance did not converge after {} iterations, residual {:.3e}",
                i + 1,
                t1,
                solution.hydrogen.iterations,
                solution.hydrogen.residual
            );
        }
        clamped_entries += solution.clamped;
        state = solution.state;

        let gas = GasPhase::from_state(&state, &params);
        total_ch4 += gas.q_ch4 * (t1 - t0);
        let (inhib, gas_row) = diagnostics(t1, &state, total_ch4);
        debug!(
            "t = {:.4} d: pH {:.4}, q_gas {:.3} m3/d, q_ch4 {:.3} m3/d, total CH4 {:.3} m3",
            t1, solution.pH, gas_row.q_gas, gas_row.q_ch4, total_ch4
        );
        states.push(StateRow {
            time: t1,
            pH: solution.pH,
            state: state.clone(),
        });
        gas_history.push(gas_row);
        inhibition.push(inhib);
        ions.push(IonRecord::from_state(t1, &state));
        mixed_influent.push(MixedInfluentRecord {
            time: t1,
            influent: mixed,
        });
    }

    if charge_failures + hydrogen_failures > 0 {
        warn!(
            "algebraic stage failed to converge in {} charge and {} hydrogen solves",
            charge_failures, hydrogen_failures
        );
    }
    let summary = finalize(
        &state,
        &params,
        &reactor,
        total_ch4,
        [charge_failures, hydrogen_failures, clamped_entries],
        stats,
    );
    info!(
        "finished: pH {:.3}, q_ch4 {:.2} m3/d, cumulative CH4 yield {:.2} m3/t VS, VS reduction {:.1} %",
        summary.pH, summary.q_ch4, summary.cumulative_methane_yield, summary.VS_reduction
    );
    Ok(SimulationResult {
        time: grid,
        states,
        gas: gas_history,
        inhibition,
        ions,
        mixed_influent,
        influent,
        reactor,
        regime,
        params,
        summary,
    })
}

#[allow(non_snake_case)]
fn finalize(
    state: &DynamicState,
    params: &ModelParameters,
    reactor: &ReactorSetup,
    total_ch4: f64,
    counts: [usize; 3],
    integration: IntegrationStats,
) -> FinalSummary {
    let [charge_failures, hydrogen_failures, clamped_entries] = counts;
    let gas = GasPhase::from_state(state, params);
    let VS_out = vss_state(state, reactor.q_out);
    FinalSummary {
        state: state.clone(),
        pH: state.pH(),
        p_gas_h2: gas.p_gas_h2,
        p_gas_ch4: gas.p_gas_ch4,
        p_gas_co2: gas.p_gas_co2,
        p_gas: gas.p_gas,
        q_gas: gas.q_gas,
        q_ch4: gas.q_ch4,
        total_ch4,
        biomethane_yield: gas.q_ch4 / reactor.VS_in,
        biomethane_yield2: gas.q_ch4 / reactor.V_ad,
        cumulative_methane_yield: total_ch4 / reactor.VS_in,
        VS_in: reactor.VS_in,
        VS_out,
        VS_reduction: (reactor.VS_in - VS_out) * 100.0 / reactor.VS_in,
        q_in: reactor.q_in,
        q_in1: reactor.q_in1,
        q_in2: reactor.q_in2,
        q_out: reactor.q_out,
        q_recycle: reactor.q_r,
        q_ad: reactor.q_ad,
        HRT: reactor.HRT,
        V_liq: reactor.V_liq,
        V_gas: reactor.V_gas,
        V_ad: reactor.V_ad,
        TS: reactor.TS,
        VSS: reactor.VSS,
        TS_fraction_initial: reactor.TS_fraction_initial,
        charge_failures,
        hydrogen_failures,
        clamped_entries,
        integration,
    }
}

/////////////////////////////////////////SCENARIO COMPARISON/////////////////////////////////////////

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct MixingComparison {
    pub mixing_ratio: f64,
    pub pH: f64,
    pub q_ch4: f64,
    pub cumulative_methane_yield: f64,
    pub VS_reduction: f64,
}

/// Runs `base` once per mixing ratio; everything else is left unchanged.
pub fn compare_mixing_ratios(
    base: &SimulationConfig,
    ratios: &[f64],
) -> Result<Vec<MixingComparison>, Adm1Error> {
    ratios
        .iter()
        .map(|&m| {
            info!("scenario comparison: mixing ratio {}", m);
            let config = SimulationConfig {
                mixing_ratio: m,
                ..base.clone()
            };
            let result = run_simulation(&config)?;
            Ok(MixingComparison {
                mixing_ratio: m,
                pH: result.summary.pH,
                q_ch4: result.summary.q_ch4,
                cumulative_methane_yield: result.summary.cumulative_methane_yield,
                VS_reduction: result.summary.VS_reduction,
            })
        })
        .collect()
}
