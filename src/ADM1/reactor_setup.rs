//! # Reactor sizing
//!
//! Derives flows, volumes and retention time from the feed description:
//!
//! ```text
//! VS/TS_mix   = m2·VS/TS_PS + (1 - m2)·VS/TS_SS
//! TS          = VSS / VS/TS_mix
//! TS_init     = TS / (q_ad_init·density)
//! q_in        = TS_init·q_ad_init / TS_fraction
//! q_out       = q_in / (1 - rr),   q_r = rr·q_out,   q_ad = q_out
//! HRT         = VS_in·1000 / (q_ad·OLR·(1 + rr))
//! V_liq       = HRT·q_ad,   V_gas = 0.1·V_liq
//! ```
//!
//! Batch operation sizes the vessel from the initial inventory instead and uses a vanishing
//! inflow. Also hosts the VSS estimator and the C/N ratio of a feed.
use crate::ADM1::error::Adm1Error;
use crate::ADM1::simulation::SimulationConfig;
use crate::ADM1::state::{DynamicState, InfluentVector};
use log::info;
use std::collections::HashMap;

/// Inflow used for batch runs, small enough to leave the inventory unchanged.
pub const BATCH_INFLOW: f64 = 1e-10;
pub const BATCH_HRT: f64 = 25.0;
pub const GAS_TO_LIQUID_VOLUME: f64 = 0.1;

/// COD-to-VS conversion factors λ [kg COD/kg VS] keyed by influent and state names.
pub const VSS_LAMBDAS: [(&str, f64); 41] = [
    ("S_su_in", 1.07),
    ("S_aa_in", 1.53),
    ("S_fa_in", 2.87),
    ("S_va_in", 2.04),
    ("S_bu_in", 1.82),
    ("S_pro_in", 1.51),
    ("S_ac_in", 1.07),
    ("X_ch1_in", 1.18),
    ("X_ch2_in", 1.18),
    ("X_pr1_in", 1.53),
    ("X_pr2_in", 1.53),
    ("X_li1_in", 2.87),
    ("X_li2_in", 2.87),
    ("X_I_in", 1.18),
    ("X_su", 1.41),
    ("X_aa", 1.41),
    ("X_fa", 1.41),
    ("X_c4", 1.41),
    ("X_pro", 1.41),
    ("X_ac", 1.41),
    ("X_h2", 1.41),
    ("S_su", 1.07),
    ("S_aa", 1.53),
    ("S_fa", 2.87),
    ("S_va", 2.04),
    ("S_va_ion", 1.98),
    ("S_bu", 1.82),
    ("S_bu_ion", 1.75),
    ("S_pro", 1.51),
    ("S_pro_ion", 1.42),
    ("S_ac", 1.07),
    ("S_ac_ion", 0.95),
    ("X_ch1", 1.18),
    ("X_ch2", 1.18),
    ("X_pr1", 1.53),
    ("X_pr2", 1.53),
    ("X_li1", 2.87),
    ("X_li2", 2.87),
    ("X_I", 1.18),
    ("S_h2", 7.94),
    ("S_ch4", 3.99),
];

/// Volatile solids carried by a flow `q` [m³/d] of the given composition, in tonne/d
/// (or tonne for a volume). Keys absent from the map count as zero.
pub fn vss_from_map(values: &HashMap<String, f64>, q: f64) -> f64 {
    VSS_LAMBDAS
        .iter()
        .map(|(key, lambda)| q * 0.001 * values.get(*key).copied().unwrap_or(0.0) / lambda)
        .sum()
}

pub fn vss_influent(influent: &InfluentVector, q: f64) -> f64 {
    vss_from_map(&influent.to_map(), q)
}

pub fn vss_state(state: &DynamicState, q: f64) -> f64 {
    vss_from_map(&state.to_map(), q)
}

/// (C, N) mass fractions per unit COD of the feed components.
const CN_MASS_FRACTIONS: [(&str, f64, f64); 8] = [
    ("X_ch1_in", 0.4445 / 1.18, 0.0),
    ("X_pr1_in", 0.5497 / 1.53, 0.1603 / 1.53),
    ("X_li1_in", 0.7587 / 2.87, 0.0),
    ("X_ch2_in", 0.4445 / 1.18, 0.0),
    ("X_pr2_in", 0.5497 / 1.53, 0.1603 / 1.53),
    ("X_li2_in", 0.7587 / 2.87, 0.0),
    ("X_I_in", 0.4445 / 1.18, 0.0),
    ("S_IN_in", 0.0, 0.7995 * 18.0),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarbonNitrogen {
    pub total_c: f64,
    pub total_n: f64,
    /// infinite for a nitrogen-free feed
    pub ratio: f64,
}

pub fn cn_ratio(influent: &InfluentVector) -> CarbonNitrogen {
    let map = influent.to_map();
    let (total_c, total_n) = CN_MASS_FRACTIONS
        .iter()
        .fold((0.0, 0.0), |(c, n), (key, c_frac, n_frac)| {
            let value = map.get(*key).copied().unwrap_or(0.0);
            (c + value * c_frac, n + value * n_frac)
        });
    let ratio = if total_n == 0.0 {
        f64::INFINITY
    } else {
        total_c / total_n
    };
    CarbonNitrogen {
        total_c,
        total_n,
        ratio,
    }
}

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct ReactorSetup {
    pub TS_fraction_initial: f64,
    pub q_in: f64,
    pub q_in1: f64,
    pub q_in2: f64,
    pub q_ad: f64,
    pub q_out: f64,
    pub q_r: f64,
    pub VS_in: f64,
    pub HRT: f64,
    pub V_liq: f64,
    pub V_gas: f64,
    pub V_ad: f64,
    pub OLR: f64,
    pub density: f64,
    pub mixing_ratio: f64,
    pub TS: f64,
    pub VSS: f64,
}

fn check(condition: bool, message: impl FnOnce() -> String) -> Result<(), Adm1Error> {
    if condition {
        Ok(())
    } else {
        Err(Adm1Error::Configuration(message()))
    }
}

impl ReactorSetup {
    /// Sizes the digester for the configured feed. `influent` is the feed at `q_ad_init`
    /// (before rescaling), `initial` the inventory used for batch sizing.
    #[allow(non_snake_case)]
    pub fn calculate(
        config: &SimulationConfig,
        influent: &InfluentVector,
        initial: &DynamicState,
    ) -> Result<Self, Adm1Error> {
        let rr = config.recycle_ratio;
        let m = config.mixing_ratio;
        check((0.0..1.0).contains(&rr), || {
            format!("recycle_ratio must lie in [0, 1), got {}", rr)
        })?;
        check((0.0..=1.0).contains(&m), || {
            format!("mixing_ratio must lie in [0, 1], got {}", m)
        })?;
        check(config.density > 0.0, || {
            format!("density must be positive, got {}", config.density)
        })?;
        check(config.TS_fraction > 0.0, || {
            format!("TS_fraction must be positive, got {}", config.TS_fraction)
        })?;
        check(config.q_ad_init > 0.0, || {
            format!("q_ad_init must be positive, got {}", config.q_ad_init)
        })?;
        let vs_per_ts_mix = config.mixing_ratio2 * config.VS_per_TS_PS
            + (1.0 - config.mixing_ratio2) * config.VS_per_TS_SS;
        check(vs_per_ts_mix > 0.0, || {
            format!("VS/TS of the sludge blend must be positive, got {}", vs_per_ts_mix)
        })?;

        let setup = if config.batch_process {
            let v_liq_given = config.V_liq.ok_or_else(|| {
                Adm1Error::Configuration("batch operation requires V_liq".to_string())
            })?;
            check(v_liq_given > 0.0, || {
                format!("V_liq must be positive, got {}", v_liq_given)
            })?;
            let VSS = vss_state(initial, v_liq_given);
            let TS = VSS / vs_per_ts_mix;
            let TS_fraction_initial = TS / (v_liq_given * config.density);
            let V_liq = TS_fraction_initial * v_liq_given / config.TS_fraction;
            check(V_liq > 0.0, || {
                "initial state carries no volatile solids to size the batch".to_string()
            })?;
            let V_gas = GAS_TO_LIQUID_VOLUME * V_liq;
            let q_in = BATCH_INFLOW;
            // recycle follows the vanishing batch outflow, so it stays negligible as well
            let q_out = q_in / (1.0 - rr);
            ReactorSetup {
                TS_fraction_initial,
                q_in,
                q_in1: m * q_in,
                q_in2: q_in - m * q_in,
                q_ad: q_out,
                q_out,
                q_r: rr * q_out,
                VS_in: VSS,
                HRT: BATCH_HRT,
                V_liq,
                V_gas,
                V_ad: V_liq + V_gas,
                OLR: config.OLR,
                density: config.density,
                mixing_ratio: m,
                TS,
                VSS,
            }
        } else {
            let VSS = config
                .VSS
                .unwrap_or_else(|| vss_influent(influent, config.q_ad_init));
            let TS = VSS / vs_per_ts_mix;
            let TS_fraction_initial = TS / (config.q_ad_init * config.density);
            let q_in = TS_fraction_initial * config.q_ad_init / config.TS_fraction;
            check(q_in > 0.0, || {
                format!("feed carries no volatile solids (VSS = {})", VSS)
            })?;
            let q_out = q_in / (1.0 - rr);
            let q_ad = q_out;
            let VS_in = VSS;
            let (HRT, V_liq) = match config.V_liq {
                Some(v) => {
                    check(v > 0.0, || format!("V_liq must be positive, got {}", v))?;
                    (v / q_ad, v)
                }
                None => {
                    check(config.OLR > 0.0, || {
                        format!("OLR must be positive to size the reactor, got {}", config.OLR)
                    })?;
                    let HRT = VS_in * 1000.0 / (q_ad * config.OLR * (1.0 + rr));
                    (HRT, HRT * q_ad)
                }
            };
            let V_gas = GAS_TO_LIQUID_VOLUME * V_liq;
            ReactorSetup {
                TS_fraction_initial,
                q_in,
                q_in1: m * q_in,
                q_in2: q_in - m * q_in,
                q_ad,
                q_out,
                q_r: rr * q_out,
                VS_in,
                HRT,
                V_liq,
                V_gas,
                V_ad: V_liq + V_gas,
                OLR: config.OLR,
                density: config.density,
                mixing_ratio: m,
                TS,
                VSS,
            }
        };
        info!(
            "reactor sized: q_in = {:.3} m3/d, q_ad = {:.3} m3/d, HRT = {:.2} d, V_liq = {:.1} m3, V_gas = {:.1} m3",
            setup.q_in, setup.q_ad, setup.HRT, setup.V_liq, setup.V_gas
        );
        Ok(setup)
    }

    /// (name, value) pairs in display order
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("TS_fraction_initial", self.TS_fraction_initial),
            ("q_in", self.q_in),
            ("q_in1", self.q_in1),
            ("q_in2", self.q_in2),
            ("q_ad", self.q_ad),
            ("q_out", self.q_out),
            ("q_r", self.q_r),
            ("VS_in", self.VS_in),
            ("HRT", self.HRT),
            ("V_liq", self.V_liq),
            ("V_gas", self.V_gas),
            ("V_ad", self.V_ad),
            ("OLR", self.OLR),
            ("density", self.density),
            ("mixing_ratio", self.mixing_ratio),
            ("TS", self.TS),
            ("VSS", self.VSS),
        ]
    }
}
