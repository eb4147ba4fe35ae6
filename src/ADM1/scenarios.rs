//! # Feed and start-up scenarios
//!
//! ## Influent
//! Line 1 is a blend of primary (PS) and secondary (SS) sewage sludge, with the PS share given
//! by `mixing_ratio2`. Its total COD is split so that the blend carries 338.33 kg COD/m³.
//! Line 2 is a carbohydrate-rich co-substrate with 259.992 kg COD/m³.
//! Both lines are weighted by the feed split `mixing_ratio`.
//!
//! ## Initial states
//! - [`InitialScenario::Startup`]: a freshly seeded digester with almost no particulates and
//!   an active biomass inoculum
//! - [`InitialScenario::SteadyStateSludge`]: a digester already loaded with line-1 sludge
//!   and a line-2 inventory equal to the feed
use crate::ADM1::error::Adm1Error;
use crate::ADM1::state::{DynamicState, InfluentVector, StateVar};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const LINE1_TOTAL_COD: f64 = 338.33;
const LINE2_TOTAL_COD: f64 = 259.992;
/// (carbohydrate, protein, lipid) shares of the particulate COD
const PS_FRACTIONS: [f64; 3] = [0.2041, 0.0045, 0.0828];
const SS_FRACTIONS: [f64; 3] = [0.0647, 0.2822, 0.0697];
const LINE2_FRACTIONS: [f64; 3] = [0.79, 0.184, 0.026];
const LINE2_INERTS: f64 = 19.023;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InitialScenario {
    #[default]
    Startup,
    SteadyStateSludge,
}

impl InitialScenario {
    pub fn state(&self, mixing_ratio: f64) -> DynamicState {
        match self {
            InitialScenario::Startup => startup_initial_state(mixing_ratio),
            InitialScenario::SteadyStateSludge => steady_state_sludge_initial_state(mixing_ratio),
        }
    }
}

impl fmt::Display for InitialScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitialScenario::Startup => write!(f, "startup"),
            InitialScenario::SteadyStateSludge => write!(f, "steady_state_sludge"),
        }
    }
}

impl FromStr for InitialScenario {
    type Err = Adm1Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "startup" => Ok(InitialScenario::Startup),
            "steady_state_sludge" => Ok(InitialScenario::SteadyStateSludge),
            _ => Err(Adm1Error::Configuration(format!(
                "unknown initial-state scenario '{}'",
                s
            ))),
        }
    }
}

/// Line-2 particulates (xc, ch, pr, li) and inerts at feed strength.
fn line2_feed(mixing_ratio: f64) -> ([f64; 4], f64) {
    let share = 1.0 - mixing_ratio;
    let [ch, pr, li] = LINE2_FRACTIONS.map(|frac| share * frac * LINE2_TOTAL_COD);
    ([0.0, ch, pr, li], share * LINE2_INERTS)
}

/// Default two-line feed. `mixing_ratio2` is the PS share of line 1 and must lie in (0, 1].
pub fn default_influent(mixing_ratio: f64, mixing_ratio2: f64) -> Result<InfluentVector, Adm1Error> {
    if !(mixing_ratio2 > 0.0 && mixing_ratio2 <= 1.0) {
        return Err(Adm1Error::Configuration(format!(
            "mixing_ratio2 must lie in (0, 1], got {}",
            mixing_ratio2
        )));
    }
    if !(0.0..=1.0).contains(&mixing_ratio) {
        return Err(Adm1Error::Configuration(format!(
            "mixing_ratio must lie in [0, 1], got {}",
            mixing_ratio
        )));
    }
    use StateVar::*;
    let m = mixing_ratio;
    let m2 = mixing_ratio2;
    let ps_total = LINE1_TOTAL_COD / (2.0 * m2 + 1.0 / m2 - 2.0);
    let ss_total = ps_total * (1.0 / m2 - 1.0);
    // each sludge component is weighted by the feed split once, the blend once more
    let sludge = |fractions: [f64; 3], total: f64| {
        let inert = 1.0 - fractions.iter().sum::<f64>();
        let [ch, pr, li] = fractions.map(|frac| m * frac * total);
        [ch, pr, li, m * inert * total]
    };
    let ps = sludge(PS_FRACTIONS, ps_total);
    let ss = sludge(SS_FRACTIONS, ss_total);
    let line1: Vec<f64> = ps
        .iter()
        .zip(ss.iter())
        .map(|(p, s)| m * (m2 * p + (1.0 - m2) * s))
        .collect();
    let (line2, inerts2) = line2_feed(m);

    let mut inf = InfluentVector::zeros();
    for var in [S_su, S_aa, S_fa, S_va, S_bu, S_pro, S_ac] {
        inf.set(var, 0.001)?;
    }
    let entries = [
        (S_h2, 1e-8),
        (S_ch4, 1e-5),
        (S_IC, 0.04),
        (S_IN, 0.0),
        (S_I, 0.02),
        (X_xc1, 0.0),
        (X_ch1, line1[0]),
        (X_pr1, line1[1]),
        (X_li1, line1[2]),
        (X_xc2, line2[0]),
        (X_ch2, line2[1]),
        (X_pr2, line2[2]),
        (X_li2, line2[3]),
        (X_I, line1[3] + inerts2),
        (S_cation, 0.04),
        (S_anion, 0.02),
    ];
    for (var, value) in entries {
        inf.set(var, value)?;
    }
    Ok(inf)
}

/// Rescales concentrations defined at `q_ad_init` to the actual inflow `q_in` so that
/// the mass load is preserved. Line-specific particulates use the per-line flows; a line
/// without flow keeps its concentrations.
pub fn rescale_influent(
    influent: &InfluentVector,
    mixing_ratio: f64,
    q_in: f64,
    q_ad_init: f64,
) -> InfluentVector {
    use StateVar::*;
    let ratio = |reference: f64, actual: f64| {
        if actual > 0.0 { reference / actual } else { 1.0 }
    };
    let shared = ratio(q_ad_init, q_in);
    let line1 = ratio(mixing_ratio * q_ad_init, mixing_ratio * q_in);
    let line2 = ratio((1.0 - mixing_ratio) * q_ad_init, (1.0 - mixing_ratio) * q_in);

    let mut out = influent.clone();
    for (value, var) in out.values.iter_mut().zip(StateVar::influent_vars()) {
        let factor = match var {
            X_xc1 | X_ch1 | X_pr1 | X_li1 => line1,
            X_xc2 | X_ch2 | X_pr2 | X_li2 => line2,
            _ => shared,
        };
        *value *= factor;
    }
    out
}

/// Entries common to both start-up states: solubles, inoculum-independent ions and headspace.
fn base_state() -> DynamicState {
    use StateVar::*;
    let mut x = DynamicState::zeros();
    for var in [S_su, S_aa, S_fa, S_va, S_bu, S_pro, S_ac] {
        x[var] = 1e-5;
    }
    x[S_h2] = 1e-8;
    x[S_ch4] = 1e-5;
    x[S_IC] = 0.04;
    x[S_IN] = 0.01;
    x[S_I] = 0.02;
    x[X_h2] = 0.466;
    x[S_cation] = 0.04;
    x[S_anion] = 0.02;
    x[S_H_ion] = 6.04e-8;
    x[S_va_ion] = 0.0082;
    x[S_bu_ion] = 0.0156;
    x[S_pro_ion] = 0.0172;
    x[S_ac_ion] = 0.11199;
    x[S_hco3_ion] = 0.15415;
    x[S_co2] = 0.0093003;
    x[S_nh3] = 0.0025;
    x[S_nh4_ion] = 0.126138;
    x[S_gas_h2] = 4.91e-6;
    x[S_gas_ch4] = 1.78;
    x[S_gas_co2] = 0.025;
    x
}

pub fn startup_initial_state(mixing_ratio: f64) -> DynamicState {
    use StateVar::*;
    let m = mixing_ratio;
    let mut x = base_state();
    let line1_total = 2.0 + 5.0 + 20.0 + 5.0;
    x[X_xc1] = m * (2.0 / line1_total) * 1e-5;
    x[X_ch1] = m * (5.0 / line1_total) * 1e-5;
    x[X_pr1] = m * (20.0 / line1_total) * 1e-5;
    x[X_li1] = m * (5.0 / line1_total) * 1e-5;
    let line2_total = 205.0 + 47.76 + 6.925;
    x[X_xc2] = 0.0;
    x[X_ch2] = (1.0 - m) * (205.0 / line2_total) * 1e-5;
    x[X_pr2] = (1.0 - m) * (47.76 / line2_total) * 1e-5;
    x[X_li2] = (1.0 - m) * (6.925 / line2_total) * 1e-5;
    // inoculum: five times the reference biomass
    x[X_su] = 5.0 * 1.41;
    x[X_aa] = 5.0 * 0.75;
    x[X_fa] = 5.0 * 0.38;
    x[X_c4] = 5.0 * 0.35;
    x[X_pro] = 5.0 * 0.197;
    x[X_ac] = 5.0 * 0.95;
    x[X_I] = 25.6;
    x
}

pub fn steady_state_sludge_initial_state(mixing_ratio: f64) -> DynamicState {
    use StateVar::*;
    let m = mixing_ratio;
    let mut x = base_state();
    x[X_xc1] = 0.0;
    x[X_ch1] = m * 53.21;
    x[X_pr1] = m * 33.62 * 0.2;
    x[X_li1] = m * 26.51;
    let (line2, inerts2) = line2_feed(m);
    x[X_xc2] = line2[0];
    x[X_ch2] = line2[1];
    x[X_pr2] = line2[2];
    x[X_li2] = line2[3];
    x[X_su] = 1.41;
    x[X_aa] = 0.75;
    x[X_fa] = 0.38;
    x[X_c4] = 0.35;
    x[X_pro] = 0.197;
    x[X_ac] = 0.95 * 5.0;
    x[X_I] = m * 224.85 + inerts2;
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_influent_even_split() {
        let inf = default_influent(0.5, 0.5).unwrap();
        // m2 = 0.5: PS and SS both carry the full 338.33
        let total = 338.33;
        let expected_ch1 = 0.5 * (0.5 * 0.5 * 0.2041 * total + 0.5 * 0.5 * 0.0647 * total);
        assert_relative_eq!(inf.feed(StateVar::X_ch1), expected_ch1, max_relative = 1e-12);
        assert_relative_eq!(inf.feed(StateVar::X_ch2), 0.5 * 0.79 * 259.992, max_relative = 1e-12);
        assert_eq!(inf.feed(StateVar::X_xc1), 0.0);
        assert_eq!(inf.feed(StateVar::X_xc2), 0.0);
        assert_eq!(inf.feed(StateVar::X_su), 0.0);
        assert_eq!(inf.feed(StateVar::S_IN), 0.0);
        assert_relative_eq!(inf.feed(StateVar::S_cation), 0.04);
    }

    #[test]
    fn test_single_line_feed() {
        let inf = default_influent(1.0, 1.0).unwrap();
        assert_eq!(inf.feed(StateVar::X_ch2), 0.0);
        // PS only, total COD 338.33
        assert_relative_eq!(inf.feed(StateVar::X_ch1), 0.2041 * 338.33, max_relative = 1e-12);
        let inerts = 1.0 - (0.2041 + 0.0045 + 0.0828);
        assert_relative_eq!(inf.feed(StateVar::X_I), inerts * 338.33, max_relative = 1e-12);
    }

    #[test]
    fn test_invalid_sludge_ratio_is_rejected() {
        assert!(default_influent(0.5, 0.0).unwrap_err().is_configuration());
        assert!(default_influent(0.5, 1.5).is_err());
        assert!(default_influent(-0.1, 0.5).is_err());
    }

    #[test]
    fn test_rescale_preserves_mass_load() {
        let inf = default_influent(0.4, 0.5).unwrap();
        let q_ad_init = 170.0;
        let q_in = 340.0;
        let out = rescale_influent(&inf, 0.4, q_in, q_ad_init);
        for var in StateVar::influent_vars() {
            assert_relative_eq!(out.feed(var) * q_in, inf.feed(var) * q_ad_init, max_relative = 1e-12);
        }
        // zero inflow leaves the feed untouched
        assert_eq!(rescale_influent(&inf, 0.4, 0.0, q_ad_init), inf);
    }

    #[test]
    fn test_initial_scenarios() {
        let startup = InitialScenario::Startup.state(0.5);
        assert_relative_eq!(startup[StateVar::X_ac], 4.75, max_relative = 1e-12);
        assert_relative_eq!(startup[StateVar::X_pr1], 0.5 * 20.0 / 32.0 * 1e-5, max_relative = 1e-12);
        let loaded = InitialScenario::SteadyStateSludge.state(0.5);
        assert_relative_eq!(loaded[StateVar::X_ch1], 26.605, max_relative = 1e-12);
        assert_relative_eq!(loaded[StateVar::X_I], 0.5 * 224.85 + 0.5 * 19.023, max_relative = 1e-12);
        assert!(loaded.values.iter().all(|v| *v >= 0.0));
        assert_eq!(
            "steady_state_sludge".parse::<InitialScenario>().unwrap(),
            InitialScenario::SteadyStateSludge
        );
        assert!("warm".parse::<InitialScenario>().is_err());
    }
}
