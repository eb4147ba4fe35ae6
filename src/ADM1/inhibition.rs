//! # Inhibition factors
//!
//! Base factors:
//! - pH inhibition of acidogens/acetogens (`I_pH_aa`), acetoclastic methanogens (`I_pH_ac`)
//!   and hydrogenotrophic methanogens (`I_pH_h2`), empirical lower-limit form
//!   `exp(-3·((pH - pH_UL)/(pH_UL - pH_LL))²)` below the upper limit, 1 above it
//! - inorganic nitrogen limitation `1/(1 + K_S_IN/S_IN)`
//! - hydrogen inhibition of LCFA, C4 and propionate degraders `1/(1 + S_h2/K_I)`
//! - free ammonia inhibition of acetoclastic methanogens `1/(1 + S_nh3/K_I_nh3)`
//!
//! Composite factors I_5 … I_12 are the products used by the uptake process rates.
use crate::ADM1::parameters::ParameterSet;

/// Inhibition constants with the literature defaults used when a key is absent.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct InhibitionParams {
    pub K_S_IN: f64,
    pub K_I_h2_fa: f64,
    pub K_I_h2_c4: f64,
    pub K_I_h2_pro: f64,
    pub K_I_nh3: f64,
    pub pH_UL_aa: f64,
    pub pH_LL_aa: f64,
    pub pH_UL_ac: f64,
    pub pH_LL_ac: f64,
    pub pH_UL_h2: f64,
    pub pH_LL_h2: f64,
}

impl Default for InhibitionParams {
    fn default() -> Self {
        InhibitionParams {
            K_S_IN: 1e-4,
            K_I_h2_fa: 1e-6,
            K_I_h2_c4: 1e-6,
            K_I_h2_pro: 1e-6,
            K_I_nh3: 0.0018,
            pH_UL_aa: 5.5,
            pH_LL_aa: 4.0,
            pH_UL_ac: 7.0,
            pH_LL_ac: 6.0,
            pH_UL_h2: 6.0,
            pH_LL_h2: 5.0,
        }
    }
}

impl InhibitionParams {
    pub fn from_set(set: &ParameterSet) -> Self {
        let d = InhibitionParams::default();
        InhibitionParams {
            K_S_IN: set.get_or("K_S_IN", d.K_S_IN),
            K_I_h2_fa: set.get_or("K_I_h2_fa", d.K_I_h2_fa),
            K_I_h2_c4: set.get_or("K_I_h2_c4", d.K_I_h2_c4),
            K_I_h2_pro: set.get_or("K_I_h2_pro", d.K_I_h2_pro),
            K_I_nh3: set.get_or("K_I_nh3", d.K_I_nh3),
            pH_UL_aa: set.get_or("pH_UL_aa", d.pH_UL_aa),
            pH_LL_aa: set.get_or("pH_LL_aa", d.pH_LL_aa),
            pH_UL_ac: set.get_or("pH_UL_ac", d.pH_UL_ac),
            pH_LL_ac: set.get_or("pH_LL_ac", d.pH_LL_ac),
            pH_UL_h2: set.get_or("pH_UL_h2", d.pH_UL_h2),
            pH_LL_h2: set.get_or("pH_LL_h2", d.pH_LL_h2),
        }
    }
}

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InhibitionFactors {
    pub I_pH_aa: f64,
    pub I_pH_ac: f64,
    pub I_pH_h2: f64,
    pub I_IN_lim: f64,
    pub I_h2_fa: f64,
    pub I_h2_c4: f64,
    pub I_h2_pro: f64,
    pub I_nh3: f64,
    pub I_5: f64,
    pub I_6: f64,
    pub I_7: f64,
    pub I_8: f64,
    pub I_9: f64,
    pub I_10: f64,
    pub I_11: f64,
    pub I_12: f64,
}

pub const INHIBITION_COLUMNS: [&str; 16] = [
    "I_pH_aa", "I_pH_ac", "I_pH_h2", "I_IN_lim", "I_h2_fa", "I_h2_c4", "I_h2_pro", "I_nh3", "I_5",
    "I_6", "I_7", "I_8", "I_9", "I_10", "I_11", "I_12",
];

impl InhibitionFactors {
    pub fn uninhibited() -> Self {
        InhibitionFactors::from_base([1.0; 8])
    }

    /// Composite factors follow the ADM1 process-rate table.
    fn from_base(base: [f64; 8]) -> Self {
        let [pH_aa, pH_ac, pH_h2, IN_lim, h2_fa, h2_c4, h2_pro, nh3] = base;
        InhibitionFactors {
            I_pH_aa: pH_aa,
            I_pH_ac: pH_ac,
            I_pH_h2: pH_h2,
            I_IN_lim: IN_lim,
            I_h2_fa: h2_fa,
            I_h2_c4: h2_c4,
            I_h2_pro: h2_pro,
            I_nh3: nh3,
            I_5: pH_aa * IN_lim,
            I_6: pH_aa * IN_lim,
            I_7: pH_aa * IN_lim * h2_fa,
            I_8: pH_aa * IN_lim * h2_c4,
            I_9: pH_aa * IN_lim * h2_c4,
            I_10: pH_aa * IN_lim * h2_pro,
            I_11: pH_ac * IN_lim * nh3,
            I_12: pH_h2 * IN_lim,
        }
    }

    pub fn values(&self) -> [f64; 16] {
        [
            self.I_pH_aa,
            self.I_pH_ac,
            self.I_pH_h2,
            self.I_IN_lim,
            self.I_h2_fa,
            self.I_h2_c4,
            self.I_h2_pro,
            self.I_nh3,
            self.I_5,
            self.I_6,
            self.I_7,
            self.I_8,
            self.I_9,
            self.I_10,
            self.I_11,
            self.I_12,
        ]
    }
}

fn ph_factor(pH: f64, upper: f64, lower: f64) -> f64 {
    if pH < upper {
        (-3.0 * ((pH - upper) / (upper - lower)).powi(2)).exp()
    } else {
        1.0
    }
}

/// Computes base and composite inhibition factors.
///
/// `disable_inhibition` forces every factor to 1.0 regardless of the inputs, which
/// isolates the kinetic response from the inhibition response in what-if runs.
pub fn compute_inhibition_factors(
    s_h_ion: f64,
    s_in: f64,
    s_h2: f64,
    s_nh3: f64,
    params: &InhibitionParams,
    disable_inhibition: bool,
) -> InhibitionFactors {
    if disable_inhibition {
        return InhibitionFactors::uninhibited();
    }
    let pH = -s_h_ion.log10();
    let base = [
        ph_factor(pH, params.pH_UL_aa, params.pH_LL_aa),
        ph_factor(pH, params.pH_UL_ac, params.pH_LL_ac),
        ph_factor(pH, params.pH_UL_h2, params.pH_LL_h2),
        1.0 / (1.0 + params.K_S_IN / s_in),
        1.0 / (1.0 + s_h2 / params.K_I_h2_fa),
        1.0 / (1.0 + s_h2 / params.K_I_h2_c4),
        1.0 / (1.0 + s_h2 / params.K_I_h2_pro),
        1.0 / (1.0 + s_nh3 / params.K_I_nh3),
    ];
    InhibitionFactors::from_base(base)
}
