//! # ADM1 parameter sets
//!
//! ## Purpose
//! Holds the biochemical parameter tables suggested for ADM1 (Batstone et al. 2002, Table 6.2)
//! and the temperature-dependent physicochemical constants (Rosen & Jeppsson 2006).
//!
//! ## Main Structures
//! - [`ParameterRegime`]: named table (mesophilic high-rate, mesophilic solids, thermophilic solids)
//! - [`ParameterSet`]: mutable name→value mapping; overrides are applied here
//! - [`ModelParameters`]: typed, frozen context passed by reference into every kinetic routine
//!
//! ## Interesting Features
//! - Regime selection by digestion temperature: 20–40 °C → mesophilic solids, 45–70 °C →
//!   thermophilic solids, anything else (including the 40–45 °C gap) → mesophilic solids.
//! - Carbon contents `C_*` of the first feedstock line are scaled by the mixing ratio; the
//!   `C_*_ref` entries keep the unscaled values so that the second line can be recovered as
//!   `C_*_ref - C_*`.
//! - A key absent from the set is reported as [`Adm1Error::MissingParameter`] when the typed
//!   context is built, i.e. before the first time step.
use crate::ADM1::error::Adm1Error;
use crate::ADM1::inhibition::InhibitionParams;
use log::{info, warn};
use std::collections::HashMap;
use strum_macros::EnumIter;

/// Gas constant [bar·M⁻¹·K⁻¹]
pub const R_GAS: f64 = 0.083145;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ParameterRegime {
    MesophilicHighRate,
    MesophilicSolids,
    ThermophilicSolids,
}

impl ParameterRegime {
    pub fn name(&self) -> &'static str {
        match self {
            ParameterRegime::MesophilicHighRate => "mesophilic_high_rate",
            ParameterRegime::MesophilicSolids => "mesophilic_solids",
            ParameterRegime::ThermophilicSolids => "thermophilic_solids",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "mesophilic_high_rate" => Some(ParameterRegime::MesophilicHighRate),
            "mesophilic_solids" => Some(ParameterRegime::MesophilicSolids),
            "thermophilic_solids" => Some(ParameterRegime::ThermophilicSolids),
            _ => None,
        }
    }

    /// Picks the table for a digestion temperature given in Kelvin.
    #[allow(non_snake_case)]
    pub fn select(T_ad: f64) -> Self {
        let t_celsius = T_ad - 273.15;
        if (20.0..=40.0).contains(&t_celsius) {
            ParameterRegime::MesophilicSolids
        } else if (45.0..=70.0).contains(&t_celsius) {
            ParameterRegime::ThermophilicSolids
        } else {
            ParameterRegime::MesophilicSolids
        }
    }

    pub fn table(&self) -> Vec<(&'static str, f64)> {
        // rows shared by all three sets
        let mut table = vec![
            ("k_hyd_ch1", 0.1),
            ("k_hyd_pr1", 0.1),
            ("k_hyd_li1", 0.1),
            ("k_hyd_ch2", 5.22),
            ("k_hyd_pr2", 1.86),
            ("k_hyd_li2", 1.24),
            ("K_S_IN", 1e-4),
            ("pH_UL_aa", 5.5),
            ("pH_LL_aa", 4.0),
            ("K_S_aa", 0.3),
            ("Y_aa", 0.08),
            ("K_S_fa", 0.4),
            ("Y_fa", 0.06),
            ("K_I_h2_fa", 5e-6),
            ("Y_ac", 0.05),
            ("pH_UL_ac", 7.0),
            ("pH_LL_ac", 6.0),
            ("k_m_h2", 35.0),
            ("Y_h2", 0.06),
            ("pH_UL_h2", 6.0),
            ("pH_LL_h2", 5.0),
            ("Y_su", 0.1),
        ];
        let specific: Vec<(&'static str, f64)> = match self {
            ParameterRegime::MesophilicHighRate | ParameterRegime::MesophilicSolids => {
                let high_rate = *self == ParameterRegime::MesophilicHighRate;
                vec![
                    ("k_dis1", if high_rate { 0.4 } else { 0.5 }),
                    ("k_dis2", if high_rate { 0.4 } else { 0.5 }),
                    ("k_dec_X_su", 0.02),
                    ("k_dec_X_aa", 0.02),
                    ("k_dec_X_fa", 0.02),
                    ("k_dec_X_c4", 0.02),
                    ("k_dec_X_pro", 0.02),
                    ("k_dec_X_ac", 0.02),
                    ("k_dec_X_h2", 0.02),
                    ("k_m_su", 30.0),
                    ("K_S_su", 0.5),
                    ("k_m_aa", 50.0),
                    ("k_m_fa", 6.0),
                    ("k_m_c4", 20.0),
                    ("K_S_c4", 0.3),
                    ("Y_c4", 0.04),
                    ("K_I_h2_c4", 3.5_f64.powi(-6)),
                    ("k_m_pro", 13.0),
                    ("K_S_pro", if high_rate { 0.3 } else { 0.1 }),
                    ("Y_pro", 0.04),
                    ("K_I_h2_pro", 3.5e-6),
                    ("k_m_ac", 8.0),
                    ("K_S_ac", 0.15),
                    ("K_I_nh3", 0.0018),
                    ("K_S_h2", if high_rate { 2.5e-5 } else { 7e-6 }),
                ]
            }
            ParameterRegime::ThermophilicSolids => vec![
                ("k_dis1", 1.0),
                ("k_dis2", 1.0),
                ("k_dec_X_su", 0.04),
                ("k_dec_X_aa", 0.04),
                ("k_dec_X_fa", 0.04),
                ("k_dec_X_c4", 0.04),
                ("k_dec_X_pro", 0.04),
                ("k_dec_X_ac", 0.04),
                ("k_dec_X_h2", 0.04),
                ("k_m_su", 70.0),
                ("K_S_su", 1.0),
                ("k_m_aa", 70.0),
                ("k_m_fa", 10.0),
                ("k_m_c4", 30.0),
                ("K_S_c4", 0.4),
                ("Y_c4", 0.06),
                ("K_I_h2_c4", 3.0_f64.powi(-5)),
                ("k_m_pro", 20.0),
                ("K_S_pro", 0.3),
                ("Y_pro", 0.05),
                ("K_I_h2_pro", 1e-5),
                ("k_m_ac", 16.0),
                ("K_S_ac", 0.3),
                ("K_I_nh3", 0.011),
                ("K_S_h2", 5e-5),
            ],
        };
        table.extend(specific);
        table
    }
}

/////////////////////////////////////////PARAMETER SET/////////////////////////////////////////

/// Named parameter mapping. Built once per run, then frozen into [`ModelParameters`].
#[derive(Debug, Clone)]
pub struct ParameterSet {
    pub regime: ParameterRegime,
    values: HashMap<String, f64>,
}

impl ParameterSet {
    /// Regime table plus temperature-corrected physicochemical constants,
    /// composition fractions and elemental contents.
    #[allow(non_snake_case)]
    pub fn new(regime: ParameterRegime, T_ad: f64, T_base: f64, mixing_ratio: f64) -> Self {
        let mut values: HashMap<String, f64> = regime
            .table()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let R = R_GAS;
        let dT = 1.0 / T_base - 1.0 / T_ad;
        let physchem = [
            ("K_w", 1e-14 * ((55900.0 / (100.0 * R)) * dT).exp()),
            ("K_a_va", 10f64.powf(-4.86)),
            ("K_a_bu", 10f64.powf(-4.82)),
            ("K_a_pro", 10f64.powf(-4.88)),
            ("K_a_ac", 10f64.powf(-4.76)),
            ("K_a_co2", 10f64.powf(-6.35) * ((7646.0 / (100.0 * R)) * dT).exp()),
            ("K_a_IN", 10f64.powf(-9.25) * ((51965.0 / (100.0 * R)) * dT).exp()),
            ("k_A_B_va", 1e10),
            ("k_A_B_bu", 1e10),
            ("k_A_B_pro", 1e10),
            ("k_A_B_ac", 1e10),
            ("k_A_B_co2", 1e10),
            ("k_A_B_IN", 1e10),
            ("p_atm", 1.013),
            ("p_gas_h2o", 0.0313 * (5290.0 * dT).exp()),
            ("k_p", 5e4),
            ("k_L_a", 200.0),
            ("K_H_co2", 0.035 * ((-19410.0 / (100.0 * R)) * dT).exp()),
            ("K_H_ch4", 0.0014 * ((-14240.0 / (100.0 * R)) * dT).exp()),
            ("K_H_h2", 7.8e-4 * ((-4180.0 / (100.0 * R)) * dT).exp()),
        ];
        // particulate COD split of both feedstock lines
        let fractions = [
            ("f_sI_xc1", 0.1),
            ("f_xI_xc1", 0.2),
            ("f_ch_xc1", 0.2),
            ("f_pr_xc1", 0.2),
            ("f_li_xc1", 0.3),
            ("f_sI_xc2", 0.1),
            ("f_xI_xc2", 0.2),
            ("f_ch_xc2", 0.2),
            ("f_pr_xc2", 0.2),
            ("f_li_xc2", 0.3),
        ];
        let elemental = [
            ("N_xc", 0.0376 / 14.0),
            ("N_I", 0.06 / 14.0),
            ("N_aa", 0.007),
            ("N_bac", 0.08 / 14.0),
            ("C_xc", mixing_ratio * 0.02786),
            ("C_sI", mixing_ratio * 0.03),
            ("C_ch", mixing_ratio * 0.0313),
            ("C_pr", mixing_ratio * 0.03),
            ("C_li", mixing_ratio * 0.022),
            ("C_xI", mixing_ratio * 0.03),
            ("C_xc_ref", 0.02786),
            ("C_sI_ref", 0.03),
            ("C_ch_ref", 0.0313),
            ("C_pr_ref", 0.03),
            ("C_li_ref", 0.022),
            ("C_xI_ref", 0.03),
            ("C_su", 0.0313),
            ("C_aa", 0.03),
            ("C_fa", 0.0217),
            ("C_bu", 0.025),
            ("C_pro", 0.0268),
            ("C_ac", 0.0313),
            ("C_bac", 0.0313),
            ("C_va", 0.024),
            ("C_ch4", 0.0156),
            ("f_fa_li", 0.95),
            ("f_h2_su", 0.19),
            ("f_bu_su", 0.13),
            ("f_pro_su", 0.27),
            ("f_ac_su", 0.41),
            ("f_h2_aa", 0.06),
            ("f_va_aa", 0.23),
            ("f_bu_aa", 0.26),
            ("f_pro_aa", 0.05),
            ("f_ac_aa", 0.40),
        ];
        let operating = [
            ("R", R),
            ("T_ad", T_ad),
            ("T_op", T_ad),
            ("T_base", T_base),
            ("mixing_ratio", mixing_ratio),
        ];
        for (k, v) in physchem
            .iter()
            .chain(fractions.iter())
            .chain(elemental.iter())
            .chain(operating.iter())
        {
            values.insert(k.to_string(), *v);
        }
        ParameterSet { regime, values }
    }

    pub fn get(&self, key: &str) -> Result<f64, Adm1Error> {
        self.values
            .get(key)
            .copied()
            .ok_or_else(|| Adm1Error::MissingParameter(key.to_string()))
    }

    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    pub fn set(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<f64> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Caller overrides replace any entry; unknown keys are accepted but reported.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, f64>) {
        let mut keys: Vec<&String> = overrides.keys().collect();
        keys.sort();
        for key in keys {
            let value = overrides[key];
            match self.values.insert(key.clone(), value) {
                Some(old) => info!("parameter override {}: {} -> {}", key, old, value),
                None => warn!("parameter override {} = {} is not a known ADM1 parameter", key, value),
            }
        }
    }

    /// (key, value) pairs sorted by key
    pub fn sorted_entries(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> =
            self.values.iter().map(|(k, v)| (k.clone(), *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

/////////////////////////////////////////TYPED CONTEXT/////////////////////////////////////////

/// Frozen parameter context shared by the kinetics, the algebraic solver and the gas phase.
#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct ModelParameters {
    // disintegration and hydrolysis
    pub k_dis1: f64,
    pub k_dis2: f64,
    pub k_hyd_ch1: f64,
    pub k_hyd_pr1: f64,
    pub k_hyd_li1: f64,
    pub k_hyd_ch2: f64,
    pub k_hyd_pr2: f64,
    pub k_hyd_li2: f64,
    // uptake
    pub k_m_su: f64,
    pub K_S_su: f64,
    pub Y_su: f64,
    pub k_m_aa: f64,
    pub K_S_aa: f64,
    pub Y_aa: f64,
    pub k_m_fa: f64,
    pub K_S_fa: f64,
    pub Y_fa: f64,
    pub k_m_c4: f64,
    pub K_S_c4: f64,
    pub Y_c4: f64,
    pub k_m_pro: f64,
    pub K_S_pro: f64,
    pub Y_pro: f64,
    pub k_m_ac: f64,
    pub K_S_ac: f64,
    pub Y_ac: f64,
    pub k_m_h2: f64,
    pub K_S_h2: f64,
    pub Y_h2: f64,
    // decay
    pub k_dec_X_su: f64,
    pub k_dec_X_aa: f64,
    pub k_dec_X_fa: f64,
    pub k_dec_X_c4: f64,
    pub k_dec_X_pro: f64,
    pub k_dec_X_ac: f64,
    pub k_dec_X_h2: f64,
    // stoichiometry
    pub f_sI_xc1: f64,
    pub f_xI_xc1: f64,
    pub f_ch_xc1: f64,
    pub f_pr_xc1: f64,
    pub f_li_xc1: f64,
    pub f_sI_xc2: f64,
    pub f_xI_xc2: f64,
    pub f_ch_xc2: f64,
    pub f_pr_xc2: f64,
    pub f_li_xc2: f64,
    pub f_fa_li: f64,
    pub f_h2_su: f64,
    pub f_bu_su: f64,
    pub f_pro_su: f64,
    pub f_ac_su: f64,
    pub f_h2_aa: f64,
    pub f_va_aa: f64,
    pub f_bu_aa: f64,
    pub f_pro_aa: f64,
    pub f_ac_aa: f64,
    // nitrogen and carbon contents
    pub N_xc: f64,
    pub N_I: f64,
    pub N_aa: f64,
    pub N_bac: f64,
    pub C_xc: f64,
    pub C_sI: f64,
    pub C_ch: f64,
    pub C_pr: f64,
    pub C_li: f64,
    pub C_xI: f64,
    pub C_xc_ref: f64,
    pub C_sI_ref: f64,
    pub C_ch_ref: f64,
    pub C_pr_ref: f64,
    pub C_li_ref: f64,
    pub C_xI_ref: f64,
    pub C_su: f64,
    pub C_aa: f64,
    pub C_fa: f64,
    pub C_bu: f64,
    pub C_pro: f64,
    pub C_ac: f64,
    pub C_bac: f64,
    pub C_va: f64,
    pub C_ch4: f64,
    // acid-base and gas-liquid equilibria
    pub K_w: f64,
    pub K_a_va: f64,
    pub K_a_bu: f64,
    pub K_a_pro: f64,
    pub K_a_ac: f64,
    pub K_a_co2: f64,
    pub K_a_IN: f64,
    pub k_A_B_va: f64,
    pub k_A_B_bu: f64,
    pub k_A_B_pro: f64,
    pub k_A_B_ac: f64,
    pub k_A_B_co2: f64,
    pub k_A_B_IN: f64,
    pub K_H_co2: f64,
    pub K_H_ch4: f64,
    pub K_H_h2: f64,
    pub p_atm: f64,
    pub p_gas_h2o: f64,
    pub k_p: f64,
    pub k_L_a: f64,
    pub R: f64,
    pub T_ad: f64,
    pub T_op: f64,
    pub T_base: f64,
    // reactor
    pub mixing_ratio: f64,
    pub q_ad: f64,
    pub q_in1: f64,
    pub q_in2: f64,
    pub V_liq: f64,
    pub V_gas: f64,
    pub inhibition: InhibitionParams,
}

impl ModelParameters {
    /// Reads every key the model needs; the first absent key aborts with
    /// [`Adm1Error::MissingParameter`].
    pub fn from_set(set: &ParameterSet) -> Result<Self, Adm1Error> {
        let g = |key: &str| set.get(key);
        let params = ModelParameters {
            k_dis1: g("k_dis1")?,
            k_dis2: g("k_dis2")?,
            k_hyd_ch1: g("k_hyd_ch1")?,
            k_hyd_pr1: g("k_hyd_pr1")?,
            k_hyd_li1: g("k_hyd_li1")?,
            k_hyd_ch2: g("k_hyd_ch2")?,
            k_hyd_pr2: g("k_hyd_pr2")?,
            k_hyd_li2: g("k_hyd_li2")?,
            k_m_su: g("k_m_su")?,
            K_S_su: g("K_S_su")?,
            Y_su: g("Y_su")?,
            k_m_aa: g("k_m_aa")?,
            K_S_aa: g("K_S_aa")?,
            Y_aa: g("Y_aa")?,
            k_m_fa: g("k_m_fa")?,
            K_S_fa: g("K_S_fa")?,
            Y_fa: g("Y_fa")?,
            k_m_c4: g("k_m_c4")?,
            K_S_c4: g("K_S_c4")?,
            Y_c4: g("Y_c4")?,
            k_m_pro: g("k_m_pro")?,
            K_S_pro: g("K_S_pro")?,
            Y_pro: g("Y_pro")?,
            k_m_ac: g("k_m_ac")?,
            K_S_ac: g("K_S_ac")?,
            Y_ac: g("Y_ac")?,
            k_m_h2: g("k_m_h2")?,
            K_S_h2: g("K_S_h2")?,
            Y_h2: g("Y_h2")?,
            k_dec_X_su: g("k_dec_X_su")?,
            k_dec_X_aa: g("k_dec_X_aa")?,
            k_dec_X_fa: g("k_dec_X_fa")?,
            k_dec_X_c4: g("k_dec_X_c4")?,
            k_dec_X_pro: g("k_dec_X_pro")?,
            k_dec_X_ac: g("k_dec_X_ac")?,
            k_dec_X_h2: g("k_dec_X_h2")?,
            f_sI_xc1: g("f_sI_xc1")?,
            f_xI_xc1: g("f_xI_xc1")?,
            f_ch_xc1: g("f_ch_xc1")?,
            f_pr_xc1: g("f_pr_xc1")?,
            f_li_xc1: g("f_li_xc1")?,
            f_sI_xc2: g("f_sI_xc2")?,
            f_xI_xc2: g("f_xI_xc2")?,
            f_ch_xc2: g("f_ch_xc2")?,
            f_pr_xc2: g("f_pr_xc2")?,
            f_li_xc2: g("f_li_xc2")?,
            f_fa_li: g("f_fa_li")?,
            f_h2_su: g("f_h2_su")?,
            f_bu_su: g("f_bu_su")?,
            f_pro_su: g("f_pro_su")?,
            f_ac_su: g("f_ac_su")?,
            f_h2_aa: g("f_h2_aa")?,
            f_va_aa: g("f_va_aa")?,
            f_bu_aa: g("f_bu_aa")?,
            f_pro_aa: g("f_pro_aa")?,
            f_ac_aa: g("f_ac_aa")?,
            N_xc: g("N_xc")?,
            N_I: g("N_I")?,
            N_aa: g("N_aa")?,
            N_bac: g("N_bac")?,
            C_xc: g("C_xc")?,
            C_sI: g("C_sI")?,
            C_ch: g("C_ch")?,
            C_pr: g("C_pr")?,
            C_li: g("C_li")?,
            C_xI: g("C_xI")?,
            C_xc_ref: g("C_xc_ref")?,
            C_sI_ref: g("C_sI_ref")?,
            C_ch_ref: g("C_ch_ref")?,
            C_pr_ref: g("C_pr_ref")?,
            C_li_ref: g("C_li_ref")?,
            C_xI_ref: g("C_xI_ref")?,
            C_su: g("C_su")?,
            C_aa: g("C_aa")?,
            C_fa: g("C_fa")?,
            C_bu: g("C_bu")?,
            C_pro: g("C_pro")?,
            C_ac: g("C_ac")?,
            C_bac: g("C_bac")?,
            C_va: g("C_va")?,
            C_ch4: g("C_ch4")?,
            K_w: g("K_w")?,
            K_a_va: g("K_a_va")?,
            K_a_bu: g("K_a_bu")?,
            K_a_pro: g("K_a_pro")?,
            K_a_ac: g("K_a_ac")?,
            K_a_co2: g("K_a_co2")?,
            K_a_IN: g("K_a_IN")?,
            k_A_B_va: g("k_A_B_va")?,
            k_A_B_bu: g("k_A_B_bu")?,
            k_A_B_pro: g("k_A_B_pro")?,
            k_A_B_ac: g("k_A_B_ac")?,
            k_A_B_co2: g("k_A_B_co2")?,
            k_A_B_IN: g("k_A_B_IN")?,
            K_H_co2: g("K_H_co2")?,
            K_H_ch4: g("K_H_ch4")?,
            K_H_h2: g("K_H_h2")?,
            p_atm: g("p_atm")?,
            p_gas_h2o: g("p_gas_h2o")?,
            k_p: g("k_p")?,
            k_L_a: g("k_L_a")?,
            R: g("R")?,
            T_ad: g("T_ad")?,
            T_op: g("T_op")?,
            T_base: g("T_base")?,
            mixing_ratio: g("mixing_ratio")?,
            q_ad: g("q_ad")?,
            q_in1: g("q_in1")?,
            q_in2: g("q_in2")?,
            V_liq: g("V_liq")?,
            V_gas: g("V_gas")?,
            inhibition: InhibitionParams::from_set(set),
        };
        if params.V_liq <= 0.0 || params.V_gas <= 0.0 {
            return Err(Adm1Error::Configuration(format!(
                "reactor volumes must be positive (V_liq = {}, V_gas = {})",
                params.V_liq, params.V_gas
            )));
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    fn reactor_entries(set: &mut ParameterSet) {
        set.set("q_ad", 170.0);
        set.set("q_in1", 85.0);
        set.set("q_in2", 85.0);
        set.set("V_liq", 3400.0);
        set.set("V_gas", 340.0);
    }

    #[test]
    fn test_regime_boundaries() {
        assert_eq!(ParameterRegime::select(313.15), ParameterRegime::MesophilicSolids);
        assert_eq!(ParameterRegime::select(318.15), ParameterRegime::ThermophilicSolids);
        assert_eq!(ParameterRegime::select(308.15), ParameterRegime::MesophilicSolids);
        assert_eq!(ParameterRegime::select(293.15), ParameterRegime::MesophilicSolids);
        assert_eq!(ParameterRegime::select(343.15), ParameterRegime::ThermophilicSolids);
        // the 40-45 C gap and out-of-range temperatures fall back to mesophilic
        assert_eq!(ParameterRegime::select(315.15), ParameterRegime::MesophilicSolids);
        assert_eq!(ParameterRegime::select(353.15), ParameterRegime::MesophilicSolids);
        assert_eq!(ParameterRegime::select(283.15), ParameterRegime::MesophilicSolids);
    }

    #[test]
    fn test_regime_names_roundtrip() {
        for regime in ParameterRegime::iter() {
            assert_eq!(ParameterRegime::from_name(regime.name()), Some(regime));
            let keys: Vec<&str> = regime.table().iter().map(|(k, _)| *k).collect();
            assert_eq!(keys.len(), 47);
            assert!(keys.contains(&"K_I_h2_c4"));
        }
        assert_eq!(ParameterRegime::from_name("psychrophilic"), None);
    }

    #[test]
    fn test_reference_temperature_constants() {
        // at T_ad == T_base every correction factor is 1
        let set = ParameterSet::new(ParameterRegime::MesophilicSolids, 298.15, 298.15, 0.5);
        assert_relative_eq!(set.get("K_w").unwrap(), 1e-14, max_relative = 1e-12);
        assert_relative_eq!(set.get("K_H_co2").unwrap(), 0.035, max_relative = 1e-12);
        assert_relative_eq!(set.get("p_gas_h2o").unwrap(), 0.0313, max_relative = 1e-12);
        assert_relative_eq!(set.get("C_xc").unwrap(), 0.5 * 0.02786, max_relative = 1e-12);
        assert_relative_eq!(set.get("K_I_h2_c4").unwrap(), 3.5_f64.powi(-6), max_relative = 1e-12);
    }

    #[test]
    fn test_temperature_corrections_at_35_celsius() {
        let set = ParameterSet::new(ParameterRegime::MesophilicSolids, 308.15, 298.15, 0.5);
        let d_t = 1.0 / 298.15 - 1.0 / 308.15;
        let k_w = 1e-14 * (55900.0 / (100.0 * R_GAS) * d_t).exp();
        assert_relative_eq!(set.get("K_w").unwrap(), k_w, max_relative = 1e-12);
        // water dissociation grows, CO2 solubility drops with temperature
        assert!(set.get("K_w").unwrap() > 1e-14);
        assert!(set.get("K_H_co2").unwrap() < 0.035);
        assert_eq!(set.get("T_op").unwrap(), 308.15);
    }

    #[test]
    fn test_overrides_and_missing_parameter() {
        let mut set = ParameterSet::new(ParameterRegime::ThermophilicSolids, 328.15, 298.15, 0.5);
        reactor_entries(&mut set);
        let mut overrides = HashMap::new();
        overrides.insert("k_L_a".to_string(), 150.0);
        overrides.insert("custom_tracer".to_string(), 1.0);
        set.apply_overrides(&overrides);
        let params = ModelParameters::from_set(&set).unwrap();
        assert_eq!(params.k_L_a, 150.0);
        assert_eq!(params.k_m_ac, 16.0);
        assert!(set.contains("custom_tracer"));

        set.remove("K_S_h2");
        match ModelParameters::from_set(&set) {
            Err(Adm1Error::MissingParameter(key)) => assert_eq!(key, "K_S_h2"),
            other => panic!("expected missing parameter, got {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_volume_is_configuration_error() {
        let mut set = ParameterSet::new(ParameterRegime::MesophilicSolids, 308.15, 298.15, 0.5);
        reactor_entries(&mut set);
        set.set("V_liq", 0.0);
        let err = ModelParameters::from_set(&set).unwrap_err();
        assert!(err.is_configuration());
    }
}
