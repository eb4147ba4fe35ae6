//! # Reactor state and influent vectors
//!
//! The ADM1 state has a fixed ordinal layout (Rosen & Jeppsson BSM2 ordering extended with a
//! second feedstock line). Instead of addressing components by raw position, every entry is
//! named by [`StateVar`]. [`DynamicState`] is indexed by it; [`InfluentVector`] is read through
//! `get`/`feed` and written through `set`, which reject components without an influent counterpart.
//!
//! | Range | Components |
//! |-------|------------|
//! | 0..12 | soluble substrates `S_su` … `S_I` |
//! | 12..20 | line-specific particulates `X_xc1` … `X_li2` |
//! | 20..28 | biomass groups and inerts `X_su` … `X_I` |
//! | 28..30 | `S_cation`, `S_anion` |
//! | 30..39 | algebraic species `S_H_ion` … `S_nh4_ion` |
//! | 39..42 | gas headspace `S_gas_h2`, `S_gas_ch4`, `S_gas_co2` |
//!
//! The influent vector mirrors the first 30 components (the "_in" counterparts).
use crate::ADM1::error::Adm1Error;
use nalgebra::SVector;
use std::collections::HashMap;
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString};

pub const STATE_LEN: usize = 42;
pub const INFLUENT_LEN: usize = 30;

pub type StateVector = SVector<f64, STATE_LEN>;
pub type InfluentValues = SVector<f64, INFLUENT_LEN>;

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString)]
pub enum StateVar {
    S_su,
    S_aa,
    S_fa,
    S_va,
    S_bu,
    S_pro,
    S_ac,
    S_h2,
    S_ch4,
    S_IC,
    S_IN,
    S_I,
    X_xc1,
    X_ch1,
    X_pr1,
    X_li1,
    X_xc2,
    X_ch2,
    X_pr2,
    X_li2,
    X_su,
    X_aa,
    X_fa,
    X_c4,
    X_pro,
    X_ac,
    X_h2,
    X_I,
    S_cation,
    S_anion,
    S_H_ion,
    S_va_ion,
    S_bu_ion,
    S_pro_ion,
    S_ac_ion,
    S_hco3_ion,
    S_co2,
    S_nh3,
    S_nh4_ion,
    S_gas_h2,
    S_gas_ch4,
    S_gas_co2,
}

impl StateVar {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        STATE_NAMES[self.index()]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        StateVar::from_str(name).ok()
    }

    /// Influent counterparts exist for the first 30 components only.
    pub fn is_influent(self) -> bool {
        self.index() < INFLUENT_LEN
    }

    /// "S_su" -> "S_su_in"
    pub fn influent_name(self) -> Option<String> {
        if self.is_influent() {
            Some(format!("{}_in", self.name()))
        } else {
            None
        }
    }

    /// Components overwritten by the algebraic stage. They carry a zero derivative
    /// while the ODE integrator runs.
    pub fn is_algebraic(self) -> bool {
        matches!(
            self,
            StateVar::S_h2
                | StateVar::S_H_ion
                | StateVar::S_va_ion
                | StateVar::S_bu_ion
                | StateVar::S_pro_ion
                | StateVar::S_ac_ion
                | StateVar::S_hco3_ion
                | StateVar::S_co2
                | StateVar::S_nh3
                | StateVar::S_nh4_ion
        )
    }

    pub fn influent_vars() -> impl Iterator<Item = StateVar> {
        StateVar::iter().take(INFLUENT_LEN)
    }
}

pub const STATE_NAMES: [&str; STATE_LEN] = [
    "S_su", "S_aa", "S_fa", "S_va", "S_bu", "S_pro", "S_ac", "S_h2", "S_ch4", "S_IC", "S_IN",
    "S_I", "X_xc1", "X_ch1", "X_pr1", "X_li1", "X_xc2", "X_ch2", "X_pr2", "X_li2", "X_su",
    "X_aa", "X_fa", "X_c4", "X_pro", "X_ac", "X_h2", "X_I", "S_cation", "S_anion", "S_H_ion",
    "S_va_ion", "S_bu_ion", "S_pro_ion", "S_ac_ion", "S_hco3_ion", "S_co2", "S_nh3",
    "S_nh4_ion", "S_gas_h2", "S_gas_ch4", "S_gas_co2",
];

/////////////////////////////////////////DYNAMIC STATE/////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicState {
    pub values: StateVector,
}

impl DynamicState {
    pub fn zeros() -> Self {
        DynamicState {
            values: StateVector::zeros(),
        }
    }

    pub fn from_vector(values: StateVector) -> Self {
        DynamicState { values }
    }

    /// Builds a state from a name-keyed map (e.g. a caller-provided initial state).
    /// Extra keys such as "pH" are ignored; a missing component is a configuration error.
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self, Adm1Error> {
        let mut state = DynamicState::zeros();
        for var in StateVar::iter() {
            let value = map.get(var.name()).ok_or_else(|| {
                Adm1Error::Configuration(format!("initial state has no entry for {}", var.name()))
            })?;
            state[var] = *value;
        }
        Ok(state)
    }

    pub fn to_map(&self) -> HashMap<String, f64> {
        StateVar::iter()
            .map(|var| (var.name().to_string(), self[var]))
            .collect()
    }

    /// Replaces negative entries by zero and returns how many were clamped.
    pub fn clamp_non_negative(&mut self) -> usize {
        let mut clamped = 0;
        for v in self.values.iter_mut() {
            if *v < 0.0 {
                *v = 0.0;
                clamped += 1;
            }
        }
        clamped
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    pub fn pH(&self) -> f64 {
        -self[StateVar::S_H_ion].log10()
    }
}

impl Index<StateVar> for DynamicState {
    type Output = f64;
    fn index(&self, var: StateVar) -> &f64 {
        &self.values[var.index()]
    }
}

impl IndexMut<StateVar> for DynamicState {
    fn index_mut(&mut self, var: StateVar) -> &mut f64 {
        &mut self.values[var.index()]
    }
}

/////////////////////////////////////////INFLUENT/////////////////////////////////////////

/// Feed composition for one step, one entry per component with an influent counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct InfluentVector {
    pub values: InfluentValues,
}

impl InfluentVector {
    pub fn zeros() -> Self {
        InfluentVector {
            values: InfluentValues::zeros(),
        }
    }

    pub fn get(&self, var: StateVar) -> Option<f64> {
        if var.is_influent() {
            Some(self.values[var.index()])
        } else {
            None
        }
    }

    /// Feed concentration of `var`. Ion states and headspace gases are never fed and read as 0.
    pub fn feed(&self, var: StateVar) -> f64 {
        self.get(var).unwrap_or(0.0)
    }

    pub fn set(&mut self, var: StateVar, value: f64) -> Result<(), Adm1Error> {
        if !var.is_influent() {
            return Err(Adm1Error::Configuration(format!(
                "{} has no influent counterpart",
                var.name()
            )));
        }
        self.values[var.index()] = value;
        Ok(())
    }

    /// Reads the "_in" suffixed keys. Keys that have no state counterpart
    /// (e.g. "S_co2_in", "S_nh3_in") are ignored.
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self, Adm1Error> {
        let mut influent = InfluentVector::zeros();
        for (i, var) in StateVar::influent_vars().enumerate() {
            let key = format!("{}_in", var.name());
            let value = map.get(&key).ok_or_else(|| {
                Adm1Error::Configuration(format!("influent has no entry for {}", key))
            })?;
            influent.values[i] = *value;
        }
        Ok(influent)
    }

    pub fn to_map(&self) -> HashMap<String, f64> {
        StateVar::influent_vars()
            .zip(self.values.iter())
            .map(|(var, value)| (format!("{}_in", var.name()), *value))
            .collect()
    }

    pub fn column_names() -> Vec<String> {
        StateVar::influent_vars()
            .map(|var| format!("{}_in", var.name()))
            .collect()
    }
}
