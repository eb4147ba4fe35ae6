//! # Algebraic stage
//!
//! After every integrator step the fast equilibria are re-established outside the ODE:
//! 1. the charge balance is solved for `S_H_ion` by Newton's method with the analytic gradient
//! 2. the hydrogen mass balance is solved for `S_h2` by Newton's method with a forward-difference
//!    slope
//! 3. the dissociated species (VFA anions, HCO₃⁻, NH₃) are re-derived from the new `S_H_ion`,
//!    NH₄⁺ and CO₂ from the totals
//!
//! Both iterations stop when `|residual| ≤ tolerance` or the Newton step falls below
//! `step_rtol·|x|`; exhausting `max_iterations` is reported through [`NewtonReport::converged`]
//! and never panics. Iterates that leave the positive half-line are reset to `tolerance`.
use crate::ADM1::parameters::ModelParameters;
use crate::ADM1::state::{DynamicState, InfluentVector, StateVar};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlgebraicSolver {
    pub tolerance: f64,
    pub step_rtol: f64,
    pub max_iterations: usize,
}

impl Default for AlgebraicSolver {
    fn default() -> Self {
        AlgebraicSolver {
            tolerance: 1e-12,
            step_rtol: 1e-10,
            max_iterations: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonReport {
    pub iterations: usize,
    /// last evaluated residual
    pub residual: f64,
    pub converged: bool,
}

#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct AlgebraicSolution {
    pub state: DynamicState,
    pub pH: f64,
    pub charge: NewtonReport,
    pub hydrogen: NewtonReport,
    /// negative entries of the provisional state reset to zero
    pub clamped: usize,
}

impl AlgebraicSolution {
    pub fn converged(&self) -> bool {
        self.charge.converged && self.hydrogen.converged
    }
}

/// Equilibrium concentration of the dissociated form, `K_a·S/(K_a + H)`.
fn dissociated(k_a: f64, total: f64, s_h_ion: f64) -> f64 {
    k_a * total / (k_a + s_h_ion)
}

/// Charge-balance residual and its derivative with respect to `S_H_ion`.
pub fn charge_residual(x: &DynamicState, s_h_ion: f64, p: &ModelParameters) -> (f64, f64) {
    use StateVar::*;
    let va = dissociated(p.K_a_va, x[S_va], s_h_ion);
    let bu = dissociated(p.K_a_bu, x[S_bu], s_h_ion);
    let pro = dissociated(p.K_a_pro, x[S_pro], s_h_ion);
    let ac = dissociated(p.K_a_ac, x[S_ac], s_h_ion);
    let hco3 = dissociated(p.K_a_co2, x[S_IC], s_h_ion);
    let nh3 = dissociated(p.K_a_IN, x[S_IN], s_h_ion);
    let residual = x[S_cation] + (x[S_IN] - nh3) + s_h_ion
        - hco3
        - ac / 64.0
        - pro / 112.0
        - bu / 160.0
        - va / 208.0
        - p.K_w / s_h_ion
        - x[S_anion];
    let sq = |k_a: f64| (k_a + s_h_ion).powi(2);
    let gradient = 1.0
        + p.K_a_IN * x[S_IN] / sq(p.K_a_IN)
        + p.K_a_co2 * x[S_IC] / sq(p.K_a_co2)
        + p.K_a_ac * x[S_ac] / (64.0 * sq(p.K_a_ac))
        + p.K_a_pro * x[S_pro] / (112.0 * sq(p.K_a_pro))
        + p.K_a_bu * x[S_bu] / (160.0 * sq(p.K_a_bu))
        + p.K_a_va * x[S_va] / (208.0 * sq(p.K_a_va))
        + p.K_w / s_h_ion.powi(2);
    (residual, gradient)
}

/// Hydrogen production by the uninhibited acidogenic and acetogenic uptake rates.
fn hydrogen_production(x: &DynamicState, p: &ModelParameters) -> f64 {
    use StateVar::*;
    let monod = |s: f64, k: f64| s / (k + s + 1e-12);
    let c4_total = x[S_bu] + x[S_va] + 1e-6;
    let rho_5 = p.k_m_su * monod(x[S_su], p.K_S_su) * x[X_su];
    let rho_6 = p.k_m_aa * monod(x[S_aa], p.K_S_aa) * x[X_aa];
    let rho_7 = p.k_m_fa * monod(x[S_fa], p.K_S_fa) * x[X_fa];
    let rho_8 = p.k_m_c4 * monod(x[S_va], p.K_S_c4) * x[X_c4] * (x[S_va] / c4_total);
    let rho_9 = p.k_m_c4 * monod(x[S_bu], p.K_S_c4) * x[X_c4] * (x[S_bu] / c4_total);
    let rho_10 = p.k_m_pro * monod(x[S_pro], p.K_S_pro) * x[X_pro];
    (1.0 - p.Y_su) * p.f_h2_su * rho_5
        + (1.0 - p.Y_aa) * p.f_h2_aa * rho_6
        + (1.0 - p.Y_fa) * 0.3 * rho_7
        + (1.0 - p.Y_c4) * 0.15 * rho_8
        + (1.0 - p.Y_c4) * 0.2 * rho_9
        + (1.0 - p.Y_pro) * 0.43 * rho_10
}

fn hydrogen_uptake(s_h2: f64, x_h2: f64, p: &ModelParameters) -> f64 {
    p.k_m_h2 * (s_h2 / (p.K_S_h2 + s_h2 + 1e-12)) * x_h2
}

/// Hydrogen mass-balance residual `dS_h2/dt` evaluated at a trial `s_h2`.
/// The headspace partial pressure is taken at the digester temperature `T_ad`.
pub fn hydrogen_residual(x: &DynamicState, s_h2: f64, s_h2_in: f64, p: &ModelParameters) -> f64 {
    let p_gas_h2 = x[StateVar::S_gas_h2] * p.R * p.T_ad / 16.0;
    let transfer = p.k_L_a * (s_h2 - 16.0 * p.K_H_h2 * p_gas_h2);
    p.q_ad / p.V_liq * (s_h2_in - s_h2) + hydrogen_production(x, p)
        - hydrogen_uptake(s_h2, x[StateVar::X_h2], p)
        - transfer
}

impl AlgebraicSolver {
    fn solve_charge(&self, x: &DynamicState, p: &ModelParameters) -> (f64, NewtonReport) {
        let mut s_h_ion = x[StateVar::S_H_ion];
        if !(s_h_ion > 0.0) {
            s_h_ion = self.tolerance;
        }
        let mut report = NewtonReport {
            iterations: 0,
            residual: f64::INFINITY,
            converged: false,
        };
        while report.iterations < self.max_iterations {
            let (residual, gradient) = charge_residual(x, s_h_ion, p);
            report.residual = residual;
            if residual.abs() <= self.tolerance {
                report.converged = true;
                break;
            }
            let step = residual / gradient;
            s_h_ion -= step;
            if s_h_ion <= 0.0 {
                s_h_ion = self.tolerance;
            }
            report.iterations += 1;
            if step.abs() <= self.step_rtol * s_h_ion {
                report.converged = true;
                break;
            }
        }
        (s_h_ion, report)
    }

    fn solve_hydrogen(
        &self,
        x: &DynamicState,
        s_h2_in: f64,
        p: &ModelParameters,
    ) -> (f64, NewtonReport) {
        let mut s_h2 = x[StateVar::S_h2];
        let mut report = NewtonReport {
            iterations: 0,
            residual: f64::INFINITY,
            converged: false,
        };
        let x_h2 = x[StateVar::X_h2];
        while report.iterations < self.max_iterations {
            let residual = hydrogen_residual(x, s_h2, s_h2_in, p);
            report.residual = residual;
            if residual.abs() <= self.tolerance {
                report.converged = true;
                break;
            }
            // only convection and hydrogenotrophic uptake respond to the perturbation
            let h = (1e-6 * s_h2).max(1e-9);
            let slope = -p.q_ad / p.V_liq
                - (hydrogen_uptake(s_h2 + h, x_h2, p) - hydrogen_uptake(s_h2, x_h2, p)) / h;
            if slope == 0.0 {
                break;
            }
            let step = residual / slope;
            s_h2 -= step;
            if s_h2 <= 0.0 {
                s_h2 = self.tolerance;
            }
            report.iterations += 1;
            if step.abs() <= self.step_rtol * s_h2 {
                report.converged = true;
                break;
            }
        }
        (s_h2, report)
    }

    /// Runs both Newton iterations on the post-step state and returns the corrected state.
    pub fn solve(
        &self,
        state: &DynamicState,
        influent: &InfluentVector,
        p: &ModelParameters,
    ) -> AlgebraicSolution {
        use StateVar::*;
        let mut x = state.clone();
        let clamped = x.clamp_non_negative();

        let (s_h_ion, charge) = self.solve_charge(&x, p);
        let (s_h2, hydrogen) = self.solve_hydrogen(&x, influent.feed(S_h2), p);

        x[S_H_ion] = s_h_ion;
        x[S_h2] = s_h2;
        x[S_va_ion] = dissociated(p.K_a_va, x[S_va], s_h_ion);
        x[S_bu_ion] = dissociated(p.K_a_bu, x[S_bu], s_h_ion);
        x[S_pro_ion] = dissociated(p.K_a_pro, x[S_pro], s_h_ion);
        x[S_ac_ion] = dissociated(p.K_a_ac, x[S_ac], s_h_ion);
        x[S_hco3_ion] = dissociated(p.K_a_co2, x[S_IC], s_h_ion);
        x[S_nh3] = dissociated(p.K_a_IN, x[S_IN], s_h_ion);
        x[S_nh4_ion] = x[S_IN] - x[S_nh3];
        x[S_co2] = x[S_IC] - x[S_hco3_ion];

        AlgebraicSolution {
            state: x,
            pH: -s_h_ion.log10(),
            charge,
            hydrogen,
            clamped,
        }
    }
}
