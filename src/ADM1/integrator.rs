//! # Step integrator
//!
//! Advances the differential part over one output interval with the adaptive Runge-Kutta
//! solvers of the [`differential-equations`](https://docs.rs/differential-equations/) crate:
//! - `Dopri5`: explicit Dormand-Prince 5(4), the default
//! - `Radau5`: implicit Radau IIA of order 5 for stiff operating points
//!
//! Any system implementing [`ODE`] on a nalgebra `SVector` can be integrated; the ADM1
//! right-hand side does so through `kinetics::Adm1Ode`.
use crate::ADM1::error::Adm1Error;
use differential_equations::methods::{ExplicitRungeKutta, ImplicitRungeKutta};
use differential_equations::ode::{ODE, ODEProblem};
use log::debug;
use nalgebra::SVector;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegrationMethod {
    #[default]
    Dopri5,
    Radau5,
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationMethod::Dopri5 => write!(f, "Dopri5"),
            IntegrationMethod::Radau5 => write!(f, "Radau5"),
        }
    }
}

impl FromStr for IntegrationMethod {
    type Err = Adm1Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dopri5" | "rk45" => Ok(IntegrationMethod::Dopri5),
            "radau5" | "radau" => Ok(IntegrationMethod::Radau5),
            _ => Err(Adm1Error::Configuration(format!(
                "unknown integration method '{}'",
                s
            ))),
        }
    }
}

/// Tolerances and limits handed to the solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorOptions {
    pub rtol: f64,
    pub atol: f64,
    pub h_min: f64,
    /// step cap per output interval
    pub max_steps: usize,
    /// keep every accepted step instead of the interval end point only
    pub dense_output: bool,
}

impl Default for IntegratorOptions {
    fn default() -> Self {
        IntegratorOptions {
            rtol: 1e-6,
            atol: 1e-8,
            h_min: 1e-14,
            max_steps: 100_000,
            dense_output: false,
        }
    }
}

impl IntegratorOptions {
    fn validate(&self) -> Result<(), Adm1Error> {
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(Adm1Error::Configuration("rtol must be finite and > 0".into()));
        }
        if !self.atol.is_finite() || self.atol <= 0.0 {
            return Err(Adm1Error::Configuration("atol must be finite and > 0".into()));
        }
        if !self.h_min.is_finite() || self.h_min < 0.0 {
            return Err(Adm1Error::Configuration("h_min must be finite and >= 0".into()));
        }
        if self.max_steps == 0 {
            return Err(Adm1Error::Configuration("max_steps must be > 0".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrationStats {
    pub accepted: usize,
    pub rhs_evals: usize,
}

impl IntegrationStats {
    pub fn merge(&mut self, other: &IntegrationStats) {
        self.accepted += other.accepted;
        self.rhs_evals += other.rhs_evals;
    }
}

#[derive(Debug, Clone)]
pub struct Trajectory<const N: usize> {
    pub t: Vec<f64>,
    pub y: Vec<SVector<f64, N>>,
    pub stats: IntegrationStats,
}

impl<const N: usize> Trajectory<N> {
    /// State at the end of the interval.
    pub fn last(&self) -> Option<&SVector<f64, N>> {
        self.y.last()
    }
}

/// Counts right-hand-side evaluations of the wrapped system.
struct CountingOde<'a, S> {
    inner: &'a S,
    evals: Cell<usize>,
}

impl<S, const N: usize> ODE<f64, SVector<f64, N>> for CountingOde<'_, S>
where
    S: ODE<f64, SVector<f64, N>>,
{
    fn diff(&self, t: f64, y: &SVector<f64, N>, dydt: &mut SVector<f64, N>) {
        self.evals.set(self.evals.get() + 1);
        self.inner.diff(t, y, dydt);
    }
}

/// Integrates from `t0` to `t1` with the chosen method.
pub fn integrate<S, const N: usize>(
    sys: &S,
    method: IntegrationMethod,
    y0: &SVector<f64, N>,
    t0: f64,
    t1: f64,
    opts: &IntegratorOptions,
) -> Result<Trajectory<N>, Adm1Error>
where
    S: ODE<f64, SVector<f64, N>>,
{
    opts.validate()?;
    if !t0.is_finite() || !t1.is_finite() || t1 < t0 {
        return Err(Adm1Error::Integration(format!(
            "invalid interval [{}, {}]",
            t0, t1
        )));
    }
    if t1 == t0 {
        return Ok(Trajectory {
            t: vec![t0],
            y: vec![*y0],
            stats: IntegrationStats::default(),
        });
    }

    let counted = CountingOde {
        inner: sys,
        evals: Cell::new(0),
    };
    let problem = ODEProblem::new(&counted, t0, t1, *y0);
    let solution = match method {
        IntegrationMethod::Dopri5 => {
            let mut solver = ExplicitRungeKutta::dopri5()
                .rtol(opts.rtol)
                .atol(opts.atol)
                .h_min(opts.h_min)
                .max_steps(opts.max_steps);
            problem.solve(&mut solver)
        }
        IntegrationMethod::Radau5 => {
            let mut solver = ImplicitRungeKutta::radau5()
                .rtol(opts.rtol)
                .atol(opts.atol)
                .h_min(opts.h_min)
                .max_steps(opts.max_steps);
            problem.solve(&mut solver)
        }
    }
    .map_err(|e| Adm1Error::Integration(format!("{} on [{}, {}]: {}", method, t0, t1, e)))?;

    let (t_end, y_end) = match (solution.t.last(), solution.y.last()) {
        (Some(t), Some(y)) => (*t, *y),
        _ => {
            return Err(Adm1Error::Integration(format!(
                "{} returned no points on [{}, {}]",
                method, t0, t1
            )));
        }
    };
    let stats = IntegrationStats {
        accepted: solution.t.len().saturating_sub(1),
        rhs_evals: counted.evals.get(),
    };
    debug!(
        "{} on [{:.4}, {:.4}]: {} accepted steps, {} rhs evaluations",
        method, t0, t1, stats.accepted, stats.rhs_evals
    );
    let (t, y) = if opts.dense_output {
        (solution.t, solution.y)
    } else {
        (vec![t_end], vec![y_end])
    };
    Ok(Trajectory { t, y, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Decay {
        k: f64,
    }

    impl ODE<f64, SVector<f64, 1>> for Decay {
        fn diff(&self, _t: f64, y: &SVector<f64, 1>, dydt: &mut SVector<f64, 1>) {
            dydt[0] = -self.k * y[0];
        }
    }

    /// fast mode relaxing onto a slow one: y0' = -1000(y0 - cos t), y1' = -y1
    struct StiffPair;

    impl ODE<f64, SVector<f64, 2>> for StiffPair {
        fn diff(&self, t: f64, y: &SVector<f64, 2>, dydt: &mut SVector<f64, 2>) {
            dydt[0] = -1000.0 * (y[0] - t.cos());
            dydt[1] = -y[1];
        }
    }

    #[test]
    fn test_dopri5_exponential_decay() {
        let y0 = SVector::<f64, 1>::new(1.0);
        let traj = integrate(
            &Decay { k: 0.5 },
            IntegrationMethod::Dopri5,
            &y0,
            0.0,
            2.0,
            &IntegratorOptions::default(),
        )
        .unwrap();
        assert_relative_eq!(traj.last().unwrap()[0], (-1.0f64).exp(), max_relative = 1e-5);
        assert_eq!(traj.t.len(), 1);
        assert_relative_eq!(traj.t[0], 2.0, max_relative = 1e-12);
        assert!(traj.stats.accepted > 0);
        assert!(traj.stats.rhs_evals >= traj.stats.accepted);
    }

    #[test]
    fn test_radau5_exponential_decay() {
        let y0 = SVector::<f64, 1>::new(2.0);
        let traj = integrate(
            &Decay { k: 1.0 },
            IntegrationMethod::Radau5,
            &y0,
            0.0,
            1.0,
            &IntegratorOptions::default(),
        )
        .unwrap();
        assert_relative_eq!(traj.last().unwrap()[0], 2.0 * (-1.0f64).exp(), max_relative = 1e-4);
    }

    #[test]
    fn test_radau5_stiff_pair_tracks_slow_mode() {
        let y0 = SVector::<f64, 2>::new(0.0, 1.0);
        let traj = integrate(
            &StiffPair,
            IntegrationMethod::Radau5,
            &y0,
            0.0,
            1.0,
            &IntegratorOptions::default(),
        )
        .unwrap();
        let y = traj.last().unwrap();
        assert!((y[0] - 1.0f64.cos()).abs() < 1e-2);
        assert_relative_eq!(y[1], (-1.0f64).exp(), max_relative = 1e-4);
    }

    #[test]
    fn test_dense_output_and_zero_span() {
        let y0 = SVector::<f64, 1>::new(1.0);
        let opts = IntegratorOptions {
            dense_output: true,
            ..Default::default()
        };
        let traj =
            integrate(&Decay { k: 1.0 }, IntegrationMethod::Dopri5, &y0, 0.0, 1.0, &opts).unwrap();
        assert!(traj.t.len() > 2);
        assert_eq!(traj.t.len(), traj.y.len());
        assert!(traj.t.windows(2).all(|w| w[1] > w[0]));

        let flat =
            integrate(&Decay { k: 1.0 }, IntegrationMethod::Dopri5, &y0, 3.0, 3.0, &opts).unwrap();
        assert_eq!(flat.y, vec![y0]);
        assert_eq!(flat.stats, IntegrationStats::default());
    }

    #[test]
    fn test_invalid_options_and_interval() {
        let y0 = SVector::<f64, 1>::new(1.0);
        let bad = IntegratorOptions {
            rtol: 0.0,
            ..Default::default()
        };
        let err = integrate(&Decay { k: 1.0 }, IntegrationMethod::Dopri5, &y0, 0.0, 1.0, &bad)
            .unwrap_err();
        assert!(err.is_configuration());
        let err = integrate(
            &Decay { k: 1.0 },
            IntegrationMethod::Dopri5,
            &y0,
            1.0,
            0.0,
            &IntegratorOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Adm1Error::Integration(_)));
    }

    #[test]
    fn test_method_names() {
        assert_eq!("RK45".parse::<IntegrationMethod>().unwrap(), IntegrationMethod::Dopri5);
        assert_eq!("radau".parse::<IntegrationMethod>().unwrap(), IntegrationMethod::Radau5);
        assert!("euler".parse::<IntegrationMethod>().is_err());
        assert_eq!(IntegrationMethod::Radau5.to_string(), "Radau5");
    }
}
