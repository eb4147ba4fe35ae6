#[cfg(test)]
mod tests {
    use crate::ADM1::algebraic::charge_residual;
    use crate::ADM1::error::Adm1Error;
    use crate::ADM1::integrator::IntegrationMethod;
    use crate::ADM1::kinetics::derivatives;
    use crate::ADM1::parameters::ParameterRegime;
    use crate::ADM1::report::export_histories;
    use crate::ADM1::scenarios::{default_influent, startup_initial_state};
    use crate::ADM1::simulation::{
        SimulationConfig, SimulationResult, compare_mixing_ratios, run_simulation,
    };
    use crate::ADM1::state::{DynamicState, StateVar};
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::tempdir;

    fn default_run() -> SimulationResult {
        run_simulation(&SimulationConfig::default()).unwrap()
    }

    /// largest |dy/dt| over the differential entries
    fn max_rate(result: &SimulationResult, state: &DynamicState, row: usize) -> f64 {
        let dx = derivatives(
            state,
            &result.mixed_influent[row].influent,
            &result.params,
            false,
        );
        dx.values.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
    }

    #[test]
    fn default_scenario_ten_days() {
        let result = default_run();
        assert_eq!(result.states.len(), 11);
        assert_eq!(result.gas.len(), 11);
        assert_eq!(result.inhibition.len(), 11);
        assert_eq!(result.ions.len(), 11);
        assert_eq!(result.mixed_influent.len(), 11);
        assert_eq!(result.time, (0..=10).map(|d| d as f64).collect::<Vec<_>>());
        assert_eq!(result.regime, ParameterRegime::MesophilicSolids);
        for row in &result.states {
            assert!(row.pH >= 4.0 && row.pH <= 9.0, "pH {} at t = {}", row.pH, row.time);
        }
        assert_relative_eq!(result.summary.pH, result.states[10].pH, max_relative = 1e-12);
        assert!(result.summary.q_ch4 > 0.0);
    }

    #[test]
    fn gas_flows_are_never_negative() {
        let result = default_run();
        for g in &result.gas {
            assert!(g.q_gas >= 0.0);
            assert!(g.q_ch4 >= 0.0);
            assert!(g.p_gas > 0.0);
        }
    }

    #[test]
    fn cumulative_methane_is_accumulated_once_per_step() {
        let result = default_run();
        let mut expected = 0.0;
        for i in 1..result.gas.len() {
            let dt = result.time[i] - result.time[i - 1];
            expected += result.gas[i].q_ch4 * dt;
            assert_relative_eq!(result.gas[i].total_ch4, expected, max_relative = 1e-12);
        }
        assert_eq!(result.gas[0].total_ch4, 0.0);
        assert_relative_eq!(
            result.summary.cumulative_methane_yield,
            expected / result.summary.VS_in,
            max_relative = 1e-12
        );
    }

    #[test]
    fn algebraic_stage_closes_balances_every_step() {
        use StateVar::*;
        let result = default_run();
        assert_eq!(result.summary.charge_failures, 0);
        for row in result.states.iter().skip(1) {
            let x = &row.state;
            let (residual, _) = charge_residual(x, x[S_H_ion], &result.params);
            assert!(residual.abs() < 1e-9, "charge residual {:e}", residual);
            assert_relative_eq!(x[S_nh4_ion] + x[S_nh3], x[S_IN], max_relative = 1e-10);
            assert_relative_eq!(x[S_co2] + x[S_hco3_ion], x[S_IC], max_relative = 1e-10);
            assert_relative_eq!(row.pH, -x[S_H_ion].log10(), max_relative = 1e-12);
        }
    }

    #[test]
    fn disabled_inhibition_reports_unit_factors() {
        let config = SimulationConfig {
            days: 3.0,
            disable_inhibition: true,
            ..Default::default()
        };
        let result = run_simulation(&config).unwrap();
        for rec in &result.inhibition {
            assert!(rec.factors.values().iter().all(|&f| f == 1.0));
        }
    }

    #[test]
    fn hourly_resolution() {
        let config = SimulationConfig {
            days: 1.0,
            time_unit: "Hour(s)".to_string(),
            ..Default::default()
        };
        let result = run_simulation(&config).unwrap();
        assert_eq!(result.states.len(), 25);
        assert_relative_eq!(result.time[1], 1.0 / 24.0, max_relative = 1e-12);
        let initial = startup_initial_state(0.5);
        assert_eq!(result.states[0].state, initial);
    }

    #[test]
    fn unsupported_time_unit_is_rejected() {
        let config = SimulationConfig {
            time_unit: "Week(s)".to_string(),
            ..Default::default()
        };
        let err = run_simulation(&config).unwrap_err();
        assert!(matches!(err, Adm1Error::UnsupportedTimeUnit(_)));
    }

    #[test]
    fn incomplete_caller_maps_are_rejected() {
        let mut influent = default_influent(0.5, 0.5).unwrap().to_map();
        influent.remove("X_ch1_in");
        let config = SimulationConfig {
            influent: Some(influent),
            ..Default::default()
        };
        assert!(run_simulation(&config).unwrap_err().is_configuration());

        let mut initials = startup_initial_state(0.5).to_map();
        initials.remove("S_gas_ch4");
        let config = SimulationConfig {
            initials: Some(initials),
            ..Default::default()
        };
        assert!(run_simulation(&config).unwrap_err().is_configuration());
    }

    #[test]
    fn caller_maps_reproduce_the_default_run() {
        let config = SimulationConfig {
            days: 2.0,
            influent: Some(default_influent(0.5, 0.5).unwrap().to_map()),
            initials: Some(startup_initial_state(0.5).to_map()),
            ..Default::default()
        };
        let from_maps = run_simulation(&config).unwrap();
        let defaults = run_simulation(&SimulationConfig {
            days: 2.0,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(from_maps.summary.state, defaults.summary.state);
    }

    #[test]
    fn batch_requires_liquid_volume() {
        let config = SimulationConfig {
            batch_process: true,
            ..Default::default()
        };
        assert!(run_simulation(&config).unwrap_err().is_configuration());

        let config = SimulationConfig {
            batch_process: true,
            V_liq: Some(100.0),
            days: 3.0,
            ..Default::default()
        };
        let result = run_simulation(&config).unwrap();
        assert_eq!(result.summary.q_in, 1e-10);
        assert_eq!(result.summary.HRT, 25.0);
        assert!(result.gas.iter().all(|g| g.q_gas >= 0.0));
    }

    #[test]
    fn recycle_blends_feed_with_previous_effluent() {
        let config = SimulationConfig {
            days: 5.0,
            recycle_ratio: 0.3,
            ..Default::default()
        };
        let result = run_simulation(&config).unwrap();
        let s = &result.summary;
        assert_relative_eq!(s.q_recycle, 0.3 * s.q_out, max_relative = 1e-12);
        assert_relative_eq!(s.q_in + s.q_recycle, s.q_ad, max_relative = 1e-12);
        for i in 1..result.mixed_influent.len() {
            let mixed = &result.mixed_influent[i].influent;
            let previous = &result.states[i - 1].state;
            for var in StateVar::influent_vars() {
                let (fed, m) = (result.influent.feed(var), mixed.feed(var));
                let lo = fed.min(previous[var]);
                let hi = fed.max(previous[var]);
                let tol = 1e-9 * hi.abs().max(1.0);
                assert!(m >= lo - tol && m <= hi + tol, "{}", var.name());
            }
        }
    }

    #[test]
    fn temperature_selects_parameter_regime() {
        assert_eq!(ParameterRegime::select(313.15), ParameterRegime::MesophilicSolids);
        assert_eq!(ParameterRegime::select(318.15), ParameterRegime::ThermophilicSolids);
        let config = SimulationConfig {
            days: 1.0,
            T_ad: 318.15,
            T_op: 318.15,
            ..Default::default()
        };
        let result = run_simulation(&config).unwrap();
        assert_eq!(result.regime, ParameterRegime::ThermophilicSolids);
        assert_eq!(result.params.T_op, 318.15);
    }

    #[test]
    fn radau_agrees_with_dopri() {
        let base = SimulationConfig {
            days: 2.0,
            ..Default::default()
        };
        let explicit = run_simulation(&base).unwrap();
        let implicit = run_simulation(&SimulationConfig {
            method: IntegrationMethod::Radau5,
            ..base
        })
        .unwrap();
        assert!((explicit.summary.pH - implicit.summary.pH).abs() < 0.05);
        assert_relative_eq!(explicit.summary.q_gas, implicit.summary.q_gas, max_relative = 0.05);
    }

    #[test]
    fn derivatives_decay_toward_steady_state() {
        let config = SimulationConfig {
            days: 100.0,
            ..Default::default()
        };
        let result = run_simulation(&config).unwrap();
        let early = max_rate(&result, &result.states[1].state, 2);
        let late = max_rate(&result, &result.summary.state, 100);
        assert!(late < 0.1 * early, "late {:e}, early {:e}", late, early);
        assert!(result.states.iter().all(|r| r.pH > 4.0 && r.pH < 9.0));
    }

    #[test]
    fn mixing_ratio_comparison() {
        let base = SimulationConfig {
            days: 2.0,
            ..Default::default()
        };
        let rows = compare_mixing_ratios(&base, &[0.3, 0.7]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].mixing_ratio, 0.3);
        assert_eq!(rows[1].mixing_ratio, 0.7);
        assert!(rows.iter().all(|r| r.q_ch4 >= 0.0));
    }

    #[test]
    fn histories_export_to_csv() {
        let result = run_simulation(&SimulationConfig {
            days: 2.0,
            ..Default::default()
        })
        .unwrap();
        let dir = tempdir().unwrap();
        let paths = export_histories(&result, dir.path()).unwrap();
        assert_eq!(paths.len(), 5);
        let states = fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(states.lines().count(), 4);
        assert!(states.starts_with("time,S_su,"));
        assert!(states.lines().next().unwrap().ends_with(",pH"));
    }
}
