use approx::assert_relative_eq;
use iapws95::water::{RHOC, TC};
use iapws95::*;
use ndarray::arr1;
use num_dual::{Dual2_64, HyperDual64};
use quantity::*;

/// (T / K, ρ / kg m⁻³, p / MPa, c_v / kJ kg⁻¹ K⁻¹, w / m s⁻¹, s / kJ kg⁻¹ K⁻¹)
const SINGLE_PHASE: [[f64; 6]; 11] = [
    [300.0, 0.9965560e3, 0.992418352e-1, 0.413018112e1, 0.150151914e4, 0.393062643],
    [300.0, 0.1005308e4, 0.200022515e2, 0.406798347e1, 0.153492501e4, 0.387405401],
    [300.0, 0.1188202e4, 0.700004704e3, 0.346135580e1, 0.244357992e4, 0.132609616],
    [500.0, 0.4350000, 0.999679423e-1, 0.150817541e1, 0.548314253e3, 0.794488271e1],
    [500.0, 0.4532000e1, 0.999938125, 0.166991025e1, 0.535739001e3, 0.682502725e1],
    [500.0, 0.8380250e3, 0.100003858e2, 0.322106219e1, 0.127128441e4, 0.256690919e1],
    [500.0, 0.1084564e4, 0.700000405e3, 0.307437693e1, 0.241200877e4, 0.203237509e1],
    [647.0, 0.3580000e3, 0.220384756e2, 0.618315728e1, 0.252145078e3, 0.432092307e1],
    [900.0, 0.2410000, 0.100062559, 0.175890657e1, 0.724027147e3, 0.916653194e1],
    [900.0, 0.5261500e2, 0.200000690e2, 0.193510526e1, 0.698445674e3, 0.659070225e1],
    [900.0, 0.8707690e3, 0.700000006e3, 0.266422350e1, 0.201933608e4, 0.417223802e1],
];

fn water() -> Iapws95 {
    Iapws95::new(EosOptions::default()).unwrap()
}

#[test]
fn test_residual_reference_values() {
    let water = water();
    let eos = water.eos();

    let phi = eos.residual_contribution(838.025 / RHOC, TC / 500.0);
    assert_relative_eq!(phi.value, -0.342693206e1, max_relative = 1e-8);
    assert_relative_eq!(phi.delta, -0.364366650, max_relative = 1e-8);
    assert_relative_eq!(phi.delta_delta, 0.856063701, max_relative = 1e-8);
    assert_relative_eq!(phi.tau, -0.581403435e1, max_relative = 1e-8);
    assert_relative_eq!(phi.tau_tau, -0.223440737e1, max_relative = 1e-8);
    assert_relative_eq!(phi.delta_tau, -0.112176915e1, max_relative = 1e-8);

    let phi = eos.residual_contribution(358.0 / RHOC, TC / 647.0);
    assert_relative_eq!(phi.value, -0.121202657e1, max_relative = 1e-8);
    assert_relative_eq!(phi.delta, -0.714012024, max_relative = 1e-8);
    assert_relative_eq!(phi.delta_delta, 0.475730696, max_relative = 1e-8);
    assert_relative_eq!(phi.tau, -0.321722501e1, max_relative = 1e-8);
    assert_relative_eq!(phi.tau_tau, -0.996029507e1, max_relative = 1e-8);
    assert_relative_eq!(phi.delta_tau, -0.133214720e1, max_relative = 1e-8);
}

#[test]
fn test_ideal_gas_reference_values() {
    let water = water();
    let phi = water
        .eos()
        .ideal_gas_contribution(838.025 / RHOC, TC / 500.0);
    assert_relative_eq!(phi.value, 0.204797733e1, max_relative = 1e-8);
    assert_relative_eq!(phi.delta, 0.384236747, max_relative = 1e-8);
    assert_relative_eq!(phi.delta_delta, -0.147637878, max_relative = 1e-8);
    assert_relative_eq!(phi.tau, 0.904611106e1, max_relative = 1e-8);
    assert_relative_eq!(phi.tau_tau, -0.193249185e1, max_relative = 1e-8);
    assert_eq!(phi.delta_tau, 0.0);
}

#[test]
fn test_single_phase_reference_values() {
    let water = water();
    for [t, rho, p, cv, w, s] in SINGLE_PHASE {
        let result = water.properties_dt(rho, t);
        assert!(result.is_valid());
        assert_eq!(result.temperature, t);
        assert_eq!(result.density, rho);
        assert_relative_eq!(result.pressure, p, max_relative = 1e-6);
        assert_relative_eq!(
            result.isochoric_heat_capacity * 1e-3,
            cv,
            max_relative = 1e-6
        );
        assert_relative_eq!(result.speed_of_sound, w, max_relative = 1e-6);
        assert_relative_eq!(result.entropy * 1e-3, s, max_relative = 1e-6);
    }
}

#[test]
fn test_pressure_temperature_round_trip() {
    let water = water();
    // (647 K, 358 kg/m³) lies in the critical region where the iteration may converge to
    // a different root with the same pressure
    for [t, rho, p, ..] in SINGLE_PHASE.into_iter().filter(|r| r[0] != 647.0) {
        let result = water.properties_pt(p, t);
        assert!(result.is_valid(), "no solution at p = {p} MPa, T = {t} K");
        assert_relative_eq!(result.density, rho, max_relative = 1e-6);
        assert_relative_eq!(result.pressure, p, max_relative = 1e-9);
    }
    let result = water.properties_pt(0.220384756e2, 647.0);
    assert!(result.is_valid());
    assert_relative_eq!(result.pressure, 0.220384756e2, max_relative = 1e-9);
}

#[test]
fn test_liquid_reference_point() {
    let water = water();
    let result = water.properties_dt(1000.0, 300.0);
    assert_relative_eq!(result.pressure, 7.833, max_relative = 1e-3);
    assert_relative_eq!(result.isobaric_heat_capacity, 4159.4, max_relative = 1e-4);
    assert!(result.isochoric_heat_capacity < result.isobaric_heat_capacity);
    assert!(result.isothermal_bulk_modulus < result.isentropic_bulk_modulus);
    assert_relative_eq!(
        result.enthalpy,
        result.internal_energy + result.pressure * 1e6 / result.density,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        result.gibbs_energy,
        result.enthalpy - result.temperature * result.entropy,
        max_relative = 1e-9
    );
    assert_relative_eq!(
        result.isentropic_bulk_modulus,
        result.density * result.speed_of_sound.powi(2) * 1e-6,
        max_relative = 1e-12
    );
}

#[test]
fn test_non_analytic_terms_away_from_critical_point() {
    let with = water();
    let without = Iapws95::new(EosOptions {
        non_analytic: false,
    })
    .unwrap();
    let a = with.properties_dt(1000.0, 300.0);
    let b = without.properties_dt(1000.0, 300.0);
    for (x, y) in [
        (a.pressure, b.pressure),
        (a.isochoric_heat_capacity, b.isochoric_heat_capacity),
        (a.isobaric_heat_capacity, b.isobaric_heat_capacity),
        (a.speed_of_sound, b.speed_of_sound),
        (a.entropy, b.entropy),
    ] {
        assert!(((x - y) / x).abs() < 1e-6);
    }

    // but not close to it
    let a = with.properties_dt(358.0, 647.0);
    let b = without.properties_dt(358.0, 647.0);
    let cv = a.isochoric_heat_capacity;
    assert!(((cv - b.isochoric_heat_capacity) / cv).abs() > 1e-3);
}

#[test]
fn test_low_density_limit() -> EosResult<()> {
    let water = water();
    let tau = 1.5;
    let delta = 1e-10;
    let phi = water.eos().residual_contribution(delta, tau);
    assert!((delta * phi.delta).abs() < 1e-8);
    assert!((delta * delta * phi.delta_delta).abs() < 1e-8);
    assert!(phi.value.abs() < 1e-8);

    let state = water.state(delta * RHOC, TC / tau)?;
    assert_relative_eq!(state.compressibility_factor(), 1.0, epsilon = 1e-8);
    Ok(())
}

#[test]
fn test_repeated_evaluation_is_identical() {
    let water = water();
    let a = water.properties_pt(10.0, 500.0);
    let b = water.properties_pt(10.0, 500.0);
    assert_eq!(a.density.to_bits(), b.density.to_bits());
    assert_eq!(a.enthalpy.to_bits(), b.enthalpy.to_bits());
    assert_eq!(a.speed_of_sound.to_bits(), b.speed_of_sound.to_bits());
    assert_eq!(a, b);
}

#[test]
fn test_grid_order() -> EosResult<()> {
    let water = water();
    let pressures = arr1(&[0.1, 10.0]);
    let temperatures = arr1(&[300.0, 500.0, 900.0]);
    let grid = water.evaluate_grid(
        InputMode::PressureTemperature,
        pressures.view(),
        temperatures.view(),
    )?;
    assert_eq!(grid.mode, InputMode::PressureTemperature);
    assert_eq!(grid.results.dim(), (2, 3));
    assert_eq!(grid.invalid_count(), 0);
    for ((i, j), result) in grid.results.indexed_iter() {
        assert_relative_eq!(result.pressure, pressures[i], max_relative = 1e-9);
        assert_eq!(result.temperature, temperatures[j]);
    }
    // steam at 0.1 MPa and 500 K, liquid at 10 MPa and 500 K
    let density = grid.density();
    assert!(density[[0, 1]] < 1.0);
    assert!(density[[1, 1]] > 800.0);
    Ok(())
}

#[test]
fn test_density_temperature_grid() -> EosResult<()> {
    let water = water();
    let grid = water.evaluate_grid(
        InputMode::DensityTemperature,
        arr1(&[838.025, 0.435]).view(),
        arr1(&[500.0]).view(),
    )?;
    let pressure = grid.pressure();
    assert_relative_eq!(pressure[[0, 0]], 0.100003858e2, max_relative = 1e-6);
    assert_relative_eq!(pressure[[1, 0]], 0.999679423e-1, max_relative = 1e-6);
    Ok(())
}

#[test]
fn test_invalid_points_do_not_affect_others() -> EosResult<()> {
    let water = water();
    let list = water.evaluate_points(
        InputMode::PressureTemperature,
        arr1(&[-1.0, 0.1, 0.0, 10.0]).view(),
        arr1(&[1000.0, 1000.0, 1000.0, 500.0]).view(),
    )?;
    assert_eq!(list.invalid_count(), 2);
    assert!(!list.results[0].is_valid());
    assert!(!list.results[2].is_valid());
    assert_eq!(list.results[0].temperature, 1000.0);
    assert_eq!(list.results[1], water.properties_pt(0.1, 1000.0));
    assert_eq!(list.results[3], water.properties_pt(10.0, 500.0));
    assert!(list.enthalpy()[0].is_nan());
    Ok(())
}

#[test]
fn test_branch_selection() -> EosResult<()> {
    let water = water();

    // below the vapor pressure at 500 K
    match water.solve_density(0.1, 500.0)? {
        DensityIteration::Converged {
            density,
            guess,
            attempt,
            ..
        } => {
            assert_eq!(guess.branch, Branch::Vapor);
            assert_eq!(attempt, Attempt::Primary);
            assert_relative_eq!(density, 0.435, max_relative = 1e-3);
        }
        failed => panic!("{failed:?}"),
    }

    let iteration = water.solve_density(20.0, 300.0)?;
    assert!(matches!(
        iteration,
        DensityIteration::Converged {
            guess: InitialGuess {
                branch: Branch::Liquid,
                ..
            },
            ..
        }
    ));

    let iteration = water.solve_density(1e-4, 900.0)?;
    assert!(matches!(
        iteration,
        DensityIteration::Converged {
            guess: InitialGuess {
                branch: Branch::LowDensity,
                ..
            },
            ..
        }
    ));

    match water.solve_density(-1.0, 1000.0)? {
        DensityIteration::Failed { primary, retry } => {
            assert_eq!(primary.branch, Branch::Liquid);
            assert_eq!(retry.branch, Branch::Fallback);
            assert_eq!(retry.density, 1.0);
        }
        converged => panic!("{converged:?}"),
    }
    Ok(())
}

#[test]
fn test_branch_selection_close_to_critical_point() -> EosResult<()> {
    let water = water();
    let saturation = water.saturation();
    for t in (0..=92).map(|i| 600.0 + 0.5 * f64::from(i)) {
        let (p_sat, (liquid, vapor)) = saturation
            .pressure(t)
            .zip(saturation.saturated_densities(t))
            .ok_or_else(|| EosError::Error(format!("no saturation at T = {t} K")))?;
        for factor in [1.0005, 1.01] {
            match water.solve_density(factor * p_sat, t)? {
                DensityIteration::Converged { density, guess, .. } => {
                    assert_eq!(guess.branch, Branch::Liquid);
                    assert!(density > 0.98 * liquid, "T = {t} K: ρ = {density} kg/m³");
                }
                failed => panic!("T = {t} K: {failed:?}"),
            }
        }
        for factor in [0.9995, 0.99] {
            match water.solve_density(factor * p_sat, t)? {
                DensityIteration::Converged { density, guess, .. } => {
                    assert_eq!(guess.branch, Branch::Vapor);
                    assert!(density < 1.02 * vapor, "T = {t} K: ρ = {density} kg/m³");
                }
                failed => panic!("T = {t} K: {failed:?}"),
            }
        }
    }
    Ok(())
}

#[test]
fn test_normal_boiling_point_neighbourhood() {
    let water = water();
    let liquid = water.properties_pt(0.101325, 373.0);
    let vapor = water.properties_pt(0.101325, 374.0);
    assert!(liquid.density > 950.0);
    assert!(vapor.density < 1.0);
}

#[test]
fn test_invalid_input() {
    let water = water();
    assert!(matches!(
        water.solve_density(0.1, -300.0),
        Err(EosError::InvalidState(..))
    ));
    assert!(matches!(
        water.solve_density(f64::NAN, 300.0),
        Err(EosError::InvalidState(..))
    ));
    assert!(!water.properties_pt(f64::NAN, 300.0).is_valid());
    assert!(!water.properties_dt(1000.0, 0.0).is_valid());
}

#[test]
fn test_state_pt() -> EosResult<()> {
    let water = water();
    let state = water.state_pt(0.100003858e2 * MEGA * PASCAL, 500.0 * KELVIN)?;
    assert_relative_eq!(
        state
            .density
            .convert_into(KILOGRAM / (METER * METER * METER)),
        838.025,
        max_relative = 1e-6
    );
    assert_relative_eq!(
        state.pressure().convert_into(MEGA * PASCAL),
        0.100003858e2,
        max_relative = 1e-9
    );
    assert!(matches!(
        water.state_pt(-1.0 * MEGA * PASCAL, 1000.0 * KELVIN),
        Err(EosError::NotConverged(_))
    ));
    Ok(())
}

#[test]
fn test_dual_numbers() -> EosResult<()> {
    let water = water();
    let eos = water.eos();
    let (delta, tau) = (358.0 / RHOC, TC / 647.0);
    let ideal_gas = eos.ideal_gas_contribution(delta, tau);
    let residual = eos.residual_contribution(delta, tau);

    let phi = eos.reduced_helmholtz_energy(
        HyperDual64::from_re(delta).derivative1(),
        HyperDual64::from_re(tau).derivative2(),
    );
    assert_relative_eq!(phi.re, ideal_gas.value + residual.value, max_relative = 1e-12);
    assert_relative_eq!(phi.eps1, ideal_gas.delta + residual.delta, max_relative = 1e-10);
    assert_relative_eq!(phi.eps2, ideal_gas.tau + residual.tau, max_relative = 1e-10);
    assert_relative_eq!(phi.eps1eps2, residual.delta_tau, max_relative = 1e-8);

    let phi = eos.reduced_residual_helmholtz_energy(
        Dual2_64::from(delta),
        Dual2_64::from_re(tau).derivative(),
    );
    assert_relative_eq!(phi.v2, residual.tau_tau, max_relative = 1e-8);

    // cv from the dual number derivative
    let state = water.state(358.0, 647.0)?;
    let phi_tt = eos.reduced_helmholtz_energy(
        Dual2_64::from(delta),
        Dual2_64::from_re(tau).derivative(),
    );
    let cv = -eos.specific_gas_constant() * tau * tau * phi_tt.v2;
    assert_relative_eq!(
        state
            .isochoric_heat_capacity()
            .convert_into(JOULE / (KILOGRAM * KELVIN)),
        cv,
        max_relative = 1e-8
    );
    Ok(())
}

#[test]
fn test_json_options() -> EosResult<()> {
    let policy: GuessPolicy = serde_json::from_str(r#"{"retry_density": 5.0}"#)
        .map_err(|e| EosError::Error(e.to_string()))?;
    let options: SolverOptions = serde_json::from_str(r#"{"max_iter": 200, "tol": 1e-10}"#)
        .map_err(|e| EosError::Error(e.to_string()))?;
    let water = water().policy(policy).solver_options(options);
    match water.solve_density(-1.0, 1000.0)? {
        DensityIteration::Failed { retry, .. } => assert_eq!(retry.density, 5.0),
        converged => panic!("{converged:?}"),
    }
    let result = water.properties_pt(0.1, 1000.0);
    let json = serde_json::to_string(&result).map_err(|e| EosError::Error(e.to_string()))?;
    let back: PropertyResult =
        serde_json::from_str(&json).map_err(|e| EosError::Error(e.to_string()))?;
    assert_relative_eq!(back.density, result.density, max_relative = 1e-15);
    assert_relative_eq!(back.enthalpy, result.enthalpy, max_relative = 1e-15);
    Ok(())
}
