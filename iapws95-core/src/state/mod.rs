//! States of the fluid defined by density and temperature.
//!
//! A [State] is evaluated once on construction: the ideal gas and residual parts of the
//! reduced Helmholtz energy and their derivatives are stored and every property is a cheap
//! combination of them. All properties are pure functions of density, temperature and
//! the parameters of the equation of state.
use crate::density_iteration::{density_iteration, DensityIteration, GuessPolicy, PhaseBoundary};
use crate::equation_of_state::{EquationOfState, PhiBundle};
use crate::errors::{EosError, EosResult};
use crate::parameter::CriticalConstants;
use crate::SolverOptions;
use quantity::{MassDensity, Pressure, Temperature, KELVIN, KILOGRAM, MEGA, METER, PASCAL};
use std::fmt;

mod properties;
pub use properties::PropertyResult;

/// Reduced variables $\delta=\rho/\rho_c$ and $\tau=T_c/T$.
///
/// Reduced densities that are exactly 1 are shifted to the next representable number
/// because the derivatives of the crossover terms are singular on the critical isochore.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReducedState {
    pub delta: f64,
    pub tau: f64,
}

impl ReducedState {
    /// Reduce density (kg/m³) and temperature (K) with the critical constants.
    pub fn new(critical: &CriticalConstants, density: f64, temperature: f64) -> EosResult<Self> {
        validate(density, temperature)?;
        let mut delta = density / critical.density;
        if delta == 1.0 {
            delta = f64::from_bits(delta.to_bits() + 1);
        }
        Ok(Self {
            delta,
            tau: critical.temperature / temperature,
        })
    }
}

/// Thermodynamic state at given density and temperature.
///
/// # State properties
/// The properties are available as quantities (e.g. [State::pressure]) and collectively in
/// the units of a [PropertyResult] ([State::properties]).
#[derive(Clone, Debug)]
pub struct State {
    /// Temperature $T$
    pub temperature: Temperature,
    /// Mass density $\rho$
    pub density: MassDensity,
    /// Reduced density and inverse temperature
    pub reduced: ReducedState,
    /// Specific gas constant in J/(kg K)
    gas_constant: f64,
    /// Temperature in K
    t: f64,
    /// Density in kg/m³
    rho: f64,
    ideal_gas: PhiBundle,
    residual: PhiBundle,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T = {:.5}, ρ = {:.5}", self.temperature, self.density)
    }
}

/// # State constructors
impl State {
    /// Return a new `State` given a density in kg/m³ and a temperature in K.
    ///
    /// Returns [EosError::InvalidState] if either value is not finite and positive.
    pub fn new(eos: &EquationOfState, density: f64, temperature: f64) -> EosResult<Self> {
        let reduced = ReducedState::new(eos.critical(), density, temperature)?;
        Ok(Self {
            temperature: temperature * KELVIN,
            density: density * KILOGRAM / (METER * METER * METER),
            reduced,
            gas_constant: eos.specific_gas_constant(),
            t: temperature,
            rho: density,
            ideal_gas: eos.ideal_gas_contribution(reduced.delta, reduced.tau),
            residual: eos.residual_contribution(reduced.delta, reduced.tau),
        })
    }

    /// Return a new `State` given density and temperature.
    pub fn new_dt(
        eos: &EquationOfState,
        density: MassDensity,
        temperature: Temperature,
    ) -> EosResult<Self> {
        Self::new(
            eos,
            density.convert_into(KILOGRAM / (METER * METER * METER)),
            temperature.convert_into(KELVIN),
        )
    }

    /// Return a new `State` given pressure and temperature.
    ///
    /// The density is found by [density_iteration]. The phase boundary is only used to
    /// choose the initial density below the critical temperature.
    pub fn new_pt<B: PhaseBoundary + ?Sized>(
        eos: &EquationOfState,
        pressure: Pressure,
        temperature: Temperature,
        boundary: &B,
        policy: &GuessPolicy,
        options: SolverOptions,
    ) -> EosResult<Self> {
        let t = temperature.convert_into(KELVIN);
        let p = pressure.convert_into(MEGA * PASCAL);
        match density_iteration(eos, p, t, boundary, policy, options)? {
            DensityIteration::Converged { density, .. } => Self::new(eos, density, t),
            DensityIteration::Failed { .. } => Err(EosError::NotConverged(format!(
                "density iteration at p = {p} MPa, T = {t} K"
            ))),
        }
    }
}

fn validate(density: f64, temperature: f64) -> EosResult<()> {
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(EosError::InvalidState(
            String::from("validate"),
            String::from("temperature"),
            temperature,
        ));
    }
    if !density.is_finite() || density <= 0.0 {
        return Err(EosError::InvalidState(
            String::from("validate"),
            String::from("density"),
            density,
        ));
    }
    Ok(())
}
