//! Inversion of $p(\rho,T)$ for given pressure and temperature.
//!
//! The iteration is a small state machine:
//! initial guess → root search → validation → (one retry from a low density) → done.
//! Both guesses and the outcome are returned as a [DensityIteration] so that callers
//! can decide how to treat points without a solution.
use crate::equation_of_state::EquationOfState;
use crate::errors::{EosError, EosResult};
use crate::state::ReducedState;
use crate::{SolverOptions, Verbosity};
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;

const MAX_ITER_ROOT: usize = 100;
const TOL_ROOT: f64 = 1e-12;
const INITIAL_STEP: f64 = 0.02;

/// Estimate of the liquid-vapor coexistence pressure used to pick the initial density.
pub trait PhaseBoundary {
    /// Boundary pressure in MPa at the given temperature in K, `None` if there is no
    /// estimate, e.g. above the critical temperature.
    fn boundary_pressure(&self, temperature: f64) -> Option<f64>;

    /// Densities (kg/m³) of the coexisting liquid and vapor at the given temperature in K.
    ///
    /// If available, they bound the search on the liquid and vapor branch so that the
    /// iteration cannot converge to a root inside the two-phase region.
    fn saturated_densities(&self, _temperature: f64) -> Option<(f64, f64)> {
        None
    }
}

impl<F: Fn(f64) -> Option<f64>> PhaseBoundary for F {
    fn boundary_pressure(&self, temperature: f64) -> Option<f64> {
        self(temperature)
    }
}

/// Tunable thresholds of the initial guess and limits of the bracket search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuessPolicy {
    /// Pressures (MPa) below this value start from the ideal gas density.
    pub low_pressure_threshold: f64,
    /// Initial density (kg/m³) on the liquid branch.
    pub liquid_density: f64,
    /// Initial density (kg/m³) of the second attempt.
    pub retry_density: f64,
    /// Upper limit (kg/m³) of the bracket search.
    pub max_density: f64,
    /// Maximum number of bracket expansions per attempt.
    pub max_expansions: usize,
    /// Relative distance to the saturated densities that bounds the search on the liquid
    /// and vapor branch below the critical temperature.
    pub saturation_margin: f64,
}

impl Default for GuessPolicy {
    fn default() -> Self {
        Self {
            low_pressure_threshold: 5e-4,
            liquid_density: 1000.0,
            retry_density: 1.0,
            max_density: 3000.0,
            max_expansions: 100,
            saturation_margin: 0.02,
        }
    }
}

/// Branch the initial density was chosen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Branch {
    Liquid,
    LowDensity,
    Vapor,
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attempt {
    Primary,
    Retry,
}

/// Initial density (kg/m³) and the branch it was chosen for.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InitialGuess {
    pub branch: Branch,
    pub density: f64,
}

/// Outcome of a [density_iteration].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DensityIteration {
    Converged {
        /// Density in kg/m³
        density: f64,
        guess: InitialGuess,
        attempt: Attempt,
        /// Iterations of the root finder
        iterations: usize,
    },
    Failed {
        primary: InitialGuess,
        retry: InitialGuess,
    },
}

impl DensityIteration {
    /// The converged density in kg/m³, if any.
    pub fn density(&self) -> Option<f64> {
        match self {
            Self::Converged { density, .. } => Some(*density),
            Self::Failed { .. } => None,
        }
    }
}

/// Choose the initial density for pressure (MPa) and temperature (K).
///
/// Pressures above `low_pressure_threshold` start on the liquid branch, lower pressures
/// from the ideal gas density. Below the critical temperature, pressures below the
/// phase boundary start from the ideal gas density on the vapor branch.
pub fn initial_density<B: PhaseBoundary + ?Sized>(
    eos: &EquationOfState,
    pressure: f64,
    temperature: f64,
    boundary: &B,
    policy: &GuessPolicy,
) -> InitialGuess {
    let ideal_gas = || {
        let density = pressure * 1e6 / (eos.specific_gas_constant() * temperature);
        if density > 0.0 && density.is_finite() {
            density
        } else {
            policy.retry_density
        }
    };

    let mut guess = if pressure >= policy.low_pressure_threshold || pressure <= 0.0 {
        InitialGuess {
            branch: Branch::Liquid,
            density: policy.liquid_density,
        }
    } else {
        InitialGuess {
            branch: Branch::LowDensity,
            density: ideal_gas(),
        }
    };

    if temperature < eos.critical().temperature && pressure > 0.0 {
        if let Some(p_boundary) = boundary.boundary_pressure(temperature) {
            if pressure < p_boundary {
                guess = InitialGuess {
                    branch: Branch::Vapor,
                    density: ideal_gas(),
                };
            }
        }
    }
    guess
}

/// Densities (kg/m³) the bracket search may not leave.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SearchLimits {
    lower: f64,
    upper: f64,
}

impl SearchLimits {
    fn unbounded(policy: &GuessPolicy) -> Self {
        Self {
            lower: 0.0,
            upper: policy.max_density,
        }
    }

    /// Below the critical temperature, the search on the liquid branch stays above the
    /// saturated liquid density and the search on the vapor branch stays below the
    /// saturated vapor density, both widened by `saturation_margin`.
    fn new<B: PhaseBoundary + ?Sized>(
        pressure: f64,
        temperature: f64,
        critical_temperature: f64,
        guess: &InitialGuess,
        boundary: &B,
        policy: &GuessPolicy,
    ) -> Self {
        let mut limits = Self::unbounded(policy);
        if temperature >= critical_temperature {
            return limits;
        }
        if let Some((liquid, vapor)) = boundary.saturated_densities(temperature) {
            match guess.branch {
                Branch::Liquid if pressure > 0.0 => {
                    limits.lower = (liquid * (1.0 - policy.saturation_margin)).max(0.0);
                }
                Branch::Vapor => {
                    limits.upper =
                        (vapor * (1.0 + policy.saturation_margin)).min(policy.max_density);
                }
                _ => (),
            }
        }
        limits
    }
}

/// Steps of the density iteration.
enum Step {
    GuessSelection,
    RootSearch(Attempt, InitialGuess, SearchLimits),
    Validate(Attempt, InitialGuess, Option<(f64, usize)>),
    Retry,
}

/// Density (kg/m³) for given pressure (MPa) and temperature (K).
///
/// Returns an error only for invalid input. A point without a solution on either
/// branch is reported as [DensityIteration::Failed].
pub fn density_iteration<B: PhaseBoundary + ?Sized>(
    eos: &EquationOfState,
    pressure: f64,
    temperature: f64,
    boundary: &B,
    policy: &GuessPolicy,
    options: SolverOptions,
) -> EosResult<DensityIteration> {
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(EosError::InvalidState(
            String::from("density iteration"),
            String::from("temperature"),
            temperature,
        ));
    }
    if !pressure.is_finite() {
        return Err(EosError::InvalidState(
            String::from("density iteration"),
            String::from("pressure"),
            pressure,
        ));
    }
    let (max_iter, tol, verbosity) = options.unwrap_or(MAX_ITER_ROOT, TOL_ROOT);
    let residual = |density: f64| pressure_mpa(eos, density, temperature) - pressure;

    let mut primary = None;
    let mut step = Step::GuessSelection;
    loop {
        step = match step {
            Step::GuessSelection => {
                let guess = initial_density(eos, pressure, temperature, boundary, policy);
                log_result!(
                    verbosity,
                    "Density iteration: p = {pressure} MPa, T = {temperature} K, {:?} guess ρ = {} kg/m³",
                    guess.branch,
                    guess.density
                );
                primary = Some(guess);
                let limits = SearchLimits::new(
                    pressure,
                    temperature,
                    eos.critical().temperature,
                    &guess,
                    boundary,
                    policy,
                );
                log_iter!(
                    verbosity,
                    "Density iteration: search between {} and {} kg/m³",
                    limits.lower,
                    limits.upper
                );
                Step::RootSearch(Attempt::Primary, guess, limits)
            }
            Step::RootSearch(attempt, guess, limits) => {
                let root = find_bracket(&residual, guess.density, limits, policy, verbosity)
                    .and_then(|bracket| brent(&residual, bracket, max_iter, tol, verbosity));
                Step::Validate(attempt, guess, root)
            }
            Step::Validate(attempt, guess, root) => {
                match root.filter(|&(density, _)| is_stable_root(eos, density, temperature)) {
                    Some((density, iterations)) => {
                        log_result!(
                            verbosity,
                            "Density iteration: converged to ρ = {density} kg/m³ in {iterations} step(s) ({attempt:?} attempt)\n"
                        );
                        return Ok(DensityIteration::Converged {
                            density,
                            guess,
                            attempt,
                            iterations,
                        });
                    }
                    None => match attempt {
                        Attempt::Primary => Step::Retry,
                        Attempt::Retry => {
                            log_result!(verbosity, "Density iteration: no solution found\n");
                            return Ok(DensityIteration::Failed {
                                primary: primary.unwrap_or(guess),
                                retry: guess,
                            });
                        }
                    },
                }
            }
            Step::Retry => {
                let guess = InitialGuess {
                    branch: Branch::Fallback,
                    density: policy.retry_density,
                };
                log_result!(
                    verbosity,
                    "Density iteration: retry from ρ = {} kg/m³",
                    guess.density
                );
                Step::RootSearch(Attempt::Retry, guess, SearchLimits::unbounded(policy))
            }
        };
    }
}

/// Pressure in MPa, NaN for invalid densities.
fn pressure_mpa(eos: &EquationOfState, density: f64, temperature: f64) -> f64 {
    match ReducedState::new(eos.critical(), density, temperature) {
        Ok(ReducedState { delta, tau }) => {
            let phi_d = eos.residual_contribution(delta, tau).delta;
            density * eos.specific_gas_constant() * temperature * (1.0 + delta * phi_d) * 1e-6
        }
        Err(_) => f64::NAN,
    }
}

/// Roots on the unstable part of an isotherm are rejected.
fn is_stable_root(eos: &EquationOfState, density: f64, temperature: f64) -> bool {
    match ReducedState::new(eos.critical(), density, temperature) {
        Ok(ReducedState { delta, tau }) => {
            let phi = eos.residual_contribution(delta, tau);
            1.0 + 2.0 * delta * phi.delta + delta * delta * phi.delta_delta >= 0.0
        }
        Err(_) => false,
    }
}

/// Sign of a residual used to detect a bracketed root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sign {
    Positive,
    Negative,
}

impl Sign {
    fn of(value: f64) -> Self {
        if value >= 0.0 {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }
}

/// Interval with residuals of opposite sign at its ends.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Bracket {
    a: f64,
    b: f64,
    fa: f64,
    fb: f64,
}

/// Geometric search for a sign change starting at `x0`.
///
/// The pressure increases with density on stable branches, so the search moves to lower
/// densities if the residual is positive and to higher densities otherwise. The relative
/// step grows by a factor of √2 after every expansion. The search fails if it reaches
/// one of the `limits` without a sign change.
fn find_bracket<F: Fn(f64) -> f64>(
    f: &F,
    x0: f64,
    limits: SearchLimits,
    policy: &GuessPolicy,
    verbosity: Verbosity,
) -> Option<Bracket> {
    let mut x = x0.min(limits.upper).max(limits.lower);
    let mut fx = f(x);
    if !fx.is_finite() {
        return None;
    }
    if fx == 0.0 {
        return Some(Bracket {
            a: x,
            b: x,
            fa: fx,
            fb: fx,
        });
    }
    let downwards = fx > 0.0;
    let mut dx = INITIAL_STEP;

    log_iter!(verbosity, " step |    residual    |    density    ");
    log_iter!(verbosity, "{:-<40}", "");
    for k in 1..=policy.max_expansions {
        let x_new = if downwards {
            (x / (1.0 + dx)).max(limits.lower)
        } else {
            (x * (1.0 + dx)).min(limits.upper)
        };
        let f_new = f(x_new);
        log_iter!(verbosity, " {:4} | {:<14.8e} | {:13.8}", k, f_new, x_new);
        if !f_new.is_finite() {
            return None;
        }
        if Sign::of(f_new) != Sign::of(fx) {
            return Some(Bracket {
                a: x,
                b: x_new,
                fa: fx,
                fb: f_new,
            });
        }
        if x_new == x {
            // reached a density limit
            return None;
        }
        x = x_new;
        fx = f_new;
        dx *= SQRT_2;
    }
    None
}

/// Brent's method on a bracket. Returns the root and the number of iterations.
fn brent<F: Fn(f64) -> f64>(
    f: &F,
    bracket: Bracket,
    max_iter: usize,
    tol: f64,
    verbosity: Verbosity,
) -> Option<(f64, usize)> {
    let Bracket {
        mut a,
        mut b,
        mut fa,
        mut fb,
    } = bracket;
    if fa == 0.0 {
        return Some((a, 0));
    }
    if fb == 0.0 {
        return Some((b, 0));
    }
    let (mut c, mut fc) = (b, fb);
    let (mut d, mut e) = (b - a, b - a);

    log_iter!(verbosity, " iter |    residual    |    density    ");
    log_iter!(verbosity, "{:-<40}", "");
    for i in 1..=max_iter {
        if Sign::of(fb) == Sign::of(fc) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * tol * b.abs();
        let xm = 0.5 * (c - b);
        log_iter!(verbosity, " {:4} | {:<14.8e} | {:13.8}", i, fb, b);
        if xm.abs() <= tol1 || fb == 0.0 {
            return Some((b, i));
        }
        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // inverse quadratic interpolation or secant step
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol1 {
            d
        } else {
            tol1.copysign(xm)
        };
        fb = f(b);
        if !fb.is_finite() {
            return None;
        }
    }
    None
}
