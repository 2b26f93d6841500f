#![warn(clippy::all)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_arguments)]
//! Core building blocks of the `iapws95` crate.
//!
//! The crate is organized bottom up:
//! * [parameter]: the coefficient tables of a multiparameter Helmholtz energy equation of state.
//! * [IdealGas], [Residual] and [NonAnalytic]: the three contributions to the reduced
//!   Helmholtz energy $\phi=\phi^\circ+\phi^\mathrm{r}$, each returning a [PhiBundle].
//! * [EquationOfState]: the composition of all contributions.
//! * [State] and [PropertyResult]: thermodynamic properties at a given density and temperature.
//! * [density_iteration]: the inversion of $p(\rho,T)$ for given pressure and temperature.
use serde::{Deserialize, Serialize};

/// Print messages with level `Verbosity::Iter` or higher.
#[macro_export]
macro_rules! log_iter {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::Verbosity::Iter {
            println!($($arg)*);
        }
    }
}

/// Print messages with level `Verbosity::Result` or higher.
#[macro_export]
macro_rules! log_result {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::Verbosity::Result {
            println!($($arg)*);
        }
    }
}

mod density_iteration;
mod equation_of_state;
mod errors;
pub mod parameter;
mod state;

pub use density_iteration::{
    density_iteration, initial_density, Attempt, Branch, DensityIteration, GuessPolicy,
    InitialGuess, PhaseBoundary,
};
pub use equation_of_state::{
    EosOptions, EquationOfState, IdealGas, NonAnalytic, PhiBundle, Residual,
};
pub use errors::{EosError, EosResult};
pub use state::{PropertyResult, ReducedState, State};

/// Level of detail in the iteration output.
#[derive(Copy, Clone, Debug, PartialOrd, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Do not print output.
    #[default]
    None,
    /// Print information about the success of failure of the iteration.
    Result,
    /// Print a detailed output for every iteration.
    Iter,
}

/// Options for the iterative solvers.
///
/// If the values are [None], solver specific default
/// values are used.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Maximum number of iterations.
    pub max_iter: Option<usize>,
    /// Tolerance.
    pub tol: Option<f64>,
    /// Iteration output indicated by the [Verbosity] enum.
    #[serde(default)]
    pub verbosity: Verbosity,
}

impl SolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = Some(tol);
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn unwrap_or(self, max_iter: usize, tol: f64) -> (usize, f64, Verbosity) {
        (
            self.max_iter.unwrap_or(max_iter),
            self.tol.unwrap_or(tol),
            self.verbosity,
        )
    }
}
