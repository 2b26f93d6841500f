#![warn(clippy::all)]
//! Thermodynamic properties of water and steam from the IAPWS-95 formulation.
//!
//! The [Iapws95] struct evaluates the equation of state for given density and temperature
//! or, via a density iteration, for given pressure and temperature. Many independent
//! points are evaluated on grids or lists with the functions in [batch].
//!
//! ```
//! # use iapws95::{EosOptions, EosResult, Iapws95};
//! # fn main() -> EosResult<()> {
//! let water = Iapws95::new(EosOptions::default())?;
//! let liquid = water.properties_pt(0.101325, 298.15);
//! assert!((liquid.density - 997.0).abs() < 1.0);
//! let state = water.state(1000.0, 300.0)?;
//! println!("{state}");
//! # Ok(())
//! # }
//! ```
pub mod batch;
pub mod water;

pub use batch::{InputMode, PropertyGrid, PropertyList};
pub use iapws95_core::{
    Attempt, Branch, DensityIteration, EosError, EosOptions, EosResult, GuessPolicy,
    InitialGuess, PhaseBoundary, PropertyResult, SolverOptions, State, Verbosity,
};
pub use water::{Iapws95, SaturationCurve};
