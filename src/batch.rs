//! Evaluation of many independent points.
//!
//! Inputs are either a cartesian grid of values and temperatures or a list of
//! (value, temperature) pairs, where the values are pressures or densities depending on
//! the [InputMode]. Points without a solution are reported as [PropertyResult::invalid]
//! and never abort the evaluation of the remaining points.
use crate::water::Iapws95;
use iapws95_core::{log_result, EosError, EosResult, PropertyResult};
use ndarray::{Array1, Array2, ArrayView1, ErrorKind, ShapeError};
use serde::{Deserialize, Serialize};

#[cfg(feature = "rayon")]
use rayon::{prelude::*, ThreadPool};

/// Interpretation of the first input value of every point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    /// Pressure in MPa and temperature in K
    PressureTemperature,
    /// Density in kg/m³ and temperature in K
    DensityTemperature,
}

macro_rules! impl_property_arrays {
    ($container:ident, $array:ident) => {
        impl $container {
            /// Map every result to a single value.
            pub fn map<F: Fn(&PropertyResult) -> f64>(&self, f: F) -> $array<f64> {
                self.results.map(f)
            }

            /// Number of points without a valid result.
            pub fn invalid_count(&self) -> usize {
                self.results.iter().filter(|r| !r.is_valid()).count()
            }

            /// Pressure in MPa
            pub fn pressure(&self) -> $array<f64> {
                self.map(|r| r.pressure)
            }

            /// Temperature in K
            pub fn temperature(&self) -> $array<f64> {
                self.map(|r| r.temperature)
            }

            /// Density in kg/m³
            pub fn density(&self) -> $array<f64> {
                self.map(|r| r.density)
            }

            pub fn internal_energy(&self) -> $array<f64> {
                self.map(|r| r.internal_energy)
            }

            pub fn enthalpy(&self) -> $array<f64> {
                self.map(|r| r.enthalpy)
            }

            pub fn entropy(&self) -> $array<f64> {
                self.map(|r| r.entropy)
            }

            pub fn helmholtz_energy(&self) -> $array<f64> {
                self.map(|r| r.helmholtz_energy)
            }

            pub fn gibbs_energy(&self) -> $array<f64> {
                self.map(|r| r.gibbs_energy)
            }

            pub fn isochoric_heat_capacity(&self) -> $array<f64> {
                self.map(|r| r.isochoric_heat_capacity)
            }

            pub fn isobaric_heat_capacity(&self) -> $array<f64> {
                self.map(|r| r.isobaric_heat_capacity)
            }

            pub fn speed_of_sound(&self) -> $array<f64> {
                self.map(|r| r.speed_of_sound)
            }

            pub fn thermal_expansivity(&self) -> $array<f64> {
                self.map(|r| r.thermal_expansivity)
            }

            pub fn isentropic_bulk_modulus(&self) -> $array<f64> {
                self.map(|r| r.isentropic_bulk_modulus)
            }

            pub fn isothermal_bulk_modulus(&self) -> $array<f64> {
                self.map(|r| r.isothermal_bulk_modulus)
            }

            pub fn adiabatic_exponent(&self) -> $array<f64> {
                self.map(|r| r.adiabatic_exponent)
            }

            pub fn compressibility_factor(&self) -> $array<f64> {
                self.map(|r| r.compressibility_factor)
            }
        }
    };
}

/// Results on a grid: entry `(i, j)` belongs to the `i`-th value and the `j`-th temperature.
#[derive(Clone, Debug)]
pub struct PropertyGrid {
    pub mode: InputMode,
    pub results: Array2<PropertyResult>,
}

/// Results for a list of points in the order of the input.
#[derive(Clone, Debug)]
pub struct PropertyList {
    pub mode: InputMode,
    pub results: Array1<PropertyResult>,
}

impl_property_arrays!(PropertyGrid, Array2);
impl_property_arrays!(PropertyList, Array1);

fn check_lengths(values: ArrayView1<f64>, temperatures: ArrayView1<f64>) -> EosResult<()> {
    if values.len() != temperatures.len() {
        return Err(EosError::ShapeError(ShapeError::from_kind(
            ErrorKind::IncompatibleShape,
        )));
    }
    Ok(())
}

impl Iapws95 {
    /// Properties of a single point.
    pub fn evaluate_point(&self, mode: InputMode, value: f64, temperature: f64) -> PropertyResult {
        match mode {
            InputMode::PressureTemperature => self.properties_pt(value, temperature),
            InputMode::DensityTemperature => self.properties_dt(value, temperature),
        }
    }

    /// Properties on the cartesian grid `values` × `temperatures`.
    pub fn evaluate_grid(
        &self,
        mode: InputMode,
        values: ArrayView1<f64>,
        temperatures: ArrayView1<f64>,
    ) -> EosResult<PropertyGrid> {
        let results: Vec<_> = values
            .iter()
            .flat_map(|&x| {
                temperatures
                    .iter()
                    .map(move |&t| self.evaluate_point(mode, x, t))
            })
            .collect();
        let results = Array2::from_shape_vec((values.len(), temperatures.len()), results)?;
        let grid = PropertyGrid { mode, results };
        self.log_invalid(grid.invalid_count(), grid.results.len());
        Ok(grid)
    }

    /// Properties of the points `(values[i], temperatures[i])`.
    pub fn evaluate_points(
        &self,
        mode: InputMode,
        values: ArrayView1<f64>,
        temperatures: ArrayView1<f64>,
    ) -> EosResult<PropertyList> {
        check_lengths(values, temperatures)?;
        let results = values
            .iter()
            .zip(temperatures.iter())
            .map(|(&x, &t)| self.evaluate_point(mode, x, t))
            .collect();
        let list = PropertyList { mode, results };
        self.log_invalid(list.invalid_count(), list.results.len());
        Ok(list)
    }

    /// Parallel version of [Iapws95::evaluate_grid] on the given thread pool.
    #[cfg(feature = "rayon")]
    pub fn par_evaluate_grid(
        &self,
        mode: InputMode,
        values: ArrayView1<f64>,
        temperatures: ArrayView1<f64>,
        thread_pool: &ThreadPool,
    ) -> EosResult<PropertyGrid> {
        let nt = temperatures.len();
        let results: Vec<_> = thread_pool.install(|| {
            (0..values.len() * nt)
                .into_par_iter()
                .map(|k| self.evaluate_point(mode, values[k / nt], temperatures[k % nt]))
                .collect()
        });
        let results = Array2::from_shape_vec((values.len(), nt), results)?;
        let grid = PropertyGrid { mode, results };
        self.log_invalid(grid.invalid_count(), grid.results.len());
        Ok(grid)
    }

    /// Parallel version of [Iapws95::evaluate_points] on the given thread pool.
    #[cfg(feature = "rayon")]
    pub fn par_evaluate_points(
        &self,
        mode: InputMode,
        values: ArrayView1<f64>,
        temperatures: ArrayView1<f64>,
        thread_pool: &ThreadPool,
    ) -> EosResult<PropertyList> {
        check_lengths(values, temperatures)?;
        let results: Vec<_> = thread_pool.install(|| {
            (0..values.len())
                .into_par_iter()
                .map(|i| self.evaluate_point(mode, values[i], temperatures[i]))
                .collect()
        });
        let list = PropertyList {
            mode,
            results: Array1::from_vec(results),
        };
        self.log_invalid(list.invalid_count(), list.results.len());
        Ok(list)
    }

    fn log_invalid(&self, invalid: usize, total: usize) {
        log_result!(
            self.verbosity(),
            "Evaluated {} point(s), {} without valid result",
            total,
            invalid
        );
    }
}
