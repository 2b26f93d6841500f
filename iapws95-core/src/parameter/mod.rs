//! Coefficient tables of a multiparameter Helmholtz energy equation of state.
//!
//! A [ParameterSet] is built once, validated on construction and never mutated afterwards.
//! It can be created from row records ([ParameterSet::new]) or from a JSON file in which
//! every term family is stored column-wise ([ParameterSet::from_json]).
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

mod table;
pub use table::{
    GaussianTable, IdealGasTable, NonAnalyticTable, ParameterRecord, PlanckEinsteinTable,
    ResidualTable,
};

/// Error type for incomplete parameter information and IO problems.
#[derive(Error, Debug)]
pub enum ParameterError {
    #[error(transparent)]
    FileIO(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("Incompatible parameters: {0}")]
    IncompatibleParameters(String),
}

/// Scaling constants of the equation of state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CriticalConstants {
    /// Critical temperature in K
    pub temperature: f64,
    /// Critical density in kg/m³
    pub density: f64,
    /// Molar mass in kg/mol
    pub molar_mass: f64,
    /// Universal gas constant in J/(mol K)
    pub gas_constant: f64,
}

impl CriticalConstants {
    /// Specific gas constant $R=R_\mathrm{m}/M$ in J/(kg K).
    pub fn specific_gas_constant(&self) -> f64 {
        self.gas_constant / self.molar_mass
    }
}

/// Planck-Einstein term $n\ln\left(1-e^{-\gamma\tau}\right)$ of the ideal gas contribution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanckEinsteinRecord {
    pub n: f64,
    pub gamma: f64,
}

/// Ideal gas contribution
/// $\phi^\circ=\ln\delta+n_1+n_2\tau+n_3\ln\tau+\sum_in_i\ln\left(1-e^{-\gamma_i\tau}\right)$.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdealGasRecord {
    pub n1: f64,
    pub n2: f64,
    pub n3: f64,
    pub planck_einstein: Vec<PlanckEinsteinRecord>,
}

/// Polynomial or exponential residual term $n\delta^d\tau^te^{-c\delta^p}$.
///
/// Pure power terms have `c = 0`, in which case `p` is irrelevant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResidualRecord {
    pub n: f64,
    pub d: i32,
    pub t: f64,
    pub c: f64,
    pub p: i32,
}

impl ResidualRecord {
    /// Pure power term $n\delta^d\tau^t$.
    pub fn power(n: f64, d: i32, t: f64) -> Self {
        Self {
            n,
            d,
            t,
            c: 0.0,
            p: 0,
        }
    }

    /// Exponential term $n\delta^d\tau^te^{-\delta^p}$.
    pub fn exponential(n: f64, d: i32, t: f64, p: i32) -> Self {
        Self {
            n,
            d,
            t,
            c: 1.0,
            p,
        }
    }
}

/// Gaussian bell shaped term
/// $n\delta^d\tau^te^{-\alpha(\delta-\varepsilon)^2-\beta(\tau-\gamma)^2}$.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaussianRecord {
    pub n: f64,
    pub d: i32,
    pub t: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub epsilon: f64,
}

/// Non-analytic crossover term $n\Delta^b\delta\psi$ with
/// * $\psi=e^{-C(\delta-1)^2-D(\tau-1)^2}$
/// * $\theta=(1-\tau)+A\left((\delta-1)^2\right)^{1/(2\beta)}$
/// * $\Delta=\theta^2+B\left((\delta-1)^2\right)^a$
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NonAnalyticRecord {
    pub n: f64,
    pub a: f64,
    pub b: f64,
    #[serde(rename = "B")]
    pub bb: f64,
    #[serde(rename = "C")]
    pub cc: f64,
    #[serde(rename = "D")]
    pub dd: f64,
    #[serde(rename = "A")]
    pub aa: f64,
    pub beta: f64,
}

/// Complete, validated coefficient set of a multiparameter equation of state.
///
/// The only way to obtain a `ParameterSet` is through one of the validating constructors.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSet {
    critical: CriticalConstants,
    ideal_gas: IdealGasRecord,
    residual: Vec<ResidualRecord>,
    gaussian: Vec<GaussianRecord>,
    non_analytic: Vec<NonAnalyticRecord>,
}

impl ParameterSet {
    /// Creates a parameter set from row records.
    ///
    /// Returns an error if a scaling constant is not positive, a coefficient is not
    /// finite, or an exponent lies outside its admissible range.
    pub fn new(
        critical: CriticalConstants,
        ideal_gas: IdealGasRecord,
        residual: Vec<ResidualRecord>,
        gaussian: Vec<GaussianRecord>,
        non_analytic: Vec<NonAnalyticRecord>,
    ) -> Result<Self, ParameterError> {
        let parameters = Self {
            critical,
            ideal_gas,
            residual,
            gaussian,
            non_analytic,
        };
        parameters.validate()?;
        Ok(parameters)
    }

    /// Creates a parameter set from its column-wise representation.
    pub fn from_record(record: ParameterRecord) -> Result<Self, ParameterError> {
        Self::new(
            record.critical,
            record.ideal_gas.try_into()?,
            record.residual.try_into()?,
            record.gaussian.map_or(Ok(Vec::new()), TryInto::try_into)?,
            record.non_analytic.map_or(Ok(Vec::new()), TryInto::try_into)?,
        )
    }

    /// Reads a parameter set from a JSON file.
    pub fn from_json<P: AsRef<Path>>(file: P) -> Result<Self, ParameterError> {
        let reader = BufReader::new(File::open(file)?);
        let record: ParameterRecord = serde_json::from_reader(reader)?;
        Self::from_record(record)
    }

    pub fn critical(&self) -> &CriticalConstants {
        &self.critical
    }

    pub fn ideal_gas(&self) -> &IdealGasRecord {
        &self.ideal_gas
    }

    /// Polynomial and exponential terms of the residual contribution.
    pub fn residual(&self) -> &[ResidualRecord] {
        &self.residual
    }

    pub fn gaussian(&self) -> &[GaussianRecord] {
        &self.gaussian
    }

    pub fn non_analytic(&self) -> &[NonAnalyticRecord] {
        &self.non_analytic
    }

    /// Total number of residual terms, including the critical region terms.
    pub fn residual_terms(&self) -> usize {
        self.residual.len() + self.gaussian.len() + self.non_analytic.len()
    }

    fn validate(&self) -> Result<(), ParameterError> {
        let c = &self.critical;
        for (name, value) in [
            ("critical temperature", c.temperature),
            ("critical density", c.density),
            ("molar mass", c.molar_mass),
            ("gas constant", c.gas_constant),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(incompatible(format!("{name} must be positive, got {value}")));
            }
        }

        let ig = &self.ideal_gas;
        finite("ideal gas", 0, &[ig.n1, ig.n2, ig.n3])?;
        for (i, r) in ig.planck_einstein.iter().enumerate() {
            finite("Planck-Einstein", i, &[r.n, r.gamma])?;
            if r.gamma <= 0.0 {
                return Err(incompatible(format!(
                    "Planck-Einstein term {i}: gamma must be positive"
                )));
            }
        }

        if self.residual.is_empty() {
            return Err(incompatible("the residual table is empty".into()));
        }
        for (i, r) in self.residual.iter().enumerate() {
            finite("residual", i, &[r.n, r.t, r.c])?;
            if r.c < 0.0 || (r.c > 0.0 && r.p < 1) {
                return Err(incompatible(format!(
                    "residual term {i}: exponential cutoff needs c >= 0 and p >= 1"
                )));
            }
        }

        for (i, r) in self.gaussian.iter().enumerate() {
            finite(
                "Gaussian",
                i,
                &[r.n, r.t, r.alpha, r.beta, r.gamma, r.epsilon],
            )?;
            if r.alpha < 0.0 || r.beta < 0.0 {
                return Err(incompatible(format!(
                    "Gaussian term {i}: alpha and beta must not be negative"
                )));
            }
        }

        for (i, r) in self.non_analytic.iter().enumerate() {
            finite(
                "non-analytic",
                i,
                &[r.n, r.a, r.b, r.bb, r.cc, r.dd, r.aa, r.beta],
            )?;
            if r.beta <= 0.0 || r.cc < 0.0 || r.dd < 0.0 {
                return Err(incompatible(format!(
                    "non-analytic term {i}: beta must be positive, C and D not negative"
                )));
            }
        }
        Ok(())
    }
}

fn incompatible(message: String) -> ParameterError {
    ParameterError::IncompatibleParameters(message)
}

fn finite(family: &str, index: usize, values: &[f64]) -> Result<(), ParameterError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(incompatible(format!(
            "{family} term {index} contains non-finite coefficients"
        )))
    }
}
