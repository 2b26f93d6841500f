use crate::parameter::{CriticalConstants, ParameterSet};
use num_dual::DualNum;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::sync::Arc;

mod ideal_gas;
mod non_analytic;
mod residual;
pub use ideal_gas::IdealGas;
pub use non_analytic::NonAnalytic;
pub use residual::Residual;

/// Reduced Helmholtz energy of a single contribution and its partial
/// derivatives with respect to $\delta$ and $\tau$.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhiBundle {
    /// $\phi$
    pub value: f64,
    /// $\phi_\delta$
    pub delta: f64,
    /// $\phi_{\delta\delta}$
    pub delta_delta: f64,
    /// $\phi_\tau$
    pub tau: f64,
    /// $\phi_{\tau\tau}$
    pub tau_tau: f64,
    /// $\phi_{\delta\tau}$
    pub delta_tau: f64,
}

impl Add for PhiBundle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
            delta: self.delta + rhs.delta,
            delta_delta: self.delta_delta + rhs.delta_delta,
            tau: self.tau + rhs.tau,
            tau_tau: self.tau_tau + rhs.tau_tau,
            delta_tau: self.delta_tau + rhs.delta_tau,
        }
    }
}

impl AddAssign for PhiBundle {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for PhiBundle {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Configuration of an [EquationOfState].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EosOptions {
    /// Include the critical region terms (Gaussian and non-analytic crossover terms).
    pub non_analytic: bool,
}

impl Default for EosOptions {
    fn default() -> Self {
        Self { non_analytic: true }
    }
}

/// Multiparameter equation of state in terms of the reduced Helmholtz energy
/// $\phi(\delta,\tau)=\phi^\circ(\delta,\tau)+\phi^\mathrm{r}(\delta,\tau)$.
///
/// The residual part consists of the polynomial/exponential terms and, depending on
/// [EosOptions::non_analytic], the critical region terms.
#[derive(Clone, Debug)]
pub struct EquationOfState {
    pub parameters: Arc<ParameterSet>,
    pub options: EosOptions,
    ideal_gas: IdealGas,
    residual: Residual,
    non_analytic: Option<NonAnalytic>,
}

impl EquationOfState {
    pub fn new(parameters: Arc<ParameterSet>, options: EosOptions) -> Self {
        let ideal_gas = IdealGas::new(parameters.ideal_gas());
        let residual = Residual::new(parameters.residual());
        let non_analytic = options
            .non_analytic
            .then(|| NonAnalytic::new(parameters.gaussian(), parameters.non_analytic()));
        Self {
            parameters,
            options,
            ideal_gas,
            residual,
            non_analytic,
        }
    }

    pub fn critical(&self) -> &CriticalConstants {
        self.parameters.critical()
    }

    /// Specific gas constant in J/(kg K).
    pub fn specific_gas_constant(&self) -> f64 {
        self.parameters.critical().specific_gas_constant()
    }

    pub fn ideal_gas(&self) -> &IdealGas {
        &self.ideal_gas
    }

    pub fn residual(&self) -> &Residual {
        &self.residual
    }

    /// The critical region contribution, `None` if it is disabled.
    pub fn non_analytic(&self) -> Option<&NonAnalytic> {
        self.non_analytic.as_ref()
    }

    /// Ideal gas contribution $\phi^\circ$ and its derivatives.
    pub fn ideal_gas_contribution(&self, delta: f64, tau: f64) -> PhiBundle {
        self.ideal_gas.evaluate(delta, tau)
    }

    /// Residual contribution $\phi^\mathrm{r}$ and its derivatives, including the
    /// critical region terms if they are enabled.
    pub fn residual_contribution(&self, delta: f64, tau: f64) -> PhiBundle {
        let mut phi = self.residual.evaluate(delta, tau);
        if let Some(non_analytic) = &self.non_analytic {
            phi += non_analytic.evaluate(delta, tau);
        }
        phi
    }

    /// Reduced residual Helmholtz energy for arbitrary (dual) numbers.
    pub fn reduced_residual_helmholtz_energy<D: DualNum<f64> + Copy>(
        &self,
        delta: D,
        tau: D,
    ) -> D {
        let phi = self.residual.phi(delta, tau);
        match &self.non_analytic {
            Some(non_analytic) => phi + non_analytic.phi(delta, tau),
            None => phi,
        }
    }

    /// Total reduced Helmholtz energy $\phi=a/(RT)$ for arbitrary (dual) numbers.
    pub fn reduced_helmholtz_energy<D: DualNum<f64> + Copy>(&self, delta: D, tau: D) -> D {
        self.ideal_gas.phi(delta, tau) + self.reduced_residual_helmholtz_energy(delta, tau)
    }
}
