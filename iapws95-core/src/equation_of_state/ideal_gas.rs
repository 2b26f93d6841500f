use super::PhiBundle;
use crate::parameter::{IdealGasRecord, PlanckEinsteinRecord};
use num_dual::DualNum;

/// Ideal gas part $\phi^\circ(\delta,\tau)$ of the reduced Helmholtz energy.
#[derive(Clone, Debug)]
pub struct IdealGas {
    n1: f64,
    n2: f64,
    n3: f64,
    planck_einstein: Vec<PlanckEinsteinRecord>,
}

impl IdealGas {
    pub fn new(record: &IdealGasRecord) -> Self {
        Self {
            n1: record.n1,
            n2: record.n2,
            n3: record.n3,
            planck_einstein: record.planck_einstein.clone(),
        }
    }

    /// $\phi^\circ$ and its partial derivatives. $\phi^\circ_{\delta\tau}$ vanishes identically.
    pub fn evaluate(&self, delta: f64, tau: f64) -> PhiBundle {
        let mut value = delta.ln() + self.n1 + self.n2 * tau + self.n3 * tau.ln();
        let mut phi_t = self.n2 + self.n3 / tau;
        let mut phi_tt = -self.n3 / (tau * tau);
        for &PlanckEinsteinRecord { n, gamma } in &self.planck_einstein {
            let e = (-gamma * tau).exp();
            let one_minus_e = 1.0 - e;
            value += n * (-e).ln_1p();
            phi_t += n * gamma * (1.0 / one_minus_e - 1.0);
            phi_tt -= n * gamma * gamma * e / (one_minus_e * one_minus_e);
        }
        PhiBundle {
            value,
            delta: 1.0 / delta,
            delta_delta: -1.0 / (delta * delta),
            tau: phi_t,
            tau_tau: phi_tt,
            delta_tau: 0.0,
        }
    }

    /// $\phi^\circ$ for arbitrary (dual) numbers.
    pub fn phi<D: DualNum<f64> + Copy>(&self, delta: D, tau: D) -> D {
        let mut phi = delta.ln() + self.n1 + tau * self.n2 + tau.ln() * self.n3;
        for &PlanckEinsteinRecord { n, gamma } in &self.planck_einstein {
            phi += (-(-tau * gamma).exp()).ln_1p() * n;
        }
        phi
    }
}
