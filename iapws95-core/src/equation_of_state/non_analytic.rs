use super::PhiBundle;
use crate::parameter::{GaussianRecord, NonAnalyticRecord};
use num_dual::DualNum;

/// Critical region terms of the residual Helmholtz energy: Gaussian bell shaped
/// terms and non-analytic crossover terms.
#[derive(Clone, Debug)]
pub struct NonAnalytic {
    gaussian: Vec<GaussianRecord>,
    crossover: Vec<NonAnalyticRecord>,
}

impl NonAnalytic {
    pub fn new(gaussian: &[GaussianRecord], crossover: &[NonAnalyticRecord]) -> Self {
        Self {
            gaussian: gaussian.to_vec(),
            crossover: crossover.to_vec(),
        }
    }

    pub fn evaluate(&self, delta: f64, tau: f64) -> PhiBundle {
        let gaussian: PhiBundle = self
            .gaussian
            .iter()
            .map(|r| gaussian_term(r, delta, tau))
            .sum();
        let crossover: PhiBundle = self
            .crossover
            .iter()
            .map(|r| crossover_term(r, delta, tau))
            .sum();
        gaussian + crossover
    }

    /// Critical region contribution for arbitrary (dual) numbers.
    ///
    /// The crossover terms are not differentiable on the critical isochore $\delta=1$.
    pub fn phi<D: DualNum<f64> + Copy>(&self, delta: D, tau: D) -> D {
        let mut phi = D::zero();
        for r in &self.gaussian {
            phi += delta.powi(r.d)
                * tau.powf(r.t)
                * r.n
                * (-(delta - r.epsilon).powi(2) * r.alpha - (tau - r.gamma).powi(2) * r.beta)
                    .exp();
        }
        let delta_2 = (delta - 1.0).powi(2);
        for r in &self.crossover {
            let psi = (-delta_2 * r.cc - (tau - 1.0).powi(2) * r.dd).exp();
            let theta = -(tau - 1.0) + delta_2.powf(0.5 / r.beta) * r.aa;
            let distance = theta.powi(2) + delta_2.powf(r.a) * r.bb;
            phi += distance.powf(r.b) * delta * psi * r.n;
        }
        phi
    }
}

fn gaussian_term(r: &GaussianRecord, delta: f64, tau: f64) -> PhiBundle {
    let d = r.d as f64;
    let dd = delta - r.epsilon;
    let dt = tau - r.gamma;
    let f = r.n
        * delta.powi(r.d)
        * tau.powf(r.t)
        * (-r.alpha * dd * dd - r.beta * dt * dt).exp();
    let a_d = d / delta - 2.0 * r.alpha * dd;
    let a_t = r.t / tau - 2.0 * r.beta * dt;
    PhiBundle {
        value: f,
        delta: f * a_d,
        delta_delta: f * (a_d * a_d - d / (delta * delta) - 2.0 * r.alpha),
        tau: f * a_t,
        tau_tau: f * (a_t * a_t - r.t / (tau * tau) - 2.0 * r.beta),
        delta_tau: f * a_d * a_t,
    }
}

fn crossover_term(r: &NonAnalyticRecord, delta: f64, tau: f64) -> PhiBundle {
    let dm1 = delta - 1.0;
    let tm1 = tau - 1.0;
    let u = dm1 * dm1;
    let q = 0.5 / r.beta;

    // theta and distance function
    let u_q1 = u.powf(q - 1.0);
    let theta = -tm1 + r.aa * u * u_q1;
    let theta_d = 2.0 * r.aa * q * dm1 * u_q1;
    let theta_dd = r.aa * q * u_q1 * (4.0 * q - 2.0);
    let u_a1 = u.powf(r.a - 1.0);
    let dist = theta * theta + r.bb * u * u_a1;
    let dist_d = 2.0 * theta * theta_d + 2.0 * r.bb * r.a * dm1 * u_a1;
    let dist_dd = 2.0 * theta_d * theta_d
        + 2.0 * theta * theta_dd
        + r.bb * r.a * u_a1 * (4.0 * r.a - 2.0);

    // distance function to the power of b
    let b = r.b;
    let db = dist.powf(b);
    let db1 = dist.powf(b - 1.0);
    let db2 = dist.powf(b - 2.0);
    let db_d = b * db1 * dist_d;
    let db_dd = b * (db1 * dist_dd + (b - 1.0) * db2 * dist_d * dist_d);
    let db_t = -2.0 * theta * b * db1;
    let db_tt = 2.0 * b * db1 + 4.0 * theta * theta * b * (b - 1.0) * db2;
    let db_dt = -2.0 * b * (theta_d * db1 + theta * (b - 1.0) * db2 * dist_d);

    // exponential damping
    let psi = (-r.cc * u - r.dd * tm1 * tm1).exp();
    let psi_d = -2.0 * r.cc * dm1 * psi;
    let psi_dd = (2.0 * r.cc * u - 1.0) * 2.0 * r.cc * psi;
    let psi_t = -2.0 * r.dd * tm1 * psi;
    let psi_tt = (2.0 * r.dd * tm1 * tm1 - 1.0) * 2.0 * r.dd * psi;
    let psi_dt = 4.0 * r.cc * r.dd * dm1 * tm1 * psi;

    let n = r.n;
    PhiBundle {
        value: n * db * delta * psi,
        delta: n * (db * (psi + delta * psi_d) + db_d * delta * psi),
        delta_delta: n
            * (db * (2.0 * psi_d + delta * psi_dd)
                + 2.0 * db_d * (psi + delta * psi_d)
                + db_dd * delta * psi),
        tau: n * delta * (db_t * psi + db * psi_t),
        tau_tau: n * delta * (db_tt * psi + 2.0 * db_t * psi_t + db * psi_tt),
        delta_tau: n
            * (db * (psi_t + delta * psi_dt)
                + delta * db_d * psi_t
                + db_t * (psi + delta * psi_d)
                + db_dt * delta * psi),
    }
}
