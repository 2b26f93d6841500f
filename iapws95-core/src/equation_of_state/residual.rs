use super::PhiBundle;
use crate::parameter::ResidualRecord;
use num_dual::DualNum;

/// Polynomial and exponential terms
/// $\phi^\mathrm{r}=\sum_in_i\delta^{d_i}\tau^{t_i}e^{-c_i\delta^{p_i}}$
/// of the residual Helmholtz energy.
#[derive(Clone, Debug)]
pub struct Residual {
    terms: Vec<ResidualRecord>,
}

/// Value of a single term and the reduced exponent $d-cp\delta^p$.
#[inline]
fn term(record: &ResidualRecord, delta: f64, tau: f64) -> (f64, f64) {
    let ResidualRecord { n, d, t, c, p } = *record;
    let f = n * delta.powi(d) * tau.powf(t);
    if c == 0.0 {
        (f, d as f64)
    } else {
        let delta_p = delta.powi(p);
        (f * (-c * delta_p).exp(), d as f64 - c * p as f64 * delta_p)
    }
}

impl Residual {
    pub fn new(terms: &[ResidualRecord]) -> Self {
        Self {
            terms: terms.to_vec(),
        }
    }

    pub fn terms(&self) -> &[ResidualRecord] {
        &self.terms
    }

    pub fn evaluate(&self, delta: f64, tau: f64) -> PhiBundle {
        let mut phi = PhiBundle::default();
        for record in &self.terms {
            let (f, a) = term(record, delta, tau);
            let t = record.t;
            let cpp = if record.c == 0.0 {
                0.0
            } else {
                record.c * (record.p * record.p) as f64 * delta.powi(record.p)
            };
            phi.value += f;
            phi.delta += f * a;
            phi.delta_delta += f * (a * (a - 1.0) - cpp);
            phi.tau += f * t;
            phi.tau_tau += f * t * (t - 1.0);
            phi.delta_tau += f * a * t;
        }
        phi.delta /= delta;
        phi.delta_delta /= delta * delta;
        phi.tau /= tau;
        phi.tau_tau /= tau * tau;
        phi.delta_tau /= delta * tau;
        phi
    }

    /// Third mixed derivative $\phi^\mathrm{r}_{\delta\tau\tau}$.
    pub fn delta_tau_tau(&self, delta: f64, tau: f64) -> f64 {
        self.terms
            .iter()
            .map(|record| {
                let (f, a) = term(record, delta, tau);
                f * a * record.t * (record.t - 1.0)
            })
            .sum::<f64>()
            / (delta * tau * tau)
    }

    /// $\phi^\mathrm{r}$ for arbitrary (dual) numbers.
    pub fn phi<D: DualNum<f64> + Copy>(&self, delta: D, tau: D) -> D {
        let mut phi = D::zero();
        for &ResidualRecord { n, d, t, c, p } in &self.terms {
            let f = delta.powi(d) * tau.powf(t) * n;
            phi += if c == 0.0 {
                f
            } else {
                f * (-delta.powi(p) * c).exp()
            };
        }
        phi
    }
}
