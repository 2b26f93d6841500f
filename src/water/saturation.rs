use super::{PC, RHOC, TC};
use iapws95_core::PhaseBoundary;
use num_dual::DualNum;

const VAPOR_PRESSURE: [f64; 6] = [
    -7.85951783,
    1.84408259,
    -11.7866497,
    22.6807411,
    -15.9618719,
    1.80122502,
];

const SAT_LIQ: [f64; 6] = [
    1.99274064,
    1.09965342,
    -0.510839303,
    -1.75493479,
    -45.5170352,
    -6.74694450e5,
];

const SAT_VAP: [f64; 6] = [
    -2.03105240,
    -2.68302940,
    -5.38626492,
    -17.2991605,
    -44.7586581,
    -63.9201063,
];

/// Auxiliary equations for the vapor pressure and the densities of the coexisting phases.
///
/// The equations are explicit in temperature and do not require a phase equilibrium
/// calculation. They are used to choose the initial density of the density iteration.
/// All functions return `None` at or above the critical temperature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaturationCurve {
    /// Critical temperature in K
    pub critical_temperature: f64,
    /// Critical pressure in MPa
    pub critical_pressure: f64,
    /// Critical density in kg/m³
    pub critical_density: f64,
}

impl Default for SaturationCurve {
    fn default() -> Self {
        Self {
            critical_temperature: TC,
            critical_pressure: PC,
            critical_density: RHOC,
        }
    }
}

fn ln_reduced_vapor_pressure<D: DualNum<f64> + Copy>(temperature: D, tc: f64) -> D {
    let theta = -temperature / tc + 1.0;
    let [a1, a2, a3, a4, a5, a6] = VAPOR_PRESSURE;
    (theta * a1
        + theta.powf(1.5) * a2
        + theta.powi(3) * a3
        + theta.powf(3.5) * a4
        + theta.powi(4) * a5
        + theta.powf(7.5) * a6)
        * temperature.recip()
        * tc
}

fn delta_sat<D: DualNum<f64> + Copy>(temperature: D, tc: f64) -> [D; 2] {
    let theta_6 = (-temperature / tc + 1.0).powf(1.0 / 6.0);
    let delta_liquid = theta_6.powi(2) * SAT_LIQ[0]
        + theta_6.powi(4) * SAT_LIQ[1]
        + theta_6.powi(10) * SAT_LIQ[2]
        + theta_6.powi(32) * SAT_LIQ[3]
        + theta_6.powi(86) * SAT_LIQ[4]
        + theta_6.powi(220) * SAT_LIQ[5]
        + 1.0;
    let delta_vapor = (theta_6.powi(2) * SAT_VAP[0]
        + theta_6.powi(4) * SAT_VAP[1]
        + theta_6.powi(8) * SAT_VAP[2]
        + theta_6.powi(18) * SAT_VAP[3]
        + theta_6.powi(37) * SAT_VAP[4]
        + theta_6.powi(71) * SAT_VAP[5])
        .exp();
    [delta_liquid, delta_vapor]
}

impl SaturationCurve {
    fn is_subcritical(&self, temperature: f64) -> bool {
        temperature > 0.0 && temperature < self.critical_temperature
    }

    /// Vapor pressure in MPa.
    pub fn pressure(&self, temperature: f64) -> Option<f64> {
        self.pressure_dual(temperature)
    }

    /// Vapor pressure in MPa for arbitrary (dual) temperatures.
    pub fn pressure_dual<D: DualNum<f64> + Copy>(&self, temperature: D) -> Option<D> {
        self.is_subcritical(temperature.re()).then(|| {
            ln_reduced_vapor_pressure(temperature, self.critical_temperature).exp()
                * self.critical_pressure
        })
    }

    /// Density of the saturated liquid in kg/m³.
    pub fn liquid_density(&self, temperature: f64) -> Option<f64> {
        self.is_subcritical(temperature).then(|| {
            delta_sat(temperature, self.critical_temperature)[0] * self.critical_density
        })
    }

    /// Density of the saturated vapor in kg/m³.
    pub fn vapor_density(&self, temperature: f64) -> Option<f64> {
        self.is_subcritical(temperature).then(|| {
            delta_sat(temperature, self.critical_temperature)[1] * self.critical_density
        })
    }
}

impl PhaseBoundary for SaturationCurve {
    fn boundary_pressure(&self, temperature: f64) -> Option<f64> {
        self.pressure(temperature)
    }

    fn saturated_densities(&self, temperature: f64) -> Option<(f64, f64)> {
        self.is_subcritical(temperature).then(|| {
            let [liquid, vapor] = delta_sat(temperature, self.critical_temperature);
            (liquid * self.critical_density, vapor * self.critical_density)
        })
    }
}
