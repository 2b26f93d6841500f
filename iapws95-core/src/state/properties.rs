use super::State;
use quantity::*;
use serde::{Deserialize, Serialize};
use std::ops::Neg;

type InvT = Quantity<f64, <_Temperature as Neg>::Output>;

/// Thermodynamic properties at a single point.
///
/// Pressure and bulk moduli are given in MPa, temperature in K, density in kg/m³,
/// energies in J/kg, entropies and heat capacities in J/(kg K), the speed of sound in m/s
/// and the thermal expansivity in 1/K.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyResult {
    pub pressure: f64,
    pub temperature: f64,
    pub density: f64,
    pub internal_energy: f64,
    pub enthalpy: f64,
    pub entropy: f64,
    pub helmholtz_energy: f64,
    pub gibbs_energy: f64,
    pub isochoric_heat_capacity: f64,
    pub isobaric_heat_capacity: f64,
    pub speed_of_sound: f64,
    pub thermal_expansivity: f64,
    pub isentropic_bulk_modulus: f64,
    pub isothermal_bulk_modulus: f64,
    pub adiabatic_exponent: f64,
    pub compressibility_factor: f64,
}

impl PropertyResult {
    /// Result of a failed evaluation: every property is NaN except the temperature.
    pub fn invalid(temperature: f64) -> Self {
        Self {
            pressure: f64::NAN,
            temperature,
            density: f64::NAN,
            internal_energy: f64::NAN,
            enthalpy: f64::NAN,
            entropy: f64::NAN,
            helmholtz_energy: f64::NAN,
            gibbs_energy: f64::NAN,
            isochoric_heat_capacity: f64::NAN,
            isobaric_heat_capacity: f64::NAN,
            speed_of_sound: f64::NAN,
            thermal_expansivity: f64::NAN,
            isentropic_bulk_modulus: f64::NAN,
            isothermal_bulk_modulus: f64::NAN,
            adiabatic_exponent: f64::NAN,
            compressibility_factor: f64::NAN,
        }
    }

    /// `false` for the result of a failed evaluation.
    pub fn is_valid(&self) -> bool {
        !self.density.is_nan()
    }
}

/// Combinations of reduced Helmholtz energy derivatives in SI units.
impl State {
    /// $\phi^\circ_{\tau\tau}+\phi^\mathrm{r}_{\tau\tau}$
    fn phi_tau_tau(&self) -> f64 {
        self.ideal_gas.tau_tau + self.residual.tau_tau
    }

    /// $1+2\delta\phi^\mathrm{r}_\delta+\delta^2\phi^\mathrm{r}_{\delta\delta}$
    fn dp_drho_reduced(&self) -> f64 {
        let d = self.reduced.delta;
        1.0 + 2.0 * d * self.residual.delta + d * d * self.residual.delta_delta
    }

    /// $1+\delta\phi^\mathrm{r}_\delta-\delta\tau\phi^\mathrm{r}_{\delta\tau}$
    fn dp_dt_reduced(&self) -> f64 {
        let d = self.reduced.delta;
        1.0 + d * self.residual.delta - d * self.reduced.tau * self.residual.delta_tau
    }

    fn pressure_si(&self) -> f64 {
        self.rho * self.gas_constant * self.t * self.compressibility_factor()
    }

    fn speed_of_sound_si(&self) -> f64 {
        let tau = self.reduced.tau;
        let w2 = self.gas_constant
            * self.t
            * (self.dp_drho_reduced() - self.dp_dt_reduced().powi(2) / (tau * tau * self.phi_tau_tau()));
        // slightly negative close to the critical point
        w2.max(0.0).sqrt()
    }

    fn isochoric_heat_capacity_si(&self) -> f64 {
        let tau = self.reduced.tau;
        -self.gas_constant * tau * tau * self.phi_tau_tau()
    }

    fn isobaric_heat_capacity_si(&self) -> f64 {
        self.isochoric_heat_capacity_si()
            + self.gas_constant * self.dp_dt_reduced().powi(2) / self.dp_drho_reduced()
    }

    fn internal_energy_si(&self) -> f64 {
        self.gas_constant * self.t * self.reduced.tau * (self.ideal_gas.tau + self.residual.tau)
    }

    fn enthalpy_si(&self) -> f64 {
        self.internal_energy_si()
            + self.gas_constant * self.t * (1.0 + self.reduced.delta * self.residual.delta)
    }

    fn helmholtz_energy_si(&self) -> f64 {
        self.gas_constant * self.t * (self.ideal_gas.value + self.residual.value)
    }

    fn entropy_si(&self) -> f64 {
        self.internal_energy_si() / self.t
            - self.gas_constant * (self.ideal_gas.value + self.residual.value)
    }

    fn gibbs_energy_si(&self) -> f64 {
        self.helmholtz_energy_si()
            + self.gas_constant * self.t * (1.0 + self.reduced.delta * self.residual.delta)
    }

    /// $\left(\frac{\partial p}{\partial\rho}\right)_T$ in m²/s²
    fn dp_drho_si(&self) -> f64 {
        self.gas_constant * self.t * self.dp_drho_reduced()
    }

    /// $\left(\frac{\partial p}{\partial T}\right)_\rho$ in Pa/K
    fn dp_dt_si(&self) -> f64 {
        self.rho * self.gas_constant * self.dp_dt_reduced()
    }

    fn thermal_expansivity_si(&self) -> f64 {
        self.dp_dt_si() / (self.dp_drho_si() * self.rho)
    }

    fn isentropic_bulk_modulus_si(&self) -> f64 {
        self.rho * self.speed_of_sound_si().powi(2)
    }

    fn adiabatic_exponent_si(&self) -> f64 {
        self.thermal_expansivity_si() * self.isentropic_bulk_modulus_si()
            / (self.rho * self.isobaric_heat_capacity_si())
    }

    fn isothermal_bulk_modulus_si(&self) -> f64 {
        self.isentropic_bulk_modulus_si()
            / (1.0 + self.thermal_expansivity_si() * self.adiabatic_exponent_si() * self.t)
    }
}

/// # State properties
impl State {
    /// Pressure: $p=\rho RT\left(1+\delta\phi^\mathrm{r}_\delta\right)$
    pub fn pressure(&self) -> Pressure {
        self.pressure_si() * PASCAL
    }

    /// Compressibility factor: $Z=1+\delta\phi^\mathrm{r}_\delta$
    pub fn compressibility_factor(&self) -> f64 {
        1.0 + self.reduced.delta * self.residual.delta
    }

    /// Speed of sound: $w=\sqrt{\left(\frac{\partial p}{\partial\rho}\right)_s}$
    pub fn speed_of_sound(&self) -> Velocity {
        self.speed_of_sound_si() * METER / SECOND
    }

    /// Specific isochoric heat capacity: $c_v=-R\tau^2\left(\phi^\circ_{\tau\tau}+\phi^\mathrm{r}_{\tau\tau}\right)$
    pub fn isochoric_heat_capacity(&self) -> SpecificEntropy {
        self.isochoric_heat_capacity_si() * JOULE / (KILOGRAM * KELVIN)
    }

    /// Specific isobaric heat capacity: $c_p=\left(\frac{\partial h}{\partial T}\right)_p$
    pub fn isobaric_heat_capacity(&self) -> SpecificEntropy {
        self.isobaric_heat_capacity_si() * JOULE / (KILOGRAM * KELVIN)
    }

    /// Specific internal energy: $u=RT\tau\left(\phi^\circ_\tau+\phi^\mathrm{r}_\tau\right)$
    pub fn internal_energy(&self) -> SpecificEnergy {
        self.internal_energy_si() * JOULE / KILOGRAM
    }

    /// Specific enthalpy: $h=u+p/\rho$
    pub fn enthalpy(&self) -> SpecificEnergy {
        self.enthalpy_si() * JOULE / KILOGRAM
    }

    /// Specific entropy: $s=u/T-R\left(\phi^\circ+\phi^\mathrm{r}\right)$
    pub fn entropy(&self) -> SpecificEntropy {
        self.entropy_si() * JOULE / (KILOGRAM * KELVIN)
    }

    /// Specific Helmholtz energy: $a=RT\left(\phi^\circ+\phi^\mathrm{r}\right)$
    pub fn helmholtz_energy(&self) -> SpecificEnergy {
        self.helmholtz_energy_si() * JOULE / KILOGRAM
    }

    /// Specific Gibbs energy: $g=a+p/\rho$
    pub fn gibbs_energy(&self) -> SpecificEnergy {
        self.gibbs_energy_si() * JOULE / KILOGRAM
    }

    /// Thermal expansivity: $\alpha_p=\frac{1}{\rho}\left(\frac{\partial p}{\partial T}\right)_\rho\left(\frac{\partial p}{\partial\rho}\right)_T^{-1}$
    pub fn thermal_expansivity(&self) -> InvT {
        self.thermal_expansivity_si() / KELVIN
    }

    /// Isentropic bulk modulus: $K_s=\rho w^2$
    pub fn isentropic_bulk_modulus(&self) -> Pressure {
        self.isentropic_bulk_modulus_si() * PASCAL
    }

    /// Isothermal bulk modulus: $K_T=\frac{K_s}{1+\alpha_p\gamma T}$
    pub fn isothermal_bulk_modulus(&self) -> Pressure {
        self.isothermal_bulk_modulus_si() * PASCAL
    }

    /// Adiabatic exponent (Grüneisen parameter): $\gamma=\frac{\alpha_pK_s}{\rho c_p}$
    pub fn adiabatic_exponent(&self) -> f64 {
        self.adiabatic_exponent_si()
    }

    /// All properties in the units of [PropertyResult].
    pub fn properties(&self) -> PropertyResult {
        PropertyResult {
            pressure: self.pressure_si() * 1e-6,
            temperature: self.t,
            density: self.rho,
            internal_energy: self.internal_energy_si(),
            enthalpy: self.enthalpy_si(),
            entropy: self.entropy_si(),
            helmholtz_energy: self.helmholtz_energy_si(),
            gibbs_energy: self.gibbs_energy_si(),
            isochoric_heat_capacity: self.isochoric_heat_capacity_si(),
            isobaric_heat_capacity: self.isobaric_heat_capacity_si(),
            speed_of_sound: self.speed_of_sound_si(),
            thermal_expansivity: self.thermal_expansivity_si(),
            isentropic_bulk_modulus: self.isentropic_bulk_modulus_si() * 1e-6,
            isothermal_bulk_modulus: self.isothermal_bulk_modulus_si() * 1e-6,
            adiabatic_exponent: self.adiabatic_exponent_si(),
            compressibility_factor: self.compressibility_factor(),
        }
    }
}
