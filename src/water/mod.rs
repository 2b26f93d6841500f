//! The IAPWS-95 formulation for the thermodynamic properties of ordinary water substance.
//!
//! Wagner, W. & Pruß, A. (2002): The IAPWS Formulation 1995 for the Thermodynamic Properties
//! of Ordinary Water Substance for General and Scientific Use. J. Phys. Chem. Ref. Data 31, 387.
use iapws95_core::parameter::{
    CriticalConstants, GaussianRecord, IdealGasRecord, NonAnalyticRecord, ParameterError,
    ParameterSet, PlanckEinsteinRecord, ResidualRecord,
};
use iapws95_core::{
    density_iteration, DensityIteration, EosOptions, EosResult, EquationOfState, GuessPolicy,
    PropertyResult, SolverOptions, State, Verbosity,
};
use quantity::{Pressure, Temperature};
use std::sync::Arc;

mod saturation;
pub use saturation::SaturationCurve;

/// Critical temperature in K
pub const TC: f64 = 647.096;
/// Critical density in kg/m³
pub const RHOC: f64 = 322.0;
/// Critical pressure in MPa
pub const PC: f64 = 22.064;
/// Molar mass in kg/mol
const MOLAR_MASS: f64 = 0.018015268;
/// Molar gas constant in J/(mol K) used by the formulation
const GAS_CONSTANT: f64 = 8.314371;

const IDEAL_GAS: [f64; 3] = [-8.32044648201, 6.6832105268, 3.00632];

const PLANCK_EINSTEIN: [(f64, f64); 5] = [
    (0.012436, 1.28728967),
    (0.97315, 3.53734222),
    (1.27950, 7.74073708),
    (0.96956, 9.24437796),
    (0.24873, 27.5075105),
];

/// (d, t, n)
const POWER_TERMS: [(i32, f64, f64); 7] = [
    (1, -0.5, 0.125335479355233e-1),
    (1, 0.875, 0.789576347228283e1),
    (1, 1.0, -0.878032033035613e1),
    (2, 0.5, 0.31802509345418),
    (2, 0.75, -0.26145533859358),
    (3, 0.375, -0.781997516879813e-2),
    (4, 1.0, 0.880894931021343e-2),
];

/// (p, d, t, n)
const EXPONENTIAL_TERMS: [(i32, i32, i32, f64); 44] = [
    (1, 1, 4, -0.66856572307965),
    (1, 1, 6, 0.20433810950965),
    (1, 1, 12, -0.662126050396873e-4),
    (1, 2, 1, -0.19232721156002),
    (1, 2, 5, -0.25709043003438),
    (1, 3, 4, 0.16074868486251),
    (1, 4, 2, -0.400928289258073e-1),
    (1, 4, 13, 0.393434226032543e-6),
    (1, 5, 9, -0.759413770881443e-5),
    (1, 7, 3, 0.562509793518883e-3),
    (1, 9, 4, -0.156086522571353e-4),
    (1, 10, 11, 0.115379964229513e-8),
    (1, 11, 4, 0.365821651442043e-6),
    (1, 13, 13, -0.132511800746683e-11),
    (1, 15, 1, -0.626395869124543e-9),
    (2, 1, 7, -0.10793600908932),
    (2, 2, 1, 0.176114910087523e-1),
    (2, 2, 9, 0.22132295167546),
    (2, 2, 10, -0.40247669763528),
    (2, 3, 10, 0.58083399985759),
    (2, 4, 3, 0.499691469908063e-2),
    (2, 4, 7, -0.313587007125493e-1),
    (2, 4, 10, -0.74315929710341),
    (2, 5, 10, 0.47807329915480),
    (2, 6, 6, 0.205279408959483e-1),
    (2, 6, 10, -0.13636435110343),
    (2, 7, 10, 0.141806344006173e-1),
    (2, 9, 1, 0.833265048807133e-2),
    (2, 9, 2, -0.290523360095853e-1),
    (2, 9, 3, 0.386150855742063e-1),
    (2, 9, 4, -0.203934865137043e-1),
    (2, 9, 8, -0.165540500637343e-2),
    (2, 10, 6, 0.199555719795413e-2),
    (2, 10, 9, 0.158703083241573e-3),
    (2, 12, 8, -0.163885683425303e-4),
    (3, 3, 16, 0.436136157238113e-1),
    (3, 4, 22, 0.349940054637653e-1),
    (3, 4, 23, -0.767881978446213e-1),
    (3, 5, 23, 0.224462773320063e-1),
    (4, 14, 10, -0.626897104146853e-4),
    (6, 3, 50, -0.557111185656453e-9),
    (6, 6, 44, -0.19905718354408),
    (6, 6, 46, 0.31777497330738),
    (6, 6, 50, -0.11841182425981),
];

/// (d, t, n, alpha, beta, gamma), epsilon = 1
const GAUSSIAN_TERMS: [(i32, f64, f64, f64, f64, f64); 3] = [
    (3, 0.0, -0.313062603234353e2, 20.0, 150.0, 1.21),
    (3, 1.0, 0.315461402377813e2, 20.0, 150.0, 1.21),
    (3, 4.0, -0.252131543416953e4, 20.0, 250.0, 1.25),
];

/// [a, b, B, n, C, D, A, beta]
const CROSSOVER_TERMS: [[f64; 8]; 2] = [
    [3.5, 0.85, 0.2, -0.14874640856724, 28.0, 700.0, 0.32, 0.3],
    [3.5, 0.95, 0.2, 0.31806110878444, 32.0, 800.0, 0.32, 0.3],
];

/// Water and steam described by IAPWS-95.
///
/// Bundles the equation of state with the auxiliary saturation curve that guides the
/// density iteration, the [GuessPolicy] and the [SolverOptions] of the root finder.
#[derive(Clone, Debug)]
pub struct Iapws95 {
    eos: EquationOfState,
    saturation: SaturationCurve,
    policy: GuessPolicy,
    options: SolverOptions,
}

impl Iapws95 {
    /// The coefficients of IAPWS-95: 8 ideal gas terms and 56 residual terms.
    pub fn parameters() -> Result<ParameterSet, ParameterError> {
        let critical = CriticalConstants {
            temperature: TC,
            density: RHOC,
            molar_mass: MOLAR_MASS,
            gas_constant: GAS_CONSTANT,
        };
        let [n1, n2, n3] = IDEAL_GAS;
        let ideal_gas = IdealGasRecord {
            n1,
            n2,
            n3,
            planck_einstein: PLANCK_EINSTEIN
                .iter()
                .map(|&(n, gamma)| PlanckEinsteinRecord { n, gamma })
                .collect(),
        };
        let residual = POWER_TERMS
            .iter()
            .map(|&(d, t, n)| ResidualRecord::power(n, d, t))
            .chain(
                EXPONENTIAL_TERMS
                    .iter()
                    .map(|&(p, d, t, n)| ResidualRecord::exponential(n, d, t as f64, p)),
            )
            .collect();
        let gaussian = GAUSSIAN_TERMS
            .iter()
            .map(|&(d, t, n, alpha, beta, gamma)| GaussianRecord {
                n,
                d,
                t,
                alpha,
                beta,
                gamma,
                epsilon: 1.0,
            })
            .collect();
        let non_analytic = CROSSOVER_TERMS
            .iter()
            .map(|&[a, b, bb, n, cc, dd, aa, beta]| NonAnalyticRecord {
                n,
                a,
                b,
                bb,
                cc,
                dd,
                aa,
                beta,
            })
            .collect();
        ParameterSet::new(critical, ideal_gas, residual, gaussian, non_analytic)
    }

    pub fn new(options: EosOptions) -> EosResult<Self> {
        Ok(Self::from_parameters(
            Arc::new(Self::parameters()?),
            options,
        ))
    }

    /// Use a custom (e.g. modified or file based) parameter set.
    pub fn from_parameters(parameters: Arc<ParameterSet>, options: EosOptions) -> Self {
        Self {
            eos: EquationOfState::new(parameters, options),
            saturation: SaturationCurve::default(),
            policy: GuessPolicy::default(),
            options: SolverOptions::default(),
        }
    }

    pub fn policy(mut self, policy: GuessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn solver_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn eos(&self) -> &EquationOfState {
        &self.eos
    }

    pub fn saturation(&self) -> &SaturationCurve {
        &self.saturation
    }

    pub fn verbosity(&self) -> Verbosity {
        self.options.verbosity
    }

    /// State at density (kg/m³) and temperature (K).
    pub fn state(&self, density: f64, temperature: f64) -> EosResult<State> {
        State::new(&self.eos, density, temperature)
    }

    /// State at given pressure and temperature.
    pub fn state_pt(&self, pressure: Pressure, temperature: Temperature) -> EosResult<State> {
        State::new_pt(
            &self.eos,
            pressure,
            temperature,
            &self.saturation,
            &self.policy,
            self.options,
        )
    }

    /// Density iteration for pressure (MPa) and temperature (K).
    pub fn solve_density(&self, pressure: f64, temperature: f64) -> EosResult<DensityIteration> {
        density_iteration(
            &self.eos,
            pressure,
            temperature,
            &self.saturation,
            &self.policy,
            self.options,
        )
    }

    /// Properties at density (kg/m³) and temperature (K).
    ///
    /// Invalid inputs result in [PropertyResult::invalid].
    pub fn properties_dt(&self, density: f64, temperature: f64) -> PropertyResult {
        self.state(density, temperature)
            .map_or(PropertyResult::invalid(temperature), |s| s.properties())
    }

    /// Properties at pressure (MPa) and temperature (K).
    ///
    /// The reported pressure is recomputed at the converged density. Points without a
    /// solution and invalid inputs result in [PropertyResult::invalid].
    pub fn properties_pt(&self, pressure: f64, temperature: f64) -> PropertyResult {
        match self.solve_density(pressure, temperature) {
            Ok(DensityIteration::Converged { density, .. }) => {
                self.properties_dt(density, temperature)
            }
            _ => PropertyResult::invalid(temperature),
        }
    }
}
