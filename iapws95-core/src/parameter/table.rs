//! Column-wise representation of the coefficient tables as they are stored in JSON files.
//!
//! Every column of a term family must have the same length. The conversion into row
//! records fails with [ParameterError::IncompatibleParameters] otherwise.
use super::{
    CriticalConstants, GaussianRecord, IdealGasRecord, NonAnalyticRecord, ParameterError,
    PlanckEinsteinRecord, ResidualRecord,
};
use serde::{Deserialize, Serialize};

/// Complete parameter record as read from a JSON file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub critical: CriticalConstants,
    pub ideal_gas: IdealGasTable,
    pub residual: ResidualTable,
    #[serde(default)]
    pub gaussian: Option<GaussianTable>,
    #[serde(default)]
    pub non_analytic: Option<NonAnalyticTable>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanckEinsteinTable {
    pub n: Vec<f64>,
    pub gamma: Vec<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdealGasTable {
    pub n1: f64,
    pub n2: f64,
    pub n3: f64,
    pub planck_einstein: PlanckEinsteinTable,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResidualTable {
    pub n: Vec<f64>,
    pub d: Vec<i32>,
    pub t: Vec<f64>,
    pub c: Vec<f64>,
    pub p: Vec<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GaussianTable {
    pub n: Vec<f64>,
    pub d: Vec<i32>,
    pub t: Vec<f64>,
    pub alpha: Vec<f64>,
    pub beta: Vec<f64>,
    pub gamma: Vec<f64>,
    pub epsilon: Vec<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NonAnalyticTable {
    pub n: Vec<f64>,
    pub a: Vec<f64>,
    pub b: Vec<f64>,
    #[serde(rename = "B")]
    pub bb: Vec<f64>,
    #[serde(rename = "C")]
    pub cc: Vec<f64>,
    #[serde(rename = "D")]
    pub dd: Vec<f64>,
    #[serde(rename = "A")]
    pub aa: Vec<f64>,
    pub beta: Vec<f64>,
}

/// Returns the common length of all columns of a term family.
fn column_length(family: &str, lengths: &[usize]) -> Result<usize, ParameterError> {
    let len = lengths.first().copied().unwrap_or(0);
    if lengths.iter().any(|&l| l != len) {
        return Err(ParameterError::IncompatibleParameters(format!(
            "the columns of the {family} table have different lengths: {lengths:?}"
        )));
    }
    Ok(len)
}

impl TryFrom<IdealGasTable> for IdealGasRecord {
    type Error = ParameterError;

    fn try_from(table: IdealGasTable) -> Result<Self, Self::Error> {
        let pe = table.planck_einstein;
        column_length("Planck-Einstein", &[pe.n.len(), pe.gamma.len()])?;
        let planck_einstein = pe
            .n
            .into_iter()
            .zip(pe.gamma)
            .map(|(n, gamma)| PlanckEinsteinRecord { n, gamma })
            .collect();
        Ok(Self {
            n1: table.n1,
            n2: table.n2,
            n3: table.n3,
            planck_einstein,
        })
    }
}

impl TryFrom<ResidualTable> for Vec<ResidualRecord> {
    type Error = ParameterError;

    fn try_from(table: ResidualTable) -> Result<Self, Self::Error> {
        let len = column_length(
            "residual",
            &[
                table.n.len(),
                table.d.len(),
                table.t.len(),
                table.c.len(),
                table.p.len(),
            ],
        )?;
        Ok((0..len)
            .map(|i| ResidualRecord {
                n: table.n[i],
                d: table.d[i],
                t: table.t[i],
                c: table.c[i],
                p: table.p[i],
            })
            .collect())
    }
}

impl TryFrom<GaussianTable> for Vec<GaussianRecord> {
    type Error = ParameterError;

    fn try_from(table: GaussianTable) -> Result<Self, Self::Error> {
        let len = column_length(
            "Gaussian",
            &[
                table.n.len(),
                table.d.len(),
                table.t.len(),
                table.alpha.len(),
                table.beta.len(),
                table.gamma.len(),
                table.epsilon.len(),
            ],
        )?;
        Ok((0..len)
            .map(|i| GaussianRecord {
                n: table.n[i],
                d: table.d[i],
                t: table.t[i],
                alpha: table.alpha[i],
                beta: table.beta[i],
                gamma: table.gamma[i],
                epsilon: table.epsilon[i],
            })
            .collect())
    }
}

impl TryFrom<NonAnalyticTable> for Vec<NonAnalyticRecord> {
    type Error = ParameterError;

    fn try_from(table: NonAnalyticTable) -> Result<Self, Self::Error> {
        let len = column_length(
            "non-analytic",
            &[
                table.n.len(),
                table.a.len(),
                table.b.len(),
                table.bb.len(),
                table.cc.len(),
                table.dd.len(),
                table.aa.len(),
                table.beta.len(),
            ],
        )?;
        Ok((0..len)
            .map(|i| NonAnalyticRecord {
                n: table.n[i],
                a: table.a[i],
                b: table.b[i],
                bb: table.bb[i],
                cc: table.cc[i],
                dd: table.dd[i],
                aa: table.aa[i],
                beta: table.beta[i],
            })
            .collect())
    }
}
