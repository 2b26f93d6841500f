use iapws95_core::parameter::*;

const RECORD: &str = r#"
    {
        "critical": {
            "temperature": 647.096,
            "density": 322.0,
            "molar_mass": 0.018015268,
            "gas_constant": 8.314371
        },
        "ideal_gas": {
            "n1": -8.32044648201,
            "n2": 6.6832105268,
            "n3": 3.00632,
            "planck_einstein": {
                "n": [0.012436, 0.97315],
                "gamma": [1.28728967, 3.53734222]
            }
        },
        "residual": {
            "n": [0.0125335479355233, -0.66856572307965],
            "d": [1, 1],
            "t": [-0.5, 4.0],
            "c": [0.0, 1.0],
            "p": [0, 1]
        },
        "gaussian": {
            "n": [-31.306260323435],
            "d": [3],
            "t": [0.0],
            "alpha": [20.0],
            "beta": [150.0],
            "gamma": [1.21],
            "epsilon": [1.0]
        },
        "non_analytic": {
            "n": [-0.14874640856724],
            "a": [3.5],
            "b": [0.85],
            "B": [0.2],
            "C": [28.0],
            "D": [700.0],
            "A": [0.32],
            "beta": [0.3]
        }
    }
"#;

#[test]
fn from_record() -> Result<(), ParameterError> {
    let record: ParameterRecord = serde_json::from_str(RECORD)?;
    let parameters = ParameterSet::from_record(record)?;
    assert_eq!(parameters.ideal_gas().planck_einstein.len(), 2);
    assert_eq!(parameters.residual().len(), 2);
    assert_eq!(
        parameters.residual()[1],
        ResidualRecord::exponential(-0.66856572307965, 1, 4.0, 1)
    );
    assert_eq!(parameters.gaussian()[0].gamma, 1.21);
    assert_eq!(parameters.non_analytic()[0].bb, 0.2);
    assert_eq!(parameters.non_analytic()[0].dd, 700.0);
    assert_eq!(parameters.residual_terms(), 4);
    Ok(())
}

#[test]
fn critical_region_terms_are_optional() -> Result<(), ParameterError> {
    let mut record: ParameterRecord = serde_json::from_str(RECORD)?;
    record.gaussian = None;
    record.non_analytic = None;
    let parameters = ParameterSet::from_record(record)?;
    assert!(parameters.gaussian().is_empty());
    assert!(parameters.non_analytic().is_empty());
    Ok(())
}

#[test]
fn mismatching_column_lengths() -> Result<(), ParameterError> {
    let mut record: ParameterRecord = serde_json::from_str(RECORD)?;
    record.residual.t.pop();
    let error = ParameterSet::from_record(record).unwrap_err();
    assert!(matches!(error, ParameterError::IncompatibleParameters(_)));
    assert!(error.to_string().contains("residual"));
    Ok(())
}

#[test]
fn mismatching_planck_einstein_lengths() -> Result<(), ParameterError> {
    let mut record: ParameterRecord = serde_json::from_str(RECORD)?;
    record.ideal_gas.planck_einstein.gamma.push(7.74073708);
    assert!(ParameterSet::from_record(record).is_err());
    Ok(())
}

#[test]
fn missing_file() {
    let result = ParameterSet::from_json("does/not/exist.json");
    assert!(matches!(result, Err(ParameterError::FileIO(_))));
}
