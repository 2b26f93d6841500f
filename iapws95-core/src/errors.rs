use crate::parameter::ParameterError;
use thiserror::Error;

/// Error type for improperly defined states and convergence problems.
#[derive(Error, Debug)]
pub enum EosError {
    #[error("{0}")]
    Error(String),
    #[error("`{0}` did not converge within the maximum number of iterations.")]
    NotConverged(String),
    #[error("Invalid state in {0}: {1} = {2}.")]
    InvalidState(String, String, f64),
    #[error(transparent)]
    ParameterError(#[from] ParameterError),
    #[error(transparent)]
    ShapeError(#[from] ndarray::ShapeError),
    #[cfg(feature = "rayon")]
    #[error(transparent)]
    RayonError(#[from] rayon::ThreadPoolBuildError),
}

/// Convenience type for `Result<T, EosError>`.
pub type EosResult<T> = Result<T, EosError>;
