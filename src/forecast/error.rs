use thiserror::Error;

use crate::chart::ChartError;
use crate::repo::DataError;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no data for province '{0}'")]
    NotFound(String),

    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("numerically degenerate: {0}")]
    NumericDegenerate(String),

    #[error("dimension mismatch: {predictors} predictor rows, {targets} targets")]
    DimensionMismatch { predictors: usize, targets: usize },

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}
