//! Ordinary least squares with intercept.
//!
//! Inputs are centred on their means and the centred system is solved with an
//! SVD. Singular values below `eps * max(n, p) * σ_max` are dropped, which
//! yields the minimum-norm solution when the system is rank deficient (e.g.
//! fewer observations than predictors + 1). The intercept is recovered as
//! `mean(y) - mean(x)·β`.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ForecastError;
use crate::domain::FitMetrics;

/// Energy consumption as a linear function of population and income.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    pub intercept: f64,
    pub coef_population: f64,
    pub coef_income: f64,
}

impl FittedModel {
    pub fn fit(predictors: &[[f64; 2]], targets: &[f64]) -> Result<Self, ForecastError> {
        let x = DMatrix::from_fn(predictors.len(), 2, |i, j| predictors[i][j]);
        let y = DVector::from_column_slice(targets);

        if predictors.len() < 3 {
            warn!(
                rows = predictors.len(),
                "regression is under-determined; coefficients carry no statistical meaning"
            );
        }

        let (beta, intercept) = least_squares(&x, &y)?;
        Ok(Self {
            intercept,
            coef_population: beta[0],
            coef_income: beta[1],
        })
    }

    pub fn predict(&self, population: f64, income: f64) -> f64 {
        self.intercept + self.coef_population * population + self.coef_income * income
    }

    /// In-sample fit quality over the given rows.
    pub fn evaluate(&self, predictors: &[[f64; 2]], targets: &[f64]) -> Result<FitMetrics, ForecastError> {
        let predicted: Vec<f64> = predictors.iter().map(|[p, i]| self.predict(*p, *i)).collect();
        FitMetrics::calculate(targets, &predicted)
    }
}

/// Solve `y ≈ Xβ + b` and return `(β, b)`.
pub(crate) fn least_squares(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
) -> Result<(DVector<f64>, f64), ForecastError> {
    let (n, p) = x.shape();
    if n != y.len() {
        return Err(ForecastError::DimensionMismatch {
            predictors: n,
            targets: y.len(),
        });
    }
    if n == 0 {
        return Err(ForecastError::InsufficientData { required: 1, actual: 0 });
    }

    let x_mean: Vec<f64> = (0..p).map(|j| x.column(j).mean()).collect();
    let y_mean = y.mean();
    let xc = DMatrix::from_fn(n, p, |i, j| x[(i, j)] - x_mean[j]);
    let yc = y.map(|v| v - y_mean);

    let svd = xc.svd(true, true);
    let sigma_max = svd.singular_values.iter().cloned().fold(0.0_f64, f64::max);
    let tolerance = (f64::EPSILON * n.max(p) as f64 * sigma_max).max(f64::MIN_POSITIVE);
    let beta = svd
        .solve(&yc, tolerance)
        .map_err(|e| ForecastError::NumericDegenerate(e.to_string()))?;

    let intercept = y_mean - x_mean.iter().zip(beta.iter()).map(|(m, b)| m * b).sum::<f64>();

    if !intercept.is_finite() || beta.iter().any(|b| !b.is_finite()) {
        return Err(ForecastError::NumericDegenerate(
            "least squares produced non-finite coefficients".to_string(),
        ));
    }

    Ok((beta, intercept))
}
