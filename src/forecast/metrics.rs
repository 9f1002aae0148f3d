//! Fit-quality metrics
//!
//! In-sample error measures for a fitted model: MSE, RMSE, MAE and R².
//! R² is refused rather than reported as NaN when the targets carry no
//! variance.

use std::fmt;

use super::ForecastError;
use crate::domain::FitMetrics;

impl FitMetrics {
    /// Calculate metrics from actual and predicted values
    pub fn calculate(actual: &[f64], predicted: &[f64]) -> Result<Self, ForecastError> {
        if actual.len() != predicted.len() {
            return Err(ForecastError::DimensionMismatch {
                predictors: predicted.len(),
                targets: actual.len(),
            });
        }

        if actual.is_empty() {
            return Err(ForecastError::InsufficientData { required: 1, actual: 0 });
        }

        let n = actual.len() as f64;
        let residuals: Vec<f64> = actual.iter().zip(predicted).map(|(a, p)| a - p).collect();

        let ss_res: f64 = residuals.iter().map(|e| e * e).sum();
        let mean_squared_error = ss_res / n;
        let mean_absolute_error = residuals.iter().map(|e| e.abs()).sum::<f64>() / n;

        let mean_actual = actual.iter().sum::<f64>() / n;
        let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();
        // Spread at or below rounding noise of the mean counts as none.
        if ss_tot <= f64::EPSILON * n * mean_actual.powi(2) {
            return Err(ForecastError::NumericDegenerate(
                "R² undefined: targets have zero variance".to_string(),
            ));
        }

        Ok(FitMetrics {
            mean_squared_error,
            root_mean_squared_error: mean_squared_error.sqrt(),
            mean_absolute_error,
            r_squared: 1.0 - ss_res / ss_tot,
            sample_count: actual.len(),
        })
    }
}

impl fmt::Display for FitMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Metrics: MSE={:.3}, RMSE={:.3}, MAE={:.3}, R²={:.3}, n={}",
            self.mean_squared_error,
            self.root_mean_squared_error,
            self.mean_absolute_error,
            self.r_squared,
            self.sample_count
        )
    }
}
