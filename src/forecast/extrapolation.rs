use nalgebra::{DMatrix, DVector};

use super::regression::least_squares;
use super::ForecastError;
use crate::domain::TrendLine;

/// Least-squares line through `(year, value)` points.
pub fn fit_trend(years: &[i32], values: &[f64]) -> Result<TrendLine, ForecastError> {
    if years.len() != values.len() {
        return Err(ForecastError::DimensionMismatch {
            predictors: years.len(),
            targets: values.len(),
        });
    }
    if years.len() < 2 {
        return Err(ForecastError::InsufficientData {
            required: 2,
            actual: years.len(),
        });
    }
    if years.iter().all(|y| *y == years[0]) {
        return Err(ForecastError::NumericDegenerate(
            "trend undefined: all observations share one year".to_string(),
        ));
    }

    let x = DMatrix::from_fn(years.len(), 1, |i, _| f64::from(years[i]));
    let y = DVector::from_column_slice(values);
    let (beta, intercept) = least_squares(&x, &y)?;

    Ok(TrendLine {
        slope: beta[0],
        intercept,
    })
}

/// Annual slope expressed relative to the last observed value.
pub fn relative_slope(trend: &TrendLine, last_value: f64) -> Result<f64, ForecastError> {
    if last_value == 0.0 {
        return Err(ForecastError::NumericDegenerate(
            "growth rate undefined: last observed value is zero".to_string(),
        ));
    }
    Ok(trend.slope / last_value)
}
