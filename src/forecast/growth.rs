use super::ForecastError;
use crate::domain::GrowthResult;

/// Average year-over-year relative growth of a chronologically ordered series.
///
/// Each period contributes `(v[i] - v[i-1]) / v[i-1]`; the average is the
/// plain arithmetic mean of those rates.
pub fn compute_average_growth(series: &[f64]) -> Result<GrowthResult, ForecastError> {
    if series.len() < 2 {
        return Err(ForecastError::InsufficientData {
            required: 2,
            actual: series.len(),
        });
    }

    let mut per_period_rates = Vec::with_capacity(series.len() - 1);
    for (i, pair) in series.windows(2).enumerate() {
        let (prev, curr) = (pair[0], pair[1]);
        if prev == 0.0 {
            return Err(ForecastError::NumericDegenerate(format!(
                "growth undefined at period {}: previous value is zero",
                i + 1
            )));
        }
        let rate = (curr - prev) / prev;
        if !rate.is_finite() {
            return Err(ForecastError::NumericDegenerate(format!(
                "growth at period {} is not finite",
                i + 1
            )));
        }
        per_period_rates.push(rate);
    }

    let average_rate = per_period_rates.iter().sum::<f64>() / per_period_rates.len() as f64;
    Ok(GrowthResult {
        average_rate,
        per_period_rates,
    })
}

/// Single-step compounded projection. Negative results pass through.
pub fn project_next(last_value: f64, growth_rate: f64) -> f64 {
    last_value * (1.0 + growth_rate)
}
