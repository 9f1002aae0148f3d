use serde::{Deserialize, Serialize};

/// Year-over-year relative growth of one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthResult {
    /// Arithmetic mean of `per_period_rates` (fractional, not percent)
    pub average_rate: f64,
    pub per_period_rates: Vec<f64>,
}

/// Predictor values for the forecast year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInputs {
    pub projected_population: f64,
    pub projected_income: f64,
}

/// In-sample fit quality of a regression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitMetrics {
    pub mean_squared_error: f64,
    pub root_mean_squared_error: f64,
    pub mean_absolute_error: f64,
    /// Coefficient of determination
    pub r_squared: f64,
    pub sample_count: usize,
}

/// A rendered chart, base64-encoded for JSON transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedChart(pub String);

impl EncodedChart {
    pub fn from_png(bytes: &[u8]) -> Self {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        Self(STANDARD.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Which optional parts of a forecast to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForecastOptions {
    pub include_chart: bool,
    pub include_metrics: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub province: String,
    pub target_year: i32,
    pub projected_population: f64,
    pub projected_income: f64,
    pub predicted_energy_consumption: f64,
    pub average_growth_population: f64,
    pub average_growth_income: f64,
    pub fit_metrics: Option<FitMetrics>,
    pub chart: Option<EncodedChart>,
}

/// Least-squares line `value = slope * year + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn value_at(&self, year: f64) -> f64 {
        self.slope * year + self.intercept
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrapolationResult {
    pub province: String,
    pub target_year: i32,
    pub predicted_energy_consumption: f64,
    /// Slope relative to the last observed value
    pub growth_rate: f64,
    pub trend: TrendLine,
    pub chart: Option<EncodedChart>,
}
