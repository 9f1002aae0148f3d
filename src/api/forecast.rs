use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::error::ApiError,
    domain::{EncodedChart, ExtrapolationResult, ForecastOptions, ForecastResult},
    state::AppState,
};

const REGRESSION_MESSAGE: &str = "Berhasil menghitung regresi linear";
const EXTRAPOLATION_MESSAGE: &str = "Berhasil menghitung prediksi dengan metode ekstrapolasi linear";

/// Body of both forecast endpoints
#[derive(Debug, Deserialize, Validate)]
pub struct ProvinceRequest {
    #[validate(length(min = 1))]
    pub provinsi: String,
}

/// Per-request overrides of the configured defaults
#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    pub chart: Option<bool>,
    pub metrics: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RegressionResponse {
    pub message: &'static str,
    /// Predicted energy consumption (kkal/kap/hari)
    pub data: f64,
    pub provinsi: String,
    pub penduduk_2024: f64,
    pub pendapatan_2024: f64,
    pub growth_penduduk: f64,
    pub growth_pendapatan: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<EncodedChart>,
    /// In-sample mean squared error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub galat: Option<f64>,
    /// In-sample R²
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accurate: Option<f64>,
}

impl From<ForecastResult> for RegressionResponse {
    fn from(r: ForecastResult) -> Self {
        Self {
            message: REGRESSION_MESSAGE,
            data: r.predicted_energy_consumption,
            provinsi: r.province,
            penduduk_2024: r.projected_population,
            pendapatan_2024: r.projected_income,
            growth_penduduk: r.average_growth_population,
            growth_pendapatan: r.average_growth_income,
            plot: r.chart,
            galat: r.fit_metrics.map(|m| m.mean_squared_error),
            accurate: r.fit_metrics.map(|m| m.r_squared),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExtrapolationResponse {
    pub message: &'static str,
    pub data: f64,
    pub provinsi: String,
    pub growth_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<EncodedChart>,
}

impl From<ExtrapolationResult> for ExtrapolationResponse {
    fn from(r: ExtrapolationResult) -> Self {
        Self {
            message: EXTRAPOLATION_MESSAGE,
            data: r.predicted_energy_consumption,
            provinsi: r.province,
            growth_rate: r.growth_rate,
            plot: r.chart,
        }
    }
}

/// POST /api/linearregression - Multivariate regression forecast
pub async fn linear_regression(
    State(st): State<AppState>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
    payload: Result<Json<ProvinceRequest>, JsonRejection>,
) -> Result<Json<RegressionResponse>, ApiError> {
    let Query(query) = query?;
    let Json(req) = payload?;
    req.validate()?;

    let options = ForecastOptions {
        include_chart: query.chart.unwrap_or(st.cfg.forecast.include_chart),
        include_metrics: query.metrics.unwrap_or(st.cfg.forecast.include_metrics),
    };
    let service = st.forecasts.clone();
    let result =
        tokio::task::spawn_blocking(move || service.forecast_for_province(&req.provinsi, options))
            .await??;

    Ok(Json(result.into()))
}

/// POST /api/extrapolation - Straight-line trend over years
pub async fn extrapolation(
    State(st): State<AppState>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
    payload: Result<Json<ProvinceRequest>, JsonRejection>,
) -> Result<Json<ExtrapolationResponse>, ApiError> {
    let Query(query) = query?;
    let Json(req) = payload?;
    req.validate()?;

    let include_chart = query.chart.unwrap_or(st.cfg.forecast.include_chart);
    let service = st.forecasts.clone();
    let result =
        tokio::task::spawn_blocking(move || service.extrapolate_for_province(&req.provinsi, include_chart))
            .await??;

    Ok(Json(result.into()))
}
