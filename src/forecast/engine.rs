use std::sync::Arc;

use tracing::{info, warn};

use super::{compute_average_growth, fit_trend, project_next, relative_slope, FittedModel, ForecastError};
use crate::chart::ChartRenderer;
use crate::config::Config;
use crate::domain::{
    EncodedChart, ExtrapolationResult, ForecastOptions, ForecastResult, ProjectionInputs,
    ProvinceSeries,
};
use crate::repo::HistorySource;

/// Builds one-year-ahead energy consumption forecasts for a province.
///
/// Every call loads the province's rows afresh and fits its own model;
/// nothing is shared between calls.
pub struct ForecastService {
    history: Arc<dyn HistorySource>,
    renderer: ChartRenderer,
    target_year: i32,
}

impl ForecastService {
    pub fn new(history: Arc<dyn HistorySource>, renderer: ChartRenderer, target_year: i32) -> Self {
        Self {
            history,
            renderer,
            target_year,
        }
    }

    pub fn from_config(history: Arc<dyn HistorySource>, cfg: &Config) -> Self {
        Self::new(
            history,
            ChartRenderer::from_config(&cfg.chart),
            cfg.forecast.target_year,
        )
    }

    /// Growth projection of population and income followed by a two-predictor
    /// linear regression of energy consumption.
    pub fn forecast_for_province(
        &self,
        province: &str,
        options: ForecastOptions,
    ) -> Result<ForecastResult, ForecastError> {
        let series = self.load_series(province)?;

        let growth_population = compute_average_growth(&series.populations())?;
        let growth_income = compute_average_growth(&series.incomes())?;

        let last = series.last();
        self.check_horizon(last.year);
        let projection = ProjectionInputs {
            projected_population: project_next(last.population, growth_population.average_rate),
            projected_income: project_next(last.income, growth_income.average_rate),
        };

        let predictors = series.predictors();
        let targets = series.energy_consumption();
        let model = FittedModel::fit(&predictors, &targets)?;
        let predicted = model.predict(projection.projected_population, projection.projected_income);
        if !predicted.is_finite() {
            return Err(ForecastError::NumericDegenerate(
                "prediction is not finite".to_string(),
            ));
        }

        info!(
            province = series.province(),
            target_year = self.target_year,
            growth_population_pct = growth_population.average_rate * 100.0,
            growth_income_pct = growth_income.average_rate * 100.0,
            projected_population = projection.projected_population,
            projected_income = projection.projected_income,
            predicted_energy_consumption = predicted,
            "regression forecast computed"
        );

        let fit_metrics = if options.include_metrics {
            Some(model.evaluate(&predictors, &targets)?)
        } else {
            None
        };

        let chart = if options.include_chart {
            let png = self.renderer.render_series_with_prediction(
                series.province(),
                &series.energy_points(),
                (self.target_year, predicted),
            )?;
            Some(EncodedChart::from_png(&png))
        } else {
            None
        };

        Ok(ForecastResult {
            province: series.province().to_string(),
            target_year: self.target_year,
            projected_population: projection.projected_population,
            projected_income: projection.projected_income,
            predicted_energy_consumption: predicted,
            average_growth_population: growth_population.average_rate,
            average_growth_income: growth_income.average_rate,
            fit_metrics,
            chart,
        })
    }

    /// Straight-line trend of energy consumption over years, evaluated at the
    /// target year. Independent of the regression model.
    pub fn extrapolate_for_province(
        &self,
        province: &str,
        include_chart: bool,
    ) -> Result<ExtrapolationResult, ForecastError> {
        let series = self.load_series(province)?;
        let values = series.energy_consumption();

        let trend = fit_trend(&series.years(), &values)?;
        let predicted = trend.value_at(f64::from(self.target_year));
        let growth_rate = relative_slope(&trend, series.last().energy_consumption)?;

        info!(
            province = series.province(),
            target_year = self.target_year,
            slope = trend.slope,
            growth_rate,
            predicted_energy_consumption = predicted,
            "trend extrapolation computed"
        );

        let chart = if include_chart {
            let png = self.renderer.render_trend(
                series.province(),
                &series.energy_points(),
                &trend,
                (self.target_year, predicted),
            )?;
            Some(EncodedChart::from_png(&png))
        } else {
            None
        };

        Ok(ExtrapolationResult {
            province: series.province().to_string(),
            target_year: self.target_year,
            predicted_energy_consumption: predicted,
            growth_rate,
            trend,
            chart,
        })
    }

    /// Names are matched exactly; only an all-blank name is rejected up front.
    fn load_series(&self, province: &str) -> Result<ProvinceSeries, ForecastError> {
        if province.trim().is_empty() {
            return Err(ForecastError::InvalidInput("province name is blank".to_string()));
        }

        self.history
            .load_province(province)?
            .ok_or_else(|| ForecastError::NotFound(province.to_string()))
    }

    fn check_horizon(&self, last_year: i32) {
        if self.target_year != last_year + 1 {
            warn!(
                last_year,
                target_year = self.target_year,
                "projection covers one step past the last observation but is labelled with the configured target year"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeSeriesRow;
    use crate::repo::InMemoryHistorySource;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn row(province: &str, year: i32, population: f64, income: f64, energy: f64) -> TimeSeriesRow {
        TimeSeriesRow {
            year,
            province: province.to_string(),
            population,
            income,
            energy_consumption: energy,
        }
    }

    /// Population grows 10%, income 5%, energy = 50 + 3p + 2i exactly.
    fn service() -> ForecastService {
        let energy = |p: f64, i: f64| 50.0 + 3.0 * p + 2.0 * i;
        let rows = vec![
            row("Maluku", 2021, 10.0, 100.0, energy(10.0, 100.0)),
            row("Maluku", 2022, 11.0, 105.0, energy(11.0, 105.0)),
            row("Maluku", 2023, 12.1, 110.25, energy(12.1, 110.25)),
            row("Riau", 2023, 6.5, 90.0, 2100.0),
            row("Flat", 2021, 1.0, 10.0, 500.0),
            row("Flat", 2022, 2.0, 12.0, 500.0),
            row("Flat", 2023, 3.0, 15.0, 500.0),
            row("Ghost", 2022, 0.0, 10.0, 400.0),
            row("Ghost", 2023, 1.0, 11.0, 410.0),
        ];
        ForecastService::new(
            Arc::new(InMemoryHistorySource::new(rows)),
            ChartRenderer::new(400, 300),
            2024,
        )
    }

    #[test]
    fn forecast_projects_and_predicts() {
        let result = service()
            .forecast_for_province("Maluku", ForecastOptions::default())
            .unwrap();

        assert_eq!(result.province, "Maluku");
        assert_eq!(result.target_year, 2024);
        assert_relative_eq!(result.average_growth_population, 0.10, epsilon = 1e-12);
        assert_relative_eq!(result.average_growth_income, 0.05, epsilon = 1e-12);
        assert_relative_eq!(result.projected_population, 13.31, epsilon = 1e-9);
        assert_relative_eq!(result.projected_income, 115.7625, epsilon = 1e-9);
        assert_relative_eq!(
            result.predicted_energy_consumption,
            50.0 + 3.0 * 13.31 + 2.0 * 115.7625,
            epsilon = 1e-6
        );
        assert!(result.fit_metrics.is_none());
        assert!(result.chart.is_none());
    }

    #[test]
    fn metrics_are_in_sample() {
        let options = ForecastOptions { include_chart: false, include_metrics: true };
        let metrics = service()
            .forecast_for_province("Maluku", options)
            .unwrap()
            .fit_metrics
            .unwrap();

        assert_eq!(metrics.sample_count, 3);
        assert_relative_eq!(metrics.r_squared, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn chart_is_attached_when_requested() {
        let options = ForecastOptions { include_chart: true, include_metrics: false };
        let chart = service()
            .forecast_for_province("Maluku", options)
            .unwrap()
            .chart
            .unwrap();
        assert!(chart.as_str().starts_with("iVBORw0KGgo"));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_province_is_invalid_input(#[case] province: &str) {
        let err = service()
            .forecast_for_province(province, ForecastOptions::default())
            .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidInput(_)));
    }

    #[test]
    fn unknown_province_is_not_found() {
        let err = service()
            .forecast_for_province("Atlantis", ForecastOptions::default())
            .unwrap_err();
        assert!(matches!(err, ForecastError::NotFound(p) if p == "Atlantis"));
    }

    #[test]
    fn padded_name_does_not_match() {
        let err = service()
            .forecast_for_province(" Maluku ", ForecastOptions::default())
            .unwrap_err();
        assert!(matches!(err, ForecastError::NotFound(p) if p == " Maluku "));
    }

    #[test]
    fn single_row_is_insufficient() {
        let err = service()
            .forecast_for_province("Riau", ForecastOptions::default())
            .unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientData { required: 2, actual: 1 }));
    }

    #[test]
    fn zero_population_is_degenerate() {
        let err = service()
            .forecast_for_province("Ghost", ForecastOptions::default())
            .unwrap_err();
        assert!(matches!(err, ForecastError::NumericDegenerate(_)));
    }

    #[test]
    fn constant_target_blocks_metrics_only() {
        let svc = service();
        let plain = svc.forecast_for_province("Flat", ForecastOptions::default()).unwrap();
        assert_relative_eq!(plain.predicted_energy_consumption, 500.0, epsilon = 1e-9);

        let options = ForecastOptions { include_chart: false, include_metrics: true };
        let err = svc.forecast_for_province("Flat", options).unwrap_err();
        assert!(matches!(err, ForecastError::NumericDegenerate(_)));
    }

    #[test]
    fn extrapolation_follows_year_trend() {
        let rows = (2018..=2023)
            .map(|y| row("Bali", y, 4.0, 50.0, 2000.0 + 10.0 * f64::from(y - 2018)))
            .collect();
        let svc = ForecastService::new(
            Arc::new(InMemoryHistorySource::new(rows)),
            ChartRenderer::new(400, 300),
            2024,
        );

        let result = svc.extrapolate_for_province("Bali", false).unwrap();
        assert_relative_eq!(result.trend.slope, 10.0, epsilon = 1e-9);
        assert_relative_eq!(result.predicted_energy_consumption, 2060.0, epsilon = 1e-6);
        assert_relative_eq!(result.growth_rate, 10.0 / 2050.0, epsilon = 1e-12);
        assert!(result.chart.is_none());
    }

    #[test]
    fn extrapolation_needs_two_years() {
        let err = service().extrapolate_for_province("Riau", false).unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientData { .. }));
    }
}
