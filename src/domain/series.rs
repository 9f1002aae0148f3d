use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One year of observations for one province.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRow {
    pub year: i32,
    pub province: String,
    /// Population in millions
    pub population: f64,
    /// Income in million IDR per capita per year
    pub income: f64,
    /// Energy consumption in kcal per capita per day
    pub energy_consumption: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("no rows for province '{0}'")]
    Empty(String),

    #[error("province '{province}' has more than one row for year {year}")]
    DuplicateYear { province: String, year: i32 },
}

/// Rows of a single province, ordered by year ascending with no repeated year.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceSeries {
    province: String,
    rows: Vec<TimeSeriesRow>,
}

impl ProvinceSeries {
    pub fn new(province: impl Into<String>, mut rows: Vec<TimeSeriesRow>) -> Result<Self, SeriesError> {
        let province = province.into();
        if rows.is_empty() {
            return Err(SeriesError::Empty(province));
        }

        rows.sort_by_key(|r| r.year);
        if let Some(pair) = rows.windows(2).find(|w| w[0].year == w[1].year) {
            return Err(SeriesError::DuplicateYear {
                province,
                year: pair[1].year,
            });
        }

        Ok(Self { province, rows })
    }

    pub fn province(&self) -> &str {
        &self.province
    }

    pub fn last(&self) -> &TimeSeriesRow {
        &self.rows[self.rows.len() - 1]
    }

    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().map(|r| r.year).collect()
    }

    pub fn populations(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.population).collect()
    }

    pub fn incomes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.income).collect()
    }

    pub fn energy_consumption(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.energy_consumption).collect()
    }

    /// (population, income) predictor pairs in year order.
    pub fn predictors(&self) -> Vec<[f64; 2]> {
        self.rows.iter().map(|r| [r.population, r.income]).collect()
    }

    /// (year, energy consumption) points for charting.
    pub fn energy_points(&self) -> Vec<(i32, f64)> {
        self.rows.iter().map(|r| (r.year, r.energy_consumption)).collect()
    }
}
