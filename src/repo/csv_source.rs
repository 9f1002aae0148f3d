use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use super::{DataError, HistorySource};
use crate::domain::{ProvinceSeries, TimeSeriesRow};

const COL_YEAR: &str = "Tahun";
const COL_PROVINCE: &str = "Nama Provinsi";
const COL_POPULATION: &str = "Jumlah Penduduk (juta)";
const COL_INCOME: &str = "Pendapatan (juta IDR/kapita/tahun)";
const COL_ENERGY: &str = "Konsumsi Energi (kkal/kap/hari)";

const REQUIRED_COLUMNS: [&str; 5] = [COL_YEAR, COL_PROVINCE, COL_POPULATION, COL_INCOME, COL_ENERGY];

#[derive(Debug, Deserialize)]
struct HistoryRecord {
    #[serde(rename = "Tahun")]
    year: i32,
    #[serde(rename = "Nama Provinsi")]
    province: String,
    #[serde(rename = "Jumlah Penduduk (juta)")]
    population: f64,
    #[serde(rename = "Pendapatan (juta IDR/kapita/tahun)")]
    income: f64,
    #[serde(rename = "Konsumsi Energi (kkal/kap/hari)")]
    energy_consumption: f64,
}

impl HistoryRecord {
    fn into_row(self) -> Result<TimeSeriesRow, DataError> {
        for (column, value) in [
            (COL_POPULATION, self.population),
            (COL_INCOME, self.income),
            (COL_ENERGY, self.energy_consumption),
        ] {
            if !value.is_finite() {
                return Err(DataError::InvalidValue { column, year: self.year });
            }
        }

        Ok(TimeSeriesRow {
            year: self.year,
            province: self.province,
            population: self.population,
            income: self.income,
            energy_consumption: self.energy_consumption,
        })
    }
}

/// Reads the history table from disk on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct CsvHistorySource {
    path: PathBuf,
}

impl CsvHistorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistorySource for CsvHistorySource {
    fn load_province(&self, province: &str) -> Result<Option<ProvinceSeries>, DataError> {
        let file = File::open(&self.path).map_err(|source| DataError::Io {
            path: self.path.clone(),
            source,
        })?;
        let rows = read_province_rows(file, province)?;
        debug!(path = %self.path.display(), province, rows = rows.len(), "history rows read");

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(ProvinceSeries::new(province, rows)?))
    }
}

/// Rows whose province column equals `province` exactly.
pub fn read_province_rows<R: Read>(reader: R, province: &str) -> Result<Vec<TimeSeriesRow>, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(DataError::MissingColumn((*missing).to_string()));
    }

    let mut rows = Vec::new();
    for record in rdr.deserialize::<HistoryRecord>() {
        let record = record?;
        if record.province == province {
            rows.push(record.into_row()?);
        }
    }
    Ok(rows)
}
