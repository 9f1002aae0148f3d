use super::{DataError, HistorySource};
use crate::domain::{ProvinceSeries, TimeSeriesRow};

/// Fixed rows held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistorySource {
    rows: Vec<TimeSeriesRow>,
}

impl InMemoryHistorySource {
    pub fn new(rows: Vec<TimeSeriesRow>) -> Self {
        Self { rows }
    }
}

impl HistorySource for InMemoryHistorySource {
    fn load_province(&self, province: &str) -> Result<Option<ProvinceSeries>, DataError> {
        let rows: Vec<TimeSeriesRow> = self
            .rows
            .iter()
            .filter(|r| r.province == province)
            .cloned()
            .collect();

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(ProvinceSeries::new(province, rows)?))
    }
}
