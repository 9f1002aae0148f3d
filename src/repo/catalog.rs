use std::fs::File;
use std::io::Read;
use std::path::Path;

use itertools::Itertools;

use super::DataError;

const PROVINCE_COLUMN: &str = "provinsi";

/// Distinct province names of the primary dataset, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvinceCatalog {
    provinces: Vec<String>,
}

impl ProvinceCatalog {
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let idx = rdr
            .headers()?
            .iter()
            .position(|h| h == PROVINCE_COLUMN)
            .ok_or_else(|| DataError::MissingColumn(PROVINCE_COLUMN.to_string()))?;

        let mut names = Vec::new();
        for record in rdr.records() {
            let record = record?;
            if let Some(name) = record.get(idx).filter(|n| !n.is_empty()) {
                names.push(name.to_string());
            }
        }

        Ok(Self::from_names(names))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            provinces: names.into_iter().map(Into::into).unique().collect(),
        }
    }

    pub fn provinces(&self) -> &[String] {
        &self.provinces
    }

    pub fn len(&self) -> usize {
        self.provinces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }
}
