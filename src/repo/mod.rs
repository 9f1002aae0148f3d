pub mod catalog;
pub mod csv_source;
pub mod memory;

pub use catalog::ProvinceCatalog;
pub use csv_source::CsvHistorySource;
pub use memory::InMemoryHistorySource;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::config::DataConfig;
use crate::domain::{ProvinceSeries, SeriesError};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("non-finite {column} for year {year}")]
    InvalidValue { column: &'static str, year: i32 },

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Per-province historical rows.
pub trait HistorySource: Send + Sync {
    /// `Ok(None)` when the province has no rows.
    fn load_province(&self, province: &str) -> Result<Option<ProvinceSeries>, DataError>;
}

pub struct Repositories {
    /// `None` when the startup load failed.
    pub catalog: Option<Arc<ProvinceCatalog>>,
    pub history: Arc<dyn HistorySource>,
}

impl Repositories {
    pub fn new(cfg: &DataConfig) -> Self {
        let catalog = match ProvinceCatalog::load(&cfg.catalog_path) {
            Ok(catalog) => {
                info!(
                    path = %cfg.catalog_path.display(),
                    provinces = catalog.len(),
                    "province catalog loaded"
                );
                Some(Arc::new(catalog))
            }
            Err(e) => {
                error!(path = %cfg.catalog_path.display(), error = %e, "failed to load province catalog");
                None
            }
        };

        Self {
            catalog,
            history: Arc::new(CsvHistorySource::new(cfg.history_path.clone())),
        }
    }

    pub fn with_sources(catalog: Option<ProvinceCatalog>, history: Arc<dyn HistorySource>) -> Self {
        Self {
            catalog: catalog.map(Arc::new),
            history,
        }
    }
}
