use std::sync::Arc;

use crate::config::Config;
use crate::forecast::ForecastService;
use crate::repo::{ProvinceCatalog, Repositories};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    /// Read-only after startup; `None` when the catalog failed to load.
    pub catalog: Option<Arc<ProvinceCatalog>>,
    pub forecasts: Arc<ForecastService>,
}

impl AppState {
    pub fn new(cfg: Config) -> Self {
        let repos = Repositories::new(&cfg.data);
        Self::from_repositories(cfg, repos)
    }

    pub fn from_repositories(cfg: Config, repos: Repositories) -> Self {
        let forecasts = Arc::new(ForecastService::from_config(repos.history, &cfg));
        Self {
            cfg: Arc::new(cfg),
            catalog: repos.catalog,
            forecasts,
        }
    }
}
