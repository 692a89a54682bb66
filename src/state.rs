use crate::config::AppConfig;
use crate::db;
use crate::repo::{MemoryRepository, PgRepository, Repository};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = db::connect(&config).await?;
        let repo = Arc::new(PgRepository::new(pool)) as Arc<dyn Repository>;
        Ok(Self { repo, config })
    }

    pub fn from_parts(repo: Arc<dyn Repository>, config: Arc<AppConfig>) -> Self {
        Self { repo, config }
    }

    /// In-memory store and fixed test config.
    pub fn fake() -> Self {
        Self::from_parts(
            Arc::new(MemoryRepository::new()),
            Arc::new(AppConfig::for_tests()),
        )
    }
}
