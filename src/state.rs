use crate::config::settings::AppConfig;
use crate::infrastructure::encoder::Encoder;
use crate::infrastructure::fetch::SourceFetcher;
use crate::infrastructure::storage::ObjectStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub encoder: Arc<dyn Encoder>,
    pub fetcher: Arc<dyn SourceFetcher>,
    pub storage: Arc<dyn ObjectStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        encoder: Arc<dyn Encoder>,
        fetcher: Arc<dyn SourceFetcher>,
        storage: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            config,
            encoder,
            fetcher,
            storage,
        }
    }
}
