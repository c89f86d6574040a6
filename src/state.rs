use std::sync::Arc;

use crate::{config::Config, database::init_mongo, flash::FlashStore, store::ContactStore};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ContactStore>,
    pub flash: FlashStore,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();
        let store = init_mongo(&config.mongo_url, &config.mongo_db).await;
        Self::with_store(config, store)
    }

    /// Assembles state around any store implementation; the test suite runs
    /// the full router over the in-memory one.
    pub fn with_store(config: Config, store: Arc<dyn ContactStore>) -> Arc<Self> {
        Arc::new(Self {
            flash: FlashStore::new(config.flash_ttl),
            config,
            store,
        })
    }
}
