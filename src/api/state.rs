use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::{Config, StoreBackend};
use crate::db::{FileStore, MemoryStore, PreferenceStore, RedisStore, StoreAdapter};
use crate::services::{
    Catalog, EngineOptions, Notifier, PreferenceEngine, StaticCatalog, SystemClock,
};

use super::SessionGate;

/// Shared context handed to every consumer
///
/// Engine operations run to completion while the write lock is held, so
/// mutations are applied one at a time in the order they are dispatched.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<PreferenceEngine>>,
    pub catalog: Arc<dyn Catalog>,
    pub session: Arc<dyn SessionGate>,
    pub notifier: Notifier,
    /// Maximum titles per recommendation row
    pub recommendation_limit: usize,
}

impl AppState {
    /// Wraps an already hydrated engine
    pub fn new(
        engine: PreferenceEngine,
        catalog: Arc<dyn Catalog>,
        session: Arc<dyn SessionGate>,
    ) -> Self {
        let notifier = engine.notifier().clone();
        Self {
            engine: Arc::new(RwLock::new(engine)),
            catalog,
            session,
            notifier,
            recommendation_limit: 8,
        }
    }

    pub fn with_recommendation_limit(mut self, limit: usize) -> Self {
        self.recommendation_limit = limit;
        self
    }

    /// Builds the store, catalog and engine described by `config`
    pub fn from_config(config: &Config, session: Arc<dyn SessionGate>) -> anyhow::Result<Self> {
        let store: Arc<dyn PreferenceStore> = match config.store_backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::File => Arc::new(FileStore::new(&config.store_dir)),
            StoreBackend::Redis => Arc::new(RedisStore::connect(&config.redis_url)?),
        };
        tracing::info!(backend = store.name(), "Preference store selected");

        let mut adapter = StoreAdapter::new(store);
        if let Some(namespace) = &config.profile_namespace {
            adapter = adapter.with_namespace(namespace.clone());
        }

        let catalog = match &config.catalog_path {
            Some(path) => StaticCatalog::from_path(path)
                .map_err(|e| anyhow::anyhow!("Failed to load catalog {}: {}", path, e))?,
            None => StaticCatalog::default(),
        };

        let engine = PreferenceEngine::hydrate(
            adapter,
            Notifier::new(),
            Arc::new(SystemClock),
            EngineOptions {
                mirror_likes_and_list: config.mirror_likes_and_list,
            },
        );

        Ok(Self::new(engine, Arc::new(catalog), session)
            .with_recommendation_limit(config.recommendation_limit))
    }
}
