//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{CacheStore, Database};
use crate::services::{ServiceContainer, Services};

/// Shared by every handler; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Backend checked by the health endpoint
    pub cache: Arc<dyn CacheStore>,
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the SeaORM-backed services over the given connection and cache.
    pub fn from_config(database: Arc<Database>, cache: Arc<dyn CacheStore>, config: Config) -> Self {
        let services = Arc::new(Services::from_connection(
            database.get_connection(),
            cache.clone(),
            config,
        ));

        Self::new(services, cache, database)
    }

    /// Build state around an existing service container.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        cache: Arc<dyn CacheStore>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            services,
            cache,
            database,
        }
    }
}
