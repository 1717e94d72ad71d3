//! Cache layer.
//!
//! Services never write through the cache: they read from it, fall back to
//! the repositories, and invalidate after every mutation. A [`CacheStore`]
//! is a plain string key/value backend; [`EntityCache`] adds typed
//! per-entity keys on top of it.

mod entity;
mod memory;
mod redis_cache;

use async_trait::async_trait;
use std::sync::Arc;

pub use entity::{Cacheable, EntityCache, OrderCache, ProductCache, UserCache};
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;

use crate::config::{CacheBackend, Config};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Key/value backend behind the entity caches.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key` for `ttl_seconds`.
    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> AppResult<()>;

    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Atomically increment an integer counter, creating it at 1.
    async fn incr(&self, key: &str) -> AppResult<i64>;

    /// Delete every key starting with `prefix`; returns how many were removed.
    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64>;

    /// Connectivity check for the health endpoint.
    async fn ping(&self) -> AppResult<()>;
}

/// Cache that stores nothing; every read is a miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl CacheStore for NoopCache {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String, _ttl_seconds: u64) -> AppResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Ok(())
    }

    async fn incr(&self, _key: &str) -> AppResult<i64> {
        Ok(0)
    }

    async fn delete_prefix(&self, _prefix: &str) -> AppResult<u64> {
        Ok(0)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Build the configured cache backend.
pub async fn connect(config: &Config) -> AppResult<Arc<dyn CacheStore>> {
    match config.cache_backend {
        CacheBackend::Redis => {
            let cache = RedisCache::try_connect(config)
                .await
                .map_err(|e| AppError::internal(format!("Redis connection failed: {}", e)))?;
            tracing::info!("Redis cache connected");
            Ok(Arc::new(cache))
        }
        CacheBackend::Memory => {
            tracing::info!("Using in-process memory cache");
            Ok(Arc::new(MemoryCache::new()))
        }
        CacheBackend::Disabled => {
            tracing::info!("Cache disabled");
            Ok(Arc::new(NoopCache))
        }
    }
}
