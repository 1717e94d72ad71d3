//! Redis cache backend.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use super::CacheStore;
use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Number of keys requested per SCAN round trip
const SCAN_BATCH: usize = 200;

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis, returning an error instead of panicking.
    pub async fn try_connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        Ok(Self { connection })
    }

    /// Collect keys matching `pattern` with cursor-based SCAN.
    async fn scan(&self, pattern: &str) -> AppResult<Vec<String>> {
        let mut conn = self.connection.clone();
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(cache_error)?;

            keys.extend(batch);
            if next == 0 {
                return Ok(keys);
            }
            cursor = next;
        }
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.connection.clone();
        conn.get(key).await.map_err(cache_error)
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> AppResult<()> {
        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
            .map_err(cache_error)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await.map_err(cache_error)?;
        Ok(())
    }

    async fn incr(&self, key: &str) -> AppResult<i64> {
        let mut conn = self.connection.clone();
        conn.incr(key, 1).await.map_err(cache_error)
    }

    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        let keys = self.scan(&format!("{}*", prefix)).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection.clone();
        let deleted: u64 = conn.del(&keys).await.map_err(cache_error)?;
        Ok(deleted)
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }
}

/// Convert Redis error to AppError.
fn cache_error(e: RedisError) -> AppError {
    AppError::internal(format!("Cache error: {}", e))
}
