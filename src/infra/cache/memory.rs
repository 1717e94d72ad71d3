//! In-process cache backend for single-instance deployments and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::CacheStore;
use crate::errors::{AppError, AppResult};

/// Expired entries are swept from the map once every this many writes.
const SWEEP_INTERVAL: u64 = 256;

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
    writes: AtomicU64,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Count a write and, every `SWEEP_INTERVAL` writes, drop expired entries.
    fn after_write(&self, entries: &mut HashMap<String, Entry>) {
        let writes = self.writes.fetch_add(1, Ordering::Relaxed) + 1;
        if writes % SWEEP_INTERVAL == 0 {
            let now = Instant::now();
            let before = entries.len();
            entries.retain(|_, entry| entry.is_live(now));
            tracing::debug!(removed = before - entries.len(), "Memory cache swept");
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // Expired: drop it unless another writer refreshed it meanwhile
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> AppResult<()> {
        let entry = Entry {
            value,
            expires_at: Some(Instant::now() + Duration::from_secs(ttl_seconds)),
        };
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), entry);
        self.after_write(&mut entries);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn incr(&self, key: &str) -> AppResult<i64> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let current = match entries.get(key).filter(|entry| entry.is_live(now)) {
            Some(entry) => entry
                .value
                .parse::<i64>()
                .map_err(|_| AppError::internal(format!("Cache key {} is not a counter", key)))?,
            None => 0,
        };

        let next = current + 1;
        entries.insert(
            key.to_string(),
            Entry {
                value: next.to_string(),
                expires_at: None,
            },
        );
        self.after_write(&mut entries);
        Ok(next)
    }

    async fn delete_prefix(&self, prefix: &str) -> AppResult<u64> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok((before - entries.len()) as u64)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
