//! Typed cache-aside helpers per entity type.
//!
//! Item keys are `<entity>:<id>`. List pages live under
//! `<entities>:v<version>:<offset>:<limit>`; `<entities>:version` is bumped to
//! invalidate every page at once, and stale pages age out through their TTL.
//!
//! Backend and serialization failures are logged and treated as misses.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use super::CacheStore;
use crate::config::{
    CACHE_LIST_VERSION_KEY, CACHE_PREFIX_ORDER, CACHE_PREFIX_ORDER_LIST, CACHE_PREFIX_PRODUCT,
    CACHE_PREFIX_PRODUCT_LIST, CACHE_PREFIX_USER, CACHE_PREFIX_USER_LIST,
};
use crate::domain::{Order, Product, User};

/// An entity that can be stored in an [`EntityCache`].
pub trait Cacheable: Serialize + DeserializeOwned + Send + Sync + 'static {
    const ITEM_PREFIX: &'static str;
    const LIST_PREFIX: &'static str;

    fn cache_id(&self) -> &str;
}

impl Cacheable for User {
    const ITEM_PREFIX: &'static str = CACHE_PREFIX_USER;
    const LIST_PREFIX: &'static str = CACHE_PREFIX_USER_LIST;

    fn cache_id(&self) -> &str {
        &self.id
    }
}

impl Cacheable for Product {
    const ITEM_PREFIX: &'static str = CACHE_PREFIX_PRODUCT;
    const LIST_PREFIX: &'static str = CACHE_PREFIX_PRODUCT_LIST;

    fn cache_id(&self) -> &str {
        &self.id
    }
}

impl Cacheable for Order {
    const ITEM_PREFIX: &'static str = CACHE_PREFIX_ORDER;
    const LIST_PREFIX: &'static str = CACHE_PREFIX_ORDER_LIST;

    fn cache_id(&self) -> &str {
        &self.id
    }
}

pub type UserCache = EntityCache<User>;
pub type ProductCache = EntityCache<Product>;
pub type OrderCache = EntityCache<Order>;

pub struct EntityCache<T> {
    store: Arc<dyn CacheStore>,
    ttl_seconds: u64,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for EntityCache<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            ttl_seconds: self.ttl_seconds,
            _entity: PhantomData,
        }
    }
}

impl<T: Cacheable> EntityCache<T> {
    pub fn new(store: Arc<dyn CacheStore>, ttl_seconds: u64) -> Self {
        Self {
            store,
            ttl_seconds,
            _entity: PhantomData,
        }
    }

    fn item_key(id: &str) -> String {
        format!("{}{}", T::ITEM_PREFIX, id)
    }

    fn version_key() -> String {
        format!("{}{}", T::LIST_PREFIX, CACHE_LIST_VERSION_KEY)
    }

    fn list_key(version: i64, offset: u64, limit: u64) -> String {
        format!("{}v{}:{}:{}", T::LIST_PREFIX, version, offset, limit)
    }

    /// Current list generation; `None` when the backend cannot be read.
    async fn list_version(&self) -> Option<i64> {
        match self.store.get(&Self::version_key()).await {
            Ok(Some(raw)) => raw.parse().ok().or(Some(0)),
            Ok(None) => Some(0),
            Err(e) => {
                tracing::warn!(error = %e, key = %Self::version_key(), "Cache read failed");
                None
            }
        }
    }

    async fn read<V: DeserializeOwned>(&self, key: &str) -> Option<V> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key, "Cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, key, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!(key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, key, "Cache entry unreadable, treating as miss");
                None
            }
        }
    }

    async fn write<V: Serialize + ?Sized>(&self, key: &str, value: &V) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, key, "Cache serialization failed");
                return;
            }
        };

        if let Err(e) = self.store.set(key, json, self.ttl_seconds).await {
            tracing::warn!(error = %e, key, "Cache write failed");
        }
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.read(&Self::item_key(id)).await
    }

    pub async fn set(&self, item: &T) {
        self.write(&Self::item_key(item.cache_id()), item).await
    }

    pub async fn list(&self, offset: u64, limit: u64) -> Option<Vec<T>> {
        let version = self.list_version().await?;
        self.read(&Self::list_key(version, offset, limit)).await
    }

    pub async fn set_list(&self, offset: u64, limit: u64, items: &[T]) {
        if let Some(version) = self.list_version().await {
            self.write(&Self::list_key(version, offset, limit), items).await
        }
    }

    pub async fn invalidate(&self, id: &str) {
        let key = Self::item_key(id);
        if let Err(e) = self.store.delete(&key).await {
            tracing::warn!(error = %e, key = %key, "Cache invalidation failed");
        }
    }

    /// Retire every cached list page by moving to a new list generation.
    pub async fn invalidate_list(&self) {
        if let Err(e) = self.store.incr(&Self::version_key()).await {
            tracing::warn!(error = %e, key = %Self::version_key(), "Cache list invalidation failed");
        }
    }

    /// Drop every cached item and list page of this entity type.
    pub async fn invalidate_all(&self) {
        self.invalidate_list().await;
        if let Err(e) = self.store.delete_prefix(T::ITEM_PREFIX).await {
            tracing::warn!(error = %e, prefix = T::ITEM_PREFIX, "Cache purge failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreateProduct, ProductCategory};
    use crate::errors::AppError;
    use crate::infra::cache::{MemoryCache, MockCacheStore};
    use rust_decimal::Decimal;

    fn product(name: &str) -> Product {
        Product::new(CreateProduct {
            name: name.into(),
            description: None,
            price: Decimal::new(1000, 2),
            category: ProductCategory::Snack,
        })
    }

    fn cache() -> ProductCache {
        EntityCache::new(Arc::new(MemoryCache::new()), 60)
    }

    #[tokio::test]
    async fn item_round_trip_and_invalidate() {
        let cache = cache();
        let fries = product("Fries");

        cache.set(&fries).await;
        assert_eq!(cache.get(&fries.id).await, Some(fries.clone()));

        cache.invalidate(&fries.id).await;
        assert_eq!(cache.get(&fries.id).await, None);
    }

    #[tokio::test]
    async fn pages_are_keyed_by_offset_and_limit() {
        let cache = cache();
        let page = vec![product("A"), product("B")];

        cache.set_list(0, 10, &page).await;

        assert_eq!(cache.list(0, 10).await, Some(page));
        assert_eq!(cache.list(10, 10).await, None);
        assert_eq!(cache.list(0, 5).await, None);
    }

    #[tokio::test]
    async fn invalidate_list_retires_every_page() {
        let cache = cache();
        cache.set_list(0, 10, &[product("A")]).await;
        cache.set_list(10, 10, &[product("B")]).await;

        cache.invalidate_list().await;

        assert_eq!(cache.list(0, 10).await, None);
        assert_eq!(cache.list(10, 10).await, None);
    }

    #[tokio::test]
    async fn invalidate_all_drops_items_and_pages() {
        let cache = cache();
        let a = product("A");
        cache.set(&a).await;
        cache.set_list(0, 10, std::slice::from_ref(&a)).await;

        cache.invalidate_all().await;

        assert_eq!(cache.get(&a.id).await, None);
        assert_eq!(cache.list(0, 10).await, None);
    }

    #[tokio::test]
    async fn backend_errors_degrade_to_misses() {
        let mut store = MockCacheStore::new();
        store
            .expect_get()
            .returning(|_| Err(AppError::internal("connection refused")));
        store
            .expect_set()
            .returning(|_, _, _| Err(AppError::internal("connection refused")));
        store
            .expect_delete()
            .returning(|_| Err(AppError::internal("connection refused")));

        let cache: ProductCache = EntityCache::new(Arc::new(store), 60);
        let a = product("A");

        cache.set(&a).await;
        assert_eq!(cache.get(&a.id).await, None);
        assert_eq!(cache.list(0, 10).await, None);
        cache.invalidate(&a.id).await;
    }

    #[tokio::test]
    async fn corrupt_entries_are_misses() {
        let store = Arc::new(MemoryCache::new());
        store.set("product:p1", "not json".into(), 60).await.unwrap();

        let cache: ProductCache = EntityCache::new(store, 60);
        assert_eq!(cache.get("p1").await, None);
    }
}
