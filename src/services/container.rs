//! Service container - one handle for every application service.
//!
//! Handlers only see the [`ServiceContainer`] trait, so router tests can
//! swap in services built over fake repositories.

use std::future::Future;
use std::sync::Arc;

use super::{
    AuthService, Authenticator, OrderManager, OrderService, ProductManager, ProductService,
    SetupManager, SetupService, UserManager, UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::cache::{CacheStore, EntityCache};
use crate::infra::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn products(&self) -> Arc<dyn ProductService>;

    fn orders(&self) -> Arc<dyn OrderService>;

    fn setup(&self) -> Arc<dyn SetupService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    product_service: Arc<dyn ProductService>,
    order_service: Arc<dyn OrderService>,
    setup_service: Arc<dyn SetupService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        product_service: Arc<dyn ProductService>,
        order_service: Arc<dyn OrderService>,
        setup_service: Arc<dyn SetupService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            product_service,
            order_service,
            setup_service,
        }
    }

    /// Wire every service over one unit of work and one cache backend.
    pub fn from_parts<U>(uow: Arc<U>, cache: Arc<dyn CacheStore>, config: Config) -> Self
    where
        U: UnitOfWork + 'static,
    {
        let ttl = config.cache_ttl_seconds;

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(
                uow.clone(),
                EntityCache::new(cache.clone(), ttl),
            )),
            product_service: Arc::new(ProductManager::new(
                uow.clone(),
                EntityCache::new(cache.clone(), ttl),
            )),
            order_service: Arc::new(OrderManager::new(
                uow.clone(),
                EntityCache::new(cache.clone(), ttl),
            )),
            setup_service: Arc::new(SetupManager::new(uow, EntityCache::new(cache, ttl))),
        }
    }

    /// Services backed by the SeaORM stores.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        cache: Arc<dyn CacheStore>,
        config: Config,
    ) -> Self {
        Self::from_parts(Arc::new(Persistence::new(db)), cache, config)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }

    fn setup(&self) -> Arc<dyn SetupService> {
        self.setup_service.clone()
    }
}

/// Run independent operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Await both futures together; the first error wins.
    ///
    /// # Example
    /// ```ignore
    /// let (items, total) = parallel::join2(repo.list(0, 10), repo.count()).await?;
    /// ```
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }
}
