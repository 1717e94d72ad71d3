//! Unit of Work: one place to reach every repository.
//!
//! Services are generic over [`UnitOfWork`] so tests can hand them mocked
//! repositories. Multi-table writes go through [`run_in_transaction`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use sea_orm::{AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait};

use super::repositories::{
    OrderRepository, OrderStore, ProductRepository, ProductStore, UserRepository, UserStore,
};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Repository registry handed to the services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn products(&self) -> Arc<dyn ProductRepository>;

    fn orders(&self) -> Arc<dyn OrderRepository>;
}

/// SeaORM-backed unit of work sharing one connection pool.
pub struct Persistence {
    users: Arc<UserStore>,
    products: Arc<ProductStore>,
    orders: Arc<OrderStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            products: Arc::new(ProductStore::new(db.clone())),
            orders: Arc::new(OrderStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }
}

/// Run `f` inside a ReadCommitted transaction.
///
/// Commits when `f` succeeds; otherwise rolls back and returns the error from `f`.
pub async fn run_in_transaction<F, T>(db: &DatabaseConnection, f: F) -> AppResult<T>
where
    F: for<'a> FnOnce(
            &'a DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
        + Send,
    T: Send,
{
    let txn = db
        .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
        .await
        .map_err(AppError::from)?;

    match f(&txn).await {
        Ok(result) => {
            txn.commit().await.map_err(AppError::from)?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}
