//! Infrastructure layer - External systems integration
//!
//! Database connection and migrations, the SeaORM repositories behind the
//! unit of work, and the cache backends.

pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{CacheStore, EntityCache, MemoryCache, NoopCache, RedisCache};
pub use db::{Database, Migrator};
pub use repositories::{
    OrderRepository, OrderStore, ProductRepository, ProductStore, UserRepository, UserStore,
};
pub use unit_of_work::{run_in_transaction, Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockCacheStore;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockOrderRepository, MockProductRepository, MockUserRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use unit_of_work::MockUnitOfWork;
