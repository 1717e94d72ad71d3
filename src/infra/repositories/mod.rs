//! Repository layer - Data access abstraction
//!
//! One trait per aggregate plus its SeaORM-backed store. Services only ever
//! see the traits, reached through the unit of work.

mod base;
pub(crate) mod entities;
mod order_repository;
mod product_repository;
mod user_repository;

pub use base::EntityRepository;
pub use order_repository::{OrderRepository, OrderStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
