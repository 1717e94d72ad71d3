//! In-memory repositories and helpers shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use food_truck_api::config::Config;
use food_truck_api::domain::{
    Order, OrderPatch, Patch, Product, ProductPatch, PublicProduct, PublicRating, User, UserPatch,
    UserRole,
};
use food_truck_api::errors::AppResult;
use food_truck_api::infra::{
    MemoryCache, OrderRepository, ProductRepository, UnitOfWork, UserRepository,
};
use food_truck_api::services::Services;
use food_truck_api::Password;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";

fn window<T: Clone>(rows: &[T], offset: u64, limit: u64) -> Vec<T> {
    rows.iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, user: User) -> AppResult<User> {
        self.rows.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self, offset: u64, limit: u64) -> AppResult<Vec<User>> {
        Ok(window(&self.rows.lock().unwrap(), offset, limit))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn update(&self, user: User, patch: UserPatch) -> AppResult<User> {
        let updated = patch.apply(user);
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|u| u.id == updated.id) {
            *row = updated.clone();
        }
        Ok(updated)
    }

    async fn delete(&self, user: &User) -> AppResult<()> {
        self.rows.lock().unwrap().retain(|u| u.id != user.id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProducts {
    rows: Mutex<Vec<Product>>,
}

#[async_trait]
impl ProductRepository for InMemoryProducts {
    async fn create(&self, product: Product) -> AppResult<Product> {
        self.rows.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Product>> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Product>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn list(&self, offset: u64, limit: u64) -> AppResult<Vec<Product>> {
        Ok(window(&self.rows.lock().unwrap(), offset, limit))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn update(&self, product: Product, patch: ProductPatch) -> AppResult<Product> {
        let updated = patch.apply(product);
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|p| p.id == updated.id) {
            *row = updated.clone();
        }
        Ok(updated)
    }

    async fn delete(&self, product: &Product) -> AppResult<()> {
        self.rows.lock().unwrap().retain(|p| p.id != product.id);
        Ok(())
    }

    async fn list_public(&self) -> AppResult<Vec<PublicProduct>> {
        let mut products: Vec<PublicProduct> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .map(PublicProduct::from)
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }
}

#[derive(Default)]
pub struct InMemoryOrders {
    rows: Mutex<Vec<Order>>,
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
    async fn create(&self, order: Order) -> AppResult<Order> {
        self.rows.lock().unwrap().push(order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Order>> {
        Ok(self.rows.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    async fn list(&self, offset: u64, limit: u64) -> AppResult<Vec<Order>> {
        Ok(window(&self.rows.lock().unwrap(), offset, limit))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn update(&self, order: Order, patch: OrderPatch) -> AppResult<Order> {
        let updated = patch.apply(order);
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|o| o.id == updated.id) {
            *row = updated.clone();
        }
        Ok(updated)
    }

    async fn delete(&self, order: &Order) -> AppResult<()> {
        self.rows.lock().unwrap().retain(|o| o.id != order.id);
        Ok(())
    }

    async fn list_public_ratings(&self) -> AppResult<Vec<PublicRating>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter_map(|order| order.rating.map(|rating| (order, rating)))
            .flat_map(|(order, rating)| {
                order.items.iter().map(move |item| PublicRating {
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                    rating,
                })
            })
            .collect())
    }
}

/// Unit of work over the in-memory repositories.
#[derive(Default, Clone)]
pub struct InMemoryUnitOfWork {
    pub users: Arc<InMemoryUsers>,
    pub products: Arc<InMemoryProducts>,
    pub orders: Arc<InMemoryOrders>,
}

impl UnitOfWork for InMemoryUnitOfWork {
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

impl InMemoryUnitOfWork {
    /// Insert a user with a real Argon2 hash so it can log in.
    pub async fn seed_user(&self, username: &str, password: &str, role: UserRole) -> User {
        let hash = Password::new(password).unwrap().into_string();
        let user = User::new(
            username.to_string(),
            format!("{}@foodtruck.test", username),
            hash,
            None,
            role,
        );
        self.users.create(user).await.unwrap()
    }
}

pub fn test_config() -> Config {
    Config::with_secret(TEST_SECRET)
}

/// Services wired over the given in-memory storage and a fresh memory cache.
pub fn services(uow: &InMemoryUnitOfWork) -> Services {
    Services::from_parts(
        Arc::new(uow.clone()),
        Arc::new(MemoryCache::new()),
        test_config(),
    )
}
