//! Order service - order lifecycle and the public rating feed.
//!
//! Statuses may move freely between pending, processing, completed and
//! cancelled; the one guard is that only pending orders can be deleted.

use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;
use validator::Validate;

use super::container::parallel;
use crate::domain::{
    authorize, fits_money_column, Action, CreateOrder, CurrentUser, Order, OrderItemOut, OrderOut,
    OrderPatch, PublicRating, Resource,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::cache::OrderCache;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderService: Send + Sync {
    async fn list(
        &self,
        actor: &CurrentUser,
        params: PaginationParams,
    ) -> AppResult<Paginated<OrderOut>>;

    async fn get(&self, actor: &CurrentUser, id: &str) -> AppResult<OrderOut>;

    /// Price every line from the current product price and persist order and items together.
    async fn create(&self, actor: &CurrentUser, dto: CreateOrder) -> AppResult<OrderOut>;

    async fn update(&self, actor: &CurrentUser, id: &str, patch: OrderPatch) -> AppResult<OrderOut>;

    /// Fails with `BadRequest` unless the order is still pending.
    async fn delete(&self, actor: &CurrentUser, id: &str) -> AppResult<()>;

    /// One page of a single order's lines.
    async fn list_items(
        &self,
        actor: &CurrentUser,
        order_id: &str,
        params: PaginationParams,
    ) -> AppResult<Paginated<OrderItemOut>>;

    /// Item rows of every rated order; no authentication involved.
    async fn list_public_ratings(&self) -> AppResult<Vec<PublicRating>>;
}

pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
    cache: OrderCache,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(uow: Arc<U>, cache: OrderCache) -> Self {
        Self { uow, cache }
    }

    async fn page(&self, offset: u64, limit: u64) -> AppResult<Vec<Order>> {
        if let Some(orders) = self.cache.list(offset, limit).await {
            return Ok(orders);
        }

        let orders = self.uow.orders().list(offset, limit).await?;
        self.cache.set_list(offset, limit, &orders).await;
        Ok(orders)
    }

    async fn fetch(&self, id: &str) -> AppResult<Order> {
        if let Some(order) = self.cache.get(id).await {
            return Ok(order);
        }

        let order = self
            .uow
            .orders()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Order")?;
        self.cache.set(&order).await;
        Ok(order)
    }

    async fn forget(&self, id: &str) {
        self.cache.invalidate(id).await;
        self.cache.invalidate_list().await;
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn list(
        &self,
        actor: &CurrentUser,
        params: PaginationParams,
    ) -> AppResult<Paginated<OrderOut>> {
        authorize(actor, Resource::Order, Action::List)?;

        let (offset, limit) = (params.offset(), params.limit());
        let repo = self.uow.orders();
        let (orders, total) = parallel::join2(self.page(offset, limit), repo.count()).await?;

        Ok(Paginated::new(orders, offset, limit, total).map(OrderOut::from))
    }

    async fn get(&self, actor: &CurrentUser, id: &str) -> AppResult<OrderOut> {
        authorize(actor, Resource::Order, Action::Read)?;
        self.fetch(id).await.map(OrderOut::from)
    }

    async fn create(&self, actor: &CurrentUser, dto: CreateOrder) -> AppResult<OrderOut> {
        authorize(actor, Resource::Order, Action::Create)?;
        dto.validate()?;

        let products = self.uow.products();
        let lookups = dto.items.iter().map(|line| {
            let products = products.clone();
            async move {
                let product = products
                    .find_by_id(&line.product_id)
                    .await?
                    .ok_or_else(|| AppError::validation("Product not found"))?;
                Ok::<_, AppError>((product, line.quantity))
            }
        });
        let lines = try_join_all(lookups).await?;

        let mut order = Order::new(dto.notes);
        for (product, quantity) in &lines {
            order.add_item(product, *quantity);
        }
        if !fits_money_column(&order.total) {
            return Err(AppError::validation("Order total is too large"));
        }

        let order = self.uow.orders().create(order).await?;
        self.forget(&order.id).await;

        tracing::info!(
            order_id = %order.id,
            locator = %order.locator,
            total = %order.total,
            "Order created"
        );
        Ok(order.into())
    }

    async fn update(&self, actor: &CurrentUser, id: &str, patch: OrderPatch) -> AppResult<OrderOut> {
        authorize(actor, Resource::Order, Action::Update)?;
        patch.validate()?;

        let repo = self.uow.orders();
        let order = repo.find_by_id(id).await?.ok_or_not_found("Order")?;
        let order = repo.update(order, patch).await?;
        self.forget(&order.id).await;

        tracing::info!(order_id = %order.id, status = %order.status, "Order updated");
        Ok(order.into())
    }

    async fn delete(&self, actor: &CurrentUser, id: &str) -> AppResult<()> {
        authorize(actor, Resource::Order, Action::Delete)?;

        let repo = self.uow.orders();
        let order = repo.find_by_id(id).await?.ok_or_not_found("Order")?;
        if !order.is_pending() {
            return Err(AppError::bad_request("Order is not pending"));
        }

        repo.delete(&order).await?;
        self.forget(&order.id).await;

        tracing::info!(order_id = %order.id, "Order deleted");
        Ok(())
    }

    async fn list_items(
        &self,
        actor: &CurrentUser,
        order_id: &str,
        params: PaginationParams,
    ) -> AppResult<Paginated<OrderItemOut>> {
        authorize(actor, Resource::Order, Action::Read)?;

        let (offset, limit) = (params.offset(), params.limit());
        let order = self.fetch(order_id).await?;
        let total = order.items.len() as u64;
        let items = order
            .items
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(OrderItemOut::from)
            .collect();

        Ok(Paginated::new(items, offset, limit, total))
    }

    async fn list_public_ratings(&self) -> AppResult<Vec<PublicRating>> {
        self.uow.orders().list_public_ratings().await
    }
}
