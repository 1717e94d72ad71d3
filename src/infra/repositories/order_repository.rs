//! Order repository implementation.
//!
//! An order and its items are always written together inside one
//! transaction and read back together.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    FromQueryResult, LoaderTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    Unchanged,
};

use super::base::EntityRepository;
use super::entities::order::{self, Entity as OrderEntity};
use super::entities::order_item::{self, Entity as OrderItemEntity};
use crate::domain::{Order, OrderPatch, Patch, PublicRating};
use crate::errors::AppResult;
use crate::infra::unit_of_work::run_in_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert the order and all of its items atomically.
    async fn create(&self, order: Order) -> AppResult<Order>;

    /// Order with its items loaded.
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Order>>;

    async fn list(&self, offset: u64, limit: u64) -> AppResult<Vec<Order>>;

    async fn count(&self) -> AppResult<u64>;

    /// Write only status, rating and notes when present.
    async fn update(&self, order: Order, patch: OrderPatch) -> AppResult<Order>;

    /// Delete the order; its items cascade.
    async fn delete(&self, order: &Order) -> AppResult<()>;

    /// One row per item of every rated order.
    async fn list_public_ratings(&self) -> AppResult<Vec<PublicRating>>;
}

#[derive(Debug, FromQueryResult)]
struct RatingRow {
    product_id: String,
    quantity: i32,
    rating: i32,
}

impl From<RatingRow> for PublicRating {
    fn from(row: RatingRow) -> Self {
        PublicRating {
            product_id: row.product_id,
            quantity: row.quantity,
            rating: row.rating,
        }
    }
}

pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl EntityRepository<OrderEntity> for OrderStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

async fn insert_order(txn: &DatabaseTransaction, order: &Order) -> AppResult<()> {
    order::ActiveModel::from(order).insert(txn).await?;

    if !order.items.is_empty() {
        OrderItemEntity::insert_many(order.items.iter().map(order_item::ActiveModel::from))
            .exec(txn)
            .await?;
    }

    Ok(())
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn create(&self, order: Order) -> AppResult<Order> {
        let row = order.clone();
        run_in_transaction(&self.db, move |txn| {
            Box::pin(async move { insert_order(txn, &row).await })
        })
        .await?;

        Ok(order)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Order>> {
        let Some(model) = self.find_model(id.to_string()).await? else {
            return Ok(None);
        };

        let items = model
            .find_related(OrderItemEntity)
            .order_by_asc(order_item::Column::CreatedAt)
            .order_by_asc(order_item::Column::Id)
            .all(&self.db)
            .await?;

        model.into_domain(items).map(Some)
    }

    async fn list(&self, offset: u64, limit: u64) -> AppResult<Vec<Order>> {
        let orders = self
            .fetch_window(&[order::Column::CreatedAt, order::Column::Id], offset, limit)
            .await?;
        let items = orders.load_many(OrderItemEntity, &self.db).await?;

        orders
            .into_iter()
            .zip(items)
            .map(|(model, items)| model.into_domain(items))
            .collect()
    }

    async fn count(&self) -> AppResult<u64> {
        self.count_all().await
    }

    async fn update(&self, order: Order, patch: OrderPatch) -> AppResult<Order> {
        let mut active = order::ActiveModel {
            id: Unchanged(order.id.clone()),
            ..Default::default()
        };
        if let Some(status) = patch.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(rating) = patch.rating {
            active.rating = Set(Some(rating));
        }
        if let Some(notes) = &patch.notes {
            active.notes = Set(Some(notes.clone()));
        }

        let updated = patch.apply(order);
        active.updated_at = Set(updated.updated_at);
        active.update(&self.db).await?;

        Ok(updated)
    }

    async fn delete(&self, order: &Order) -> AppResult<()> {
        self.delete_model(order.id.clone()).await?;
        Ok(())
    }

    async fn list_public_ratings(&self) -> AppResult<Vec<PublicRating>> {
        let rows = OrderItemEntity::find()
            .select_only()
            .column(order_item::Column::ProductId)
            .column(order_item::Column::Quantity)
            .column(order::Column::Rating)
            .inner_join(OrderEntity)
            .filter(order::Column::Rating.is_not_null())
            .order_by_asc(order_item::Column::CreatedAt)
            .into_model::<RatingRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(PublicRating::from).collect())
    }
}
