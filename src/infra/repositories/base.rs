//! Shared read/delete helpers for the SeaORM-backed stores.
//!
//! Each store implements [`EntityRepository`] for its table and gets paging,
//! counting and primary-key lookups for free.

use async_trait::async_trait;
use sea_orm::{
    DatabaseConnection, EntityTrait, PaginatorTrait, PrimaryKeyTrait, QueryOrder, QuerySelect,
};

use crate::errors::AppResult;

#[async_trait]
pub trait EntityRepository<E>: Send + Sync
where
    E: EntityTrait,
    E::Model: Sync,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<String>,
{
    fn db(&self) -> &DatabaseConnection;

    async fn find_model(&self, id: String) -> AppResult<Option<E::Model>> {
        E::find_by_id(id).one(self.db()).await.map_err(Into::into)
    }

    /// One window of rows, sorted ascending by `order_by` in the given priority.
    async fn fetch_window(
        &self,
        order_by: &[E::Column],
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<E::Model>> {
        let mut query = E::find();
        for column in order_by {
            query = query.order_by_asc(*column);
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db())
            .await
            .map_err(Into::into)
    }

    async fn count_all(&self) -> AppResult<u64> {
        E::find().count(self.db()).await.map_err(Into::into)
    }

    /// Delete by primary key; returns the number of removed rows.
    async fn delete_model(&self, id: String) -> AppResult<u64> {
        let result = E::delete_by_id(id).exec(self.db()).await?;
        Ok(result.rows_affected)
    }
}
