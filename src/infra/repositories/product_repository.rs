//! Product repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Unchanged, Set,
};

use super::base::EntityRepository;
use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{Patch, Product, ProductPatch, PublicProduct};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: Product) -> AppResult<Product>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Product>>;

    /// Exact, case-sensitive name match.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Product>>;

    async fn list(&self, offset: u64, limit: u64) -> AppResult<Vec<Product>>;

    async fn count(&self) -> AppResult<u64>;

    async fn update(&self, product: Product, patch: ProductPatch) -> AppResult<Product>;

    async fn delete(&self, product: &Product) -> AppResult<()>;

    /// Whole catalogue ordered by name, for unauthenticated readers.
    async fn list_public(&self) -> AppResult<Vec<PublicProduct>>;
}

pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl EntityRepository<ProductEntity> for ProductStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn create(&self, product: Product) -> AppResult<Product> {
        let model = ActiveModel::from(&product).insert(&self.db).await?;
        Product::try_from(model)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Product>> {
        self.find_model(id.to_string())
            .await?
            .map(Product::try_from)
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Product>> {
        ProductEntity::find()
            .filter(product::Column::Name.eq(name))
            .one(&self.db)
            .await?
            .map(Product::try_from)
            .transpose()
    }

    async fn list(&self, offset: u64, limit: u64) -> AppResult<Vec<Product>> {
        self.fetch_window(
            &[product::Column::CreatedAt, product::Column::Id],
            offset,
            limit,
        )
        .await?
        .into_iter()
        .map(Product::try_from)
        .collect()
    }

    async fn count(&self) -> AppResult<u64> {
        self.count_all().await
    }

    async fn update(&self, product: Product, patch: ProductPatch) -> AppResult<Product> {
        let mut active = ActiveModel {
            id: Unchanged(product.id.clone()),
            ..Default::default()
        };
        if let Some(name) = &patch.name {
            active.name = Set(name.clone());
        }
        if let Some(description) = &patch.description {
            active.description = Set(Some(description.clone()));
        }
        if let Some(price) = patch.price {
            active.price = Set(price);
        }
        if let Some(category) = patch.category {
            active.category = Set(category.as_str().to_string());
        }

        let updated = patch.apply(product);
        active.updated_at = Set(updated.updated_at);
        active.update(&self.db).await?;

        Ok(updated)
    }

    async fn delete(&self, product: &Product) -> AppResult<()> {
        self.delete_model(product.id.clone()).await?;
        Ok(())
    }

    async fn list_public(&self) -> AppResult<Vec<PublicProduct>> {
        ProductEntity::find()
            .order_by_asc(product::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| Product::try_from(model).map(PublicProduct::from))
            .collect()
    }
}
