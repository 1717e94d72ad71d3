//! Product service - catalogue management.
//!
//! Every authenticated role may browse; only admins change the catalogue.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use super::container::parallel;
use crate::domain::{
    authorize, Action, CreateProduct, CurrentUser, Product, ProductOut, ProductPatch,
    PublicProduct, Resource,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::cache::ProductCache;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list(
        &self,
        actor: &CurrentUser,
        params: PaginationParams,
    ) -> AppResult<Paginated<ProductOut>>;

    async fn get(&self, actor: &CurrentUser, id: &str) -> AppResult<ProductOut>;

    /// Fails with `Conflict` when the exact name is already taken.
    async fn create(&self, actor: &CurrentUser, dto: CreateProduct) -> AppResult<ProductOut>;

    async fn update(
        &self,
        actor: &CurrentUser,
        id: &str,
        patch: ProductPatch,
    ) -> AppResult<ProductOut>;

    async fn delete(&self, actor: &CurrentUser, id: &str) -> AppResult<()>;

    /// Unauthenticated catalogue.
    async fn list_public(&self) -> AppResult<Vec<PublicProduct>>;
}

pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
    cache: ProductCache,
}

impl<U: UnitOfWork> ProductManager<U> {
    pub fn new(uow: Arc<U>, cache: ProductCache) -> Self {
        Self { uow, cache }
    }

    async fn page(&self, offset: u64, limit: u64) -> AppResult<Vec<Product>> {
        if let Some(products) = self.cache.list(offset, limit).await {
            return Ok(products);
        }

        let products = self.uow.products().list(offset, limit).await?;
        self.cache.set_list(offset, limit, &products).await;
        Ok(products)
    }

    async fn fetch(&self, id: &str) -> AppResult<Product> {
        if let Some(product) = self.cache.get(id).await {
            return Ok(product);
        }

        let product = self
            .uow
            .products()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Product")?;
        self.cache.set(&product).await;
        Ok(product)
    }

    async fn forget(&self, id: &str) {
        self.cache.invalidate(id).await;
        self.cache.invalidate_list().await;
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn list(
        &self,
        actor: &CurrentUser,
        params: PaginationParams,
    ) -> AppResult<Paginated<ProductOut>> {
        authorize(actor, Resource::Product, Action::List)?;

        let (offset, limit) = (params.offset(), params.limit());
        let repo = self.uow.products();
        let (products, total) = parallel::join2(self.page(offset, limit), repo.count()).await?;

        Ok(Paginated::new(products, offset, limit, total).map(ProductOut::from))
    }

    async fn get(&self, actor: &CurrentUser, id: &str) -> AppResult<ProductOut> {
        authorize(actor, Resource::Product, Action::Read)?;
        self.fetch(id).await.map(ProductOut::from)
    }

    async fn create(&self, actor: &CurrentUser, dto: CreateProduct) -> AppResult<ProductOut> {
        authorize(actor, Resource::Product, Action::Create)?;
        dto.validate()?;

        let repo = self.uow.products();
        if repo.find_by_name(&dto.name).await?.is_some() {
            return Err(AppError::already_exists("Product"));
        }

        let product = repo.create(Product::new(dto)).await?;
        self.forget(&product.id).await;

        tracing::info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product.into())
    }

    async fn update(
        &self,
        actor: &CurrentUser,
        id: &str,
        patch: ProductPatch,
    ) -> AppResult<ProductOut> {
        authorize(actor, Resource::Product, Action::Update)?;
        patch.validate()?;

        let repo = self.uow.products();
        let product = repo.find_by_id(id).await?.ok_or_not_found("Product")?;
        let product = repo.update(product, patch).await?;
        self.forget(&product.id).await;

        tracing::info!(product_id = %product.id, "Product updated");
        Ok(product.into())
    }

    async fn delete(&self, actor: &CurrentUser, id: &str) -> AppResult<()> {
        authorize(actor, Resource::Product, Action::Delete)?;

        let repo = self.uow.products();
        let product = repo.find_by_id(id).await?.ok_or_not_found("Product")?;
        repo.delete(&product).await?;
        self.forget(&product.id).await;

        tracing::info!(product_id = %product.id, "Product deleted");
        Ok(())
    }

    async fn list_public(&self) -> AppResult<Vec<PublicProduct>> {
        self.uow.products().list_public().await
    }
}
