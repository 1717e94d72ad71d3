//! User service - admin-only account management.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use super::container::parallel;
use crate::domain::{
    authorize, Action, CreateUser, CurrentUser, Password, Resource, UpdateUser, User, UserOut,
    UserPatch,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::cache::UserCache;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    async fn list(&self, actor: &CurrentUser, params: PaginationParams) -> AppResult<Paginated<UserOut>>;

    async fn get(&self, actor: &CurrentUser, id: &str) -> AppResult<UserOut>;

    /// Create an account; duplicate username/email fail in the store.
    async fn create(&self, actor: &CurrentUser, dto: CreateUser) -> AppResult<UserOut>;

    /// Apply the present fields; a new password is re-hashed.
    async fn update(&self, actor: &CurrentUser, id: &str, dto: UpdateUser) -> AppResult<UserOut>;

    async fn delete(&self, actor: &CurrentUser, id: &str) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    cache: UserCache,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, cache: UserCache) -> Self {
        Self { uow, cache }
    }

    async fn page(&self, offset: u64, limit: u64) -> AppResult<Vec<User>> {
        if let Some(users) = self.cache.list(offset, limit).await {
            return Ok(users);
        }

        let users = self.uow.users().list(offset, limit).await?;
        self.cache.set_list(offset, limit, &users).await;
        Ok(users)
    }

    async fn fetch(&self, id: &str) -> AppResult<User> {
        if let Some(user) = self.cache.get(id).await {
            return Ok(user);
        }

        let user = self.uow.users().find_by_id(id).await?.ok_or_not_found("User")?;
        self.cache.set(&user).await;
        Ok(user)
    }

    async fn forget(&self, id: &str) {
        self.cache.invalidate(id).await;
        self.cache.invalidate_list().await;
    }
}

fn hash_password(plain: &str) -> AppResult<String> {
    Ok(Password::new(plain)?.into_string())
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn list(&self, actor: &CurrentUser, params: PaginationParams) -> AppResult<Paginated<UserOut>> {
        authorize(actor, Resource::User, Action::List)?;

        let (offset, limit) = (params.offset(), params.limit());
        let repo = self.uow.users();
        let (users, total) = parallel::join2(self.page(offset, limit), repo.count()).await?;

        Ok(Paginated::new(users, offset, limit, total).map(UserOut::from))
    }

    async fn get(&self, actor: &CurrentUser, id: &str) -> AppResult<UserOut> {
        authorize(actor, Resource::User, Action::Read)?;
        self.fetch(id).await.map(UserOut::from)
    }

    async fn create(&self, actor: &CurrentUser, dto: CreateUser) -> AppResult<UserOut> {
        authorize(actor, Resource::User, Action::Create)?;
        dto.validate()?;

        let user = User::new(
            dto.username,
            dto.email,
            hash_password(&dto.password)?,
            dto.full_name,
            dto.role,
        );
        let user = self.uow.users().create(user).await?;
        self.forget(&user.id).await;

        tracing::info!(user_id = %user.id, created_by = %actor.id, "User created");
        Ok(user.into())
    }

    async fn update(&self, actor: &CurrentUser, id: &str, dto: UpdateUser) -> AppResult<UserOut> {
        authorize(actor, Resource::User, Action::Update)?;
        dto.validate()?;

        let repo = self.uow.users();
        let user = repo.find_by_id(id).await?.ok_or_not_found("User")?;

        let patch = UserPatch {
            full_name: dto.full_name,
            email: dto.email,
            password_hash: dto.password.as_deref().map(hash_password).transpose()?,
            role: dto.role,
        };
        let user = repo.update(user, patch).await?;
        self.forget(&user.id).await;

        tracing::info!(user_id = %user.id, updated_by = %actor.id, "User updated");
        Ok(user.into())
    }

    async fn delete(&self, actor: &CurrentUser, id: &str) -> AppResult<()> {
        authorize(actor, Resource::User, Action::Delete)?;

        let repo = self.uow.users();
        let user = repo.find_by_id(id).await?.ok_or_not_found("User")?;
        repo.delete(&user).await?;
        self.forget(&user.id).await;

        tracing::info!(user_id = %user.id, deleted_by = %actor.id, "User deleted");
        Ok(())
    }
}
