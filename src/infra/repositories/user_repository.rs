//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Unchanged, Set,
};

use super::base::EntityRepository;
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{Patch, User, UserPatch};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user; unique username/email violations surface as database errors.
    async fn create(&self, user: User) -> AppResult<User>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Users ordered by creation time.
    async fn list(&self, offset: u64, limit: u64) -> AppResult<Vec<User>>;

    async fn count(&self) -> AppResult<u64>;

    /// Write only the fields present in `patch` and return the patched user.
    async fn update(&self, user: User, patch: UserPatch) -> AppResult<User>;

    async fn delete(&self, user: &User) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_one(&self, column: user::Column, value: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }
}

impl EntityRepository<UserEntity> for UserStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, user: User) -> AppResult<User> {
        let model = ActiveModel::from(&user).insert(&self.db).await?;
        User::try_from(model)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        self.find_model(id.to_string())
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.find_one(user::Column::Username, username).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_one(user::Column::Email, email).await
    }

    async fn list(&self, offset: u64, limit: u64) -> AppResult<Vec<User>> {
        self.fetch_window(&[user::Column::CreatedAt, user::Column::Id], offset, limit)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn count(&self) -> AppResult<u64> {
        self.count_all().await
    }

    async fn update(&self, user: User, patch: UserPatch) -> AppResult<User> {
        let mut active = ActiveModel {
            id: Unchanged(user.id.clone()),
            ..Default::default()
        };
        if let Some(full_name) = &patch.full_name {
            active.full_name = Set(Some(full_name.clone()));
        }
        if let Some(email) = &patch.email {
            active.email = Set(email.clone());
        }
        if let Some(password_hash) = &patch.password_hash {
            active.password_hash = Set(password_hash.clone());
        }
        if let Some(role) = patch.role {
            active.role = Set(role.as_str().to_string());
        }

        let updated = patch.apply(user);
        active.updated_at = Set(updated.updated_at);
        active.update(&self.db).await?;

        Ok(updated)
    }

    async fn delete(&self, user: &User) -> AppResult<()> {
        self.delete_model(user.id.clone()).await?;
        Ok(())
    }
}
