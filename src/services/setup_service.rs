//! First-run bootstrap of the built-in accounts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{
    BOOTSTRAP_ADMIN_EMAIL, BOOTSTRAP_ADMIN_FULL_NAME, BOOTSTRAP_ADMIN_USERNAME,
    BOOTSTRAP_INTEGRATION_EMAIL, BOOTSTRAP_INTEGRATION_FULL_NAME, BOOTSTRAP_INTEGRATION_USERNAME,
    BOOTSTRAP_PASSWORD_LENGTH,
};
use crate::domain::{Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::cache::UserCache;
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Newly provisioned account with its one-time password.
///
/// Only the hash is stored; this is the only place the password is ever shown.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BootstrapAccount {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub password: String,
}

struct AccountTemplate {
    username: &'static str,
    email: &'static str,
    full_name: &'static str,
    role: UserRole,
}

static ACCOUNTS: [AccountTemplate; 2] = [
    AccountTemplate {
        username: BOOTSTRAP_ADMIN_USERNAME,
        email: BOOTSTRAP_ADMIN_EMAIL,
        full_name: BOOTSTRAP_ADMIN_FULL_NAME,
        role: UserRole::Admin,
    },
    AccountTemplate {
        username: BOOTSTRAP_INTEGRATION_USERNAME,
        email: BOOTSTRAP_INTEGRATION_EMAIL,
        full_name: BOOTSTRAP_INTEGRATION_FULL_NAME,
        role: UserRole::Attendant,
    },
];

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SetupService: Send + Sync {
    /// Create whichever built-in account is missing.
    ///
    /// Fails with `Conflict` when both already exist.
    async fn bootstrap(&self) -> AppResult<Vec<BootstrapAccount>>;
}

pub struct SetupManager<U: UnitOfWork> {
    uow: Arc<U>,
    cache: UserCache,
}

impl<U: UnitOfWork> SetupManager<U> {
    pub fn new(uow: Arc<U>, cache: UserCache) -> Self {
        Self { uow, cache }
    }
}

#[async_trait]
impl<U: UnitOfWork> SetupService for SetupManager<U> {
    async fn bootstrap(&self) -> AppResult<Vec<BootstrapAccount>> {
        let repo = self.uow.users();

        let mut missing = Vec::new();
        for template in &ACCOUNTS {
            if repo.find_by_username(template.username).await?.is_none() {
                missing.push(template);
            }
        }

        if missing.is_empty() {
            return Err(AppError::conflict("Setup already completed"));
        }

        let mut created = Vec::with_capacity(missing.len());
        for template in missing {
            let password = Password::generate_plain(BOOTSTRAP_PASSWORD_LENGTH);
            let user = User::new(
                template.username.to_string(),
                template.email.to_string(),
                Password::new(&password)?.into_string(),
                Some(template.full_name.to_string()),
                template.role,
            );
            let user = repo.create(user).await?;

            tracing::info!(user_id = %user.id, username = %user.username, "Bootstrap account created");
            created.push(BootstrapAccount {
                id: user.id,
                username: user.username,
                email: user.email,
                role: user.role,
                password,
            });
        }

        self.cache.invalidate_all().await;
        Ok(created)
    }
}
