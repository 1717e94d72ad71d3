//! Role-based authorization.
//!
//! One table decides which roles may perform which action on which
//! resource. Services call [`authorize`] before touching a repository.

use super::user::{CurrentUser, UserRole};
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Product,
    Order,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Read,
    Create,
    Update,
    Delete,
}

const EVERYONE: &[UserRole] = &[UserRole::Kitchen, UserRole::Attendant, UserRole::Admin];
const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];
const FRONT_DESK: &[UserRole] = &[UserRole::Attendant, UserRole::Admin];

/// Roles allowed to perform `action` on `resource`.
pub fn allowed_roles(resource: Resource, action: Action) -> &'static [UserRole] {
    use Action::*;

    match (resource, action) {
        (Resource::User, _) => ADMIN_ONLY,

        (Resource::Product, List | Read) => EVERYONE,
        (Resource::Product, Create | Update | Delete) => ADMIN_ONLY,

        (Resource::Order, List | Read) => EVERYONE,
        (Resource::Order, Create | Delete) => FRONT_DESK,
        (Resource::Order, Update) => EVERYONE,
    }
}

/// Fail with `Forbidden` unless the actor's role is allowed.
pub fn authorize(actor: &CurrentUser, resource: Resource, action: Action) -> AppResult<()> {
    if allowed_roles(resource, action).contains(&actor.role) {
        return Ok(());
    }

    tracing::debug!(
        user = %actor.username,
        role = %actor.role,
        ?resource,
        ?action,
        "Authorization denied"
    );
    Err(AppError::forbidden(denial_message(resource, action)))
}

fn denial_message(resource: Resource, action: Action) -> String {
    let verb = match action {
        Action::List | Action::Read => "view",
        Action::Create => "create",
        Action::Update => "update",
        Action::Delete => "delete",
    };
    let noun = match resource {
        Resource::User => "users",
        Resource::Product => "products",
        Resource::Order => "orders",
    };
    format!("You are not allowed to {} {}", verb, noun)
}
