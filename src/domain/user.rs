//! User domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::patch::{next_updated_at, Patch};
use crate::config::{ROLE_ADMIN, ROLE_ATTENDANT, ROLE_KITCHEN};
use crate::errors::AppError;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Kitchen,
    Attendant,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Kitchen, UserRole::Attendant, UserRole::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Kitchen => ROLE_KITCHEN,
            UserRole::Attendant => ROLE_ATTENDANT,
            UserRole::Admin => ROLE_ADMIN,
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_KITCHEN => Ok(UserRole::Kitchen),
            ROLE_ATTENDANT => Ok(UserRole::Attendant),
            ROLE_ADMIN => Ok(UserRole::Admin),
            other => Err(AppError::validation(format!("Unknown role: {}", other))),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Never serialized; cached copies carry an empty hash.
    #[serde(default, skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh identifier.
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        full_name: Option<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            full_name,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Identity resolved from a bearer token, handed to every service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub role: UserRole,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// User creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 20, message = "Username must be 1-20 characters"))]
    #[schema(example = "maria")]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "maria@foodtruck.local")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "s3cret!", min_length = 6)]
    pub password: String,
    #[schema(example = "Maria Silva")]
    pub full_name: Option<String>,
    pub role: UserRole,
}

/// User update data transfer object; the password, if present, is re-hashed
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[schema(example = "Maria S. Silva")]
    pub full_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

/// Stored-field changes for a user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
}

impl Patch<User> for UserPatch {
    fn apply_at(self, mut user: User, now: DateTime<Utc>) -> User {
        if let Some(full_name) = self.full_name {
            user.full_name = Some(full_name);
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(password_hash) = self.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        user.updated_at = next_updated_at(user.updated_at, now);
        user
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserOut {
    pub id: String,
    #[schema(example = "maria")]
    pub username: String,
    pub full_name: Option<String>,
    #[schema(example = "maria@foodtruck.local")]
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserOut {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User::new(
            "ana".into(),
            "ana@foodtruck.local".into(),
            "hash".into(),
            None,
            UserRole::Kitchen,
        )
    }

    #[test]
    fn role_round_trips_through_its_name() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("chef".parse::<UserRole>().is_err());
    }

    #[test]
    fn patch_changes_only_present_fields() {
        let user = sample();
        let created_at = user.created_at;
        let before = user.updated_at;

        let patched = UserPatch {
            role: Some(UserRole::Attendant),
            ..Default::default()
        }
        .apply(user);

        assert_eq!(patched.role, UserRole::Attendant);
        assert_eq!(patched.email, "ana@foodtruck.local");
        assert_eq!(patched.password_hash, "hash");
        assert_eq!(patched.created_at, created_at);
        assert!(patched.updated_at > before);
    }

    #[test]
    fn cached_copy_drops_the_hash() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("password_hash"));

        let restored: User = serde_json::from_str(&json).unwrap();
        assert!(restored.password_hash.is_empty());
    }

    #[test]
    fn create_user_validation() {
        let dto = CreateUser {
            username: "".into(),
            email: "not-an-email".into(),
            password: "123".into(),
            full_name: None,
            role: UserRole::Kitchen,
        };

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
