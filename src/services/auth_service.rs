//! Identity service: credential checks and bearer tokens.
//!
//! Tokens carry the username as subject; resolving a token always goes back
//! to the repository so deleted users lose access immediately.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use crate::config::{Config, SECONDS_PER_MINUTE, TOKEN_TYPE_BEARER};
use crate::domain::{Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const INVALID_LOGIN: &str = "Incorrect username or password";
const INVALID_TOKEN: &str = "Could not validate credentials";

/// Never matches any password; verified against when the username is unknown.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$dGhpcyBpcyBub3QgYSByZWFsIGhhc2ggdmFsdWU";

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Login form fields
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct Credentials {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Account summary embedded in the token response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Lifetime in seconds
    #[schema(example = 1800)]
    pub expires_in: i64,
    pub user: TokenUser,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check a username/password pair; both failure causes look identical.
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<User>;

    fn issue_token(&self, user: &User) -> AppResult<TokenResponse>;

    /// Validate the form, authenticate and issue a token.
    async fn login(&self, credentials: Credentials) -> AppResult<TokenResponse>;

    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Decode a token and load the user it names.
    async fn resolve_token(&self, token: &str) -> AppResult<User>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::minutes(config.jwt_expiration_minutes);

    let claims = Claims {
        sub: user.username.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::new(config.jwt_algorithm),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_minutes * SECONDS_PER_MINUTE,
        user: TokenUser {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        },
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::new(config.jwt_algorithm),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self.uow.users().find_by_username(username).await?;

        // Verify against a dummy hash for unknown users so both paths do the same work
        let stored = Password::from_hash(
            user.as_ref()
                .map_or(DUMMY_HASH, |u| u.password_hash.as_str())
                .to_string(),
        );
        let password_valid = stored.verify(password);

        match user {
            Some(user) if password_valid => Ok(user),
            _ => {
                tracing::info!(username, "Rejected login attempt");
                Err(AppError::unauthorized(INVALID_LOGIN))
            }
        }
    }

    fn issue_token(&self, user: &User) -> AppResult<TokenResponse> {
        generate_token(user, &self.config)
    }

    async fn login(&self, credentials: Credentials) -> AppResult<TokenResponse> {
        credentials.validate()?;

        let user = self
            .authenticate(&credentials.username, &credentials.password)
            .await?;
        tracing::info!(user_id = %user.id, "User logged in");

        self.issue_token(&user)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }

    async fn resolve_token(&self, token: &str) -> AppResult<User> {
        let claims = self.verify_token(token)?;

        self.uow
            .users()
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_TOKEN))
    }
}
