//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use thiserror::Error;

use super::constants::{
    DEFAULT_CACHE_TTL_SECONDS, DEFAULT_DATABASE_URL, DEFAULT_JWT_ALGORITHM,
    DEFAULT_JWT_EXPIRATION_MINUTES, DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    MIN_JWT_SECRET_LENGTH,
};

/// Errors raised while reading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JWT_SECRET_KEY environment variable must be set in production")]
    MissingSecret,

    #[error("JWT_SECRET_KEY must be at least {0} characters long")]
    SecretTooShort(usize),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Which cache backend sits in front of the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
    Disabled,
}

impl FromStr for CacheBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            "none" | "disabled" | "off" => Ok(CacheBackend::Disabled),
            _ => Err(()),
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub cache_backend: CacheBackend,
    pub redis_url: String,
    jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub jwt_expiration_minutes: i64,
    pub cache_ttl_seconds: u64,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("cache_backend", &self.cache_backend)
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("cache_ttl_seconds", &self.cache_ttl_seconds)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET_KEY") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET_KEY not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            }
            Err(_) => return Err(ConfigError::MissingSecret),
        };

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort(MIN_JWT_SECRET_LENGTH));
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            cache_backend: parse_var("CACHE_BACKEND", CacheBackend::Redis)?,
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            jwt_algorithm: parse_algorithm()?,
            jwt_expiration_minutes: parse_var(
                "JWT_ACCESS_TOKEN_EXPIRE_MINUTES",
                DEFAULT_JWT_EXPIRATION_MINUTES,
            )?,
            cache_ttl_seconds: parse_var("CACHE_TTL_SECONDS", DEFAULT_CACHE_TTL_SECONDS)?,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
        })
    }

    /// Configuration with defaults and the given signing secret.
    ///
    /// Used by tests and tooling that never touch the environment.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            cache_backend: CacheBackend::Memory,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret: jwt_secret.into(),
            jwt_algorithm: Algorithm::HS256,
            jwt_expiration_minutes: DEFAULT_JWT_EXPIRATION_MINUTES,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

// Only HMAC algorithms make sense with a shared secret.
fn parse_algorithm() -> Result<Algorithm, ConfigError> {
    let value = env::var("JWT_ALGORITHM").unwrap_or_else(|_| DEFAULT_JWT_ALGORITHM.to_string());
    match Algorithm::from_str(&value) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(ConfigError::Invalid {
            name: "JWT_ALGORITHM",
            value,
        }),
    }
}
