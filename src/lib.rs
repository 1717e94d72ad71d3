//! Food Truck API - order management backend
//!
//! Users, products and orders behind a JWT-protected REST API with
//! role-based authorization and a read-through cache.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Entities, validation and the authorization table
//! - **services**: Use cases orchestrating repositories and caches
//! - **infra**: Database, repositories and cache backends
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Create the admin and integration accounts
//! cargo run -- setup
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{CurrentUser, Password, User, UserRole};
pub use errors::{AppError, AppResult};
