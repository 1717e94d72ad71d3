//! CLI module - Command-line interface for the application.
//!
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `setup` - Bootstrap the default accounts

pub mod args;

pub use args::{Cli, Commands};
