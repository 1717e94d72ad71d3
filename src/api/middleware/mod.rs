//! API middleware.

mod auth;
mod security_headers;

pub use auth::auth_middleware;
pub use security_headers::security_headers_middleware;
