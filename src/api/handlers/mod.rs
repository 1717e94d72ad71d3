//! HTTP request handlers.

pub mod order_handler;
pub mod product_handler;
pub mod public_handler;
pub mod setup_handler;
pub mod token_handler;
pub mod user_handler;

pub use order_handler::order_routes;
pub use product_handler::product_routes;
pub use public_handler::public_routes;
pub use setup_handler::setup_routes;
pub use token_handler::token_routes;
pub use user_handler::user_routes;
