//! Application services layer - use cases and business logic.
//!
//! Each service checks the authorization table first, validates its input,
//! reads through the entity cache, and invalidates that cache after every
//! write. Repositories are reached through the unit of work.

mod auth_service;
pub mod container;
mod order_service;
mod product_service;
mod setup_service;
mod user_service;

pub use container::{parallel, ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator, Claims, Credentials, TokenResponse, TokenUser};
pub use order_service::{OrderManager, OrderService};
pub use product_service::{ProductManager, ProductService};
pub use setup_service::{BootstrapAccount, SetupManager, SetupService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use order_service::MockOrderService;
#[cfg(any(test, feature = "test-utils"))]
pub use product_service::MockProductService;
#[cfg(any(test, feature = "test-utils"))]
pub use setup_service::MockSetupService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
