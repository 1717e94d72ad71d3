//! Domain layer - Core business entities and rules.
//!
//! Entities, their create/patch shapes and output views, the password value
//! object and the authorization table. Nothing here touches I/O.

mod order;
mod password;
mod patch;
pub mod policy;
mod product;
mod user;
mod validation;

pub use order::{
    generate_locator, CreateOrder, CreateOrderItem, Order, OrderItem, OrderItemOut, OrderOut,
    OrderPatch, OrderStatus, PublicRating,
};
pub use password::Password;
pub use patch::Patch;
pub use policy::{authorize, Action, Resource};
pub use product::{CreateProduct, Product, ProductCategory, ProductOut, ProductPatch, PublicProduct};
pub use user::{CreateUser, CurrentUser, UpdateUser, User, UserOut, UserPatch, UserRole};
pub use validation::fits_money_column;
