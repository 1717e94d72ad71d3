//! Shared request/response types.

mod pagination;
mod response;

pub use pagination::{
    OrderItemPage, OrderPage, Paginated, PaginationMeta, PaginationParams, ProductPage, UserPage,
};
pub use response::{ActionResponse, Created};
