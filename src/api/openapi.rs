//! OpenAPI document served behind Swagger UI.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    order_handler, product_handler, public_handler, setup_handler, token_handler, user_handler,
};
use crate::domain::{
    CreateOrder, CreateOrderItem, CreateProduct, CreateUser, OrderItemOut, OrderOut, OrderPatch,
    OrderStatus, ProductCategory, ProductOut, ProductPatch, PublicProduct, PublicRating,
    UpdateUser, UserOut, UserRole,
};
use crate::services::{BootstrapAccount, Credentials, TokenResponse, TokenUser};
use crate::types::{
    ActionResponse, OrderItemPage, OrderPage, PaginationMeta, ProductPage, UserPage,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Food Truck API",
        version = "0.1.0",
        description = "Order management for a food truck: users, products, orders and their items"
    ),
    paths(
        token_handler::issue_token,
        setup_handler::run_setup,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::delete_user,
        product_handler::list_products,
        product_handler::get_product,
        product_handler::create_product,
        product_handler::update_product,
        product_handler::delete_product,
        order_handler::list_orders,
        order_handler::get_order,
        order_handler::list_order_items,
        order_handler::create_order,
        order_handler::update_order,
        order_handler::delete_order,
        public_handler::public_products,
        public_handler::public_ratings,
    ),
    components(
        schemas(
            UserRole,
            UserOut,
            CreateUser,
            UpdateUser,
            ProductCategory,
            ProductOut,
            CreateProduct,
            ProductPatch,
            PublicProduct,
            OrderStatus,
            OrderOut,
            OrderItemOut,
            CreateOrder,
            CreateOrderItem,
            OrderPatch,
            PublicRating,
            Credentials,
            TokenResponse,
            TokenUser,
            BootstrapAccount,
            ActionResponse,
            PaginationMeta,
            UserPage,
            ProductPage,
            OrderPage,
            OrderItemPage,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Bearer token issuance"),
        (name = "Setup", description = "First-run account bootstrap"),
        (name = "Users", description = "Staff accounts (admin only)"),
        (name = "Products", description = "Menu management"),
        (name = "Orders", description = "Order lifecycle"),
        (name = "Public", description = "Unauthenticated read-only feeds")
    )
)]
pub struct ApiDoc;

/// Registers the JWT bearer scheme referenced by `security(("bearer_auth" = []))`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token obtained from /api/v1/token"))
                        .build(),
                ),
            );
        }
    }
}
