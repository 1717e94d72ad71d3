//! Product handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{CreateProduct, CurrentUser, ProductOut, ProductPatch};
use crate::errors::AppResult;
use crate::types::{ActionResponse, Created, Paginated, PaginationParams, ProductPage};

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product)
                .put(update_product)
                .patch(update_product)
                .delete(delete_product),
        )
}

/// List products
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_products(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<ProductOut>>> {
    let page = state.services.products().list(&current_user, params).await?;
    Ok(Json(page))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = ProductOut),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductOut>> {
    let product = state.services.products().get(&current_user, &id).await?;
    Ok(Json(product))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = ActionResponse),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Product already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateProduct>,
) -> AppResult<Created<ActionResponse>> {
    let product = state.services.products().create(&current_user, dto).await?;
    Ok(Created(ActionResponse::created(product.id)))
}

/// Update the supplied fields of a product (PUT and PATCH behave the same)
#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Product ID")),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Product updated", body = ActionResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<ProductPatch>,
) -> AppResult<Json<ActionResponse>> {
    let product = state
        .services
        .products()
        .update(&current_user, &id, patch)
        .await?;
    Ok(Json(ActionResponse::updated(product.id)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = ActionResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ActionResponse>> {
    state.services.products().delete(&current_user, &id).await?;
    Ok(Json(ActionResponse::deleted(id)))
}
