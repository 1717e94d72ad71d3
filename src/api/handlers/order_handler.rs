//! Order handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{CreateOrder, CurrentUser, OrderItemOut, OrderOut, OrderPatch};
use crate::errors::AppResult;
use crate::types::{ActionResponse, Created, OrderItemPage, OrderPage, Paginated, PaginationParams};

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order).patch(update_order).delete(delete_order))
        .route("/:id/items", get(list_order_items))
}

/// List orders
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of orders", body = OrderPage),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_orders(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<OrderOut>>> {
    let page = state.services.orders().list(&current_user, params).await?;
    Ok(Json(page))
}

/// Get an order with its items
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order", body = OrderOut),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderOut>> {
    let order = state.services.orders().get(&current_user, &id).await?;
    Ok(Json(order))
}

/// List the items of one order
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/items",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Order ID"), PaginationParams),
    responses(
        (status = 200, description = "One page of order items", body = OrderItemPage),
        (status = 404, description = "Order not found")
    )
)]
pub async fn list_order_items(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<OrderItemOut>>> {
    let page = state
        .services
        .orders()
        .list_items(&current_user, &id, params)
        .await?;
    Ok(Json(page))
}

/// Place an order (admin and attendant)
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order created", body = ActionResponse),
        (status = 403, description = "Kitchen staff cannot create orders"),
        (status = 422, description = "Unknown product or invalid items")
    )
)]
pub async fn create_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateOrder>,
) -> AppResult<Created<ActionResponse>> {
    let order = state.services.orders().create(&current_user, dto).await?;
    Ok(Created(ActionResponse::created(order.id)))
}

/// Change status, rating or notes
#[utoipa::path(
    patch,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Order ID")),
    request_body = OrderPatch,
    responses(
        (status = 200, description = "Order updated", body = ActionResponse),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<OrderPatch>,
) -> AppResult<Json<ActionResponse>> {
    let order = state
        .services
        .orders()
        .update(&current_user, &id, patch)
        .await?;
    Ok(Json(ActionResponse::updated(order.id)))
}

/// Delete a pending order (admin and attendant)
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted", body = ActionResponse),
        (status = 400, description = "Order is not pending"),
        (status = 403, description = "Kitchen staff cannot delete orders"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn delete_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ActionResponse>> {
    state.services.orders().delete(&current_user, &id).await?;
    Ok(Json(ActionResponse::deleted(id)))
}
