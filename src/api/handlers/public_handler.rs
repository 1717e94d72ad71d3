//! Unauthenticated read-only feeds.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::AppState;
use crate::domain::{PublicProduct, PublicRating};
use crate::errors::AppResult;

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(public_products))
        .route("/orders", get(public_ratings))
}

/// Product catalogue
#[utoipa::path(
    get,
    path = "/api/v1/public/products",
    tag = "Public",
    responses((status = 200, description = "Every product", body = Vec<PublicProduct>))
)]
pub async fn public_products(State(state): State<AppState>) -> AppResult<Json<Vec<PublicProduct>>> {
    let products = state.services.products().list_public().await?;
    Ok(Json(products))
}

/// Items of every rated order
#[utoipa::path(
    get,
    path = "/api/v1/public/orders",
    tag = "Public",
    responses((status = 200, description = "Rated order items", body = Vec<PublicRating>))
)]
pub async fn public_ratings(State(state): State<AppState>) -> AppResult<Json<Vec<PublicRating>>> {
    let ratings = state.services.orders().list_public_ratings().await?;
    Ok(Json(ratings))
}
