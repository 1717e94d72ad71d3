//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    order_routes, product_routes, public_routes, setup_routes, token_routes, user_routes,
};
use super::middleware::{auth_middleware, security_headers_middleware};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::{API_PREFIX, SERVICE_NAME};

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/users", user_routes())
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api = Router::new()
        .merge(token_routes())
        .merge(setup_routes())
        .nest("/public", public_routes())
        .merge(protected);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest(API_PREFIX, api)
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(security_headers_middleware)),
        )
        .with_state(state)
}

async fn root() -> &'static str {
    "Food Truck API"
}

#[derive(Serialize)]
struct HealthResponse {
    service: &'static str,
    status: &'static str,
    services: ServiceHealth,
}

#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    cache: ServiceStatus,
}

#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<E: std::fmt::Display> From<Result<(), E>> for ServiceStatus {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => ServiceStatus {
                status: "healthy",
                error: None,
            },
            Err(e) => ServiceStatus {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }
}

/// Health check endpoint with database and cache connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (db, cache) = tokio::join!(state.database.ping(), state.cache.ping());
    let database = ServiceStatus::from(db);
    let cache = ServiceStatus::from(cache);

    let all_healthy = database.error.is_none() && cache.error.is_none();

    let response = HealthResponse {
        service: SERVICE_NAME,
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth { database, cache },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
