//! One-time bootstrap endpoint.

use axum::{extract::State, routing::post, Router};

use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::BootstrapAccount;
use crate::types::Created;

pub fn setup_routes() -> Router<AppState> {
    Router::new().route("/setup", post(run_setup))
}

/// Create the built-in admin and integration accounts
///
/// The generated passwords appear in this response only.
#[utoipa::path(
    post,
    path = "/api/v1/setup",
    tag = "Setup",
    responses(
        (status = 201, description = "Accounts created", body = Vec<BootstrapAccount>),
        (status = 409, description = "Setup already completed")
    )
)]
pub async fn run_setup(State(state): State<AppState>) -> AppResult<Created<Vec<BootstrapAccount>>> {
    let accounts = state.services.setup().bootstrap().await?;
    Ok(Created(accounts))
}
