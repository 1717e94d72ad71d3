//! Token endpoint.

use axum::{extract::State, response::Json, routing::post, Router};

use crate::api::extractors::ValidatedForm;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::{Credentials, TokenResponse};

pub fn token_routes() -> Router<AppState> {
    Router::new().route("/token", post(issue_token))
}

/// Exchange username and password for a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/token",
    tag = "Authentication",
    request_body(content = Credentials, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Incorrect username or password"),
        (status = 422, description = "Missing username or password")
    )
)]
pub async fn issue_token(
    State(state): State<AppState>,
    ValidatedForm(credentials): ValidatedForm<Credentials>,
) -> AppResult<Json<TokenResponse>> {
    let token = state.services.auth().login(credentials).await?;
    Ok(Json(token))
}
