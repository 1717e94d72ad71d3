//! Bearer token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::CurrentUser;
use crate::errors::AppError;

/// Resolve the bearer token to a user and store a [`CurrentUser`] in the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or_else(|| AppError::unauthorized("Not authenticated"))?;

    let user = state.services.auth().resolve_token(token).await?;
    tracing::debug!(user_id = %user.id, role = %user.role, "Request authenticated");

    request.extensions_mut().insert(CurrentUser::from(&user));

    Ok(next.run(request).await)
}
