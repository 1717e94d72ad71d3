use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Confirmation envelope for create/update/delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActionResponse {
    pub id: String,
    #[schema(example = "created")]
    pub action: String,
}

impl ActionResponse {
    pub fn created(id: impl Into<String>) -> Self {
        Self::new(id, "created")
    }

    pub fn updated(id: impl Into<String>) -> Self {
        Self::new(id, "updated")
    }

    pub fn deleted(id: impl Into<String>) -> Self {
        Self::new(id, "deleted")
    }

    fn new(id: impl Into<String>, action: &str) -> Self {
        Self {
            id: id.into(),
            action: action.to_string(),
        }
    }
}

/// 201 Created with a JSON body
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}
