//! Body extractors that run `validator` rules before the handler sees the value.
//!
//! Malformed bodies and rule violations both become `422` responses in the
//! standard error envelope.

use axum::{
    async_trait,
    extract::{
        rejection::{FormRejection, JsonRejection},
        FromRequest, Request,
    },
    Form, Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::{AppError, AppResult};

/// JSON body that has already passed its rules.
///
/// ```rust,ignore
/// async fn create_product(ValidatedJson(dto): ValidatedJson<CreateProduct>) {
///     // dto.price is already known to be positive
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

/// URL-encoded form body that has already passed its rules (token endpoint).
pub struct ValidatedForm<T>(pub T);

fn checked<T: Validate>(value: T) -> AppResult<T> {
    value.validate()?;
    Ok(value)
}

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        checked(value).map(ValidatedJson)
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Form<T>: FromRequest<S, Rejection = FormRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        checked(value).map(ValidatedForm)
    }
}
