//! `ValidatedJson` extractor: a JSON body that passed `validator` checks.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use spooldb_core::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// JSON request body deserialized into `T` and validated.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest<AppState> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(format!("Invalid request body: {}", e.body_text())))?;
        validate_input(&value)?;
        Ok(Self(value))
    }
}

/// Run `validator` checks, flattening the errors into one message.
pub(crate) fn validate_input<T: Validate>(value: &T) -> Result<(), AppError> {
    value
        .validate()
        .map_err(|errors| AppError::validation(format!("Validation failed: {errors}")))
}
