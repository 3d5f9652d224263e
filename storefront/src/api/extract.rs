//! Request extractors

use axum::Json;
use axum::extract::{FromRequest, Request, rejection::JsonRejection};
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};
use validator::Validate;

/// JSON body that is deserialized and then checked with [`Validate`].
///
/// Both failures are rejected with the error envelope instead of axum's
/// plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                AppError::with_message(ErrorCode::InvalidFormat, rejection.body_text())
            })?;

        value.validate().map_err(|errors| {
            AppError::validation(errors.to_string()).with_detail(
                "fields",
                serde_json::to_value(&errors).unwrap_or_default(),
            )
        })?;

        Ok(ValidatedJson(value))
    }
}
