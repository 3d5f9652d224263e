//! Storefront service errors
//!
//! Handlers and services return [`ServiceError`] so `?` works on both sqlx
//! calls and business-rule [`AppError`]s. Database failures are classified
//! and logged once, when they are turned into an [`AppError`]; the driver
//! message never reaches the client.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db;

#[derive(Debug)]
pub enum ServiceError {
    /// Pool exhausted or statement cancelled; the request may be retried
    Timeout(sqlx::Error),
    /// Any other database failure
    Db(sqlx::Error),
    /// Business-rule error, passed through to the client
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        if db::is_timeout(&e) {
            ServiceError::Timeout(e)
        } else {
            ServiceError::Db(e)
        }
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Timeout(db_err) => {
                tracing::warn!(error = %db_err, "Database operation timed out");
                AppError::new(ErrorCode::TimeoutError).with_detail("retryable", true)
            }
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        AppError::from(self).into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
