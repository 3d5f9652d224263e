//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the only error type that crosses the HTTP boundary:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (offending ids, field names, ...)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create an invalid token error
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    /// Create a token expired error
    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }
}

/// Error payload carried by a failed [`ApiResponse`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub message: String,
    /// Numeric [`ErrorCode`]
    pub code: u16,
    /// Additional error details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

/// Unified API response envelope
///
/// ```json
/// { "success": true, "data": { ... }, "message": "Order created" }
/// { "success": false, "error": { "message": "Invalid coupon", "code": 5001 } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Response data (present on success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Optional human-readable message (success only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error payload (present on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// Create a success response with custom message and data
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create a success response without data
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
            error: None,
        }
    }

    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(ErrorBody {
                message: err.message.clone(),
                code: err.code.code(),
                details: err.details.clone(),
            }),
        }
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(ErrorBody {
                message: err.message,
                code: err.code.code(),
                details: err.details,
            }),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        // Callers log at the point where the cause is still known
        (self.http_status(), Json(ApiResponse::<()>::error(&self))).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = match &self.error {
            None => http::StatusCode::OK,
            Some(err) => ErrorCode::try_from(err.code)
                .map(|c| c.http_status())
                .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR),
        };

        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::CartNotFound);
        assert_eq!(err.code, ErrorCode::CartNotFound);
        assert_eq!(err.message, "Cart not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::new(ErrorCode::SelectionInvalid)
            .with_detail("missing_app_ids", serde_json::json!([99]))
            .with_detail("reason", "not in cart");

        let details = err.details.unwrap();
        assert_eq!(details.get("missing_app_ids").unwrap(), &serde_json::json!([99]));
        assert_eq!(details.get("reason").unwrap(), "not in cart");
    }

    #[test]
    fn test_app_error_convenience_constructors() {
        assert_eq!(AppError::validation("x").code, ErrorCode::ValidationFailed);
        assert_eq!(AppError::not_authenticated().code, ErrorCode::NotAuthenticated);
        assert_eq!(AppError::invalid_token("bad").code, ErrorCode::TokenInvalid);
        assert_eq!(AppError::invalid_request("page").code, ErrorCode::InvalidRequest);
        assert_eq!(AppError::token_expired().code, ErrorCode::TokenExpired);
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::OrderNotFound, "Order 7 not found");
        assert_eq!(format!("{}", err), "Order 7 not found");
    }

    #[test]
    fn test_success_envelope_shape() {
        let response = ApiResponse::success_with_message("Order created", 42);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": true, "data": 42, "message": "Order created" })
        );
    }

    #[test]
    fn test_success_without_message_omits_field() {
        let json = serde_json::to_value(ApiResponse::success("hello")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": "hello" }));
    }

    #[test]
    fn test_error_envelope_shape() {
        let err = AppError::new(ErrorCode::CouponAlreadyUsed);
        let json = serde_json::to_value(ApiResponse::<()>::error(&err)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "error": { "message": "Coupon has already been used", "code": 5002 }
            })
        );
    }

    #[test]
    fn test_api_response_from_error() {
        let response: ApiResponse<String> = AppError::new(ErrorCode::InternalError).into();
        assert!(!response.success);
        assert!(response.data.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.code, 9001);
        assert_eq!(error.message, "Internal server error");
    }

    #[test]
    fn test_api_response_deserialize() {
        let json = r#"{"success":true,"data":42}"#;
        let response: ApiResponse<i32> = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.data, Some(42));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_into_response_status() {
        use axum::response::IntoResponse;

        let response = AppError::new(ErrorCode::CouponAlreadyUsed).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response =
            ApiResponse::<()>::error(&AppError::new(ErrorCode::CartEmpty)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiResponse::success(1).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
