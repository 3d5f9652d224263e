//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::CartNotFound
            | Self::CartItemNotFound
            | Self::OrderNotFound
            | Self::BillingAddressNotFound
            | Self::PaymentNotFound
            | Self::GameNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::CouponAlreadyUsed => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,

            // 503 Service Unavailable (transient, the client can retry)
            Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (validation and business errors)
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::CartEmpty
            | Self::SelectionEmpty
            | Self::SelectionInvalid
            | Self::InvalidCoupon
            | Self::InvalidPaymentStatus => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::CartNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::OrderNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::PaymentNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::GameNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_checkout_validation_status() {
        assert_eq!(ErrorCode::CartEmpty.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::SelectionEmpty.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::SelectionInvalid.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidCoupon.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::CouponAlreadyUsed.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::AlreadyExists.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_auth_status() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::TokenInvalid.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::AdminRequired.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_system_status() {
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::TimeoutError.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
