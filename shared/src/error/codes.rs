//! Unified error codes for the storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Cart errors
//! - 4xxx: Order errors
//! - 5xxx: Coupon and payment errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility with the SPA client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Cart ====================
    /// User has no cart
    CartNotFound = 3001,
    /// Cart has no items
    CartEmpty = 3002,
    /// Selection matched no cart items
    SelectionEmpty = 3003,
    /// Selection references games that are not in the cart
    SelectionInvalid = 3004,
    /// Cart item not found
    CartItemNotFound = 3005,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Billing address not found or not owned by the user
    BillingAddressNotFound = 4002,

    // ==================== 5xxx: Coupon / Payment ====================
    /// Coupon code does not resolve to a coupon
    InvalidCoupon = 5001,
    /// Coupon already redeemed by this user
    CouponAlreadyUsed = 5002,
    /// Payment not found
    PaymentNotFound = 5101,
    /// Unknown payment status
    InvalidPaymentStatus = 5102,

    // ==================== 6xxx: Catalog ====================
    /// Game not found
    GameNotFound = 6001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Cart
            ErrorCode::CartNotFound => "Cart not found",
            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::SelectionEmpty => "No cart items match the selection",
            ErrorCode::SelectionInvalid => "Selection contains games that are not in the cart",
            ErrorCode::CartItemNotFound => "Cart item not found",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::BillingAddressNotFound => "Billing address not found",

            // Coupon / Payment
            ErrorCode::InvalidCoupon => "Invalid coupon",
            ErrorCode::CouponAlreadyUsed => "Coupon has already been used",
            ErrorCode::PaymentNotFound => "Payment not found",
            ErrorCode::InvalidPaymentStatus => "Invalid payment status",

            // Catalog
            ErrorCode::GameNotFound => "Game not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out, please retry",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            // Cart
            3001 => Ok(ErrorCode::CartNotFound),
            3002 => Ok(ErrorCode::CartEmpty),
            3003 => Ok(ErrorCode::SelectionEmpty),
            3004 => Ok(ErrorCode::SelectionInvalid),
            3005 => Ok(ErrorCode::CartItemNotFound),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::BillingAddressNotFound),

            // Coupon / Payment
            5001 => Ok(ErrorCode::InvalidCoupon),
            5002 => Ok(ErrorCode::CouponAlreadyUsed),
            5101 => Ok(ErrorCode::PaymentNotFound),
            5102 => Ok(ErrorCode::InvalidPaymentStatus),

            // Catalog
            6001 => Ok(ErrorCode::GameNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);
        assert_eq!(ErrorCode::CartNotFound.code(), 3001);
        assert_eq!(ErrorCode::SelectionInvalid.code(), 3004);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::InvalidCoupon.code(), 5001);
        assert_eq!(ErrorCode::CouponAlreadyUsed.code(), 5002);
        assert_eq!(ErrorCode::GameNotFound.code(), 6001);
        assert_eq!(ErrorCode::TimeoutError.code(), 9004);
    }

    #[test]
    fn test_try_from_covers_every_code() {
        let all = [
            ErrorCode::Success,
            ErrorCode::Unknown,
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::AlreadyExists,
            ErrorCode::InvalidRequest,
            ErrorCode::InvalidFormat,
            ErrorCode::RequiredField,
            ErrorCode::ValueOutOfRange,
            ErrorCode::NotAuthenticated,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::PermissionDenied,
            ErrorCode::AdminRequired,
            ErrorCode::CartNotFound,
            ErrorCode::CartEmpty,
            ErrorCode::SelectionEmpty,
            ErrorCode::SelectionInvalid,
            ErrorCode::CartItemNotFound,
            ErrorCode::OrderNotFound,
            ErrorCode::BillingAddressNotFound,
            ErrorCode::InvalidCoupon,
            ErrorCode::CouponAlreadyUsed,
            ErrorCode::PaymentNotFound,
            ErrorCode::InvalidPaymentStatus,
            ErrorCode::GameNotFound,
            ErrorCode::InternalError,
            ErrorCode::DatabaseError,
            ErrorCode::TimeoutError,
            ErrorCode::ConfigError,
        ];
        for code in all {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(
            InvalidErrorCode(4242).to_string(),
            "invalid error code: 4242"
        );
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::CouponAlreadyUsed).unwrap();
        assert_eq!(json, "5002");
        let code: ErrorCode = serde_json::from_str("3004").unwrap();
        assert_eq!(code, ErrorCode::SelectionInvalid);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }
}
