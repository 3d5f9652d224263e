//! Unified error system for the storefront
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Cart errors
//! - 4xxx: Order errors
//! - 5xxx: Coupon and payment errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::CouponAlreadyUsed);
//!
//! let err = AppError::validation("Invalid app_id list")
//!     .with_detail("field", "app_ids");
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert!(!response.success);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult, ErrorBody};
