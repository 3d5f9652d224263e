//! Checkout: convert (part of) a user's cart into an immutable order
//!
//! The flow is cart snapshot → coupon validation → price evaluation →
//! order write, all inside one PostgreSQL transaction owned by
//! [`create_order`]. Any failure rolls everything back, so a failed
//! checkout leaves no order, no order items, no coupon redemption and an
//! untouched cart.

pub mod cart_snapshot;
pub mod coupon;
pub mod pricing;
mod writer;

pub use writer::create_order;

use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;

use crate::db;

/// Checkout options supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct CheckoutOptions {
    /// Games to purchase. `None` purchases the whole cart.
    pub app_ids: Option<Vec<i64>>,
    /// Raw coupon code, normalized before lookup
    pub discount_code: Option<String>,
    /// Initial order status, `pending` when absent
    pub order_status: Option<OrderStatus>,
    /// Must belong to the purchasing user
    pub billing_address_id: Option<i64>,
}

/// Checkout failure
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("user has no cart")]
    CartNotFound,

    #[error("cart is empty")]
    CartEmpty,

    #[error("selection is empty")]
    SelectionEmpty,

    #[error("selection contains games that are not in the cart: {missing:?}")]
    SelectionInvalid { missing: Vec<i64> },

    #[error("invalid coupon: {code}")]
    InvalidCoupon { code: String },

    #[error("coupon {code} has already been used")]
    CouponAlreadyUsed { code: String },

    #[error("games not found in catalog: {missing:?}")]
    GameNotFound { missing: Vec<i64> },

    #[error("billing address {0} not found")]
    BillingAddressNotFound(i64),

    #[error("checkout transaction timed out")]
    TransactionTimeout,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl CheckoutError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::CartNotFound => ErrorCode::CartNotFound,
            Self::CartEmpty => ErrorCode::CartEmpty,
            Self::SelectionEmpty => ErrorCode::SelectionEmpty,
            Self::SelectionInvalid { .. } => ErrorCode::SelectionInvalid,
            Self::InvalidCoupon { .. } => ErrorCode::InvalidCoupon,
            Self::CouponAlreadyUsed { .. } => ErrorCode::CouponAlreadyUsed,
            Self::GameNotFound { .. } => ErrorCode::GameNotFound,
            Self::BillingAddressNotFound(_) => ErrorCode::BillingAddressNotFound,
            Self::TransactionTimeout => ErrorCode::TimeoutError,
            Self::Database(_) => ErrorCode::DatabaseError,
        }
    }

    /// Whether the client may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransactionTimeout)
    }
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        if db::is_timeout(&e) {
            CheckoutError::TransactionTimeout
        } else {
            CheckoutError::Database(e)
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(e: CheckoutError) -> Self {
        let code = e.code();
        match e {
            CheckoutError::SelectionInvalid { missing } => {
                AppError::new(code).with_detail("missing_app_ids", json!(missing))
            }
            CheckoutError::GameNotFound { missing } => {
                AppError::new(code).with_detail("missing_app_ids", json!(missing))
            }
            CheckoutError::InvalidCoupon { code: coupon } => {
                AppError::new(code).with_detail("discount_code", coupon)
            }
            CheckoutError::CouponAlreadyUsed { code: coupon } => {
                AppError::new(code).with_detail("discount_code", coupon)
            }
            CheckoutError::BillingAddressNotFound(id) => {
                AppError::new(code).with_detail("billing_address_id", id)
            }
            CheckoutError::TransactionTimeout => AppError::new(code).with_detail("retryable", true),
            CheckoutError::Database(err) => {
                // Driver detail stays in the log
                tracing::error!(error = %err, "Checkout database error");
                AppError::new(code)
            }
            CheckoutError::CartNotFound
            | CheckoutError::CartEmpty
            | CheckoutError::SelectionEmpty => AppError::new(code),
        }
    }
}
