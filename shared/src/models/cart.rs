//! Cart Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cart entity (one per user)
///
/// `total_price` is a cache of the sum of the live prices of the cart's
/// items. It is only written by the cart mutation paths and by checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub updated_at: i64,
}

/// Cart line joined with the live catalog price (for cart views)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartLine {
    pub app_id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_final: Decimal,
    pub discount_percent: i32,
    pub added_at: i64,
}

/// Cart as returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartView {
    /// `None` until the first cart mutation creates the cart
    pub cart_id: Option<i64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub items: Vec<CartLine>,
}

impl CartView {
    /// View of a user that has never added anything
    pub fn empty() -> Self {
        Self {
            cart_id: None,
            total_price: Decimal::ZERO,
            items: Vec::new(),
        }
    }
}
