//! Game Model (catalog pricing, read-only from the checkout side)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Authoritative price of a game as stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct GamePrice {
    pub app_id: i64,
    /// Current effective price
    #[serde(with = "rust_decimal::serde::float")]
    pub price_final: Decimal,
    /// Catalog discount already reflected in `price_final` (0-100)
    pub discount_percent: i32,
}
