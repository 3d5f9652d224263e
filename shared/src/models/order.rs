//! Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BillingAddress, UnknownVariant};

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Canceled,
    Failed,
    Refunded,
}

impl OrderStatus {
    /// Parse from database string value
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "canceled" => Some(Self::Canceled),
            "failed" => Some(Self::Failed),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }

    /// Database string representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Canceled => "canceled",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_db(&value).ok_or(UnknownVariant {
            kind: "order_status",
            value,
        })
    }
}

/// Order header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub order_status: OrderStatus,
    /// Amount charged, after the coupon discount
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    /// Normalized coupon code, if one was applied
    pub discount_code: Option<String>,
    /// Absolute coupon discount, always within `[0, subtotal]`
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_order: Decimal,
    pub billing_address_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Immutable price snapshot of one purchased game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub app_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price_paid: Decimal,
    pub discount_percent_applied: i32,
}

/// Order with its line items (checkout result, list entries)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Order detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    /// Best-effort enrichment, `null` when it could not be loaded
    pub billing_address: Option<BillingAddress>,
}
