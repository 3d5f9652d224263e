//! Coupon Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::UnknownVariant;

/// How a coupon's `value` is applied to the subtotal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `value` percent of the subtotal (10 = 10%)
    Percentage,
    /// `value` currency units off the subtotal
    FixedAmount,
}

impl DiscountType {
    /// Parse from database string value
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "percentage" => Some(Self::Percentage),
            "fixed_amount" => Some(Self::FixedAmount),
            _ => None,
        }
    }

    /// Database string representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::FixedAmount => "fixed_amount",
        }
    }
}

impl TryFrom<String> for DiscountType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_db(&value).ok_or(UnknownVariant {
            kind: "discount_type",
            value,
        })
    }
}

/// Coupon entity, looked up by its upper-cased code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Coupon {
    pub id: i64,
    pub code: String,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub discount_type: DiscountType,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}
