//! Payment Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderStatus, UnknownVariant};

/// Payment provider status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Initiated,
    Authorized,
    Captured,
    Failed,
    Canceled,
    Refunded,
}

impl PaymentStatus {
    /// Parse from database / request string value
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "initiated" => Some(Self::Initiated),
            "authorized" => Some(Self::Authorized),
            "captured" => Some(Self::Captured),
            "failed" => Some(Self::Failed),
            "canceled" => Some(Self::Canceled),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }

    /// Database string representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::Authorized => "authorized",
            Self::Captured => "captured",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Refunded => "refunded",
        }
    }

    /// Order status implied by this payment status.
    ///
    /// `Initiated` maps to `Pending`, which callers treat as "leave the
    /// order untouched".
    pub fn order_status(&self) -> OrderStatus {
        match self {
            Self::Initiated => OrderStatus::Pending,
            Self::Authorized | Self::Captured => OrderStatus::Paid,
            Self::Canceled => OrderStatus::Canceled,
            Self::Failed => OrderStatus::Failed,
            Self::Refunded => OrderStatus::Refunded,
        }
    }
}

impl TryFrom<String> for PaymentStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_db(&value).ok_or(UnknownVariant {
            kind: "payment_status",
            value,
        })
    }
}

/// Payment entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub payment_status: PaymentStatus,
    pub provider: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_to_order_status_table() {
        assert_eq!(PaymentStatus::Initiated.order_status(), OrderStatus::Pending);
        assert_eq!(PaymentStatus::Authorized.order_status(), OrderStatus::Paid);
        assert_eq!(PaymentStatus::Captured.order_status(), OrderStatus::Paid);
        assert_eq!(PaymentStatus::Canceled.order_status(), OrderStatus::Canceled);
        assert_eq!(PaymentStatus::Failed.order_status(), OrderStatus::Failed);
        assert_eq!(PaymentStatus::Refunded.order_status(), OrderStatus::Refunded);
    }

    #[test]
    fn test_payment_status_parse() {
        assert_eq!(PaymentStatus::from_db("captured"), Some(PaymentStatus::Captured));
        assert_eq!(PaymentStatus::from_db("Captured"), None);
        assert!(PaymentStatus::try_from("settled".to_string()).is_err());
    }
}
