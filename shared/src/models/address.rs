//! Billing Address Model

use serde::{Deserialize, Serialize};

/// Billing address owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BillingAddress {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}
