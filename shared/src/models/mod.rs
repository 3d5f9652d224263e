//! Data models
//!
//! Shared between the storefront server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL / BIGINT). Money is `Decimal`
//! serialized as a JSON number.

pub mod address;
pub mod cart;
pub mod coupon;
pub mod game;
pub mod order;
pub mod payment;

// Re-exports
pub use address::*;
pub use cart::*;
pub use coupon::*;
pub use game::*;
pub use order::*;
pub use payment::*;

/// Error returned when a database string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
