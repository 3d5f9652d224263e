//! Payments

use rust_decimal::Decimal;
use shared::models::{Payment, PaymentStatus};
use sqlx::PgExecutor;

pub async fn insert(
    executor: impl PgExecutor<'_>,
    order_id: i64,
    amount: Decimal,
    provider: Option<&str>,
    now: i64,
) -> Result<Payment, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO payments (order_id, amount, payment_status, provider, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)
         RETURNING *",
    )
    .bind(order_id)
    .bind(amount)
    .bind(PaymentStatus::Initiated.as_db())
    .bind(provider)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id(
    executor: impl PgExecutor<'_>,
    payment_id: i64,
) -> Result<Option<Payment>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM payments WHERE id = $1")
        .bind(payment_id)
        .fetch_optional(executor)
        .await
}

/// Write the new status. `None` when the payment does not exist.
pub async fn update_status(
    executor: impl PgExecutor<'_>,
    payment_id: i64,
    status: PaymentStatus,
    now: i64,
) -> Result<Option<Payment>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE payments SET payment_status = $1, updated_at = $2 WHERE id = $3 RETURNING *",
    )
    .bind(status.as_db())
    .bind(now)
    .bind(payment_id)
    .fetch_optional(executor)
    .await
}
