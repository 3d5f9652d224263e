//! Coupons and per-user redemptions

use shared::models::Coupon;
use sqlx::PgExecutor;

/// Name of the `(user_id, coupon_id)` uniqueness constraint
pub const USAGE_UNIQUE_CONSTRAINT: &str = "user_coupon_usage_user_coupon_key";

/// Look up a coupon by its normalized (upper-case) code
pub async fn find_by_code(
    executor: impl PgExecutor<'_>,
    code: &str,
) -> Result<Option<Coupon>, sqlx::Error> {
    sqlx::query_as("SELECT id, code, discount_type, value FROM coupons WHERE code = $1")
        .bind(code)
        .fetch_optional(executor)
        .await
}

pub async fn has_usage(
    executor: impl PgExecutor<'_>,
    user_id: i64,
    coupon_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM user_coupon_usage WHERE user_id = $1 AND coupon_id = $2)",
    )
    .bind(user_id)
    .bind(coupon_id)
    .fetch_one(executor)
    .await
}

/// Record a redemption. Fails with a unique violation on
/// [`USAGE_UNIQUE_CONSTRAINT`] if the user already redeemed the coupon.
pub async fn insert_usage(
    executor: impl PgExecutor<'_>,
    user_id: i64,
    coupon_id: i64,
    order_id: i64,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO user_coupon_usage (user_id, coupon_id, order_id, used_at)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id)
    .bind(coupon_id)
    .bind(order_id)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}
