//! Billing addresses (owned by the account service, read here)

use shared::models::BillingAddress;
use sqlx::PgExecutor;

/// Find an address only if it belongs to `user_id`
pub async fn find_owned(
    executor: impl PgExecutor<'_>,
    address_id: i64,
    user_id: i64,
) -> Result<Option<BillingAddress>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM billing_addresses WHERE id = $1 AND user_id = $2")
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
}
